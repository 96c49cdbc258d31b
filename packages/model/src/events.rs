//! Source-side mutation notifications.
//!
//! A source raises these after mutating itself; the host forwards them to
//! whatever derived views observe that source. Events carry record clones,
//! never references into the source, so a handler can hold them freely.

use crate::group::GrouperSpec;
use crate::record::{Record, RecordId};
use serde::{Deserialize, Serialize};

/// Kind of record operation reported by an `Update` notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateOp {
    /// In-place field edit (also used for synthetic member refreshes)
    Edit,
    Add,
    Remove,
    /// Pending changes committed
    Commit,
    /// Pending changes rejected
    Reject,
}

/// Mutation notification raised by a source
#[derive(Debug, Clone)]
pub enum SourceEvent {
    /// Contents changed in a way that may affect count, order, or group
    /// membership (load, add, remove, sort, filter)
    DataChanged,

    /// Grouping was applied, replaced, or removed (`grouper: None`)
    GroupChange { grouper: Option<GrouperSpec> },

    /// A record's business id was rewritten; element order is unaffected
    IdChanged {
        record: Record,
        old_id: RecordId,
        new_id: RecordId,
    },

    /// A single record's fields changed without any structural effect
    Update {
        record: Record,
        op: UpdateOp,
        changed_fields: Vec<String>,
    },
}
