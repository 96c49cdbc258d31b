//! The contract a record source exposes to derived views.

use crate::group::{Group, GroupKey, GrouperSpec};
use crate::record::{Record, RecordId};

/// Read interface of an externally-owned record collection.
///
/// A source owns its records, decides how they are grouped, and notifies
/// observers of mutations via [`SourceEvent`](crate::SourceEvent)s. Derived
/// views hold the source behind `Rc<RefCell<..>>` and only read it while
/// handling a notification.
///
/// Group objects returned here are rebuilt wholesale on regroup/reload;
/// observers must key any per-group state by [`GroupKey`], never by group
/// identity.
pub trait RecordSource {
    /// Identifier for diagnostics
    fn source_id(&self) -> &str;

    /// Total record count, ignoring any grouping
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records in `[start, end)` source order; out-of-range is clamped
    fn range(&self, start: usize, end: usize) -> Vec<Record>;

    /// Current groups in presentation order; empty when not grouped
    fn groups(&self) -> Vec<Group>;

    /// The active grouper, if grouping is applied
    fn grouper(&self) -> Option<GrouperSpec>;

    /// Name of the grouping field, if grouping is applied
    fn group_field(&self) -> Option<String> {
        self.grouper().map(|g| g.field().to_string())
    }

    /// Position of a record in the full, ungrouped order
    fn record_index(&self, id: &RecordId) -> Option<usize>;

    /// Look up a group by key
    fn resolve_group(&self, key: &GroupKey) -> Option<Group>;

    /// Replace the active grouper and regroup.
    ///
    /// Called by observers that detected degenerate keys and know an
    /// explicit key function for the grouping field.
    fn regroup(&mut self, spec: GrouperSpec);
}
