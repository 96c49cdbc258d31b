//! # View events
//!
//! Structural and content notifications emitted to subscribers, plus the
//! subscriber channel itself.
//!
//! Two event families: *structural* events (`Refresh`, `Replace`) describe
//! a change in the shape of the view; `Update` describes a change to an
//! existing element's content. `BatchBegin`/`BatchEnd` bracket a matched
//! set of updates so a presentation layer can defer expensive layout
//! recomputation until the scope closes — they are a logical marker, not a
//! concurrency primitive.
//!
//! Fan-out is synchronous and registration-ordered; a handler runs to
//! completion before the next one starts.

use gridkit_model::{GroupKey, GrouperSpec, Record, UpdateOp};

/// Notification emitted by a grouped view
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// View contents were rebuilt; consumers should re-read the full range
    Refresh,

    /// Exact splice: `removed` elements at `index` became `added`
    Replace {
        index: usize,
        removed: Vec<Record>,
        added: Vec<Record>,
    },

    /// An existing element's content changed
    Update {
        record: Record,
        op: Option<UpdateOp>,
        changed_fields: Option<Vec<String>>,
    },

    /// The source's grouper was applied, replaced, or removed
    GroupChange { grouper: Option<GrouperSpec> },

    /// A collapsed group was expanded (preceded by its `Replace`)
    GroupExpand { key: GroupKey },

    /// An expanded group was collapsed (preceded by its `Replace`)
    GroupCollapse { key: GroupKey },

    /// Start of an atomic batch of updates
    BatchBegin,

    /// End of an atomic batch of updates
    BatchEnd,
}

/// Handle returned by [`Subscribers::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Explicit subscriber list with synchronous, registration-ordered fan-out
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Box<dyn FnMut(&ViewEvent)>)>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&ViewEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Returns false when the id was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sid, _)| *sid != id);
        self.handlers.len() != before
    }

    pub fn emit(&mut self, event: &ViewEvent) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.handlers.len())
            .finish()
    }
}
