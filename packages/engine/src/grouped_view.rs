//! # GroupedView facade
//!
//! Public surface of the engine: binds to exactly one source at a time,
//! receives that source's mutation notifications via [`notify`], and
//! exposes the derived flattened view plus the collapse/expand commands.
//!
//! Two index spaces coexist and stay separately named: the *visible* space
//! (`len`, `index_of` — placeholders count, collapsed members do not) and
//! the *total* space (`total_len`, `index_of_total` — the full ungrouped
//! source order, ignoring collapse state).
//!
//! [`notify`]: GroupedView::notify

use crate::config::GroupingConfig;
use crate::events::{SubscriptionId, ViewEvent};
use crate::registry::GroupRegistry;
use crate::translator::{EventTranslator, GroupRef};
use gridkit_model::{GroupKey, InternalId, Record, RecordId, RecordSource, SourceEvent};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Derived, collapsible, flattened view over a grouped source
pub struct GroupedView<S: RecordSource> {
    source: Option<Rc<RefCell<S>>>,
    translator: EventTranslator,
}

impl<S: RecordSource> GroupedView<S> {
    /// Build a view bound to `source` and run the initial sync pass
    pub fn new(source: Rc<RefCell<S>>, config: GroupingConfig) -> Self {
        let mut view = GroupedView {
            source: Some(source),
            translator: EventTranslator::new(config),
        };
        if let Some(source) = view.source.clone() {
            view.translator.on_data_changed(source.as_ref());
        }
        view
    }

    /// Rebind to a new source.
    ///
    /// All derived state (view contents, group side table) is dropped and
    /// rebuilt from the new source; subscribers stay registered.
    pub fn bind(&mut self, source: Rc<RefCell<S>>) {
        debug!(
            "[GroupedView] binding to source '{}'",
            source.borrow().source_id()
        );
        self.translator.reset();
        self.source = Some(source);
        if let Some(source) = self.source.clone() {
            self.translator.on_data_changed(source.as_ref());
        }
    }

    /// Unbind and clear all derived state and subscriptions.
    ///
    /// Further notifications and commands are ignored.
    pub fn destroy(&mut self) {
        self.translator.reset();
        self.translator.clear_subscribers();
        self.source = None;
    }

    /// Feed one source mutation notification through the translator
    pub fn notify(&mut self, event: SourceEvent) {
        let Some(source) = self.source.clone() else {
            debug!("[GroupedView] notification after destroy, ignoring");
            return;
        };
        let source = source.as_ref();
        match event {
            SourceEvent::DataChanged => self.translator.on_data_changed(source),
            SourceEvent::GroupChange { grouper } => {
                self.translator.on_group_change(source, grouper)
            }
            SourceEvent::IdChanged {
                record,
                old_id,
                new_id,
            } => self.translator.on_id_changed(&record, &old_id, &new_id),
            SourceEvent::Update {
                record,
                op,
                changed_fields,
            } => self.translator.on_update(source, &record, op, &changed_fields),
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&ViewEvent) + 'static) -> SubscriptionId {
        self.translator.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.translator.unsubscribe(id)
    }

    // ---- visible index space ----

    /// Visible row count: one per collapsed group, one per visible record
    pub fn len(&self) -> usize {
        self.translator.view().len()
    }

    pub fn is_empty(&self) -> bool {
        self.translator.view().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.translator.view().get(index)
    }

    pub fn get_by_id(&self, id: &RecordId) -> Option<&Record> {
        self.translator.view().get_by_id(id)
    }

    pub fn get_by_internal_id(&self, id: InternalId) -> Option<&Record> {
        self.translator.view().get_by_internal_id(id)
    }

    /// Visible rows in `[start, end)`
    pub fn range(&self, start: usize, end: usize) -> &[Record] {
        self.translator.view().range(start, end)
    }

    /// Visit every visible row in order
    pub fn each(&self, f: impl FnMut(&Record)) {
        self.translator.view().each(f)
    }

    /// Visible position of a record; `None` while it is hidden inside a
    /// collapsed group (or unknown)
    pub fn index_of(&self, record: &Record) -> Option<usize> {
        self.translator.view().position_of_internal(record.internal_id())
    }

    // ---- total index space ----

    /// Record count of the full, ungrouped source
    pub fn total_len(&self) -> usize {
        self.source.as_ref().map(|s| s.borrow().len()).unwrap_or(0)
    }

    /// Position in the full, ungrouped source order, ignoring collapse
    /// state. `None` for placeholders and unknown records.
    pub fn index_of_total(&self, record: &Record) -> Option<usize> {
        if record.is_placeholder() {
            return None;
        }
        self.source
            .as_ref()
            .and_then(|s| s.borrow().record_index(record.id()))
    }

    // ---- grouping commands ----

    /// Collapse a group by key or resolved group; false when nothing
    /// happened
    pub fn collapse_group(&mut self, group: impl Into<GroupRef>) -> bool {
        let Some(source) = self.source.clone() else {
            return false;
        };
        self.translator.collapse_group(source.as_ref(), group.into())
    }

    /// Expand a group by key or resolved group; false when nothing happened
    pub fn expand_group(&mut self, group: impl Into<GroupRef>) -> bool {
        let Some(source) = self.source.clone() else {
            return false;
        };
        self.translator.expand_group(source.as_ref(), group.into())
    }

    pub fn toggle_group(&mut self, group: impl Into<GroupRef>) -> bool {
        let Some(source) = self.source.clone() else {
            return false;
        };
        let group = group.into();
        let key = match &group {
            GroupRef::Key(key) => key.clone(),
            GroupRef::Group(group) => group.key().clone(),
        };
        if self.translator.registry().is_collapsed(&key) {
            self.translator.expand_group(source.as_ref(), group)
        } else {
            self.translator.collapse_group(source.as_ref(), group)
        }
    }

    pub fn collapse_all(&mut self) {
        let Some(source) = self.source.clone() else {
            return;
        };
        let groups = source.borrow().groups();
        for group in groups {
            self.translator
                .collapse_group(source.as_ref(), GroupRef::Group(group));
        }
    }

    pub fn expand_all(&mut self) {
        let Some(source) = self.source.clone() else {
            return;
        };
        let groups = source.borrow().groups();
        for group in groups {
            self.translator
                .expand_group(source.as_ref(), GroupRef::Group(group));
        }
    }

    pub fn is_collapsed(&self, key: impl Into<GroupKey>) -> bool {
        self.translator.registry().is_collapsed(&key.into())
    }

    /// Name of the active grouping field, if any
    pub fn group_field(&self) -> Option<String> {
        self.source.as_ref().and_then(|s| s.borrow().group_field())
    }

    // ---- partner linking ----

    /// Handle to this view's group side table, for linking from a partner
    pub fn registry(&self) -> GroupRegistry {
        self.translator.registry()
    }

    /// Mirror this view's collapsed-state writes into a companion view's
    /// registry (e.g. the locked half of a split grid)
    pub fn link_partner(&mut self, partner: GroupRegistry) {
        self.translator.link_partner(partner);
    }
}
