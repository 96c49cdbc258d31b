//! # Group registry
//!
//! Per-group-key side table tracking collapsed state and the cached
//! placeholder record. Keyed by [`GroupKey`], never by group object
//! identity — the source replaces group objects wholesale on regroup and
//! reload, and this state must survive that.
//!
//! The registry is a cheap cloneable handle over shared state so a linked
//! partner view (a locked/split companion showing the same groups) can
//! mirror collapsed-state writes into its own table.

use gridkit_model::{GroupKey, Record};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Side-table entry for one observed group key
#[derive(Debug, Clone, Default)]
pub struct MetaGroup {
    pub collapsed: bool,
    /// Lazily created, then cached for the life of the key
    pub placeholder: Option<Record>,
}

/// Shared per-key table of [`MetaGroup`]s
#[derive(Clone, Default)]
pub struct GroupRegistry {
    inner: Rc<RefCell<HashMap<GroupKey, MetaGroup>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `key`, created on first touch with the given collapsed
    /// default
    pub fn ensure(&self, key: &GroupKey, collapsed_default: bool) -> MetaGroup {
        self.inner
            .borrow_mut()
            .entry(key.clone())
            .or_insert_with(|| MetaGroup {
                collapsed: collapsed_default,
                placeholder: None,
            })
            .clone()
    }

    pub fn is_collapsed(&self, key: &GroupKey) -> bool {
        self.inner
            .borrow()
            .get(key)
            .map(|m| m.collapsed)
            .unwrap_or(false)
    }

    pub fn set_collapsed(&self, key: &GroupKey, collapsed: bool) {
        self.inner
            .borrow_mut()
            .entry(key.clone())
            .or_default()
            .collapsed = collapsed;
    }

    /// The group's placeholder, creating and caching it on first use.
    ///
    /// The placeholder carries the grouping field set to the key; the same
    /// instance is handed out for the life of the key so derived views can
    /// locate it by identity across resynchronizations.
    pub fn placeholder(&self, key: &GroupKey, group_field: &str) -> Record {
        let mut inner = self.inner.borrow_mut();
        let meta = inner.entry(key.clone()).or_default();
        meta.placeholder
            .get_or_insert_with(|| Record::placeholder(group_field, key.clone()))
            .clone()
    }

    /// The cached placeholder, if one was ever created for `key`
    pub fn cached_placeholder(&self, key: &GroupKey) -> Option<Record> {
        self.inner
            .borrow()
            .get(key)
            .and_then(|m| m.placeholder.clone())
    }

    pub fn contains(&self, key: &GroupKey) -> bool {
        self.inner.borrow().contains_key(key)
    }

    pub fn keys(&self) -> Vec<GroupKey> {
        self.inner.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }
}
