//! # Event translation
//!
//! Turns low-level source mutation notifications into the higher-level
//! structural events consumers subscribe to, and owns the collapse/expand
//! state machine.
//!
//! ## Translation rules
//!
//! - data changed → run a sync pass; emit `Refresh` only when the view was
//!   actually rebuilt (repeated notifications with no intervening mutation
//!   are free)
//! - group change → forced sync pass when grouping was removed; the
//!   `GroupChange` relay is emitted either way
//! - id changed → pure key re-indexing, no structural event
//! - record update → relayed directly when ungrouped; swallowed in favor of
//!   a full sync when the grouping field changed; reduced to a single
//!   placeholder update for collapsed groups; fanned out to the group's
//!   first/last members for expanded groups so header and summary rows
//!   repaint
//!
//! Collapse and expand are exact, reversible splices — never rebuilds.
//!
//! Unresolvable groups, empty member sets, and detached placeholders are
//! expected races against a live, externally-mutated source; all of them
//! are silent no-ops.

use crate::config::GroupingConfig;
use crate::events::{Subscribers, SubscriptionId, ViewEvent};
use crate::registry::GroupRegistry;
use crate::sync::{resynchronize, SyncOutcome};
use gridkit_model::{Group, GroupKey, GrouperSpec, Record, RecordId, RecordSource, UpdateOp};
use gridkit_view::ViewCollection;
use std::cell::RefCell;
use tracing::{debug, warn};

/// Group argument accepted by collapse/expand: a key or an already
/// resolved group
#[derive(Debug, Clone)]
pub enum GroupRef {
    Key(GroupKey),
    Group(Group),
}

impl From<&str> for GroupRef {
    fn from(key: &str) -> Self {
        GroupRef::Key(GroupKey::from(key))
    }
}

impl From<String> for GroupRef {
    fn from(key: String) -> Self {
        GroupRef::Key(GroupKey::from(key))
    }
}

impl From<GroupKey> for GroupRef {
    fn from(key: GroupKey) -> Self {
        GroupRef::Key(key)
    }
}

impl From<Group> for GroupRef {
    fn from(group: Group) -> Self {
        GroupRef::Group(group)
    }
}

/// Group context for one update-handling pass.
///
/// Threaded through the call chain explicitly; record state is never
/// touched to carry it.
struct UpdateScope {
    key: GroupKey,
    group: Group,
}

/// Source-notification handlers plus the collapse/expand state machine
pub struct EventTranslator {
    view: ViewCollection,
    registry: GroupRegistry,
    partner: Option<GroupRegistry>,
    subscribers: Subscribers,
    config: GroupingConfig,
}

impl EventTranslator {
    pub fn new(config: GroupingConfig) -> Self {
        EventTranslator {
            view: ViewCollection::new(),
            registry: GroupRegistry::new(),
            partner: None,
            subscribers: Subscribers::new(),
            config,
        }
    }

    pub fn view(&self) -> &ViewCollection {
        &self.view
    }

    /// Handle to the shared group side table
    pub fn registry(&self) -> GroupRegistry {
        self.registry.clone()
    }

    pub fn config(&self) -> &GroupingConfig {
        &self.config
    }

    /// Mirror collapsed-state writes into a companion view's registry
    pub fn link_partner(&mut self, partner: GroupRegistry) {
        self.partner = Some(partner);
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&ViewEvent) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    pub fn clear_subscribers(&mut self) {
        self.subscribers.clear();
    }

    /// Drop all derived state (view contents and group side table)
    pub fn reset(&mut self) {
        self.view.clear();
        self.registry.clear();
    }

    /// Source contents changed: run a sync pass, emitting `Refresh` only
    /// when the view was rebuilt.
    ///
    /// The regroup retry sentinel is honored at most once per call; nothing
    /// half-built is ever committed, so a pass that keeps returning
    /// `Retry` leaves the previous view intact.
    pub fn on_data_changed<S: RecordSource>(&mut self, source: &RefCell<S>) {
        let mut retried = false;
        loop {
            let outcome = {
                let src = source.borrow();
                resynchronize(&*src, &self.config, &self.registry, &mut self.view)
            };
            match outcome {
                SyncOutcome::Unchanged => break,
                SyncOutcome::Changed => {
                    self.subscribers.emit(&ViewEvent::Refresh);
                    break;
                }
                SyncOutcome::Retry(spec) => {
                    if retried {
                        warn!(
                            "[EventTranslator] regroup retry did not converge, keeping previous view"
                        );
                        break;
                    }
                    retried = true;
                    source.borrow_mut().regroup(spec);
                }
            }
        }
    }

    /// Grouping was applied, replaced, or removed
    pub fn on_group_change<S: RecordSource>(
        &mut self,
        source: &RefCell<S>,
        grouper: Option<GrouperSpec>,
    ) {
        if grouper.is_none() {
            self.on_data_changed(source);
        }
        self.subscribers.emit(&ViewEvent::GroupChange { grouper });
    }

    /// A record's business id was rewritten: re-key, never re-order
    pub fn on_id_changed(&mut self, record: &Record, old_id: &RecordId, new_id: &RecordId) {
        if !self.view.reindex_id(old_id, new_id) {
            debug!(
                "[EventTranslator] id change {} -> {}: record {} not visible, nothing to re-key",
                old_id,
                new_id,
                record.internal_id()
            );
        }
    }

    /// A single record's fields changed
    pub fn on_update<S: RecordSource>(
        &mut self,
        source: &RefCell<S>,
        record: &Record,
        op: UpdateOp,
        changed_fields: &[String],
    ) {
        let grouper = source.borrow().grouper();
        let Some(grouper) = grouper else {
            self.subscribers.emit(&ViewEvent::Update {
                record: record.clone(),
                op: Some(op),
                changed_fields: Some(changed_fields.to_vec()),
            });
            return;
        };

        let scope = {
            let src = source.borrow();
            let key = grouper.key_for(record.get(grouper.field()));
            src.resolve_group(&key).map(|group| UpdateScope { key, group })
        };
        let Some(scope) = scope else {
            // Raced a concurrent filter/remove; the group is already gone.
            debug!(
                "[EventTranslator] update for {} resolves no group, ignoring",
                record.id()
            );
            return;
        };

        if changed_fields.iter().any(|f| f == grouper.field()) {
            // Membership may have moved: resync instead of a per-record
            // update; a Refresh is emitted if contents changed.
            self.on_data_changed(source);
            return;
        }

        if self.registry.is_collapsed(&scope.key) {
            // The placeholder stands in for every member.
            let placeholder = self.registry.placeholder(&scope.key, grouper.field());
            self.subscribers.emit(&ViewEvent::Update {
                record: placeholder,
                op: None,
                changed_fields: None,
            });
            return;
        }

        self.subscribers.emit(&ViewEvent::BatchBegin);
        self.subscribers.emit(&ViewEvent::Update {
            record: record.clone(),
            op: Some(op),
            changed_fields: Some(changed_fields.to_vec()),
        });
        if let Some(first) = scope.group.first() {
            if first.internal_id() != record.internal_id() {
                self.subscribers.emit(&ViewEvent::Update {
                    record: first.clone(),
                    op: Some(UpdateOp::Edit),
                    changed_fields: Some(changed_fields.to_vec()),
                });
            }
        }
        if self.config.show_summary() {
            if let (Some(first), Some(last)) = (scope.group.first(), scope.group.last()) {
                if last.internal_id() != first.internal_id()
                    && last.internal_id() != record.internal_id()
                {
                    self.subscribers.emit(&ViewEvent::Update {
                        record: last.clone(),
                        op: Some(UpdateOp::Edit),
                        changed_fields: Some(changed_fields.to_vec()),
                    });
                }
            }
        }
        self.subscribers.emit(&ViewEvent::BatchEnd);
    }

    /// Expand a collapsed group: replace its placeholder with its members.
    ///
    /// No-op (returns false) when the group does not resolve, no
    /// placeholder was ever materialized, or the placeholder is not
    /// currently visible.
    pub fn expand_group<S: RecordSource>(&mut self, source: &RefCell<S>, group: GroupRef) -> bool {
        let Some(group) = self.resolve(source, group) else {
            return false;
        };
        let key = group.key().clone();
        let Some(placeholder) = self.registry.cached_placeholder(&key) else {
            debug!("[EventTranslator] expand '{}': no placeholder materialized", key);
            return false;
        };
        let Some(index) = self.view.position_of_internal(placeholder.internal_id()) else {
            debug!("[EventTranslator] expand '{}': already expanded", key);
            return false;
        };

        self.set_collapsed(&key, false);
        let removed = self.view.remove_at(index, 1);
        let added = group.records().to_vec();
        self.view.insert_at(index, added.clone());
        self.subscribers.emit(&ViewEvent::Replace {
            index,
            removed,
            added,
        });
        self.subscribers.emit(&ViewEvent::GroupExpand { key });
        true
    }

    /// Collapse an expanded group: replace its members with the placeholder.
    ///
    /// No-op (returns false) when the group does not resolve, has no
    /// members, or its first member is not currently visible.
    pub fn collapse_group<S: RecordSource>(&mut self, source: &RefCell<S>, group: GroupRef) -> bool {
        let field = source.borrow().group_field().unwrap_or_default();
        let Some(group) = self.resolve(source, group) else {
            return false;
        };
        let key = group.key().clone();
        let Some(first) = group.first() else {
            debug!("[EventTranslator] collapse '{}': group has no members", key);
            return false;
        };
        let Some(index) = self.view.position_of_internal(first.internal_id()) else {
            debug!("[EventTranslator] collapse '{}': members not visible", key);
            return false;
        };

        self.set_collapsed(&key, true);
        let removed = self.view.remove_at(index, group.len());
        let placeholder = self.registry.placeholder(&key, &field);
        self.view.insert_at(index, vec![placeholder.clone()]);
        self.subscribers.emit(&ViewEvent::Replace {
            index,
            removed,
            added: vec![placeholder],
        });
        self.subscribers.emit(&ViewEvent::GroupCollapse { key });
        true
    }

    fn resolve<S: RecordSource>(&self, source: &RefCell<S>, group: GroupRef) -> Option<Group> {
        match group {
            GroupRef::Group(group) => Some(group),
            GroupRef::Key(key) => {
                let resolved = source.borrow().resolve_group(&key);
                if resolved.is_none() {
                    debug!("[EventTranslator] group '{}' does not resolve, ignoring", key);
                }
                resolved
            }
        }
    }

    fn set_collapsed(&self, key: &GroupKey, collapsed: bool) {
        self.registry.set_collapsed(key, collapsed);
        if let Some(partner) = &self.partner {
            partner.set_collapsed(key, collapsed);
        }
    }
}
