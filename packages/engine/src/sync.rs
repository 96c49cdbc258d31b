//! # Synchronization pass
//!
//! Recomputes the intended flattened sequence from the source's groups and
//! the registry's collapsed state, then compares it against the current
//! view contents.
//!
//! The comparison is a deliberate simplification: equal length and pairwise
//! identical elements means nothing to do; any difference means a full
//! clear + repopulate and a single `Refresh` downstream. No minimal patch
//! set is computed here — fine-grained `Replace` splices are reserved for
//! the explicit collapse/expand operations, which always know their exact
//! edit.

use crate::config::GroupingConfig;
use crate::registry::GroupRegistry;
use gridkit_model::{GrouperSpec, Record, RecordSource};
use gridkit_view::ViewCollection;
use tracing::debug;

/// Result of one synchronization pass
#[derive(Debug)]
pub enum SyncOutcome {
    /// View already matched the intended sequence; nothing was touched
    Unchanged,

    /// View was cleared and repopulated
    Changed,

    /// Pass abandoned: the source grouped a complex field into
    /// indistinguishable keys and an explicit key function is registered.
    /// The caller must apply the carried grouper to the source and run the
    /// pass again — nothing half-built was committed.
    Retry(GrouperSpec),
}

pub(crate) fn resynchronize<S: RecordSource>(
    source: &S,
    config: &GroupingConfig,
    registry: &GroupRegistry,
    view: &mut ViewCollection,
) -> SyncOutcome {
    let groups = source.groups();

    let intended: Vec<Record> = if groups.is_empty() {
        source.range(0, source.len())
    } else {
        let field = source.group_field().unwrap_or_default();
        let mut intended = Vec::with_capacity(source.len());
        for group in &groups {
            if group.key().is_degenerate() {
                if let Some(key_fn) = config.key_fn(&field) {
                    debug!(
                        "[SyncEngine] {}: degenerate key on '{}', requesting regroup",
                        source.source_id(),
                        field
                    );
                    return SyncOutcome::Retry(
                        GrouperSpec::new(&field).with_shared_key_fn(key_fn),
                    );
                }
                // No key function registered: the degenerate key is a
                // documented fallback, not an error.
            }
            let meta = registry.ensure(group.key(), config.start_collapsed());
            if meta.collapsed {
                intended.push(registry.placeholder(group.key(), &field));
            } else {
                intended.extend(group.records().iter().cloned());
            }
        }
        intended
    };

    let unchanged = view.len() == intended.len()
        && view
            .iter()
            .zip(intended.iter())
            .all(|(a, b)| a.internal_id() == b.internal_id());
    if unchanged {
        return SyncOutcome::Unchanged;
    }

    debug!(
        "[SyncEngine] {}: rebuilding view, {} -> {} rows",
        source.source_id(),
        view.len(),
        intended.len()
    );
    view.replace_all(intended);
    SyncOutcome::Changed
}
