//! # Gridkit View
//!
//! [`ViewCollection`]: the derived, flattened, keyed sequence a grouping
//! engine exposes to consumers.
//!
//! Elements are either ordinary records (from expanded groups, or an
//! ungrouped source) or placeholder records standing in for collapsed
//! groups. The collection owns record clones — the source remains the
//! single owner of live records.
//!
//! Lookup is O(1) three ways: by position, by business id, and by
//! session-local internal id. Structural edits (insert/remove/replace) keep
//! the two key indexes consistent by repairing positions from the splice
//! point; id changes re-key without touching element order.

mod collection;

pub use collection::ViewCollection;
