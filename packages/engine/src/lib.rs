//! # Gridkit Engine
//!
//! Grouped view synchronization: maintains a derived, collapsible,
//! flattened view over a grouped record source and translates source
//! mutations into structural events for a presentation layer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ source: records + groups + notifications    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ engine: GroupedView                         │
//! │  - GroupRegistry: per-key collapsed state   │
//! │    and cached placeholders                  │
//! │  - sync pass: intended sequence vs. view,   │
//! │    full rebuild only on difference          │
//! │  - EventTranslator: notifications in,       │
//! │    structural events out                    │
//! │  - collapse/expand: exact splices           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ subscribers: Refresh / Replace / Update ... │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The source is the single owner**: the view holds record clones and
//!    derived indexes, nothing more
//! 2. **Group state survives reload**: everything per-group is keyed by the
//!    stable group key, never by group object identity
//! 3. **Rebuild coarsely, splice precisely**: data-changed passes rebuild
//!    the whole view when anything differs; collapse/expand are exact,
//!    reversible splices
//! 4. **Races are no-ops**: a live source mutates underneath us —
//!    unresolvable groups and detached placeholders are expected, never
//!    errors
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gridkit_engine::{GroupedView, GroupingConfig, ViewEvent};
//! use gridkit_model::{GrouperSpec, MemoryStore, Record};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let mut store = MemoryStore::new("orders").with_grouper(GrouperSpec::new("city"));
//! store.insert(Record::new("o1").with_field("city", "Oslo"))?;
//! let store = Rc::new(RefCell::new(store));
//!
//! let mut view = GroupedView::new(store.clone(), GroupingConfig::new());
//! view.subscribe(|event| println!("{event:?}"));
//!
//! view.collapse_group("Oslo");     // Replace + GroupCollapse
//! let event = store.borrow_mut().set_field(&"o1".into(), "total", 99)?;
//! view.notify(event);              // placeholder Update (group collapsed)
//! ```

mod config;
mod events;
mod grouped_view;
mod registry;
mod sync;
mod translator;


#[cfg(test)]
mod tests_grouping;


pub use config::GroupingConfig;
pub use events::{Subscribers, SubscriptionId, ViewEvent};
pub use grouped_view::GroupedView;
pub use registry::{GroupRegistry, MetaGroup};
pub use sync::SyncOutcome;
pub use translator::{EventTranslator, GroupRef};

// Re-export common types for convenience
pub use gridkit_model::{
    Group, GroupKey, GrouperSpec, InternalId, Record, RecordId, RecordSource, SourceEvent,
    UpdateOp,
};
pub use gridkit_view::ViewCollection;
