//! # Gridkit Model
//!
//! Shared data model for gridkit: records, groups, the source contract, and
//! the mutation notifications sources raise.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: records, groups, source contract     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ view: derived ordered, keyed container      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ engine: grouping sync + event translation   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! A source owns its records and how they are grouped. Everything an
//! observer may rely on is here: records identified by a stable business id
//! and a session-local internal id, groups identified by a stable string
//! key (group *objects* are replaced wholesale on reload), and
//! [`SourceEvent`]s describing mutations after the fact.

mod events;
mod group;
mod record;
mod source;
mod store;

pub use events::{SourceEvent, UpdateOp};
pub use group::{Group, GroupKey, GrouperSpec, KeyFn};
pub use record::{InternalId, Record, RecordId};
pub use source::RecordSource;
pub use store::{MemoryStore, StoreError};

// Re-export the value type records are made of
pub use serde_json::Value;
