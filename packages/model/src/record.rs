//! # Records
//!
//! A record is an ordered bag of named field values identified two ways:
//!
//! - `RecordId`: the stable business identity, assigned by the source and
//!   preserved across sessions. May be rewritten by the source (e.g. when a
//!   server acknowledges a phantom row), in which case an `IdChanged`
//!   notification is raised.
//! - `InternalId`: a session-local identity allocated once per record
//!   instance. Never serialized, never reused within a process. Derived
//!   views use it to compare element identity without comparing contents.
//!
//! A record may also be a *placeholder*: a synthetic record standing in for
//! every member of a collapsed group. Placeholders carry the grouping field
//! (set to the group key) and nothing else.

use crate::group::GroupKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INTERNAL_ID: AtomicU64 = AtomicU64::new(1);

/// Stable business identity of a record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId(s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session-local identity, allocated once per record instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InternalId(u64);

impl InternalId {
    /// Allocate the next free internal id
    pub fn next() -> Self {
        InternalId(NEXT_INTERNAL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for InternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single row of data owned by a source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,

    /// Session-local identity; fresh on deserialization
    #[serde(skip, default = "InternalId::next")]
    internal_id: InternalId,

    fields: HashMap<String, Value>,

    /// Set when this record is a collapsed-group placeholder
    #[serde(skip_serializing_if = "Option::is_none", default)]
    placeholder_of: Option<GroupKey>,
}

impl Record {
    /// Create an empty data record
    pub fn new(id: impl Into<RecordId>) -> Self {
        Record {
            id: id.into(),
            internal_id: InternalId::next(),
            fields: HashMap::new(),
            placeholder_of: None,
        }
    }

    /// Create the synthetic record standing in for a collapsed group.
    ///
    /// Carries only the grouping field, set to the group key. Stores the
    /// key itself rather than any reference to the group object, so the
    /// placeholder stays valid when the source replaces groups on reload.
    pub fn placeholder(group_field: impl Into<String>, key: GroupKey) -> Self {
        let mut fields = HashMap::new();
        fields.insert(group_field.into(), Value::String(key.as_str().to_string()));
        Record {
            id: RecordId(format!("placeholder-{}", key.as_str())),
            internal_id: InternalId::next(),
            fields,
            placeholder_of: Some(key),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn internal_id(&self) -> InternalId {
        self.internal_id
    }

    /// Read a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder_of.is_some()
    }

    /// Key of the group this placeholder stands in for
    pub fn placeholder_of(&self) -> Option<&GroupKey> {
        self.placeholder_of.as_ref()
    }

    /// Write a field value.
    ///
    /// Only sources call this; derived views treat record contents as
    /// read-only and react to `Update` notifications instead.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Rewrite the business id. Key re-indexing in derived views is driven
    /// by the accompanying `IdChanged` notification.
    pub fn set_id(&mut self, id: impl Into<RecordId>) {
        self.id = id.into();
    }
}
