//! # Groups and groupers
//!
//! A group is a source-computed, ordered subset of records sharing a group
//! key. Group objects are rebuilt wholesale whenever the source regroups or
//! reloads, so nothing downstream may key state off group identity — the
//! `GroupKey` is the stable handle.
//!
//! A `GrouperSpec` names the grouping field and optionally an explicit key
//! function. Without a key function, keys come from a default rendering of
//! the field value; complex values (objects, arrays) all render to the same
//! degenerate key, which downstream consumers detect and repair by
//! re-grouping with an explicit key function.

use crate::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Rendering used for object/array field values when no key function is
/// registered. A single shared constant on purpose: the point is that such
/// keys are indistinguishable, which is the signal to re-group.
const DEGENERATE_KEY: &str = "[object]";

/// Stable string key identifying a group across source reloads
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn new(key: impl Into<String>) -> Self {
        GroupKey(key.into())
    }

    /// The fallback key produced for complex values without a key function
    pub fn degenerate() -> Self {
        GroupKey(DEGENERATE_KEY.to_string())
    }

    pub fn is_degenerate(&self) -> bool {
        self.0 == DEGENERATE_KEY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupKey {
    fn from(s: &str) -> Self {
        GroupKey(s.to_string())
    }
}

impl From<String> for GroupKey {
    fn from(s: String) -> Self {
        GroupKey(s)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered subset of records sharing one group key
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    key: GroupKey,
    records: Vec<Record>,
}

impl Group {
    pub fn new(key: GroupKey, records: Vec<Record>) -> Self {
        Group { key, records }
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }
}

/// Explicit group key function
pub type KeyFn = Rc<dyn Fn(&Value) -> String>;

/// Grouping field plus optional explicit key function
#[derive(Clone)]
pub struct GrouperSpec {
    field: String,
    key_fn: Option<KeyFn>,
}

impl GrouperSpec {
    pub fn new(field: impl Into<String>) -> Self {
        GrouperSpec {
            field: field.into(),
            key_fn: None,
        }
    }

    pub fn with_key_fn(mut self, f: impl Fn(&Value) -> String + 'static) -> Self {
        self.key_fn = Some(Rc::new(f));
        self
    }

    /// Attach an already-shared key function
    pub fn with_shared_key_fn(mut self, f: KeyFn) -> Self {
        self.key_fn = Some(f);
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn has_key_fn(&self) -> bool {
        self.key_fn.is_some()
    }

    /// Compute the group key for a field value.
    ///
    /// With a key function registered, the function decides. Otherwise
    /// scalars render to their natural string form, missing/null values to
    /// the empty key, and complex values to the degenerate key.
    pub fn key_for(&self, value: Option<&Value>) -> GroupKey {
        if let Some(f) = &self.key_fn {
            return GroupKey::new(f(value.unwrap_or(&Value::Null)));
        }
        match value {
            None | Some(Value::Null) => GroupKey::new(""),
            Some(Value::String(s)) => GroupKey::new(s.clone()),
            Some(Value::Number(n)) => GroupKey::new(n.to_string()),
            Some(Value::Bool(b)) => GroupKey::new(b.to_string()),
            Some(Value::Object(_)) | Some(Value::Array(_)) => GroupKey::degenerate(),
        }
    }
}

impl fmt::Debug for GrouperSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrouperSpec")
            .field("field", &self.field)
            .field("key_fn", &self.key_fn.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
