//! # MemoryStore
//!
//! Memory-backed reference implementation of [`RecordSource`].
//!
//! Suitable for tests, demos, and small in-process data sets. Mutators
//! return the [`SourceEvent`] the host should forward to observing views;
//! the store itself never talks to a view directly.
//!
//! Grouping is recomputed eagerly after every mutation: records are
//! partitioned by group key in source order, groups ordered by first
//! appearance of their key. How records are *sorted* is the caller's
//! business — the store preserves insertion order.

use crate::events::{SourceEvent, UpdateOp};
use crate::group::{Group, GroupKey, GrouperSpec};
use crate::record::{Record, RecordId};
use crate::source::RecordSource;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Duplicate record id: {0}")]
    DuplicateId(RecordId),

    #[error("Unknown record: {0}")]
    UnknownRecord(RecordId),
}

/// Memory-backed record source
pub struct MemoryStore {
    id: String,
    records: Vec<Record>,
    grouper: Option<GrouperSpec>,
    groups: Vec<Group>,
}

impl MemoryStore {
    pub fn new(id: impl Into<String>) -> Self {
        MemoryStore {
            id: id.into(),
            records: Vec::new(),
            grouper: None,
            groups: Vec::new(),
        }
    }

    /// Apply a grouper at construction time
    pub fn with_grouper(mut self, spec: GrouperSpec) -> Self {
        self.grouper = Some(spec);
        self.rebuild_groups();
        self
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Append a record
    pub fn insert(&mut self, record: Record) -> Result<SourceEvent, StoreError> {
        if self.records.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::DuplicateId(record.id().clone()));
        }
        self.records.push(record);
        self.rebuild_groups();
        Ok(SourceEvent::DataChanged)
    }

    /// Append several records, raising a single notification
    pub fn insert_all(
        &mut self,
        records: impl IntoIterator<Item = Record>,
    ) -> Result<SourceEvent, StoreError> {
        for record in records {
            if self.records.iter().any(|r| r.id() == record.id()) {
                return Err(StoreError::DuplicateId(record.id().clone()));
            }
            self.records.push(record);
        }
        self.rebuild_groups();
        Ok(SourceEvent::DataChanged)
    }

    pub fn remove(&mut self, id: &RecordId) -> Result<SourceEvent, StoreError> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| StoreError::UnknownRecord(id.clone()))?;
        self.records.remove(pos);
        self.rebuild_groups();
        Ok(SourceEvent::DataChanged)
    }

    /// Edit one field of one record
    pub fn set_field(
        &mut self,
        id: &RecordId,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<SourceEvent, StoreError> {
        let field = field.into();
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| StoreError::UnknownRecord(id.clone()))?;
        record.set(field.clone(), value);
        let snapshot = record.clone();
        self.rebuild_groups();
        Ok(SourceEvent::Update {
            record: snapshot,
            op: UpdateOp::Edit,
            changed_fields: vec![field],
        })
    }

    /// Rewrite a record's business id
    pub fn change_id(
        &mut self,
        old_id: &RecordId,
        new_id: impl Into<RecordId>,
    ) -> Result<SourceEvent, StoreError> {
        let new_id = new_id.into();
        if self.records.iter().any(|r| r.id() == &new_id) {
            return Err(StoreError::DuplicateId(new_id));
        }
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id() == old_id)
            .ok_or_else(|| StoreError::UnknownRecord(old_id.clone()))?;
        let old_id = record.id().clone();
        record.set_id(new_id.clone());
        let snapshot = record.clone();
        self.rebuild_groups();
        Ok(SourceEvent::IdChanged {
            record: snapshot,
            old_id,
            new_id,
        })
    }

    /// Apply, replace, or remove (`None`) the grouper
    pub fn set_grouper(&mut self, grouper: Option<GrouperSpec>) -> SourceEvent {
        self.grouper = grouper.clone();
        self.rebuild_groups();
        SourceEvent::GroupChange { grouper }
    }

    fn rebuild_groups(&mut self) {
        self.groups.clear();
        let Some(grouper) = &self.grouper else {
            return;
        };
        let mut order: Vec<GroupKey> = Vec::new();
        let mut buckets: Vec<Vec<Record>> = Vec::new();
        for record in &self.records {
            let key = grouper.key_for(record.get(grouper.field()));
            match order.iter().position(|k| k == &key) {
                Some(i) => buckets[i].push(record.clone()),
                None => {
                    order.push(key);
                    buckets.push(vec![record.clone()]);
                }
            }
        }
        self.groups = order
            .into_iter()
            .zip(buckets)
            .map(|(key, records)| Group::new(key, records))
            .collect();
    }
}

impl RecordSource for MemoryStore {
    fn source_id(&self) -> &str {
        &self.id
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn range(&self, start: usize, end: usize) -> Vec<Record> {
        let start = start.min(self.records.len());
        let end = end.clamp(start, self.records.len());
        self.records[start..end].to_vec()
    }

    fn groups(&self) -> Vec<Group> {
        self.groups.clone()
    }

    fn grouper(&self) -> Option<GrouperSpec> {
        self.grouper.clone()
    }

    fn record_index(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    fn resolve_group(&self, key: &GroupKey) -> Option<Group> {
        self.groups.iter().find(|g| g.key() == key).cloned()
    }

    fn regroup(&mut self, spec: GrouperSpec) {
        debug!(
            "[MemoryStore] {}: regrouping on '{}' with explicit key function",
            self.id,
            spec.field()
        );
        self.grouper = Some(spec);
        self.rebuild_groups();
    }
}
