//! Per-object snapshot logs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::now_millis;
use crate::model::{AnnotationObject, ObjectId};

/// A recorded state of a single object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectChangeEntry {
    pub id: u64,
    pub label: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Full copy of the object at that moment.
    pub state: AnnotationObject,
}

/// Snapshot logs keyed by object id, each with its own cursor.
///
/// Unlike the [`Timeline`](super::Timeline), stepping through a log assigns
/// the stored snapshot directly into the live collection and touches no
/// other object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectLog {
    histories: HashMap<ObjectId, Vec<ObjectChangeEntry>>,
    cursors: HashMap<ObjectId, usize>,
    #[serde(default)]
    next_entry_id: u64,
}

impl ObjectLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries recorded for an object, oldest first.
    pub fn entries(&self, id: ObjectId) -> &[ObjectChangeEntry] {
        self.histories.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cursor into an object's log. Defaults to the last entry.
    pub fn cursor(&self, id: ObjectId) -> Option<usize> {
        let len = self.entries(id).len();
        if len == 0 {
            return None;
        }
        Some(self.cursors.get(&id).copied().unwrap_or(len - 1).min(len - 1))
    }

    /// Record the current state of `object`.
    ///
    /// Entries after the object's cursor are discarded first.
    pub fn record(&mut self, object: &AnnotationObject, label: impl Into<String>) {
        let id = object.id();
        let keep = self.cursor(id).map_or(0, |c| c + 1);
        let entry = ObjectChangeEntry {
            id: self.next_entry_id,
            label: label.into(),
            timestamp_ms: now_millis(),
            state: object.clone(),
        };
        self.next_entry_id += 1;

        let list = self.histories.entry(id).or_default();
        list.truncate(keep);
        list.push(entry);
        let cursor = list.len() - 1;
        self.cursors.insert(id, cursor);
        log::debug!("📝 Object {id}: recorded state #{cursor}");
    }

    pub fn can_undo(&self, id: ObjectId) -> bool {
        self.cursor(id).is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self, id: ObjectId) -> bool {
        self.cursor(id)
            .is_some_and(|c| c + 1 < self.entries(id).len())
    }

    /// Step an object back to its previous snapshot.
    ///
    /// Returns false when there is no earlier snapshot or the object is not
    /// in `objects`.
    pub fn undo(&mut self, id: ObjectId, objects: &mut [AnnotationObject]) -> bool {
        match self.cursor(id) {
            Some(c) if c > 0 => self.step_to(id, c - 1, objects),
            _ => false,
        }
    }

    /// Step an object forward to its next snapshot.
    pub fn redo(&mut self, id: ObjectId, objects: &mut [AnnotationObject]) -> bool {
        match self.cursor(id) {
            Some(c) if c + 1 < self.entries(id).len() => self.step_to(id, c + 1, objects),
            _ => false,
        }
    }

    fn step_to(&mut self, id: ObjectId, index: usize, objects: &mut [AnnotationObject]) -> bool {
        let Some(state) = self.entries(id).get(index).map(|e| e.state.clone()) else {
            return false;
        };
        let Some(slot) = objects.iter_mut().find(|o| o.id() == id) else {
            log::debug!("Object {id} is not live, skipping snapshot restore");
            return false;
        };
        *slot = state;
        self.cursors.insert(id, index);
        log::debug!("⏪ Object {id}: restored state #{index}");
        true
    }

    /// Restore invariants on a log read from storage.
    pub(crate) fn repair(&mut self) {
        let next = self
            .histories
            .values()
            .flatten()
            .map(|e| e.id + 1)
            .max()
            .unwrap_or(0);
        self.next_entry_id = self.next_entry_id.max(next);
    }

    /// Largest object id with a recorded history.
    pub(crate) fn max_object_id(&self) -> Option<ObjectId> {
        self.histories.keys().copied().max()
    }
}
