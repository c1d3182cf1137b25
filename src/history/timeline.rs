//! Scene-wide operation log with a movable cursor.

use serde::{Deserialize, Serialize};

use super::op::{ChangeOp, EntryId, HistoryEntry};
use crate::model::{AnnotationObject, ObjectId};

/// Ordered operation log plus the objects it produces.
///
/// `cursor` is the index of the last applied entry (`None` when nothing is
/// applied). Entries after the cursor form the redo tail. After every
/// timeline operation, `objects` equals [`Timeline::replay`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(rename = "history")]
    entries: Vec<HistoryEntry>,
    #[serde(rename = "history_index")]
    cursor: Option<usize>,
    objects: Vec<AnnotationObject>,
    #[serde(default)]
    next_entry_id: EntryId,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Live objects in draw order.
    pub fn objects(&self) -> &[AnnotationObject] {
        &self.objects
    }

    /// Mutable access to the live objects for in-place edits that bypass the
    /// log (drags in progress, per-object undo).
    pub(crate) fn objects_mut(&mut self) -> &mut Vec<AnnotationObject> {
        &mut self.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&AnnotationObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    /// Replace the live object with the same id. Returns false if absent.
    pub(crate) fn replace_object(&mut self, object: AnnotationObject) -> bool {
        match self.objects.iter_mut().find(|o| o.id() == object.id()) {
            Some(slot) => {
                *slot = object;
                true
            }
            None => false,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.next_index() < self.entries.len()
    }

    /// Index the next applied entry would occupy.
    fn next_index(&self) -> usize {
        self.cursor.map_or(0, |c| c + 1)
    }

    /// Record and apply an operation.
    ///
    /// Discards the redo tail, appends the entry and moves the cursor onto it.
    pub fn apply(&mut self, op: ChangeOp, label: impl Into<String>) -> EntryId {
        let id = self.next_entry_id;
        self.next_entry_id += 1;

        let tail = self.next_index();
        if tail < self.entries.len() {
            log::debug!(
                "📝 Timeline: dropping {} redo entries",
                self.entries.len() - tail
            );
        }
        self.entries.truncate(tail);

        op.apply(&mut self.objects);
        log::debug!("📝 Timeline: applied '{}'", op.description());
        self.entries.push(HistoryEntry {
            id,
            label: label.into(),
            op,
        });
        self.cursor = Some(self.entries.len() - 1);
        id
    }

    /// Step the cursor back one entry. Returns false if nothing is applied.
    pub fn undo(&mut self) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        self.cursor = cursor.checked_sub(1);
        self.objects = self.replay();
        log::debug!("⏪ Timeline: undo to {:?}", self.cursor);
        true
    }

    /// Step the cursor forward one entry. Returns false at the end of the log.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor = Some(self.next_index());
        self.objects = self.replay();
        log::debug!("⏩ Timeline: redo to {:?}", self.cursor);
        true
    }

    /// Remove an entry from anywhere in the log and re-derive the objects.
    ///
    /// Deleting an applied entry (at or before the cursor) pulls the cursor
    /// back by one so the same later entries stay applied. Returns false for
    /// an unknown id.
    pub fn delete_entry(&mut self, id: EntryId) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };

        let removed = self.entries.remove(index);
        match self.cursor {
            Some(cursor) if index <= cursor => self.cursor = cursor.checked_sub(1),
            _ => {}
        }
        self.clamp_cursor();
        self.objects = self.replay();
        log::debug!(
            "🗑️ Timeline: deleted entry '{}', cursor now {:?}",
            removed.label,
            self.cursor
        );
        true
    }

    /// Objects produced by applying entries `0..=cursor` to an empty scene.
    pub fn replay(&self) -> Vec<AnnotationObject> {
        let mut objects = Vec::new();
        for entry in &self.entries[..self.next_index().min(self.entries.len())] {
            entry.op.apply(&mut objects);
        }
        objects
    }

    /// Largest object id referenced by the log or the live objects.
    pub(crate) fn max_object_id(&self) -> Option<ObjectId> {
        let logged = self.entries.iter().map(|e| match &e.op {
            ChangeOp::Add { object } => object.id(),
            ChangeOp::Remove { id } | ChangeOp::UpdateArrow { id, .. } => *id,
        });
        logged.chain(self.objects.iter().map(|o| o.id())).max()
    }

    /// Restore invariants on a timeline read from storage.
    pub(crate) fn repair(&mut self) {
        self.clamp_cursor();
        let next = self.entries.iter().map(|e| e.id + 1).max().unwrap_or(0);
        self.next_entry_id = self.next_entry_id.max(next);
    }

    fn clamp_cursor(&mut self) {
        self.cursor = match (self.cursor, self.entries.len()) {
            (_, 0) => None,
            (Some(c), len) if c >= len => Some(len - 1),
            (c, _) => c,
        };
    }
}
