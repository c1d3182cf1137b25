//! Scenes: one screenshot plus everything drawn over it.
//!
//! A scene is an image blob, its metadata, and a [`SceneState`] holding the
//! objects, both history layers and the view flags. Exactly one scene is
//! live at a time; the others keep the snapshot captured when they were last
//! active.

mod manager;

pub use manager::SceneManager;

use serde::{Deserialize, Serialize};

use crate::geometry::ImageSize;
use crate::history::{ObjectLog, Timeline};
use crate::model::{AnnotationObject, ObjectId};

/// Unique identifier for a scene.
pub type SceneId = u64;

/// Scene index entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneMeta {
    pub id: SceneId,
    pub title: String,
    /// Natural size of the scene's image.
    pub image_size: ImageSize,
}

impl SceneMeta {
    pub fn new(id: SceneId, title: impl Into<String>, image_size: ImageSize) -> Self {
        Self {
            id,
            title: title.into(),
            image_size,
        }
    }
}

/// Per-scene view toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewFlags {
    /// Present the screenshot inside a browser-window frame.
    #[serde(default)]
    pub safarize: bool,
}

/// Everything that is saved for a scene apart from its image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneState {
    pub timeline: Timeline,
    #[serde(default)]
    pub object_log: ObjectLog,
    #[serde(default)]
    pub view: ViewFlags,
    #[serde(default)]
    next_object_id: ObjectId,
}

impl SceneState {
    /// Create an empty scene state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Live objects in draw order.
    pub fn objects(&self) -> &[AnnotationObject] {
        self.timeline.objects()
    }

    pub fn object(&self, id: ObjectId) -> Option<&AnnotationObject> {
        self.timeline.get(id)
    }

    /// Reserve a fresh object id. Ids are never reused within a scene.
    pub fn allocate_object_id(&mut self) -> ObjectId {
        let id = self.next_object_id;
        self.next_object_id += 1;
        id
    }

    /// Per-object undo: restore the previous snapshot of one object.
    pub fn undo_object(&mut self, id: ObjectId) -> bool {
        self.object_log.undo(id, self.timeline.objects_mut())
    }

    /// Per-object redo: restore the next snapshot of one object.
    pub fn redo_object(&mut self, id: ObjectId) -> bool {
        self.object_log.redo(id, self.timeline.objects_mut())
    }

    /// Restore invariants on a state read from storage.
    pub(crate) fn repair(&mut self) {
        self.timeline.repair();
        self.object_log.repair();
        let max_id = self
            .timeline
            .max_object_id()
            .into_iter()
            .chain(self.object_log.max_object_id())
            .max();
        if let Some(max_id) = max_id {
            self.next_object_id = self.next_object_id.max(max_id + 1);
        }
    }
}

/// A scene with its image and last-saved state.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub meta: SceneMeta,
    /// Original image bytes, as pasted or dropped.
    pub image: Vec<u8>,
    /// State captured when this scene was last flushed.
    pub snapshot: SceneState,
}

impl Scene {
    pub fn id(&self) -> SceneId {
        self.meta.id
    }
}
