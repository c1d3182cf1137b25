//! Persistence of scenes: the scene index, image blobs, per-scene snapshots
//! and the active-scene pointer.
//!
//! [`SceneStore`] is the seam between the scene manager and a concrete
//! backend. Two backends ship with the crate:
//! - [`MemoryStore`]: in-process maps, used by tests and ephemeral sessions
//! - [`FsStore`]: one directory per workspace on the local filesystem

mod fs;
mod memory;

pub use fs::FsStore;
pub use memory::MemoryStore;

use thiserror::Error;

use crate::scene::{SceneId, SceneMeta, SceneState};

/// Errors that can occur while reading or writing scene data.
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend-specific failure
    #[error("Storage backend error: {message}")]
    Backend {
        /// Description of the failure
        message: String,
    },
}

impl StorageError {
    /// Create a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Key-value persistence for scenes.
///
/// Deleting a key that does not exist is not an error.
pub trait SceneStore {
    /// Ordered scene index. Missing index reads as empty.
    fn load_scene_index(&self) -> Result<Vec<SceneMeta>, StorageError>;
    fn save_scene_index(&mut self, index: &[SceneMeta]) -> Result<(), StorageError>;

    fn load_image_blob(&self, id: SceneId) -> Result<Option<Vec<u8>>, StorageError>;
    fn save_image_blob(&mut self, id: SceneId, bytes: &[u8]) -> Result<(), StorageError>;
    fn delete_image_blob(&mut self, id: SceneId) -> Result<(), StorageError>;

    fn load_snapshot(&self, id: SceneId) -> Result<Option<SceneState>, StorageError>;
    fn save_snapshot(&mut self, id: SceneId, snapshot: &SceneState) -> Result<(), StorageError>;
    fn delete_snapshot(&mut self, id: SceneId) -> Result<(), StorageError>;

    fn load_active_scene_id(&self) -> Result<Option<SceneId>, StorageError>;
    fn save_active_scene_id(&mut self, id: Option<SceneId>) -> Result<(), StorageError>;

    /// Next scene id to hand out. Ids are never reused, even after the
    /// scenes holding them are deleted.
    fn load_next_scene_id(&self) -> Result<Option<SceneId>, StorageError>;
    fn save_next_scene_id(&mut self, id: SceneId) -> Result<(), StorageError>;
}
