//! In-memory scene store.

use std::collections::HashMap;

use super::{SceneStore, StorageError};
use crate::scene::{SceneId, SceneMeta, SceneState};

/// Scene store backed by hash maps.
///
/// Snapshots are kept in serialized form so a round trip through this store
/// behaves like a real backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    index: Option<String>,
    blobs: HashMap<SceneId, Vec<u8>>,
    snapshots: HashMap<SceneId, String>,
    active: Option<SceneId>,
    next_id: Option<SceneId>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored image blobs.
    pub fn blob_count(&self) -> usize {
        self.blobs.len()
    }

    /// Number of stored snapshots.
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }
}

impl SceneStore for MemoryStore {
    fn load_scene_index(&self) -> Result<Vec<SceneMeta>, StorageError> {
        match &self.index {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_scene_index(&mut self, index: &[SceneMeta]) -> Result<(), StorageError> {
        self.index = Some(serde_json::to_string(index)?);
        Ok(())
    }

    fn load_image_blob(&self, id: SceneId) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.blobs.get(&id).cloned())
    }

    fn save_image_blob(&mut self, id: SceneId, bytes: &[u8]) -> Result<(), StorageError> {
        self.blobs.insert(id, bytes.to_vec());
        Ok(())
    }

    fn delete_image_blob(&mut self, id: SceneId) -> Result<(), StorageError> {
        self.blobs.remove(&id);
        Ok(())
    }

    fn load_snapshot(&self, id: SceneId) -> Result<Option<SceneState>, StorageError> {
        self.snapshots
            .get(&id)
            .map(|json| serde_json::from_str(json))
            .transpose()
            .map_err(StorageError::from)
    }

    fn save_snapshot(&mut self, id: SceneId, snapshot: &SceneState) -> Result<(), StorageError> {
        self.snapshots.insert(id, serde_json::to_string(snapshot)?);
        Ok(())
    }

    fn delete_snapshot(&mut self, id: SceneId) -> Result<(), StorageError> {
        self.snapshots.remove(&id);
        Ok(())
    }

    fn load_active_scene_id(&self) -> Result<Option<SceneId>, StorageError> {
        Ok(self.active)
    }

    fn save_active_scene_id(&mut self, id: Option<SceneId>) -> Result<(), StorageError> {
        self.active = id;
        Ok(())
    }

    fn load_next_scene_id(&self) -> Result<Option<SceneId>, StorageError> {
        Ok(self.next_id)
    }

    fn save_next_scene_id(&mut self, id: SceneId) -> Result<(), StorageError> {
        self.next_id = Some(id);
        Ok(())
    }
}
