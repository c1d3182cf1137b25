//! Filesystem scene store.
//!
//! Layout under the workspace root:
//!
//! ```text
//! index.json          ordered scene metadata
//! active.json         active scene id (or null)
//! next_id.json        next scene id to hand out
//! images/<id>.img     original image bytes
//! snapshots/<id>.json scene snapshot
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{SceneStore, StorageError};
use crate::scene::{SceneId, SceneMeta, SceneState};

const INDEX_FILE: &str = "index.json";
const ACTIVE_FILE: &str = "active.json";
const NEXT_ID_FILE: &str = "next_id.json";
const IMAGES_DIR: &str = "images";
const SNAPSHOTS_DIR: &str = "snapshots";

/// Scene store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open (or lazily create) a store at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default workspace directory under the user's data dir.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_root() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("shotmark"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn image_path(&self, id: SceneId) -> PathBuf {
        self.root.join(IMAGES_DIR).join(format!("{id}.img"))
    }

    fn snapshot_path(&self, id: SceneId) -> PathBuf {
        self.root.join(SNAPSHOTS_DIR).join(format!("{id}.json"))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// Read a file, mapping "not found" to `None`.
fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StorageError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Remove a file, ignoring "not found".
fn remove_optional(path: &Path) -> Result<(), StorageError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

impl SceneStore for FsStore {
    fn load_scene_index(&self) -> Result<Vec<SceneMeta>, StorageError> {
        match read_optional(&self.root.join(INDEX_FILE))? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_scene_index(&mut self, index: &[SceneMeta]) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(index)?;
        self.write(&self.root.join(INDEX_FILE), &json)
    }

    fn load_image_blob(&self, id: SceneId) -> Result<Option<Vec<u8>>, StorageError> {
        read_optional(&self.image_path(id))
    }

    fn save_image_blob(&mut self, id: SceneId, bytes: &[u8]) -> Result<(), StorageError> {
        self.write(&self.image_path(id), bytes)
    }

    fn delete_image_blob(&mut self, id: SceneId) -> Result<(), StorageError> {
        remove_optional(&self.image_path(id))
    }

    fn load_snapshot(&self, id: SceneId) -> Result<Option<SceneState>, StorageError> {
        match read_optional(&self.snapshot_path(id))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn save_snapshot(&mut self, id: SceneId, snapshot: &SceneState) -> Result<(), StorageError> {
        let json = serde_json::to_vec(snapshot)?;
        self.write(&self.snapshot_path(id), &json)
    }

    fn delete_snapshot(&mut self, id: SceneId) -> Result<(), StorageError> {
        remove_optional(&self.snapshot_path(id))
    }

    fn load_active_scene_id(&self) -> Result<Option<SceneId>, StorageError> {
        match read_optional(&self.root.join(ACTIVE_FILE))? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(None),
        }
    }

    fn save_active_scene_id(&mut self, id: Option<SceneId>) -> Result<(), StorageError> {
        let json = serde_json::to_vec(&id)?;
        self.write(&self.root.join(ACTIVE_FILE), &json)
    }

    fn load_next_scene_id(&self) -> Result<Option<SceneId>, StorageError> {
        match read_optional(&self.root.join(NEXT_ID_FILE))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn save_next_scene_id(&mut self, id: SceneId) -> Result<(), StorageError> {
        let json = serde_json::to_vec(&id)?;
        self.write(&self.root.join(NEXT_ID_FILE), &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ImageSize;

    fn temp_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("shotmark_fs_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_empty_store_reads_as_empty() {
        let store = FsStore::new(temp_root("empty"));
        assert!(store.load_scene_index().unwrap().is_empty());
        assert_eq!(store.load_image_blob(1).unwrap(), None);
        assert_eq!(store.load_snapshot(1).unwrap(), None);
        assert_eq!(store.load_active_scene_id().unwrap(), None);
        assert_eq!(store.load_next_scene_id().unwrap(), None);
    }

    #[test]
    fn test_round_trip_files() {
        let root = temp_root("round_trip");
        let mut store = FsStore::new(&root);

        let meta = SceneMeta::new(3, "Image 1", ImageSize::new(4, 2));
        store.save_scene_index(std::slice::from_ref(&meta)).unwrap();
        store.save_image_blob(3, b"bytes").unwrap();
        store.save_snapshot(3, &SceneState::new()).unwrap();
        store.save_active_scene_id(Some(3)).unwrap();
        store.save_next_scene_id(4).unwrap();

        let reopened = FsStore::new(&root);
        assert_eq!(reopened.load_scene_index().unwrap(), vec![meta]);
        assert_eq!(reopened.load_image_blob(3).unwrap(), Some(b"bytes".to_vec()));
        assert_eq!(reopened.load_snapshot(3).unwrap(), Some(SceneState::new()));
        assert_eq!(reopened.load_active_scene_id().unwrap(), Some(3));
        assert_eq!(reopened.load_next_scene_id().unwrap(), Some(4));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_delete_missing_is_ok() {
        let mut store = FsStore::new(temp_root("delete_missing"));
        assert!(store.delete_image_blob(99).is_ok());
        assert!(store.delete_snapshot(99).is_ok());
    }
}
