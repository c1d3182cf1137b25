//! Scene collection, active-scene switching and persistence.

use super::{Scene, SceneId, SceneMeta, SceneState};
use crate::constants::DEFAULT_SCENE_TITLE_PREFIX;
use crate::geometry::ImageSize;
use crate::storage::{SceneStore, StorageError};

/// Owns all scenes and the live state of the active one.
///
/// The live [`SceneState`] is the only mutable copy; it is flushed back into
/// the active scene's snapshot (and the store) before any switch and after
/// every committed edit.
#[derive(Debug)]
pub struct SceneManager<S: SceneStore> {
    store: S,
    scenes: Vec<Scene>,
    active: Option<SceneId>,
    live: SceneState,
    next_id: SceneId,
}

impl<S: SceneStore> SceneManager<S> {
    /// Create an empty manager. Call [`hydrate`](Self::hydrate) to load
    /// previously stored scenes.
    pub fn new(store: S) -> Self {
        Self {
            store,
            scenes: Vec::new(),
            active: None,
            live: SceneState::new(),
            next_id: 1,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id() == id)
    }

    pub fn active_id(&self) -> Option<SceneId> {
        self.active
    }

    pub fn active_scene(&self) -> Option<&Scene> {
        self.active.and_then(|id| self.scene(id))
    }

    /// Live state of the active scene.
    pub fn live(&self) -> &SceneState {
        &self.live
    }

    pub fn live_mut(&mut self) -> &mut SceneState {
        &mut self.live
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    fn index(&self) -> Vec<SceneMeta> {
        self.scenes.iter().map(|s| s.meta.clone()).collect()
    }

    /// Hand out a fresh scene id and persist the advanced counter.
    fn allocate_scene_id(&mut self) -> Result<SceneId, StorageError> {
        let id = self.next_id;
        self.next_id += 1;
        self.store.save_next_scene_id(self.next_id)?;
        Ok(id)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Load the stored scene index and snapshots.
    ///
    /// Scenes whose image blob is missing are skipped. A missing snapshot
    /// yields an empty state. The stored active id is restored when it still
    /// exists; otherwise the first scene becomes active.
    pub fn hydrate(&mut self) -> Result<(), StorageError> {
        let index = self.store.load_scene_index()?;
        let stored_next = self.store.load_next_scene_id()?.unwrap_or(1);
        let after_index = index.iter().map(|m| m.id + 1).max().unwrap_or(1);
        self.next_id = stored_next.max(after_index);

        let mut scenes = Vec::with_capacity(index.len());

        for meta in index {
            let Some(image) = self.store.load_image_blob(meta.id)? else {
                log::warn!("Scene {} has no image blob, skipping", meta.id);
                continue;
            };
            let mut snapshot = self.store.load_snapshot(meta.id)?.unwrap_or_default();
            snapshot.repair();
            scenes.push(Scene {
                meta,
                image,
                snapshot,
            });
        }

        let stored_active = self.store.load_active_scene_id()?;
        self.scenes = scenes;
        self.active = stored_active
            .filter(|id| self.scene(*id).is_some())
            .or_else(|| self.scenes.first().map(Scene::id));
        self.live = self
            .active_scene()
            .map(|s| s.snapshot.clone())
            .unwrap_or_default();

        log::info!(
            "Hydrated {} scene(s), active {:?}",
            self.scenes.len(),
            self.active
        );
        Ok(())
    }

    /// Create a scene from image bytes and make it active.
    ///
    /// `title` defaults to `"Image N"` where N is the new scene count.
    pub fn add_scene(
        &mut self,
        image: Vec<u8>,
        image_size: ImageSize,
        title: Option<String>,
    ) -> Result<SceneId, StorageError> {
        self.flush_active()?;

        let id = self.allocate_scene_id()?;
        let title = title
            .unwrap_or_else(|| format!("{} {}", DEFAULT_SCENE_TITLE_PREFIX, self.scenes.len() + 1));
        let meta = SceneMeta::new(id, title, image_size);
        let snapshot = SceneState::new();

        self.store.save_image_blob(id, &image)?;
        self.store.save_snapshot(id, &snapshot)?;
        self.scenes.push(Scene {
            meta,
            image,
            snapshot: snapshot.clone(),
        });
        self.store.save_scene_index(&self.index())?;

        self.active = Some(id);
        self.live = snapshot;
        self.store.save_active_scene_id(self.active)?;
        log::info!("Added scene {id} ({}x{})", image_size.width, image_size.height);
        Ok(id)
    }

    /// Make another scene active.
    ///
    /// The current live state is flushed first. Returns false if `id` is
    /// already active or unknown.
    pub fn switch_scene(&mut self, id: SceneId) -> Result<bool, StorageError> {
        if self.active == Some(id) {
            return Ok(false);
        }
        let Some(target) = self.scene(id).map(|s| s.snapshot.clone()) else {
            log::warn!("Cannot switch to unknown scene {id}");
            return Ok(false);
        };

        self.flush_active()?;
        self.active = Some(id);
        self.live = target;
        self.store.save_active_scene_id(self.active)?;
        log::debug!("Switched to scene {id}");
        Ok(true)
    }

    /// Delete a scene, its blob and its snapshot.
    ///
    /// Deleting the active scene activates its neighbour at the same
    /// position (or the new last scene), or clears everything when no scene
    /// remains. Returns false for an unknown id.
    pub fn delete_scene(&mut self, id: SceneId) -> Result<bool, StorageError> {
        let Some(position) = self.scenes.iter().position(|s| s.id() == id) else {
            return Ok(false);
        };

        self.scenes.remove(position);
        self.store.delete_image_blob(id)?;
        self.store.delete_snapshot(id)?;
        self.store.save_scene_index(&self.index())?;

        if self.active == Some(id) {
            let neighbour = self
                .scenes
                .get(position.min(self.scenes.len().saturating_sub(1)));
            self.active = neighbour.map(Scene::id);
            self.live = neighbour.map(|s| s.snapshot.clone()).unwrap_or_default();
            self.store.save_active_scene_id(self.active)?;
        }

        log::info!("Deleted scene {id}, active {:?}", self.active);
        Ok(true)
    }

    /// Delete every scene and clear the active pointer.
    pub fn delete_all_scenes(&mut self) -> Result<(), StorageError> {
        for scene in &self.scenes {
            self.store.delete_image_blob(scene.id())?;
            self.store.delete_snapshot(scene.id())?;
        }
        self.scenes.clear();
        self.store.save_scene_index(&[])?;

        self.active = None;
        self.live = SceneState::new();
        self.store.save_active_scene_id(None)?;
        log::info!("Deleted all scenes");
        Ok(())
    }

    /// Copy the live state into the active scene and persist it.
    pub fn flush_active(&mut self) -> Result<(), StorageError> {
        let Some(id) = self.active else {
            return Ok(());
        };
        if let Some(scene) = self.scenes.iter_mut().find(|s| s.meta.id == id) {
            scene.snapshot = self.live.clone();
        }
        self.store.save_snapshot(id, &self.live)
    }
}
