//! The editor facade.
//!
//! [`Editor`] owns the scenes, the pointer controller and the keyboard map,
//! and is the single entry point a UI drives. Pointer positions arrive in
//! display space and are mapped through the current [`Transform`]; every
//! committed change is flushed to the [`SceneStore`] before the call returns.

#[cfg(test)]
mod tests;

use thiserror::Error;

use crate::config::EditorConfig;
use crate::export::{
    ArchiveEntry, ClipboardPayload, ClipboardSink, ExportError, ExportLock, ExportOptions,
    RenderReadiness, entry_name, export_png, pick_image_payload, wait_until_ready, write_archive,
};
use crate::geometry::{Point, Size, Transform};
use crate::history::EntryId;
use crate::interaction::{Controller, PointerOutcome};
use crate::keybindings::{KeyAction, KeyBindings, KeyEvent, Platform};
use crate::model::{AnnotationObject, ObjectId, Rgba, Tool};
use crate::render::{RenderError, read_image_size};
use crate::scene::{Scene, SceneId, SceneManager, SceneState};
use crate::storage::{SceneStore, StorageError};

/// Errors from bringing a new image into the editor.
#[derive(Error, Debug)]
pub enum EditorError {
    /// The bytes are not a decodable image
    #[error("Failed to read image: {0}")]
    Image(#[from] RenderError),

    /// Persisting the new scene failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Screenshot editor over a scene store.
#[derive(Debug)]
pub struct Editor<S: SceneStore> {
    scenes: SceneManager<S>,
    controller: Controller,
    keybindings: KeyBindings,
    platform: Platform,
    /// Display size of the canvas container, once laid out.
    container: Option<Size>,
    config: EditorConfig,
    export_lock: ExportLock,
}

impl<S: SceneStore> Editor<S> {
    /// Create an editor. Call [`hydrate`](Self::hydrate) to load stored scenes.
    pub fn new(store: S, config: EditorConfig) -> Self {
        let preferences = &config.preferences;
        let controller = Controller::new()
            .with_settings(preferences.tool_settings())
            .with_hit_tolerance(preferences.hit_tolerance_px)
            .with_curve_segments(preferences.curve_segments);

        Self {
            scenes: SceneManager::new(store),
            controller,
            keybindings: config.keybindings.clone(),
            platform: Platform::default(),
            container: None,
            config,
            export_lock: ExportLock::new(),
        }
    }

    /// Builder: set the host platform for shortcut resolution.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Load previously stored scenes.
    pub fn hydrate(&mut self) -> Result<(), StorageError> {
        self.controller.reset(self.scenes.live_mut());
        self.scenes.hydrate()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn scenes(&self) -> &[Scene] {
        self.scenes.scenes()
    }

    pub fn scene_manager(&self) -> &SceneManager<S> {
        &self.scenes
    }

    pub fn active_scene_id(&self) -> Option<SceneId> {
        self.scenes.active_id()
    }

    pub fn active_scene(&self) -> Option<&Scene> {
        self.scenes.active_scene()
    }

    /// Live state of the active scene.
    pub fn state(&self) -> &SceneState {
        self.scenes.live()
    }

    /// Live objects of the active scene, in draw order.
    pub fn objects(&self) -> &[AnnotationObject] {
        self.scenes.live().objects()
    }

    pub fn tool(&self) -> Tool {
        self.controller.tool()
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.controller.selected()
    }

    /// The object being drawn, for preview rendering.
    pub fn draft_preview(&self) -> Option<AnnotationObject> {
        self.controller.draft_preview()
    }

    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }

    pub fn keybindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.keybindings
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn is_exporting(&self) -> bool {
        self.export_lock.is_busy()
    }

    // ========================================================================
    // View
    // ========================================================================

    /// Record the canvas container size after layout.
    pub fn set_container_size(&mut self, size: Size) {
        self.container = Some(size);
    }

    /// Current image-to-display transform, if an image is laid out.
    pub fn transform(&self) -> Option<Transform> {
        let container = self.container?;
        let image_size = self.scenes.active_scene()?.meta.image_size;
        Transform::fit(container, image_size)
    }

    /// Toggle the browser-frame decoration for the active scene.
    pub fn set_safarize(&mut self, enabled: bool) -> Result<(), StorageError> {
        if self.scenes.active_id().is_none() {
            return Ok(());
        }
        self.scenes.live_mut().view.safarize = enabled;
        self.scenes.flush_active()
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    /// Pointer pressed at a display-space position.
    pub fn pointer_down(&mut self, display: Point) -> Result<PointerOutcome, StorageError> {
        let Some(transform) = self.transform() else {
            return Ok(PointerOutcome::Ignored);
        };
        let p = transform.to_image(display);
        let outcome = self
            .controller
            .pointer_down(self.scenes.live_mut(), p, transform.scale);
        self.persist(outcome)
    }

    /// Pointer moved to a display-space position.
    pub fn pointer_move(&mut self, display: Point) -> Result<PointerOutcome, StorageError> {
        let Some(transform) = self.transform() else {
            return Ok(PointerOutcome::Ignored);
        };
        let p = transform.to_image(display);
        let outcome = self.controller.pointer_move(self.scenes.live_mut(), p);
        self.persist(outcome)
    }

    /// Pointer released at a display-space position.
    pub fn pointer_up(&mut self, display: Point) -> Result<PointerOutcome, StorageError> {
        let Some(transform) = self.transform() else {
            return Ok(PointerOutcome::Ignored);
        };
        let p = transform.to_image(display);
        let outcome = self.controller.pointer_up(self.scenes.live_mut(), p);
        self.persist(outcome)
    }

    fn persist(&mut self, outcome: PointerOutcome) -> Result<PointerOutcome, StorageError> {
        if outcome == PointerOutcome::Committed {
            self.scenes.flush_active()?;
        }
        Ok(outcome)
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    /// Resolve and run a key press. Returns the action that ran, if any.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Result<Option<KeyAction>, StorageError> {
        let Some(action) = self.keybindings.resolve(event, self.platform) else {
            return Ok(None);
        };
        log::trace!("Key {:?} -> {:?}", event.key, action);

        match action {
            KeyAction::Undo => {
                self.undo()?;
            }
            KeyAction::Redo => {
                self.redo()?;
            }
            KeyAction::DeleteSelected => {
                self.remove_selected()?;
            }
            KeyAction::SelectTool(tool) => self.set_tool(tool),
        }
        Ok(Some(action))
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Global undo. Clears the selection.
    pub fn undo(&mut self) -> Result<bool, StorageError> {
        self.controller.cancel_drag(self.scenes.live_mut());
        self.controller.clear_selection();
        let changed = self.scenes.live_mut().timeline.undo();
        self.flush_if(changed)
    }

    /// Global redo. Clears the selection.
    pub fn redo(&mut self) -> Result<bool, StorageError> {
        self.controller.cancel_drag(self.scenes.live_mut());
        self.controller.clear_selection();
        let changed = self.scenes.live_mut().timeline.redo();
        self.flush_if(changed)
    }

    /// Drop one entry from the global history. Clears the selection.
    pub fn delete_history_entry(&mut self, id: EntryId) -> Result<bool, StorageError> {
        self.controller.cancel_drag(self.scenes.live_mut());
        self.controller.clear_selection();
        let changed = self.scenes.live_mut().timeline.delete_entry(id);
        self.flush_if(changed)
    }

    /// Per-object undo: restore the object's previous snapshot.
    pub fn undo_object(&mut self, id: ObjectId) -> Result<bool, StorageError> {
        self.controller.cancel_drag(self.scenes.live_mut());
        let changed = self.scenes.live_mut().undo_object(id);
        self.rebaseline_edit(id, changed);
        self.flush_if(changed)
    }

    /// Per-object redo: restore the object's next snapshot.
    pub fn redo_object(&mut self, id: ObjectId) -> Result<bool, StorageError> {
        self.controller.cancel_drag(self.scenes.live_mut());
        let changed = self.scenes.live_mut().redo_object(id);
        self.rebaseline_edit(id, changed);
        self.flush_if(changed)
    }

    pub fn can_undo_object(&self, id: ObjectId) -> bool {
        self.scenes.live().object_log.can_undo(id)
    }

    pub fn can_redo_object(&self, id: ObjectId) -> bool {
        self.scenes.live().object_log.can_redo(id)
    }

    /// An arrow changed under an open edit session; restart the session
    /// from its new state so the next commit diffs against it.
    fn rebaseline_edit(&mut self, id: ObjectId, changed: bool) {
        if changed && self.controller.editing_arrow() == Some(id) {
            self.controller.begin_arrow_edit(self.scenes.live(), id);
        }
    }

    fn flush_if(&mut self, changed: bool) -> Result<bool, StorageError> {
        if changed {
            self.scenes.flush_active()?;
        }
        Ok(changed)
    }

    // ========================================================================
    // Objects and tools
    // ========================================================================

    /// Switch tools, abandoning any gesture in progress.
    pub fn set_tool(&mut self, tool: Tool) {
        self.controller.set_tool(self.scenes.live_mut(), tool);
    }

    /// Select an object; arrows enter edit mode.
    pub fn select(&mut self, id: ObjectId) -> bool {
        self.controller.select(self.scenes.live(), id)
    }

    pub fn clear_selection(&mut self) {
        self.controller.clear_selection();
    }

    /// Begin editing an arrow's handles.
    pub fn begin_arrow_edit(&mut self, id: ObjectId) -> bool {
        self.controller.begin_arrow_edit(self.scenes.live(), id)
    }

    /// Commit any pending arrow edit and leave edit mode.
    pub fn finish_arrow_edit(&mut self) -> Result<bool, StorageError> {
        let changed = self.controller.finish_arrow_edit(self.scenes.live_mut());
        self.controller.exit_arrow_edit();
        self.flush_if(changed)
    }

    /// Remove the selected object.
    pub fn remove_selected(&mut self) -> Result<bool, StorageError> {
        let changed = self.controller.remove_selected(self.scenes.live_mut());
        self.flush_if(changed)
    }

    pub fn set_stroke_color(&mut self, color: Rgba) {
        self.controller.settings_mut().set_stroke_color(color);
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.controller.settings_mut().set_stroke_width(width);
    }

    pub fn set_mosaic_block_size(&mut self, size: f64) {
        self.controller.settings_mut().set_mosaic_block_size(size);
    }

    // ========================================================================
    // Scenes
    // ========================================================================

    /// Add a scene from encoded image bytes and make it active.
    pub fn add_image(
        &mut self,
        bytes: Vec<u8>,
        title: Option<String>,
    ) -> Result<SceneId, EditorError> {
        let size = read_image_size(&bytes)?;
        self.controller.reset(self.scenes.live_mut());
        Ok(self.scenes.add_scene(bytes, size, title)?)
    }

    /// Add the first image found among pasted payloads.
    ///
    /// Returns `Ok(None)` when nothing in the paste looks like an image.
    pub fn paste(&mut self, payloads: &[ClipboardPayload]) -> Result<Option<SceneId>, EditorError> {
        let Some(payload) = pick_image_payload(payloads) else {
            log::debug!("Paste without image payload ignored");
            return Ok(None);
        };
        self.add_image(payload.bytes.clone(), None).map(Some)
    }

    /// Make another scene active. Any gesture in progress is abandoned
    /// before the outgoing scene is flushed.
    pub fn switch_scene(&mut self, id: SceneId) -> Result<bool, StorageError> {
        if self.scenes.active_id() == Some(id) || self.scenes.scene(id).is_none() {
            return Ok(false);
        }
        self.controller.reset(self.scenes.live_mut());
        self.scenes.switch_scene(id)
    }

    pub fn delete_scene(&mut self, id: SceneId) -> Result<bool, StorageError> {
        if self.scenes.active_id() == Some(id) {
            self.controller.reset(self.scenes.live_mut());
        }
        self.scenes.delete_scene(id)
    }

    pub fn delete_all_scenes(&mut self) -> Result<(), StorageError> {
        self.controller.reset(self.scenes.live_mut());
        self.scenes.delete_all_scenes()
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Render the active scene to PNG bytes.
    pub fn export_active(&mut self, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
        self.export_lock.acquire()?;
        let result = self.render_active(options);
        self.export_lock.release();
        result
    }

    fn render_active(&self, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
        let scene = self.scenes.active_scene().ok_or(ExportError::NoActiveScene)?;
        export_png(&scene.image, self.scenes.live().objects(), options)
    }

    /// Render every scene into a ZIP archive, one PNG per scene.
    ///
    /// Scenes are visited strictly in order: switch, wait for `readiness`,
    /// capture. The previously active scene is restored afterwards.
    pub fn export_all<R: RenderReadiness + ?Sized>(
        &mut self,
        readiness: &mut R,
    ) -> Result<Vec<u8>, ExportError> {
        self.export_lock.acquire()?;
        let original = self.scenes.active_id();
        let result = self.export_all_scenes(readiness);

        // Restore the original scene even if an export step failed
        let restored = match original {
            Some(id) => self.switch_scene(id).map(|_| ()),
            None => Ok(()),
        };
        self.export_lock.release();

        let archive = result?;
        restored?;
        Ok(archive)
    }

    fn export_all_scenes<R: RenderReadiness + ?Sized>(
        &mut self,
        readiness: &mut R,
    ) -> Result<Vec<u8>, ExportError> {
        if self.scenes.is_empty() {
            return Err(ExportError::NoActiveScene);
        }
        self.controller.reset(self.scenes.live_mut());
        self.scenes.flush_active()?;

        let ids: Vec<SceneId> = self.scenes.scenes().iter().map(Scene::id).collect();
        let budget = self.config.export.ready_frame_budget;
        let mut entries = Vec::with_capacity(ids.len());

        for (index, id) in ids.into_iter().enumerate() {
            self.switch_scene(id)?;
            if !wait_until_ready(readiness, id, budget) {
                log::warn!("Scene {id} not ready after {budget} frames, exporting anyway");
            }

            let png = self.render_active(&ExportOptions::default())?;
            let title = self
                .scenes
                .active_scene()
                .map(|s| s.meta.title.as_str())
                .unwrap_or_default();
            entries.push(ArchiveEntry {
                name: entry_name(index + 1, title),
                png,
            });
        }

        let archive = write_archive(&entries)?;
        log::info!("Exported {} scene(s) to archive", entries.len());
        Ok(archive)
    }

    /// Copy the composed active scene to the clipboard.
    ///
    /// Failures are logged and reported as `false`.
    pub fn copy_to_clipboard<C: ClipboardSink + ?Sized>(&mut self, sink: &mut C) -> bool {
        let png = match self.export_active(&ExportOptions::default()) {
            Ok(png) => png,
            Err(e) => {
                log::error!("Copy to clipboard failed: {}", e);
                return false;
            }
        };
        match sink.write_png(&png) {
            Ok(()) => {
                log::info!("Copied {} bytes to clipboard", png.len());
                true
            }
            Err(e) => {
                log::error!("{}", e);
                false
            }
        }
    }
}
