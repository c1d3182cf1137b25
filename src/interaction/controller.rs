//! Pointer state machine.

use super::ToolSettings;
use crate::constants::{DEFAULT_CURVE_SEGMENTS, DEFAULT_HIT_TOLERANCE_PX, MIN_CURVE_SEGMENTS};
use crate::geometry::Point;
use crate::history::{ArrowChanges, ChangeOp, LABEL_CREATED, LABEL_MODIFIED, LABEL_REMOVED};
use crate::model::{
    AnnotationObject, Arrow, Handle, Mosaic, ObjectId, RectOutline, Region, Tool,
};
use crate::scene::SceneState;

/// Result of feeding a pointer event to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum PointerOutcome {
    /// Nothing changed
    Ignored,
    /// Transient state changed (draft, selection, live drag); redraw only
    Changed,
    /// A change was recorded in history; the scene should be persisted
    Committed,
}

/// Object being drawn, from pointer-down to pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Draft {
    pub tool: Tool,
    pub start: Point,
    pub current: Point,
}

impl Draft {
    /// Build the object this draft would commit as.
    ///
    /// Returns `None` for the select tool, which never drafts.
    pub fn to_object(&self, id: ObjectId, settings: &ToolSettings) -> Option<AnnotationObject> {
        let object = match self.tool {
            Tool::Select => return None,
            Tool::Arrow => AnnotationObject::Arrow(Arrow::new(
                id,
                self.start,
                self.current,
                settings.stroke_color(),
                settings.stroke_width(),
            )),
            Tool::Rect => AnnotationObject::Rect(RectOutline {
                id,
                region: Region::from_corners(self.start, self.current),
                color: settings.stroke_color(),
                stroke_width: settings.stroke_width(),
            }),
            Tool::Mosaic => AnnotationObject::Mosaic(Mosaic {
                id,
                region: Region::from_corners(self.start, self.current),
                block_size: settings.mosaic_block_size(),
            }),
        };
        Some(object)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragKind {
    Move { origin: Point },
    Handle(Handle),
}

/// Drag in progress on an existing object.
#[derive(Debug, Clone, PartialEq)]
struct DragSession {
    kind: DragKind,
    /// Object state at drag start.
    original: AnnotationObject,
}

/// Interaction state for the active scene.
#[derive(Debug, Clone)]
pub struct Controller {
    tool: Tool,
    settings: ToolSettings,
    draft: Option<Draft>,
    drag: Option<DragSession>,
    selected: Option<ObjectId>,
    editing_arrow: Option<ObjectId>,
    /// Arrow state captured by `begin_arrow_edit`.
    edit_original: Option<Arrow>,
    hit_tolerance_px: f64,
    curve_segments: usize,
}

impl Default for Controller {
    fn default() -> Self {
        Self {
            tool: Tool::default(),
            settings: ToolSettings::default(),
            draft: None,
            drag: None,
            selected: None,
            editing_arrow: None,
            edit_original: None,
            hit_tolerance_px: DEFAULT_HIT_TOLERANCE_PX,
            curve_segments: DEFAULT_CURVE_SEGMENTS,
        }
    }
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the tool settings.
    pub fn with_settings(mut self, settings: ToolSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builder: set the hit tolerance in display pixels.
    pub fn with_hit_tolerance(mut self, px: f64) -> Self {
        self.hit_tolerance_px = px.max(0.0);
        self
    }

    /// Builder: set the curve sampling density used for hit tests.
    pub fn with_curve_segments(mut self, segments: usize) -> Self {
        self.curve_segments = segments.max(MIN_CURVE_SEGMENTS);
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.settings
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    /// Object the current draft would create, for live preview.
    pub fn draft_preview(&self) -> Option<AnnotationObject> {
        self.draft.and_then(|d| d.to_object(ObjectId::MAX, &self.settings))
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn editing_arrow(&self) -> Option<ObjectId> {
        self.editing_arrow
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn curve_segments(&self) -> usize {
        self.curve_segments
    }

    // ========================================================================
    // Tool and selection
    // ========================================================================

    /// Switch tools. Clears selection and edit mode; a gesture in progress
    /// is abandoned without being recorded.
    pub fn set_tool(&mut self, state: &mut SceneState, tool: Tool) {
        if self.tool != tool {
            log::debug!("Tool: {} -> {}", self.tool.name(), tool.name());
        }
        self.cancel_drag(state);
        self.tool = tool;
        self.clear_selection();
        self.draft = None;
    }

    /// Select an object; arrows also enter edit mode. Returns false if the
    /// object does not exist.
    pub fn select(&mut self, state: &SceneState, id: ObjectId) -> bool {
        let Some(object) = state.object(id) else {
            return false;
        };
        self.selected = Some(id);
        self.editing_arrow = None;
        self.edit_original = None;
        if let AnnotationObject::Arrow(arrow) = object {
            self.editing_arrow = Some(id);
            self.edit_original = Some(arrow.clone());
        }
        true
    }

    /// Clear selection and leave arrow edit mode.
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.exit_arrow_edit();
    }

    /// Forget everything transient. Call before `state` stops being the
    /// live scene so an abandoned drag is rolled back first.
    pub fn reset(&mut self, state: &mut SceneState) {
        self.cancel_drag(state);
        self.tool = Tool::Select;
        self.clear_selection();
        self.draft = None;
    }

    /// Abandon a drag in progress, putting the object back to its state at
    /// drag start. Returns false if there was no drag.
    pub fn cancel_drag(&mut self, state: &mut SceneState) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        let id = drag.original.id();
        if state.timeline.replace_object(drag.original) {
            log::debug!("Abandoned drag on object {id}");
        } else {
            log::debug!("Abandoned drag on object {id}, which no longer exists");
        }
        true
    }

    // ========================================================================
    // Arrow edit session
    // ========================================================================

    /// Enter edit mode on an arrow and capture its current state.
    pub fn begin_arrow_edit(&mut self, state: &SceneState, id: ObjectId) -> bool {
        let Some(arrow) = state.object(id).and_then(AnnotationObject::as_arrow) else {
            return false;
        };
        self.editing_arrow = Some(id);
        self.edit_original = Some(arrow.clone());
        true
    }

    /// Commit changes made since the edit session began.
    ///
    /// Records an `UpdateArrow` timeline entry carrying only the changed
    /// fields and a "Modified" snapshot in the arrow's own log. The session
    /// stays open with the new state as its baseline. Returns false if
    /// nothing changed.
    pub fn finish_arrow_edit(&mut self, state: &mut SceneState) -> bool {
        let (Some(id), Some(original)) = (self.editing_arrow, self.edit_original.as_ref()) else {
            return false;
        };
        let Some(current) = state.object(id).and_then(AnnotationObject::as_arrow).cloned() else {
            return false;
        };

        let changes = ArrowChanges::diff(original, &current);
        if changes.is_empty() {
            return false;
        }

        state
            .timeline
            .apply(ChangeOp::UpdateArrow { id, changes }, LABEL_MODIFIED);
        state
            .object_log
            .record(&AnnotationObject::Arrow(current.clone()), LABEL_MODIFIED);
        self.edit_original = Some(current);
        true
    }

    /// Leave arrow edit mode without recording anything.
    pub fn exit_arrow_edit(&mut self) {
        self.editing_arrow = None;
        self.edit_original = None;
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Remove the selected object through the timeline.
    pub fn remove_selected(&mut self, state: &mut SceneState) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        if state.object(id).is_none() {
            self.clear_selection();
            return false;
        }
        self.cancel_drag(state);
        state.timeline.apply(ChangeOp::Remove { id }, LABEL_REMOVED);
        self.clear_selection();
        true
    }

    // ========================================================================
    // Pointer events (image space)
    // ========================================================================

    /// Handle pointer-down at `p`. `scale` is the current display scale,
    /// used to keep the hit tolerance constant in display pixels.
    pub fn pointer_down(&mut self, state: &mut SceneState, p: Point, scale: f64) -> PointerOutcome {
        self.draft = None;
        self.cancel_drag(state);

        if self.tool.is_drawing_tool() {
            self.draft = Some(Draft {
                tool: self.tool,
                start: p,
                current: p,
            });
            return PointerOutcome::Changed;
        }

        let tolerance = self.tolerance(scale);

        if let Some(handle) = self.handle_at(state, p, tolerance) {
            if let Some(original) = self.selected.and_then(|id| state.object(id)).cloned() {
                self.drag = Some(DragSession {
                    kind: DragKind::Handle(handle),
                    original,
                });
                return PointerOutcome::Changed;
            }
        }

        match self.hit_test(state, p, tolerance) {
            None => {
                if self.selected.is_none() && self.editing_arrow.is_none() {
                    return PointerOutcome::Ignored;
                }
                self.clear_selection();
                PointerOutcome::Changed
            }
            Some(id) if self.selected != Some(id) => {
                self.select(state, id);
                PointerOutcome::Changed
            }
            Some(id) => {
                if let Some(original) = state.object(id).cloned() {
                    self.drag = Some(DragSession {
                        kind: DragKind::Move { origin: p },
                        original,
                    });
                }
                PointerOutcome::Changed
            }
        }
    }

    /// Handle pointer-move at `p`.
    pub fn pointer_move(&mut self, state: &mut SceneState, p: Point) -> PointerOutcome {
        if let Some(draft) = self.draft.as_mut() {
            draft.current = p;
            return PointerOutcome::Changed;
        }

        let Some(drag) = self.drag.as_ref() else {
            return PointerOutcome::Ignored;
        };
        let updated = match drag.kind {
            DragKind::Move { origin } => drag.original.translated(p.x - origin.x, p.y - origin.y),
            DragKind::Handle(handle) => drag.original.with_handle(handle, p),
        };

        if state.timeline.replace_object(updated) {
            PointerOutcome::Changed
        } else {
            log::debug!("Dragged object vanished, dropping drag");
            self.drag = None;
            PointerOutcome::Ignored
        }
    }

    /// Handle pointer-up at `p`: commit a draft or finish a drag.
    pub fn pointer_up(&mut self, state: &mut SceneState, p: Point) -> PointerOutcome {
        if let Some(mut draft) = self.draft.take() {
            draft.current = p;
            return self.commit_draft(state, draft);
        }

        if self.drag.is_none() {
            return PointerOutcome::Ignored;
        }
        let _ = self.pointer_move(state, p);
        let Some(drag) = self.drag.take() else {
            return PointerOutcome::Ignored;
        };
        self.finish_drag(state, drag)
    }

    fn commit_draft(&mut self, state: &mut SceneState, draft: Draft) -> PointerOutcome {
        let id = state.allocate_object_id();
        let Some(object) = draft.to_object(id, &self.settings) else {
            return PointerOutcome::Ignored;
        };
        let label = object.kind().label();

        state.timeline.apply(
            ChangeOp::Add {
                object: object.clone(),
            },
            label,
        );
        state.object_log.record(&object, LABEL_CREATED);
        log::debug!("Created {} {}", label, id);

        self.tool = Tool::Select;
        self.select(state, id);
        PointerOutcome::Committed
    }

    fn finish_drag(&mut self, state: &mut SceneState, drag: DragSession) -> PointerOutcome {
        let id = drag.original.id();
        let Some(current) = state.object(id).cloned() else {
            return PointerOutcome::Ignored;
        };
        if current == drag.original {
            return PointerOutcome::Ignored;
        }

        if current.as_arrow().is_some() {
            // Arrow edits go through the timeline as well
            if self.editing_arrow != Some(id) {
                self.editing_arrow = Some(id);
            }
            self.edit_original = drag.original.as_arrow().cloned();
            self.finish_arrow_edit(state);
        } else {
            state.object_log.record(&current, LABEL_MODIFIED);
        }
        PointerOutcome::Committed
    }

    // ========================================================================
    // Hit testing
    // ========================================================================

    fn tolerance(&self, scale: f64) -> f64 {
        if scale > 0.0 && scale.is_finite() {
            self.hit_tolerance_px / scale
        } else {
            self.hit_tolerance_px
        }
    }

    /// Top-most object under `p`.
    pub fn hit_test(&self, state: &SceneState, p: Point, tolerance: f64) -> Option<ObjectId> {
        state
            .objects()
            .iter()
            .rev()
            .find(|o| o.hit_test(p, tolerance, self.curve_segments))
            .map(AnnotationObject::id)
    }

    /// Handle of the selected object under `p`.
    ///
    /// Arrow handles are only live while that arrow is in edit mode.
    fn handle_at(&self, state: &SceneState, p: Point, tolerance: f64) -> Option<Handle> {
        let object = state.object(self.selected?)?;
        if object.as_arrow().is_some() && self.editing_arrow != Some(object.id()) {
            return None;
        }
        object
            .handles()
            .into_iter()
            .filter(|(_, pos)| pos.distance_to(p) <= tolerance)
            .min_by(|(_, a), (_, b)| a.distance_to(p).total_cmp(&b.distance_to(p)))
            .map(|(handle, _)| handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Corner;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn drag(
        controller: &mut Controller,
        state: &mut SceneState,
        from: Point,
        to: Point,
    ) -> PointerOutcome {
        let _ = controller.pointer_down(state, from, 1.0);
        let _ = controller.pointer_move(state, Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0));
        controller.pointer_up(state, to)
    }

    fn draw(controller: &mut Controller, state: &mut SceneState, tool: Tool, from: Point, to: Point) -> ObjectId {
        controller.set_tool(state, tool);
        assert_eq!(drag(controller, state, from, to), PointerOutcome::Committed);
        controller.selected().unwrap()
    }

    #[test]
    fn test_draw_rect_normalizes_and_selects() {
        let mut c = Controller::new();
        let mut state = SceneState::new();
        let id = draw(&mut c, &mut state, Tool::Rect, Point::new(50.0, 60.0), Point::new(10.0, 20.0));

        let region = state.object(id).unwrap().region().unwrap();
        assert_eq!(region, Region::new(10.0, 20.0, 40.0, 40.0));
        assert_eq!(c.tool(), Tool::Select);
        assert_eq!(c.selected(), Some(id));
        assert_eq!(c.editing_arrow(), None);
        assert_eq!(state.timeline.entries()[0].label, "Rectangle");
        assert_eq!(state.object_log.entries(id)[0].label, "Created");
    }

    #[test]
    fn test_draw_arrow_enters_edit_mode() {
        let mut c = Controller::new();
        let mut state = SceneState::new();
        let id = draw(&mut c, &mut state, Tool::Arrow, Point::new(0.0, 0.0), Point::new(100.0, 0.0));

        let arrow = state.object(id).unwrap().as_arrow().unwrap().clone();
        assert_eq!(arrow.control, Point::new(50.0, 0.0));
        assert_eq!(arrow.color, c.settings().stroke_color());
        assert_eq!(c.editing_arrow(), Some(id));
    }

    #[test]
    fn test_draw_mosaic_uses_block_size() {
        let mut c = Controller::new();
        c.settings_mut().set_mosaic_block_size(20.0);
        let mut state = SceneState::new();
        let id = draw(&mut c, &mut state, Tool::Mosaic, Point::new(0.0, 0.0), Point::new(30.0, 30.0));
        match state.object(id).unwrap() {
            AnnotationObject::Mosaic(m) => assert_eq!(m.block_size, 20),
            other => panic!("expected mosaic, got {other:?}"),
        }
    }

    #[test]
    fn test_draft_is_tracked_until_release() {
        let mut c = Controller::new();
        let mut state = SceneState::new();
        c.set_tool(&mut state, Tool::Rect);
        let _ = c.pointer_down(&mut state, Point::new(1.0, 1.0), 1.0);
        let _ = c.pointer_move(&mut state, Point::new(9.0, 5.0));
        let draft = c.draft().unwrap();
        assert_eq!(draft.current, Point::new(9.0, 5.0));
        assert!(state.objects().is_empty());
        assert!(c.draft_preview().is_some());
    }

    #[test]
    fn test_set_tool_clears_selection_and_draft() {
        let mut c = Controller::new();
        let mut state = SceneState::new();
        draw(&mut c, &mut state, Tool::Rect, Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        c.set_tool(&mut state, Tool::Arrow);
        let _ = c.pointer_down(&mut state, Point::new(1.0, 1.0), 1.0);
        c.set_tool(&mut state, Tool::Select);
        assert!(c.draft().is_none());
        assert!(c.selected().is_none());
    }

    #[test]
    fn test_tool_switch_mid_drag_restores_object() {
        let mut c = Controller::new();
        let mut state = SceneState::new();
        let id = draw(&mut c, &mut state, Tool::Arrow, Point::new(0.0, 50.0), Point::new(100.0, 50.0));
        let before = state.object(id).unwrap().clone();

        let _ = c.pointer_down(&mut state, Point::new(25.0, 50.0), 1.0);
        assert!(c.is_dragging());
        let _ = c.pointer_move(&mut state, Point::new(25.0, 80.0));
        assert_ne!(state.object(id).unwrap(), &before);

        c.set_tool(&mut state, Tool::Rect);
        assert!(!c.is_dragging());
        assert_eq!(state.object(id).unwrap(), &before);
        assert_eq!(state.objects(), state.timeline.replay().as_slice());
        assert_eq!(state.timeline.len(), 1);
        assert_eq!(state.object_log.entries(id).len(), 1);
    }

    #[test]
    fn test_reset_mid_resize_restores_object() {
        let mut c = Controller::new();
        let mut state = SceneState::new();
        let id = draw(&mut c, &mut state, Tool::Mosaic, Point::new(10.0, 10.0), Point::new(40.0, 40.0));
        let before = state.object(id).unwrap().clone();

        let _ = c.pointer_down(&mut state, Point::new(40.0, 40.0), 1.0);
        assert!(c.is_dragging());
        let _ = c.pointer_move(&mut state, Point::new(70.0, 90.0));
        c.reset(&mut state);

        assert_eq!(state.object(id).unwrap(), &before);
        assert_eq!(c.pointer_up(&mut state, Point::new(70.0, 90.0)), PointerOutcome::Ignored);
        assert_eq!(state.object_log.entries(id).len(), 1);
    }

    #[test]
    fn test_cancel_without_drag_is_noop() {
        let mut c = Controller::new();
        let mut state = SceneState::new();
        assert!(!c.cancel_drag(&mut state));
    }

    #[test]
    fn test_click_selects_then_click_empty_deselects() {
        let mut c = Controller::new();
        let mut state = SceneState::new();
        let id = draw(&mut c, &mut state, Tool::Rect, Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        c.clear_selection();

        assert_eq!(c.pointer_down(&mut state, Point::new(5.0, 5.0), 1.0), PointerOutcome::Changed);
        assert_eq!(c.selected(), Some(id));
        assert_eq!(c.pointer_up(&mut state, Point::new(5.0, 5.0)), PointerOutcome::Ignored);

        assert_eq!(c.pointer_down(&mut state, Point::new(50.0, 50.0), 1.0), PointerOutcome::Changed);
        assert_eq!(c.selected(), None);
        assert_eq!(c.pointer_down(&mut state, Point::new(50.0, 50.0), 1.0), PointerOutcome::Ignored);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut c = Controller::new();
        let mut state = SceneState::new();
        let below = draw(&mut c, &mut state, Tool::Rect, Point::new(0.0, 0.0), Point::new(20.0, 20.0));
        let above = draw(&mut c, &mut state, Tool::Mosaic, Point::new(10.0, 10.0), Point::new(30.0, 30.0));
        assert_eq!(c.hit_test(&state, Point::new(15.0, 15.0), 8.0), Some(above));
        assert_eq!(c.hit_test(&state, Point::new(5.0, 5.0), 8.0), Some(below));
    }

    #[test]
    fn test_move_selected_rect_logs_per_object_only() {
        let mut c = Controller::new();
        let mut state = SceneState::new();
        let id = draw(&mut c, &mut state, Tool::Rect, Point::new(10.0, 10.0), Point::new(30.0, 30.0));

        let outcome = drag(&mut c, &mut state, Point::new(20.0, 20.0), Point::new(25.0, 40.0));
        assert_eq!(outcome, PointerOutcome::Committed);
        let region = state.object(id).unwrap().region().unwrap();
        assert_eq!(region, Region::new(15.0, 30.0, 20.0, 20.0));
        assert_eq!(state.timeline.len(), 1);
        assert_eq!(state.object_log.entries(id).len(), 2);
        assert_eq!(state.object_log.entries(id)[1].label, "Modified");

        assert!(state.undo_object(id));
        assert_eq!(state.object(id).unwrap().region().unwrap(), Region::new(10.0, 10.0, 20.0, 20.0));
    }

    #[test]
    fn test_corner_handle_resizes_from_opposite_corner() {
        let mut c = Controller::new();
        let mut state = SceneState::new();
        let id = draw(&mut c, &mut state, Tool::Rect, Point::new(10.0, 10.0), Point::new(30.0, 30.0));

        // Grab the top-left handle (within tolerance)
        let outcome = drag(&mut c, &mut state, Point::new(12.0, 11.0), Point::new(0.0, 5.0));
        assert_eq!(outcome, PointerOutcome::Committed);
        let region = state.object(id).unwrap().region().unwrap();
        assert_eq!(region, Region::new(0.0, 5.0, 30.0, 25.0));
        assert_eq!(region.corner(Corner::BottomRight), Point::new(30.0, 30.0));
    }

    #[test]
    fn test_arrow_control_drag_stays_on_bisector() {
        let mut c = Controller::new();
        let mut state = SceneState::new();
        let id = draw(&mut c, &mut state, Tool::Arrow, Point::new(0.0, 0.0), Point::new(100.0, 0.0));

        let outcome = drag(&mut c, &mut state, Point::new(50.0, 2.0), Point::new(70.0, 30.0));
        assert_eq!(outcome, PointerOutcome::Committed);
        let arrow = state.object(id).unwrap().as_arrow().unwrap().clone();
        assert!(approx_eq(arrow.control.x, 50.0));
        assert!(approx_eq(arrow.control.y, 30.0));

        // Global log records the edit, so undo there reverts it
        assert_eq!(state.timeline.len(), 2);
        assert_eq!(state.timeline.entries()[1].label, "Modified");
        match &state.timeline.entries()[1].op {
            ChangeOp::UpdateArrow { changes, .. } => {
                assert!(changes.control.is_some());
                assert!(changes.start.is_none());
                assert!(changes.end.is_none());
            }
            other => panic!("expected UpdateArrow, got {other:?}"),
        }
        assert!(state.timeline.undo());
        assert_eq!(
            state.object(id).unwrap().as_arrow().unwrap().control,
            Point::new(50.0, 0.0)
        );
    }

    #[test]
    fn test_arrow_endpoint_drag_keeps_bend() {
        let mut c = Controller::new();
        let mut state = SceneState::new();
        let id = draw(&mut c, &mut state, Tool::Arrow, Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let _ = drag(&mut c, &mut state, Point::new(50.0, 0.0), Point::new(50.0, 20.0));
        let k = state.object(id).unwrap().as_arrow().unwrap().curvature();

        let _ = drag(&mut c, &mut state, Point::new(100.0, 0.0), Point::new(0.0, 100.0));
        let arrow = state.object(id).unwrap().as_arrow().unwrap().clone();
        assert_eq!(arrow.end, Point::new(0.0, 100.0));
        assert!(approx_eq(arrow.curvature(), k));
        assert_eq!(state.object_log.entries(id).len(), 3);
    }

    #[test]
    fn test_tolerance_scales_with_display() {
        let mut c = Controller::new();
        let mut state = SceneState::new();
        draw(&mut c, &mut state, Tool::Arrow, Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        c.clear_selection();

        // 12 image px away: outside 8px at scale 1, inside at scale 0.5 (16 image px)
        let _ = c.pointer_down(&mut state, Point::new(30.0, 12.0), 1.0);
        assert_eq!(c.selected(), None);
        let _ = c.pointer_down(&mut state, Point::new(30.0, 12.0), 0.5);
        assert!(c.selected().is_some());
    }

    #[test]
    fn test_remove_selected() {
        let mut c = Controller::new();
        let mut state = SceneState::new();
        draw(&mut c, &mut state, Tool::Rect, Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert!(c.remove_selected(&mut state));
        assert!(state.objects().is_empty());
        assert_eq!(state.timeline.entries()[1].label, "Removed");
        assert_eq!(c.selected(), None);
        assert!(!c.remove_selected(&mut state));
    }

    #[test]
    fn test_click_without_move_does_not_log() {
        let mut c = Controller::new();
        let mut state = SceneState::new();
        let id = draw(&mut c, &mut state, Tool::Rect, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        let _ = c.pointer_down(&mut state, Point::new(20.0, 20.0), 1.0);
        assert!(c.is_dragging());
        assert_eq!(c.pointer_up(&mut state, Point::new(20.0, 20.0)), PointerOutcome::Ignored);
        assert_eq!(state.object_log.entries(id).len(), 1);
    }

    #[test]
    fn test_begin_and_finish_arrow_edit() {
        let mut c = Controller::new();
        let mut state = SceneState::new();
        let id = draw(&mut c, &mut state, Tool::Arrow, Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!(c.begin_arrow_edit(&state, id));
        assert!(!c.finish_arrow_edit(&mut state));
        c.exit_arrow_edit();
        assert_eq!(c.editing_arrow(), None);
        assert!(!c.begin_arrow_edit(&state, 999));
    }
}
