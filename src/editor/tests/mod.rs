//! Editor-level tests.
//!
//! These drive the editor the way a UI does: display-space pointer events,
//! key presses and exports, checked against the live state and the store.

mod keyboard_tests;

use image::RgbaImage;

use super::Editor;
use crate::config::EditorConfig;
use crate::geometry::{Point, Size};
use crate::interaction::PointerOutcome;
use crate::model::{ObjectId, Tool};
use crate::render::encode_png;
use crate::scene::SceneId;
use crate::storage::MemoryStore;

/// PNG with a horizontal/vertical gradient so neighbouring mosaic cells differ.
fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x * 5 % 256) as u8, (y * 3 % 256) as u8, 128, 255])
    });
    encode_png(&image).unwrap()
}

/// Editor with one `size`x`size` scene shown at scale 1.
fn editor_with_image(size: u32) -> (Editor<MemoryStore>, SceneId) {
    let mut editor = Editor::new(MemoryStore::new(), EditorConfig::default());
    let id = editor.add_image(gradient_png(size, size), None).unwrap();
    editor.set_container_size(Size::new(f64::from(size), f64::from(size)));
    (editor, id)
}

/// Press, move and release; returns the release outcome.
fn drag(editor: &mut Editor<MemoryStore>, from: Point, to: Point) -> PointerOutcome {
    let _ = editor.pointer_down(from).unwrap();
    let _ = editor.pointer_move(to).unwrap();
    editor.pointer_up(to).unwrap()
}

/// Draw an object with `tool` and return its id.
fn draw(editor: &mut Editor<MemoryStore>, tool: Tool, from: Point, to: Point) -> ObjectId {
    editor.set_tool(tool);
    assert_eq!(drag(editor, from, to), PointerOutcome::Committed);
    editor.selected().unwrap()
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}
