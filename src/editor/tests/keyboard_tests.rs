//! Keyboard shortcuts routed through the editor.

use super::{draw, editor_with_image};
use crate::geometry::Point;
use crate::keybindings::{KeyAction, KeyCode, KeyEvent, Modifiers, Platform};
use crate::model::Tool;

fn ctrl() -> Modifiers {
    Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    }
}

fn ctrl_shift() -> Modifiers {
    Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    }
}

#[test]
fn test_undo_redo_shortcuts() {
    let (mut editor, _) = editor_with_image(100);
    draw(
        &mut editor,
        Tool::Rect,
        Point::new(10.0, 10.0),
        Point::new(30.0, 30.0),
    );

    let action = editor.handle_key(&KeyEvent::new(KeyCode::Z, ctrl())).unwrap();
    assert_eq!(action, Some(KeyAction::Undo));
    assert!(editor.objects().is_empty());

    editor
        .handle_key(&KeyEvent::new(KeyCode::Z, ctrl_shift()))
        .unwrap();
    assert_eq!(editor.objects().len(), 1);

    editor.handle_key(&KeyEvent::new(KeyCode::Z, ctrl())).unwrap();
    let action = editor.handle_key(&KeyEvent::new(KeyCode::Y, ctrl())).unwrap();
    assert_eq!(action, Some(KeyAction::Redo));
    assert_eq!(editor.objects().len(), 1);
}

#[test]
fn test_mac_uses_command() {
    let (editor, _) = editor_with_image(50);
    let mut editor = editor.with_platform(Platform::Mac);
    draw(
        &mut editor,
        Tool::Rect,
        Point::new(10.0, 10.0),
        Point::new(30.0, 30.0),
    );

    // Ctrl+Z is not a shortcut on macOS
    assert_eq!(
        editor.handle_key(&KeyEvent::new(KeyCode::Z, ctrl())).unwrap(),
        None
    );
    let cmd = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };
    editor.handle_key(&KeyEvent::new(KeyCode::Z, cmd)).unwrap();
    assert!(editor.objects().is_empty());
}

#[test]
fn test_undo_works_in_text_inputs() {
    let (mut editor, _) = editor_with_image(100);
    draw(
        &mut editor,
        Tool::Rect,
        Point::new(10.0, 10.0),
        Point::new(30.0, 30.0),
    );
    editor
        .handle_key(&KeyEvent::new(KeyCode::Z, ctrl()).in_editable())
        .unwrap();
    assert!(editor.objects().is_empty());
}

#[test]
fn test_delete_key_removes_selection() {
    let (mut editor, _) = editor_with_image(100);
    draw(
        &mut editor,
        Tool::Mosaic,
        Point::new(10.0, 10.0),
        Point::new(30.0, 30.0),
    );

    // Ignored while typing
    let typing = KeyEvent::new(KeyCode::Backspace, Modifiers::NONE).in_editable();
    assert_eq!(editor.handle_key(&typing).unwrap(), None);
    assert_eq!(editor.objects().len(), 1);

    editor
        .handle_key(&KeyEvent::new(KeyCode::Delete, Modifiers::NONE))
        .unwrap();
    assert!(editor.objects().is_empty());
}

#[test]
fn test_tool_keys() {
    let (mut editor, _) = editor_with_image(100);
    editor
        .handle_key(&KeyEvent::new(KeyCode::A, Modifiers::NONE))
        .unwrap();
    assert_eq!(editor.tool(), Tool::Arrow);

    let shifted = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };
    assert_eq!(
        editor.handle_key(&KeyEvent::new(KeyCode::R, shifted)).unwrap(),
        None
    );
    assert_eq!(editor.tool(), Tool::Arrow);

    let typing = KeyEvent::new(KeyCode::M, Modifiers::NONE).in_editable();
    assert_eq!(editor.handle_key(&typing).unwrap(), None);
    assert_eq!(editor.tool(), Tool::Arrow);
}

#[test]
fn test_rebound_tool_key() {
    let (mut editor, _) = editor_with_image(100);
    editor.keybindings_mut().set_tool_key(Tool::Rect, KeyCode::B);
    editor
        .handle_key(&KeyEvent::new(KeyCode::B, Modifiers::NONE))
        .unwrap();
    assert_eq!(editor.tool(), Tool::Rect);
    assert_eq!(
        editor
            .handle_key(&KeyEvent::new(KeyCode::R, Modifiers::NONE))
            .unwrap(),
        None
    );
}
