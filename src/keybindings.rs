//! Keyboard shortcuts for the editor.
//!
//! Fixed shortcuts:
//! - `mod+Z` undo, `mod+Shift+Z` redo, and `Ctrl+Y` redo off macOS, where
//!   `mod` is Cmd on macOS and Ctrl elsewhere
//! - Delete/Backspace removes the selected object
//!
//! Tool hotkeys (S/A/R/M by default) are configurable. Delete and tool
//! hotkeys are ignored while focus is in an editable element.

use serde::{Deserialize, Serialize};

use crate::model::Tool;

/// Physical keys the editor reacts to.
///
/// Named after the DOM `KeyboardEvent.code` values (`KeyA`, `Delete`, ...)
/// so layouts that remap characters still hit the same shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Delete,
    Backspace,
    Escape,
}

impl KeyCode {
    const LETTERS: [KeyCode; 26] = [
        KeyCode::A,
        KeyCode::B,
        KeyCode::C,
        KeyCode::D,
        KeyCode::E,
        KeyCode::F,
        KeyCode::G,
        KeyCode::H,
        KeyCode::I,
        KeyCode::J,
        KeyCode::K,
        KeyCode::L,
        KeyCode::M,
        KeyCode::N,
        KeyCode::O,
        KeyCode::P,
        KeyCode::Q,
        KeyCode::R,
        KeyCode::S,
        KeyCode::T,
        KeyCode::U,
        KeyCode::V,
        KeyCode::W,
        KeyCode::X,
        KeyCode::Y,
        KeyCode::Z,
    ];

    /// Parse a DOM `KeyboardEvent.code` string.
    pub fn from_dom_code(code: &str) -> Option<KeyCode> {
        match code {
            "Delete" => Some(KeyCode::Delete),
            "Backspace" => Some(KeyCode::Backspace),
            "Escape" => Some(KeyCode::Escape),
            _ => {
                let letter = code.strip_prefix("Key")?;
                let mut chars = letter.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_uppercase() => {
                        Self::LETTERS.get(usize::from(c as u8 - b'A')).copied()
                    }
                    _ => None,
                }
            }
        }
    }
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Host platform, which decides the primary shortcut modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    Mac,
    #[default]
    Other,
}

impl Platform {
    /// Whether the primary modifier (Cmd on macOS, Ctrl elsewhere) is held.
    pub fn primary_held(&self, modifiers: Modifiers) -> bool {
        match self {
            Platform::Mac => modifiers.meta,
            Platform::Other => modifiers.ctrl,
        }
    }
}

/// A key press as seen by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub modifiers: Modifiers,
    /// Focus is in a text input, textarea or content-editable element.
    pub editable_target: bool,
}

impl KeyEvent {
    pub fn new(key: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            editable_target: false,
        }
    }

    /// Builder: mark the event as targeting an editable element.
    pub fn in_editable(mut self) -> Self {
        self.editable_target = true;
        self
    }
}

/// What a key press asks the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Undo,
    Redo,
    DeleteSelected,
    SelectTool(Tool),
}

/// Keybinding configuration for the tool hotkeys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Hotkey for Select tool
    pub tool_select: KeyCode,
    /// Hotkey for Arrow tool
    pub tool_arrow: KeyCode,
    /// Hotkey for Rect tool
    pub tool_rect: KeyCode,
    /// Hotkey for Mosaic tool
    pub tool_mosaic: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            tool_select: KeyCode::S,
            tool_arrow: KeyCode::A,
            tool_rect: KeyCode::R,
            tool_mosaic: KeyCode::M,
        }
    }
}

impl KeyBindings {
    /// Create new keybindings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the tool that corresponds to a key press, if any.
    pub fn tool_for_key(&self, key: KeyCode) -> Option<Tool> {
        if key == self.tool_select {
            Some(Tool::Select)
        } else if key == self.tool_arrow {
            Some(Tool::Arrow)
        } else if key == self.tool_rect {
            Some(Tool::Rect)
        } else if key == self.tool_mosaic {
            Some(Tool::Mosaic)
        } else {
            None
        }
    }

    /// Get the hotkey for a specific tool.
    pub fn key_for_tool(&self, tool: Tool) -> KeyCode {
        match tool {
            Tool::Select => self.tool_select,
            Tool::Arrow => self.tool_arrow,
            Tool::Rect => self.tool_rect,
            Tool::Mosaic => self.tool_mosaic,
        }
    }

    /// Set the hotkey for a tool.
    pub fn set_tool_key(&mut self, tool: Tool, key: KeyCode) {
        match tool {
            Tool::Select => self.tool_select = key,
            Tool::Arrow => self.tool_arrow = key,
            Tool::Rect => self.tool_rect = key,
            Tool::Mosaic => self.tool_mosaic = key,
        }
    }

    /// Check if a key is already used by any binding or fixed shortcut.
    /// Returns a description of what it's used for, if anything.
    pub fn key_conflict(&self, key: KeyCode, exclude_tool: Option<Tool>) -> Option<String> {
        if matches!(key, KeyCode::Delete | KeyCode::Backspace) {
            return Some("Delete selected".to_string());
        }
        Tool::all()
            .iter()
            .filter(|tool| exclude_tool != Some(**tool))
            .find(|tool| self.key_for_tool(**tool) == key)
            .map(|tool| format!("{} tool", tool.name()))
    }

    /// Resolve a key press into an editor action.
    pub fn resolve(&self, event: &KeyEvent, platform: Platform) -> Option<KeyAction> {
        let modifiers = event.modifiers;

        if platform.primary_held(modifiers) {
            return match event.key {
                KeyCode::Z if modifiers.shift => Some(KeyAction::Redo),
                KeyCode::Z => Some(KeyAction::Undo),
                KeyCode::Y if platform == Platform::Other => Some(KeyAction::Redo),
                _ => None,
            };
        }

        if event.editable_target {
            return None;
        }

        match event.key {
            KeyCode::Delete | KeyCode::Backspace => Some(KeyAction::DeleteSelected),
            key if !modifiers.any() => self.tool_for_key(key).map(KeyAction::SelectTool),
            _ => None,
        }
    }
}

/// Convert a KeyCode to a display string.
pub fn key_to_string(key: KeyCode) -> &'static str {
    match key {
        KeyCode::A => "A",
        KeyCode::B => "B",
        KeyCode::C => "C",
        KeyCode::D => "D",
        KeyCode::E => "E",
        KeyCode::F => "F",
        KeyCode::G => "G",
        KeyCode::H => "H",
        KeyCode::I => "I",
        KeyCode::J => "J",
        KeyCode::K => "K",
        KeyCode::L => "L",
        KeyCode::M => "M",
        KeyCode::N => "N",
        KeyCode::O => "O",
        KeyCode::P => "P",
        KeyCode::Q => "Q",
        KeyCode::R => "R",
        KeyCode::S => "S",
        KeyCode::T => "T",
        KeyCode::U => "U",
        KeyCode::V => "V",
        KeyCode::W => "W",
        KeyCode::X => "X",
        KeyCode::Y => "Y",
        KeyCode::Z => "Z",
        KeyCode::Delete => "Del",
        KeyCode::Backspace => "Backspace",
        KeyCode::Escape => "Esc",
    }
}
