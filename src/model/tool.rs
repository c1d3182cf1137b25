//! Editor tools and the drag handles exposed by selected objects.

use serde::{Deserialize, Serialize};

/// Tools available in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Select, move and edit existing objects
    #[default]
    Select,
    /// Draw a curved arrow
    Arrow,
    /// Draw a rectangle outline
    Rect,
    /// Draw a pixelation region
    Mosaic,
}

impl Tool {
    /// Get the display name for this tool.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Arrow => "Arrow",
            Tool::Rect => "Rectangle",
            Tool::Mosaic => "Mosaic",
        }
    }

    /// Get all available tools.
    pub fn all() -> &'static [Tool] {
        &[Tool::Select, Tool::Arrow, Tool::Rect, Tool::Mosaic]
    }

    /// Check if this tool is a drawing tool (not Select).
    pub fn is_drawing_tool(&self) -> bool {
        !matches!(self, Tool::Select)
    }
}

/// Corner of an axis-aligned region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub fn all() -> &'static [Corner] {
        &[
            Corner::TopLeft,
            Corner::TopRight,
            Corner::BottomLeft,
            Corner::BottomRight,
        ]
    }

    /// The diagonally opposite corner, which stays fixed during a resize.
    pub fn opposite(&self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }
}

/// A draggable handle on the selected object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    ArrowStart,
    ArrowControl,
    ArrowEnd,
    Corner(Corner),
}
