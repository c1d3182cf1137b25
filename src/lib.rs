//! Shotmark - screenshot annotation core
//!
//! Paste a screenshot, draw arrows, rectangles and mosaic blocks over it,
//! and export the composed result as PNG. The crate holds everything below
//! the presentation layer: the object model, global and per-object undo,
//! scene management with pluggable storage, the pointer/keyboard state
//! machine and a deterministic compositor.
//!
//! A UI drives an [`Editor`], feeding it display-space pointer events and
//! key presses and reading back objects, selection and draft previews to
//! draw.

pub mod config;
pub mod constants;
pub mod editor;
pub mod export;
pub mod geometry;
pub mod history;
pub mod interaction;
pub mod keybindings;
pub mod model;
pub mod render;
pub mod scene;
pub mod storage;

pub use config::{ConfigError, EditorConfig, LogLevel};
pub use editor::{Editor, EditorError};
pub use export::{ExportError, ExportOptions};
pub use geometry::{Point, Size, Transform};
pub use model::{AnnotationObject, Rgba, Tool};
pub use render::{RenderError, compose};
pub use scene::{SceneId, SceneManager, SceneState};
pub use storage::{FsStore, MemoryStore, SceneStore, StorageError};
