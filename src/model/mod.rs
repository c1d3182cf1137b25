//! Annotation data model: objects, colors and tools.

mod color;
mod object;
mod tool;

pub use color::{ColorParseError, Rgba};
pub use object::{AnnotationObject, Arrow, Mosaic, ObjectId, ObjectKind, RectOutline, Region};
pub use tool::{Corner, Handle, Tool};
