//! Global constants for the shotmark editor

/// Default stroke color for arrows and rectangles (`#F99761`).
pub const DEFAULT_STROKE_COLOR: [u8; 4] = [0xF9, 0x97, 0x61, 0xFF];

/// Default stroke width in image pixels
pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;

/// Default mosaic cell size in image pixels
pub const DEFAULT_MOSAIC_BLOCK_SIZE: u32 = 12;

/// Smallest mosaic cell size accepted from tool settings
pub const MIN_MOSAIC_BLOCK_SIZE: u32 = 2;

/// Hit-test tolerance in display pixels
pub const DEFAULT_HIT_TOLERANCE_PX: f64 = 8.0;

/// Number of line segments used to approximate a quadratic curve
pub const DEFAULT_CURVE_SEGMENTS: usize = 32;

/// Lower bound on curve sampling density
pub const MIN_CURVE_SEGMENTS: usize = 28;

/// Arrowhead size is this base plus the stroke width
pub const ARROW_HEAD_BASE: f64 = 8.0;

/// Half-angle between the arrow shaft and each arrowhead wing (30 degrees)
pub const ARROW_HEAD_HALF_ANGLE: f64 = std::f64::consts::PI / 6.0;

/// Minimum width/height of a rectangle or mosaic region
pub const MIN_OBJECT_SIZE: f64 = 1.0;

/// Frames to wait for a scene to become renderable during bulk export
pub const DEFAULT_READY_FRAME_BUDGET: u32 = 3;

/// File name offered for a single-image export
pub const DEFAULT_EXPORT_FILENAME: &str = "screenshot.png";

/// File name offered for the bulk archive export
pub const DEFAULT_ARCHIVE_FILENAME: &str = "screenshots.zip";

/// Title prefix for scenes created without an explicit title
pub const DEFAULT_SCENE_TITLE_PREFIX: &str = "Image";
