//! Geometry for the annotation canvas.
//!
//! Points, the fit-to-container transform between display and image space,
//! and the quadratic-curve helpers used by arrows. All stored geometry lives
//! in image space; display space only exists at the input and preview edges.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_CURVE_SEGMENTS;

/// A 2D point in image or display space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint between this point and another.
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Translate by a delta.
    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Size of a container in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Natural pixel dimensions of a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

// ============================================================================
// Transform
// ============================================================================

/// Uniform scale plus offset mapping image space into display space.
///
/// `display = image * scale + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Transform {
    /// Create a new transform with the given scale and offset.
    pub fn new(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    /// Create an identity transform (scale=1, no offset).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Fit an image into a container, preserving aspect ratio and centering it.
    ///
    /// Returns `None` when either the container or the image has a zero
    /// dimension, in which case no transform is defined.
    pub fn fit(container: Size, image: ImageSize) -> Option<Transform> {
        if image.is_empty() || container.width <= 0.0 || container.height <= 0.0 {
            return None;
        }

        let image_w = f64::from(image.width);
        let image_h = f64::from(image.height);
        let scale = (container.width / image_w).min(container.height / image_h);

        Some(Transform {
            scale,
            offset_x: (container.width - image_w * scale) / 2.0,
            offset_y: (container.height - image_h * scale) / 2.0,
        })
    }

    /// Map an image-space point into display space.
    pub fn to_display(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.offset_x, p.y * self.scale + self.offset_y)
    }

    /// Map a display-space point into image space.
    pub fn to_image(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.offset_x) / self.scale,
            (p.y - self.offset_y) / self.scale,
        )
    }

    /// Convert a display-space distance (e.g. a hit tolerance) to image space.
    pub fn distance_to_image(&self, distance: f64) -> f64 {
        distance / self.scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

// ============================================================================
// Segments and quadratic curves
// ============================================================================

/// Shortest distance from `p` to the segment `a`-`b`.
///
/// A zero-length segment falls back to a divisor of 1, which degenerates into
/// the distance to `a`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    let denom = if len_sq == 0.0 { 1.0 } else { len_sq };
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / denom).clamp(0.0, 1.0);
    p.distance_to(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Evaluate the quadratic Bezier `start`-`control`-`end` at `t`.
pub fn quadratic_point(start: Point, control: Point, end: Point, t: f64) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * start.x + 2.0 * u * t * control.x + t * t * end.x,
        u * u * start.y + 2.0 * u * t * control.y + t * t * end.y,
    )
}

/// Sample a quadratic curve into `segments + 1` points.
///
/// The segment count never drops below [`MIN_CURVE_SEGMENTS`].
pub fn sample_quadratic(start: Point, control: Point, end: Point, segments: usize) -> Vec<Point> {
    let segments = segments.max(MIN_CURVE_SEGMENTS);
    (0..=segments)
        .map(|i| quadratic_point(start, control, end, i as f64 / segments as f64))
        .collect()
}

/// Approximate distance from `p` to a quadratic curve via its sampled polyline.
pub fn distance_to_quadratic(
    p: Point,
    start: Point,
    control: Point,
    end: Point,
    segments: usize,
) -> f64 {
    sample_quadratic(start, control, end, segments)
        .windows(2)
        .map(|w| distance_to_segment(p, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Midpoint and unit normal of the segment `start`-`end`.
///
/// The normal is `(-dy, dx) / len`; a zero-length segment uses a length of 1,
/// so its normal is the zero vector.
pub fn bisector_frame(start: Point, end: Point) -> (Point, Point) {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let len = dx.hypot(dy);
    let len = if len == 0.0 { 1.0 } else { len };
    (start.midpoint(end), Point::new(-dy / len, dx / len))
}

/// Signed distance of `p` from the start-end midpoint along the bisector.
pub fn bisector_offset(start: Point, end: Point, p: Point) -> f64 {
    let (mid, normal) = bisector_frame(start, end);
    (p.x - mid.x) * normal.x + (p.y - mid.y) * normal.y
}

/// Point on the perpendicular bisector of `start`-`end` at signed offset `k`.
pub fn point_on_bisector(start: Point, end: Point, k: f64) -> Point {
    let (mid, normal) = bisector_frame(start, end);
    Point::new(mid.x + normal.x * k, mid.y + normal.y * k)
}

/// Orthogonal projection of `p` onto the perpendicular bisector of `start`-`end`.
pub fn project_onto_bisector(start: Point, end: Point, p: Point) -> Point {
    point_on_bisector(start, end, bisector_offset(start, end, p))
}
