//! Annotation objects drawn over a screenshot.
//!
//! Every coordinate is in image space. Objects are plain values: history and
//! per-object logs store deep copies, so nothing here holds shared state.

use serde::{Deserialize, Serialize};

use super::color::Rgba;
use super::tool::{Corner, Handle};
use crate::constants::{ARROW_HEAD_BASE, ARROW_HEAD_HALF_ANGLE, MIN_OBJECT_SIZE};
use crate::geometry::{
    Point, bisector_offset, distance_to_quadratic, point_on_bisector, project_onto_bisector,
    sample_quadratic,
};

/// Unique identifier for an annotation object within a scene.
pub type ObjectId = u64;

/// The three kinds of annotation object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Arrow,
    Rect,
    Mosaic,
}

impl ObjectKind {
    /// Human-readable label, used for history entries and object titles.
    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Arrow => "Arrow",
            ObjectKind::Rect => "Rectangle",
            ObjectKind::Mosaic => "Mosaic",
        }
    }
}

// ============================================================================
// Region
// ============================================================================

/// Axis-aligned rectangle, top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalize a drag from `a` to `b` into a region with a non-negative size.
    ///
    /// Width and height are floored at [`MIN_OBJECT_SIZE`].
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs().max(MIN_OBJECT_SIZE),
            height: (b.y - a.y).abs().max(MIN_OBJECT_SIZE),
        }
    }

    /// Check if a point is inside the region (edges included).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Position of a corner.
    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => Point::new(self.x, self.y),
            Corner::TopRight => Point::new(self.x + self.width, self.y),
            Corner::BottomLeft => Point::new(self.x, self.y + self.height),
            Corner::BottomRight => Point::new(self.x + self.width, self.y + self.height),
        }
    }

    /// Resize by dragging `corner` to `p` while the opposite corner stays put.
    ///
    /// The size is floored at [`MIN_OBJECT_SIZE`]; a drag past the fixed
    /// corner pins the region against it instead of flipping.
    pub fn resized(&self, corner: Corner, p: Point) -> Region {
        let fixed = self.corner(corner.opposite());
        let (x, width) = match corner {
            Corner::TopLeft | Corner::BottomLeft => {
                let width = (fixed.x - p.x).max(MIN_OBJECT_SIZE);
                (fixed.x - width, width)
            }
            Corner::TopRight | Corner::BottomRight => {
                (fixed.x, (p.x - fixed.x).max(MIN_OBJECT_SIZE))
            }
        };
        let (y, height) = match corner {
            Corner::TopLeft | Corner::TopRight => {
                let height = (fixed.y - p.y).max(MIN_OBJECT_SIZE);
                (fixed.y - height, height)
            }
            Corner::BottomLeft | Corner::BottomRight => {
                (fixed.y, (p.y - fixed.y).max(MIN_OBJECT_SIZE))
            }
        };
        Region::new(x, y, width, height)
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Region {
        Region::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

// ============================================================================
// Object Types
// ============================================================================

/// Quadratic-curve arrow with a filled head at `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub id: ObjectId,
    pub start: Point,
    /// Always on the perpendicular bisector of `start`-`end`.
    pub control: Point,
    pub end: Point,
    pub color: Rgba,
    pub stroke_width: f64,
}

impl Arrow {
    /// Create a straight arrow; the control point sits at the chord midpoint.
    pub fn new(id: ObjectId, start: Point, end: Point, color: Rgba, stroke_width: f64) -> Self {
        Self {
            id,
            start,
            control: start.midpoint(end),
            end,
            color,
            stroke_width,
        }
    }

    /// Signed bend of the curve: the control point's offset along the bisector.
    pub fn curvature(&self) -> f64 {
        bisector_offset(self.start, self.end, self.control)
    }

    /// Move the control point, constrained to the bisector.
    pub fn with_control(&self, p: Point) -> Arrow {
        Arrow {
            control: project_onto_bisector(self.start, self.end, p),
            ..self.clone()
        }
    }

    /// Move an endpoint while keeping the bend.
    ///
    /// The curvature is measured on the current chord and re-applied on the
    /// new one, so the control point follows the moved bisector.
    pub fn with_endpoints(&self, start: Point, end: Point) -> Arrow {
        let k = self.curvature();
        Arrow {
            start,
            control: point_on_bisector(start, end, k),
            end,
            ..self.clone()
        }
    }

    /// Sampled polyline of the curve.
    pub fn sample(&self, segments: usize) -> Vec<Point> {
        sample_quadratic(self.start, self.control, self.end, segments)
    }

    /// Direction of the curve's tangent at `end`, in radians.
    ///
    /// Falls back to the chord direction when the control point coincides
    /// with the end, and to zero for a fully degenerate arrow.
    pub fn head_angle(&self) -> f64 {
        let from = if self.control != self.end {
            self.control
        } else {
            self.start
        };
        let dx = self.end.x - from.x;
        let dy = self.end.y - from.y;
        if dx == 0.0 && dy == 0.0 {
            0.0
        } else {
            dy.atan2(dx)
        }
    }

    /// Arrowhead size: a fixed base plus the stroke width.
    pub fn head_size(&self) -> f64 {
        ARROW_HEAD_BASE + self.stroke_width
    }

    /// Arrowhead triangle as `[tip, left wing, right wing]`.
    ///
    /// Shared by the interactive preview and the compositor so both draw the
    /// same head.
    pub fn head_triangle(&self) -> [Point; 3] {
        let angle = self.head_angle();
        let size = self.head_size();
        let wing = |a: f64| {
            Point::new(
                self.end.x - size * a.cos(),
                self.end.y - size * a.sin(),
            )
        };
        [
            self.end,
            wing(angle - ARROW_HEAD_HALF_ANGLE),
            wing(angle + ARROW_HEAD_HALF_ANGLE),
        ]
    }

    /// Hit test: within `tolerance` of the curve or of the control point.
    pub fn hit_test(&self, p: Point, tolerance: f64, segments: usize) -> bool {
        distance_to_quadratic(p, self.start, self.control, self.end, segments) <= tolerance
            || p.distance_to(self.control) <= tolerance
    }
}

/// Stroked rectangle outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectOutline {
    pub id: ObjectId,
    #[serde(flatten)]
    pub region: Region,
    pub color: Rgba,
    pub stroke_width: f64,
}

/// Pixelated region of the base image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mosaic {
    pub id: ObjectId,
    #[serde(flatten)]
    pub region: Region,
    /// Edge length of each mosaic cell in image pixels.
    pub block_size: u32,
}

/// Any annotation object in a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnnotationObject {
    Arrow(Arrow),
    Rect(RectOutline),
    Mosaic(Mosaic),
}

impl AnnotationObject {
    pub fn id(&self) -> ObjectId {
        match self {
            AnnotationObject::Arrow(a) => a.id,
            AnnotationObject::Rect(r) => r.id,
            AnnotationObject::Mosaic(m) => m.id,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            AnnotationObject::Arrow(_) => ObjectKind::Arrow,
            AnnotationObject::Rect(_) => ObjectKind::Rect,
            AnnotationObject::Mosaic(_) => ObjectKind::Mosaic,
        }
    }

    /// Display title shown in the object history panel.
    pub fn title(&self) -> &'static str {
        self.kind().label()
    }

    pub fn as_arrow(&self) -> Option<&Arrow> {
        match self {
            AnnotationObject::Arrow(a) => Some(a),
            _ => None,
        }
    }

    /// Bounds for region objects, `None` for arrows.
    pub fn region(&self) -> Option<Region> {
        match self {
            AnnotationObject::Arrow(_) => None,
            AnnotationObject::Rect(r) => Some(r.region),
            AnnotationObject::Mosaic(m) => Some(m.region),
        }
    }

    /// A copy of this object shifted by a delta.
    pub fn translated(&self, dx: f64, dy: f64) -> AnnotationObject {
        match self {
            AnnotationObject::Arrow(a) => AnnotationObject::Arrow(Arrow {
                start: a.start.offset(dx, dy),
                control: a.control.offset(dx, dy),
                end: a.end.offset(dx, dy),
                ..a.clone()
            }),
            AnnotationObject::Rect(r) => AnnotationObject::Rect(RectOutline {
                region: r.region.translated(dx, dy),
                ..r.clone()
            }),
            AnnotationObject::Mosaic(m) => AnnotationObject::Mosaic(Mosaic {
                region: m.region.translated(dx, dy),
                ..m.clone()
            }),
        }
    }

    /// Check if `p` hits this object.
    ///
    /// Arrows use the curve distance against `tolerance`; region objects
    /// hit anywhere inside their bounds.
    pub fn hit_test(&self, p: Point, tolerance: f64, segments: usize) -> bool {
        match self {
            AnnotationObject::Arrow(a) => a.hit_test(p, tolerance, segments),
            AnnotationObject::Rect(r) => r.region.contains(p),
            AnnotationObject::Mosaic(m) => m.region.contains(p),
        }
    }

    /// Drag handles and their positions.
    pub fn handles(&self) -> Vec<(Handle, Point)> {
        match self {
            AnnotationObject::Arrow(a) => vec![
                (Handle::ArrowStart, a.start),
                (Handle::ArrowControl, a.control),
                (Handle::ArrowEnd, a.end),
            ],
            AnnotationObject::Rect(_) | AnnotationObject::Mosaic(_) => {
                let region = self.region().unwrap_or_default();
                Corner::all()
                    .iter()
                    .map(|c| (Handle::Corner(*c), region.corner(*c)))
                    .collect()
            }
        }
    }

    /// A copy of this object with `handle` dragged to `p`.
    ///
    /// Handles that do not belong to this kind of object leave it unchanged.
    pub fn with_handle(&self, handle: Handle, p: Point) -> AnnotationObject {
        match (self, handle) {
            (AnnotationObject::Arrow(a), Handle::ArrowStart) => {
                AnnotationObject::Arrow(a.with_endpoints(p, a.end))
            }
            (AnnotationObject::Arrow(a), Handle::ArrowEnd) => {
                AnnotationObject::Arrow(a.with_endpoints(a.start, p))
            }
            (AnnotationObject::Arrow(a), Handle::ArrowControl) => {
                AnnotationObject::Arrow(a.with_control(p))
            }
            (AnnotationObject::Rect(r), Handle::Corner(corner)) => {
                AnnotationObject::Rect(RectOutline {
                    region: r.region.resized(corner, p),
                    ..r.clone()
                })
            }
            (AnnotationObject::Mosaic(m), Handle::Corner(corner)) => {
                AnnotationObject::Mosaic(Mosaic {
                    region: m.region.resized(corner, p),
                    ..m.clone()
                })
            }
            _ => self.clone(),
        }
    }
}
