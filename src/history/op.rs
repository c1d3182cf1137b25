//! Change operations recorded in the scene timeline.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::model::{AnnotationObject, Arrow, ObjectId, Rgba};

/// Identifier for a timeline entry, unique within a scene.
pub type EntryId = u64;

/// Partial update of an arrow's fields. `None` means unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrowChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

impl ArrowChanges {
    /// Fields of `after` that differ from `before`.
    pub fn diff(before: &Arrow, after: &Arrow) -> Self {
        fn changed<T: PartialEq + Copy>(a: T, b: T) -> Option<T> {
            (a != b).then_some(b)
        }

        Self {
            start: changed(before.start, after.start),
            control: changed(before.control, after.control),
            end: changed(before.end, after.end),
            color: changed(before.color, after.color),
            stroke_width: changed(before.stroke_width, after.stroke_width),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ArrowChanges::default()
    }

    /// Merge the present fields into `arrow`.
    pub fn apply_to(&self, arrow: &mut Arrow) {
        if let Some(start) = self.start {
            arrow.start = start;
        }
        if let Some(control) = self.control {
            arrow.control = control;
        }
        if let Some(end) = self.end {
            arrow.end = end;
        }
        if let Some(color) = self.color {
            arrow.color = color;
        }
        if let Some(stroke_width) = self.stroke_width {
            arrow.stroke_width = stroke_width;
        }
    }
}

/// A single change to a scene's object collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeOp {
    /// Append an object
    Add { object: AnnotationObject },
    /// Remove the object with this id
    Remove { id: ObjectId },
    /// Merge field changes into the arrow with this id
    UpdateArrow { id: ObjectId, changes: ArrowChanges },
}

impl ChangeOp {
    /// Get a human-readable description of this operation
    pub fn description(&self) -> String {
        match self {
            ChangeOp::Add { object } => format!("Add {} {}", object.title(), object.id()),
            ChangeOp::Remove { id } => format!("Remove object {id}"),
            ChangeOp::UpdateArrow { id, .. } => format!("Edit arrow {id}"),
        }
    }

    /// Apply this operation to an object collection.
    ///
    /// Operations that reference a missing object leave the collection as is.
    pub fn apply(&self, objects: &mut Vec<AnnotationObject>) {
        match self {
            ChangeOp::Add { object } => objects.push(object.clone()),
            ChangeOp::Remove { id } => objects.retain(|o| o.id() != *id),
            ChangeOp::UpdateArrow { id, changes } => {
                let arrow = objects.iter_mut().find_map(|o| match o {
                    AnnotationObject::Arrow(a) if a.id == *id => Some(a),
                    _ => None,
                });
                if let Some(arrow) = arrow {
                    changes.apply_to(arrow);
                }
            }
        }
    }
}

/// A labelled operation in the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub label: String,
    pub op: ChangeOp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Mosaic, Region};

    fn arrow(id: ObjectId) -> Arrow {
        Arrow::new(id, Point::new(0.0, 0.0), Point::new(10.0, 0.0), Rgba::default(), 3.0)
    }

    #[test]
    fn test_diff_only_changed_fields() {
        let before = arrow(1);
        let mut after = before.clone();
        after.end = Point::new(20.0, 5.0);
        after.stroke_width = 5.0;

        let changes = ArrowChanges::diff(&before, &after);
        assert_eq!(changes.start, None);
        assert_eq!(changes.end, Some(Point::new(20.0, 5.0)));
        assert_eq!(changes.stroke_width, Some(5.0));
        assert!(ArrowChanges::diff(&before, &before).is_empty());
    }

    #[test]
    fn test_update_arrow_merges_into_matching_arrow() {
        let mut objects = vec![
            AnnotationObject::Arrow(arrow(1)),
            AnnotationObject::Arrow(arrow(2)),
        ];
        let op = ChangeOp::UpdateArrow {
            id: 2,
            changes: ArrowChanges {
                color: Some(Rgba::opaque(0, 0, 255)),
                ..Default::default()
            },
        };
        op.apply(&mut objects);

        assert_eq!(objects[0], AnnotationObject::Arrow(arrow(1)));
        assert_eq!(objects[1].as_arrow().unwrap().color, Rgba::opaque(0, 0, 255));
        assert_eq!(objects[1].as_arrow().unwrap().start, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_update_ignores_non_arrows() {
        let mosaic = AnnotationObject::Mosaic(Mosaic {
            id: 1,
            region: Region::new(0.0, 0.0, 5.0, 5.0),
            block_size: 4,
        });
        let mut objects = vec![mosaic.clone()];
        ChangeOp::UpdateArrow {
            id: 1,
            changes: ArrowChanges {
                stroke_width: Some(9.0),
                ..Default::default()
            },
        }
        .apply(&mut objects);
        assert_eq!(objects, vec![mosaic]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut objects = vec![AnnotationObject::Arrow(arrow(1))];
        ChangeOp::Remove { id: 42 }.apply(&mut objects);
        assert_eq!(objects.len(), 1);
    }

    #[test]
    fn test_descriptions() {
        let add = ChangeOp::Add {
            object: AnnotationObject::Arrow(arrow(3)),
        };
        assert_eq!(add.description(), "Add Arrow 3");
        assert_eq!(ChangeOp::Remove { id: 3 }.description(), "Remove object 3");
    }
}
