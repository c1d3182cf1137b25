//! Arrow and rectangle strokes rasterized with tiny-skia.

use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

use crate::model::{Arrow, RectOutline, Rgba};

fn paint_for(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r(), color.g(), color.b(), color.a());
    paint.anti_alias = true;
    paint
}

/// Quadratic shaft with round caps, then the filled head.
pub(super) fn draw_arrow(pixmap: &mut Pixmap, arrow: &Arrow) {
    let paint = paint_for(arrow.color);
    let stroke = Stroke {
        width: arrow.stroke_width as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };

    let mut pb = PathBuilder::new();
    pb.move_to(arrow.start.x as f32, arrow.start.y as f32);
    pb.quad_to(
        arrow.control.x as f32,
        arrow.control.y as f32,
        arrow.end.x as f32,
        arrow.end.y as f32,
    );
    match pb.finish() {
        Some(path) => {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
        None => log::trace!("Arrow {} has a degenerate shaft", arrow.id),
    }

    let [tip, left, right] = arrow.head_triangle();
    let mut pb = PathBuilder::new();
    pb.move_to(tip.x as f32, tip.y as f32);
    pb.line_to(left.x as f32, left.y as f32);
    pb.line_to(right.x as f32, right.y as f32);
    pb.close();
    if let Some(path) = pb.finish() {
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

/// Outline centered on the region edge with miter joins.
pub(super) fn draw_rect(pixmap: &mut Pixmap, rect: &RectOutline) {
    let region = rect.region;
    let Some(bounds) = Rect::from_xywh(
        region.x as f32,
        region.y as f32,
        region.width as f32,
        region.height as f32,
    ) else {
        log::trace!("Rect {} has invalid bounds", rect.id);
        return;
    };

    let stroke = Stroke {
        width: rect.stroke_width as f32,
        line_join: LineJoin::Miter,
        ..Default::default()
    };
    let path = PathBuilder::from_rect(bounds);
    pixmap.stroke_path(&path, &paint_for(rect.color), &stroke, Transform::identity(), None);
}
