//! Compositor: flattens a scene into a single raster image.
//!
//! Draw order is fixed: base image, then every mosaic, then rectangles and
//! arrows in object order. Mosaics are computed from the base image, so
//! overlapping mosaics never pixelate each other's output.

mod codec;
mod mosaic;
mod vector;

pub use codec::{decode_image, encode_png, read_image_size};
pub use mosaic::pixelate_region;

use image::RgbaImage;
use thiserror::Error;
use tiny_skia::{ColorU8, Pixmap};

use crate::model::AnnotationObject;

/// Errors that can occur while composing or encoding a scene.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The source image could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// The composed image could not be encoded
    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    /// The drawing surface could not be allocated
    #[error("Cannot allocate a {width}x{height} drawing surface")]
    PixmapAlloc {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// A crop rectangle does not overlap the image
    #[error("Crop region is outside the image")]
    EmptyCrop,
}

/// Compose `objects` over `base` at the image's natural resolution.
pub fn compose(base: &RgbaImage, objects: &[AnnotationObject]) -> Result<RgbaImage, RenderError> {
    let mut output = base.clone();

    for object in objects {
        if let AnnotationObject::Mosaic(mosaic) = object {
            pixelate_region(&mut output, base, mosaic);
        }
    }

    let has_vectors = objects
        .iter()
        .any(|o| matches!(o, AnnotationObject::Arrow(_) | AnnotationObject::Rect(_)));
    if !has_vectors {
        return Ok(output);
    }

    let mut pixmap = to_pixmap(&output)?;
    for object in objects {
        match object {
            AnnotationObject::Arrow(arrow) => vector::draw_arrow(&mut pixmap, arrow),
            AnnotationObject::Rect(rect) => vector::draw_rect(&mut pixmap, rect),
            AnnotationObject::Mosaic(_) => {}
        }
    }
    Ok(from_pixmap(&pixmap))
}

/// Copy a straight-alpha image into a premultiplied pixmap.
fn to_pixmap(image: &RgbaImage) -> Result<Pixmap, RenderError> {
    let (width, height) = image.dimensions();
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapAlloc { width, height })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// Copy a premultiplied pixmap back into a straight-alpha image.
fn from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::model::{Arrow, Mosaic, RectOutline, Region, Rgba};

    fn white(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255]))
    }

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8, 255])
        })
    }

    #[test]
    fn test_compose_without_objects_is_identity() {
        let base = gradient(40, 30);
        assert_eq!(compose(&base, &[]).unwrap(), base);
    }

    #[test]
    fn test_compose_keeps_size() {
        let base = white(320, 200);
        let objects = vec![AnnotationObject::Rect(RectOutline {
            id: 1,
            region: Region::new(8.0, 8.0, 112.0, 72.0),
            color: Rgba::opaque(229, 62, 62),
            stroke_width: 3.0,
        })];
        let out = compose(&base, &objects).unwrap();
        assert_eq!(out.dimensions(), (320, 200));
    }

    #[test]
    fn test_rect_outline_strokes_edge_only() {
        let base = white(100, 100);
        let red = Rgba::opaque(255, 0, 0);
        let objects = vec![AnnotationObject::Rect(RectOutline {
            id: 1,
            region: Region::new(20.0, 20.0, 60.0, 60.0),
            color: red,
            stroke_width: 4.0,
        })];
        let out = compose(&base, &objects).unwrap();
        // On the left edge
        assert_eq!(out.get_pixel(20, 50).0, [255, 0, 0, 255]);
        // Interior and exterior untouched
        assert_eq!(out.get_pixel(50, 50).0, [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(5, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_arrow_draws_shaft_and_head() {
        let base = white(120, 60);
        let arrow = Arrow::new(
            1,
            Point::new(10.0, 30.0),
            Point::new(110.0, 30.0),
            Rgba::opaque(0, 0, 255),
            4.0,
        );
        let out = compose(&base, &[AnnotationObject::Arrow(arrow)]).unwrap();
        // Shaft
        assert_eq!(out.get_pixel(50, 30).0, [0, 0, 255, 255]);
        // Inside the head, off the shaft: head size is 12, wings spread +-6
        assert_eq!(out.get_pixel(101, 32).0, [0, 0, 255, 255]);
        // Far from the arrow
        assert_eq!(out.get_pixel(50, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_vectors_draw_over_mosaics() {
        let base = gradient(64, 64);
        let objects = vec![
            AnnotationObject::Rect(RectOutline {
                id: 1,
                region: Region::new(8.0, 8.0, 40.0, 40.0),
                color: Rgba::opaque(0, 255, 0),
                stroke_width: 4.0,
            }),
            // Listed after the rect but still drawn below it
            AnnotationObject::Mosaic(Mosaic {
                id: 2,
                region: Region::new(0.0, 0.0, 64.0, 64.0),
                block_size: 8,
            }),
        ];
        let out = compose(&base, &objects).unwrap();
        assert_eq!(out.get_pixel(8, 30).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_compose_is_deterministic() {
        let base = gradient(50, 50);
        let objects = vec![
            AnnotationObject::Mosaic(Mosaic {
                id: 1,
                region: Region::new(5.0, 5.0, 20.0, 20.0),
                block_size: 6,
            }),
            AnnotationObject::Arrow(
                Arrow::new(2, Point::new(0.0, 0.0), Point::new(45.0, 40.0), Rgba::default(), 3.0)
                    .with_control(Point::new(10.0, 40.0)),
            ),
        ];
        assert_eq!(compose(&base, &objects).unwrap(), compose(&base, &objects).unwrap());
    }

    #[test]
    fn test_pixmap_round_trip_preserves_opaque_pixels() {
        let base = gradient(16, 16);
        let pixmap = to_pixmap(&base).unwrap();
        assert_eq!(from_pixmap(&pixmap), base);
    }
}
