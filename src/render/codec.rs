//! Image decoding and PNG encoding.

use std::io::Cursor;

use image::{GenericImageView, ImageFormat, RgbaImage};

use super::RenderError;
use crate::geometry::ImageSize;

/// Decode any supported image format into straight-alpha RGBA.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, RenderError> {
    image::load_from_memory(bytes)
        .map(|image| image.to_rgba8())
        .map_err(RenderError::Decode)
}

/// Natural size of an encoded image.
pub fn read_image_size(bytes: &[u8]) -> Result<ImageSize, RenderError> {
    let image = image::load_from_memory(bytes).map_err(RenderError::Decode)?;
    let (width, height) = image.dimensions();
    Ok(ImageSize::new(width, height))
}

/// Encode an image as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(RenderError::Encode)?;
    Ok(buffer.into_inner())
}
