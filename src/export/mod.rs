//! Exporting composed scenes: PNG files, ZIP archives and the clipboard.
//!
//! Exports always re-render from the original image at natural resolution,
//! so the output does not depend on the on-screen scale.

mod archive;
mod clipboard;

pub use archive::{ArchiveEntry, entry_name, sanitize_title, write_archive};
pub use clipboard::{
    ClipboardError, ClipboardPayload, ClipboardSink, is_image_mime, pick_image_payload,
};

use image::RgbaImage;
use image::imageops::{self, FilterType};
use thiserror::Error;

use crate::model::AnnotationObject;
use crate::render::{RenderError, compose, decode_image, encode_png};
use crate::scene::SceneId;
use crate::storage::StorageError;

/// Errors that can occur during export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Another export has not finished yet
    #[error("An export is already in progress")]
    Busy,

    /// There is no scene to export
    #[error("No active scene to export")]
    NoActiveScene,

    /// Composing or encoding failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Flushing or loading scene data failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Writing the archive failed
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error while writing the archive
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Integer crop rectangle in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Optional post-processing applied to a composed scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    /// Region to keep, clipped to the image
    pub crop: Option<CropRect>,
    /// Output scale factor; 1.0 keeps the natural size
    pub scale: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            crop: None,
            scale: 1.0,
        }
    }
}

impl ExportOptions {
    /// Builder: crop to a region.
    pub fn with_crop(mut self, crop: CropRect) -> Self {
        self.crop = Some(crop);
        self
    }

    /// Builder: scale the output.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

/// Compose a scene and apply crop/scale.
pub fn render_scene(
    image_bytes: &[u8],
    objects: &[AnnotationObject],
    options: &ExportOptions,
) -> Result<RgbaImage, RenderError> {
    let base = decode_image(image_bytes)?;
    let mut output = compose(&base, objects)?;

    if let Some(crop) = options.crop {
        output = apply_crop(&output, crop)?;
    }
    if let Some((width, height)) = scaled_size(&output, options.scale) {
        // Nearest keeps mosaic cells flat
        output = imageops::resize(&output, width, height, FilterType::Nearest);
    }
    Ok(output)
}

/// Compose a scene into PNG bytes.
pub fn export_png(
    image_bytes: &[u8],
    objects: &[AnnotationObject],
    options: &ExportOptions,
) -> Result<Vec<u8>, ExportError> {
    let image = render_scene(image_bytes, objects, options)?;
    let png = encode_png(&image)?;
    log::info!(
        "Exported {}x{} PNG ({} bytes)",
        image.width(),
        image.height(),
        png.len()
    );
    Ok(png)
}

fn apply_crop(image: &RgbaImage, crop: CropRect) -> Result<RgbaImage, RenderError> {
    let (width, height) = image.dimensions();
    let x0 = crop.x.min(width);
    let y0 = crop.y.min(height);
    let x1 = crop.x.saturating_add(crop.width).min(width);
    let y1 = crop.y.saturating_add(crop.height).min(height);
    if x0 >= x1 || y0 >= y1 {
        return Err(RenderError::EmptyCrop);
    }
    Ok(imageops::crop_imm(image, x0, y0, x1 - x0, y1 - y0).to_image())
}

/// Target size for `scale`, or `None` when no resize is needed.
fn scaled_size(image: &RgbaImage, scale: f64) -> Option<(u32, u32)> {
    if !scale.is_finite() || scale <= 0.0 {
        log::warn!("Ignoring invalid export scale {scale}");
        return None;
    }
    if (scale - 1.0).abs() < f64::EPSILON {
        return None;
    }
    let resize = |v: u32| ((f64::from(v) * scale).round().max(1.0)) as u32;
    Some((resize(image.width()), resize(image.height())))
}

// ============================================================================
// Serialization
// ============================================================================

/// Allows at most one export at a time.
///
/// Bulk export switches the active scene; a second export starting in the
/// middle would capture the wrong scene.
#[derive(Debug, Default)]
pub struct ExportLock {
    busy: bool,
}

impl ExportLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Claim the lock, failing with [`ExportError::Busy`] if it is held.
    pub fn acquire(&mut self) -> Result<(), ExportError> {
        if self.busy {
            log::warn!("Export requested while another export is running");
            return Err(ExportError::Busy);
        }
        self.busy = true;
        Ok(())
    }

    pub fn release(&mut self) {
        self.busy = false;
    }
}

// ============================================================================
// Readiness
// ============================================================================

/// Lets a UI report when a scene's surface has caught up after a switch.
///
/// Bulk export switches scenes one by one; a UI that renders asynchronously
/// can hold the export back for a bounded number of frames.
pub trait RenderReadiness {
    fn is_ready(&mut self, scene: SceneId) -> bool;
    /// Yield for one frame.
    fn wait_frame(&mut self);
}

/// Readiness source for headless use: always ready.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl RenderReadiness for Immediate {
    fn is_ready(&mut self, _scene: SceneId) -> bool {
        true
    }

    fn wait_frame(&mut self) {}
}

/// Poll `readiness` for up to `budget` extra frames.
pub fn wait_until_ready<R: RenderReadiness + ?Sized>(
    readiness: &mut R,
    scene: SceneId,
    budget: u32,
) -> bool {
    for attempt in 0..=budget {
        if readiness.is_ready(scene) {
            return true;
        }
        if attempt < budget {
            readiness.wait_frame();
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ImageSize;
    use crate::model::{Mosaic, Region};
    use crate::render::read_image_size;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x * 4) as u8, (y * 4) as u8, 0, 255])
        });
        encode_png(&image).unwrap()
    }

    struct Slow {
        ready_after: u32,
        frames: u32,
    }

    impl RenderReadiness for Slow {
        fn is_ready(&mut self, _scene: SceneId) -> bool {
            self.frames >= self.ready_after
        }

        fn wait_frame(&mut self) {
            self.frames += 1;
        }
    }

    #[test]
    fn test_export_natural_size() {
        let bytes = export_png(&png(30, 20), &[], &ExportOptions::default()).unwrap();
        assert_eq!(read_image_size(&bytes).unwrap(), ImageSize::new(30, 20));
    }

    #[test]
    fn test_crop_is_clipped_to_image() {
        let options = ExportOptions::default().with_crop(CropRect::new(20, 10, 100, 100));
        let image = render_scene(&png(30, 20), &[], &options).unwrap();
        assert_eq!(image.dimensions(), (10, 10));
        assert_eq!(image.get_pixel(0, 0).0, [80, 40, 0, 255]);
    }

    #[test]
    fn test_crop_outside_image_fails() {
        let options = ExportOptions::default().with_crop(CropRect::new(50, 50, 10, 10));
        assert!(matches!(
            render_scene(&png(30, 20), &[], &options),
            Err(RenderError::EmptyCrop)
        ));
    }

    #[test]
    fn test_scale_keeps_mosaic_blocks_flat() {
        let objects = vec![AnnotationObject::Mosaic(Mosaic {
            id: 1,
            region: Region::new(0.0, 0.0, 32.0, 32.0),
            block_size: 8,
        })];
        let options = ExportOptions::default().with_scale(2.0);
        let image = render_scene(&png(32, 32), &objects, &options).unwrap();
        assert_eq!(image.dimensions(), (64, 64));
        assert_eq!(image.get_pixel(0, 0), image.get_pixel(15, 15));
    }

    #[test]
    fn test_invalid_scale_is_ignored() {
        let options = ExportOptions::default().with_scale(0.0);
        let image = render_scene(&png(8, 8), &[], &options).unwrap();
        assert_eq!(image.dimensions(), (8, 8));
    }

    #[test]
    fn test_bad_image_bytes() {
        assert!(matches!(
            export_png(b"nope", &[], &ExportOptions::default()),
            Err(ExportError::Render(RenderError::Decode(_)))
        ));
    }

    #[test]
    fn test_export_lock_rejects_second_export() {
        let mut lock = ExportLock::new();
        lock.acquire().unwrap();
        assert!(lock.is_busy());
        assert!(matches!(lock.acquire(), Err(ExportError::Busy)));
        lock.release();
        assert!(lock.acquire().is_ok());
    }

    #[test]
    fn test_readiness_waits_are_bounded() {
        let mut slow = Slow {
            ready_after: 2,
            frames: 0,
        };
        assert!(wait_until_ready(&mut slow, 1, 3));
        assert_eq!(slow.frames, 2);

        let mut never = Slow {
            ready_after: 100,
            frames: 0,
        };
        assert!(!wait_until_ready(&mut never, 1, 3));
        assert_eq!(never.frames, 3);
        assert!(wait_until_ready(&mut Immediate, 1, 0));
    }
}
