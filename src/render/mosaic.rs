//! Block pixelation.

use image::RgbaImage;

use crate::model::Mosaic;

/// Pixel span `[start, end)` covered by `[pos, pos + len)`, clipped to `limit`.
fn pixel_span(pos: f64, len: f64, limit: u32) -> (u32, u32) {
    let clip = |v: f64| v.round().clamp(0.0, f64::from(limit)) as u32;
    (clip(pos), clip(pos + len))
}

/// Alpha-weighted average of `source` over `[x0, x1) x [y0, y1)`.
fn cell_average(source: &RgbaImage, x0: u32, x1: u32, y0: u32, y1: u32) -> image::Rgba<u8> {
    let mut sums = [0u64; 3];
    let mut alpha = 0u64;
    let mut count = 0u64;

    for y in y0..y1 {
        for x in x0..x1 {
            let [r, g, b, a] = source.get_pixel(x, y).0;
            let a = u64::from(a);
            sums[0] += u64::from(r) * a;
            sums[1] += u64::from(g) * a;
            sums[2] += u64::from(b) * a;
            alpha += a;
            count += 1;
        }
    }

    if alpha == 0 || count == 0 {
        return image::Rgba([0, 0, 0, 0]);
    }
    let channel = |sum: u64| ((sum + alpha / 2) / alpha) as u8;
    image::Rgba([
        channel(sums[0]),
        channel(sums[1]),
        channel(sums[2]),
        ((alpha + count / 2) / count) as u8,
    ])
}

/// Pixelate the mosaic's region of `target` using colors from `source`.
///
/// The grid is anchored at the image origin: each cell is `block_size`
/// square, filled with the average of the whole cell in `source` (clipped to
/// the image), and written only where the cell overlaps the region.
pub fn pixelate_region(target: &mut RgbaImage, source: &RgbaImage, mosaic: &Mosaic) {
    let (width, height) = source.dimensions();
    if target.dimensions() != (width, height) {
        log::warn!("Mosaic {}: target and source sizes differ", mosaic.id);
        return;
    }

    let region = mosaic.region;
    let (x0, x1) = pixel_span(region.x, region.width, width);
    let (y0, y1) = pixel_span(region.y, region.height, height);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let block = mosaic.block_size.max(1);
    let mut cell_y = y0 / block * block;
    while cell_y < y1 {
        let cell_y_end = cell_y.saturating_add(block).min(height);
        let mut cell_x = x0 / block * block;
        while cell_x < x1 {
            let cell_x_end = cell_x.saturating_add(block).min(width);
            let color = cell_average(source, cell_x, cell_x_end, cell_y, cell_y_end);

            for y in cell_y.max(y0)..cell_y_end.min(y1) {
                for x in cell_x.max(x0)..cell_x_end.min(x1) {
                    target.put_pixel(x, y, color);
                }
            }
            cell_x = cell_x_end;
        }
        cell_y = cell_y_end;
    }
}
