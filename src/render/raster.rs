use kurbo::Rect;

use crate::foundation::error::{RevelaError, RevelaResult};

/// Resampling filter for blits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleFilter {
    /// Pick the closest source pixel. Keeps mosaic blocks hard-edged.
    Nearest,
    /// Weighted average of the four surrounding source pixels.
    Bilinear,
}

/// Owned RGBA8 pixel buffer, premultiplied, row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        Self {
            width,
            height,
            data: vec![0; len],
        }
    }

    /// Resize to the given dimensions, reallocating only when they change.
    pub fn ensure_size(&mut self, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        self.data.clear();
        self.data.resize(len, 0);
    }
}

/// Scale the whole of `src` onto the whole of `dst`.
pub fn stretch_rgba8(
    dst: &mut [u8],
    dst_w: u32,
    dst_h: u32,
    src: &[u8],
    src_w: u32,
    src_h: u32,
    filter: SampleFilter,
) -> RevelaResult<()> {
    let full = Rect::new(0.0, 0.0, f64::from(src_w), f64::from(src_h));
    stretch_region_rgba8(dst, dst_w, dst_h, src, src_w, src_h, full, filter)
}

/// Scale `src_rect` of `src` onto the whole of `dst`.
///
/// The source rect may have fractional coordinates; it must have positive
/// area and lie within the source bounds (a fuzz of half a pixel is
/// tolerated, sampling clamps at the edges).
#[allow(clippy::too_many_arguments)]
pub fn stretch_region_rgba8(
    dst: &mut [u8],
    dst_w: u32,
    dst_h: u32,
    src: &[u8],
    src_w: u32,
    src_h: u32,
    src_rect: Rect,
    filter: SampleFilter,
) -> RevelaResult<()> {
    let dst_expected = (dst_w as usize)
        .saturating_mul(dst_h as usize)
        .saturating_mul(4);
    let src_expected = (src_w as usize)
        .saturating_mul(src_h as usize)
        .saturating_mul(4);
    if dst.len() != dst_expected || src.len() != src_expected {
        return Err(RevelaError::render(
            "stretch_region_rgba8 expects buffers matching width*height*4",
        ));
    }
    if src_w == 0 || src_h == 0 {
        return Err(RevelaError::render(
            "stretch_region_rgba8 expects a non-empty source",
        ));
    }
    if !(src_rect.width() > 0.0) || !(src_rect.height() > 0.0) {
        return Err(RevelaError::render(
            "stretch_region_rgba8 expects a source rect with positive area",
        ));
    }
    if dst_w == 0 || dst_h == 0 {
        return Ok(());
    }

    let scale_x = (src_rect.width() / f64::from(dst_w)) as f32;
    let scale_y = (src_rect.height() / f64::from(dst_h)) as f32;
    let rx = src_rect.x0 as f32;
    let ry = src_rect.y0 as f32;

    match filter {
        SampleFilter::Nearest => {
            for y in 0..dst_h {
                let sy = ry + ((y as f32) + 0.5) * scale_y;
                for x in 0..dst_w {
                    let sx = rx + ((x as f32) + 0.5) * scale_x;
                    let px = sample_clamped(src, src_w, src_h, sx.floor() as i64, sy.floor() as i64);
                    let idx = ((y as usize) * (dst_w as usize) + (x as usize)) * 4;
                    dst[idx..idx + 4].copy_from_slice(&px);
                }
            }
        }
        SampleFilter::Bilinear => {
            for y in 0..dst_h {
                let fy = ry + ((y as f32) + 0.5) * scale_y - 0.5;
                let y0 = fy.floor();
                let wy = fy - y0;
                for x in 0..dst_w {
                    let fx = rx + ((x as f32) + 0.5) * scale_x - 0.5;
                    let x0 = fx.floor();
                    let wx = fx - x0;

                    let p00 = sample_clamped(src, src_w, src_h, x0 as i64, y0 as i64);
                    let p10 = sample_clamped(src, src_w, src_h, x0 as i64 + 1, y0 as i64);
                    let p01 = sample_clamped(src, src_w, src_h, x0 as i64, y0 as i64 + 1);
                    let p11 = sample_clamped(src, src_w, src_h, x0 as i64 + 1, y0 as i64 + 1);

                    let mut px = [0u8; 4];
                    for c in 0..4 {
                        let top = f32::from(p00[c]) * (1.0 - wx) + f32::from(p10[c]) * wx;
                        let bot = f32::from(p01[c]) * (1.0 - wx) + f32::from(p11[c]) * wx;
                        let v = top * (1.0 - wy) + bot * wy;
                        px[c] = v.round().clamp(0.0, 255.0) as u8;
                    }

                    let idx = ((y as usize) * (dst_w as usize) + (x as usize)) * 4;
                    dst[idx..idx + 4].copy_from_slice(&px);
                }
            }
        }
    }
    Ok(())
}

/// Read one source pixel, clamping coordinates to the image bounds.
///
/// Blits never composite outside the image; edge samples repeat instead of
/// bleeding transparent black into the result.
#[inline(always)]
fn sample_clamped(src: &[u8], width: u32, height: u32, x: i64, y: i64) -> [u8; 4] {
    let x = x.clamp(0, i64::from(width) - 1);
    let y = y.clamp(0, i64::from(height) - 1);
    let idx = ((y as usize) * (width as usize) + (x as usize)) * 4;
    [src[idx], src[idx + 1], src[idx + 2], src[idx + 3]]
}
