use kurbo::Rect;

use crate::{
    assets::PreparedImage,
    foundation::error::RevelaResult,
    foundation::math::lerp,
    render::{
        Surface,
        raster::{Raster, SampleFilter, stretch_rgba8},
    },
    settings::{RevealMode, RevealSettings},
};

/// Mosaic grid width for a given visual progress.
///
/// Sweeps from 1 (a single giant block) to the full image width. Floored,
/// never below 1.
pub fn pixelation_grid_width(image_width: u32, visual: f64) -> u32 {
    let v = visual.clamp(0.0, 1.0);
    let f = lerp(1.0, f64::from(image_width), v);
    (f.floor() as u32).max(1)
}

/// Mosaic grid height matching `grid_width` at the image's aspect ratio.
/// A zero `image_width` yields 1; the blit rejects the empty source later.
pub fn pixelation_grid_height(grid_width: u32, image_width: u32, image_height: u32) -> u32 {
    if image_width == 0 {
        return 1;
    }
    let ratio = f64::from(image_height) / f64::from(image_width);
    ((f64::from(grid_width) * ratio).floor() as u32).max(1)
}

/// Source window for the center-zoom mode.
///
/// Magnification runs from `max_zoom` down to 1 as `visual` goes 0 to 1.
/// The window is centered on the image midpoint and clamped inside the
/// image bounds, so it is valid for any aspect ratio.
pub fn center_zoom_window(image_width: u32, image_height: u32, visual: f64, max_zoom: f64) -> Rect {
    let v = visual.clamp(0.0, 1.0);
    let z = lerp(max_zoom, 1.0, v).max(1.0);

    let iw = f64::from(image_width);
    let ih = f64::from(image_height);
    let w = iw / z;
    let h = ih / z;

    let x = (iw * 0.5 - w * 0.5).max(0.0).min(iw - w);
    let y = (ih * 0.5 - h * 0.5).max(0.0).min(ih - h);
    Rect::new(x, y, x + w, y + h)
}

/// Renders one reveal frame for a given visual progress.
///
/// Owns the pixelation scratch buffer so per-frame rendering allocates only
/// when the mosaic grid changes size.
#[derive(Debug)]
pub struct RevealRenderer {
    mode: RevealMode,
    smoothing: bool,
    max_zoom: f64,
    scratch: Raster, // pixelation intermediate, reused across frames
}

impl RevealRenderer {
    pub fn new(settings: &RevealSettings) -> Self {
        Self {
            mode: settings.mode,
            smoothing: settings.smoothing,
            max_zoom: settings.tuning.max_zoom,
            scratch: Raster::new(0, 0),
        }
    }

    /// Draw the frame for effective visual progress `visual` (already
    /// curve-shaped and snapped by the caller).
    #[tracing::instrument(skip(self, image, surface))]
    pub fn render(
        &mut self,
        image: &PreparedImage,
        visual: f64,
        surface: &mut dyn Surface,
    ) -> RevelaResult<()> {
        let visual = visual.clamp(0.0, 1.0);
        match self.mode {
            RevealMode::Pixelate => self.render_pixelate(image, visual, surface),
            RevealMode::CenterZoom => self.render_center_zoom(image, visual, surface),
        }
    }

    fn render_pixelate(
        &mut self,
        image: &PreparedImage,
        visual: f64,
        surface: &mut dyn Surface,
    ) -> RevelaResult<()> {
        if visual >= 1.0 {
            // Fully revealed: native image, always filtered.
            return surface.draw_scaled(
                &image.rgba8_premul,
                image.width,
                image.height,
                SampleFilter::Bilinear,
            );
        }

        let grid_w = pixelation_grid_width(image.width, visual);
        let grid_h = pixelation_grid_height(grid_w, image.width, image.height);
        let filter = if self.smoothing {
            SampleFilter::Bilinear
        } else {
            SampleFilter::Nearest
        };

        // Two stages through the low-resolution scratch: downscale collapses
        // detail into grid cells, upscale spreads each cell back out.
        self.scratch.ensure_size(grid_w, grid_h);
        stretch_rgba8(
            &mut self.scratch.data,
            grid_w,
            grid_h,
            &image.rgba8_premul,
            image.width,
            image.height,
            filter,
        )?;
        surface.draw_scaled(&self.scratch.data, grid_w, grid_h, filter)
    }

    fn render_center_zoom(
        &mut self,
        image: &PreparedImage,
        visual: f64,
        surface: &mut dyn Surface,
    ) -> RevelaResult<()> {
        if visual >= 1.0 {
            return surface.draw_scaled(
                &image.rgba8_premul,
                image.width,
                image.height,
                SampleFilter::Bilinear,
            );
        }

        let window = center_zoom_window(image.width, image.height, visual, self.max_zoom);
        surface.draw_region_scaled(
            &image.rgba8_premul,
            image.width,
            image.height,
            window,
            SampleFilter::Bilinear,
        )
    }
}
