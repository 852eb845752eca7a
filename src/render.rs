use kurbo::Rect;

use crate::{
    foundation::error::RevelaResult,
    render::raster::{Raster, SampleFilter, stretch_region_rgba8, stretch_rgba8},
};

pub mod raster;
pub mod reveal;

/// Output edge of the engine.
///
/// The renderer only ever needs two operations: scale a whole source image
/// onto the surface, and scale a source window onto the surface. Hosts with
/// their own presentation layer (a window, a GUI canvas) implement this;
/// everything else can use [`RasterSurface`].
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Scale the whole source onto the whole surface.
    fn draw_scaled(
        &mut self,
        src: &[u8],
        src_w: u32,
        src_h: u32,
        filter: SampleFilter,
    ) -> RevelaResult<()>;

    /// Scale `src_rect` (fractional coordinates allowed) onto the whole
    /// surface.
    fn draw_region_scaled(
        &mut self,
        src: &[u8],
        src_w: u32,
        src_h: u32,
        src_rect: Rect,
        filter: SampleFilter,
    ) -> RevelaResult<()>;
}

/// CPU surface backed by an owned [`Raster`].
#[derive(Clone, Debug)]
pub struct RasterSurface {
    raster: Raster,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            raster: Raster::new(width, height),
        }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn into_raster(self) -> Raster {
        self.raster
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.raster.width
    }

    fn height(&self) -> u32 {
        self.raster.height
    }

    fn draw_scaled(
        &mut self,
        src: &[u8],
        src_w: u32,
        src_h: u32,
        filter: SampleFilter,
    ) -> RevelaResult<()> {
        stretch_rgba8(
            &mut self.raster.data,
            self.raster.width,
            self.raster.height,
            src,
            src_w,
            src_h,
            filter,
        )
    }

    fn draw_region_scaled(
        &mut self,
        src: &[u8],
        src_w: u32,
        src_h: u32,
        src_rect: Rect,
        filter: SampleFilter,
    ) -> RevelaResult<()> {
        stretch_region_rgba8(
            &mut self.raster.data,
            self.raster.width,
            self.raster.height,
            src,
            src_w,
            src_h,
            src_rect,
            filter,
        )
    }
}
