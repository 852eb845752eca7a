//! Revela is a progressive image reveal engine.
//!
//! A reveal takes a decoded image from fully obscured to fully visible over a
//! fixed wall-clock duration, pacing the visible detail with a piecewise
//! linear speed curve.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: image bytes -> [`PreparedImage`] (premultiplied RGBA8)
//! 2. **Clock**: monotonic timestamps -> elapsed fraction `t` in `[0, 1]`
//! 3. **Shape**: `t` -> visual progress via [`SpeedCurve`] plus the end snap
//! 4. **Render**: visual progress -> pixels on a [`Surface`], by pixelation
//!    or by center zoom
//!
//! [`RevealSession`] ties the stages together behind a host-driven API: the
//! host owns the event loop and the decode, the session owns the rest.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No IO in the engine**: decode helpers exist, but the session only ever
//!   sees finished [`PreparedImage`]s.
//! - **No clock of its own**: hosts pass monotonic timestamps in, so tests
//!   and offline rendering run at any speed.
//! - **Premultiplied RGBA8** end-to-end.
#![forbid(unsafe_code)]

pub mod assets;
pub mod curve;
pub mod foundation;
pub mod playback;
pub mod render;
pub mod session;
pub mod settings;

pub use assets::PreparedImage;
pub use assets::decode::{decode_image, load_image_file};
pub use curve::{ControlPoint, CurvePreset, SpeedCurve};
pub use foundation::error::{RevelaError, RevelaResult};
pub use playback::clock::{Advance, PlayState, PlaybackClock};
pub use playback::scheduler::{FrameScheduler, ManualScheduler, TickId};
pub use render::raster::{Raster, SampleFilter};
pub use render::reveal::{
    RevealRenderer, center_zoom_window, pixelation_grid_height, pixelation_grid_width,
};
pub use render::{RasterSurface, Surface};
pub use session::{DecodeToken, RevealSession, SessionEvent};
pub use settings::{
    DEFAULT_MAX_ZOOM, DEFAULT_SNAP_THRESHOLD, RevealMode, RevealSettings, RevealTuning,
};
