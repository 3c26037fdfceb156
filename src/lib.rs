//! rasterfx is a deterministic raster image-effect engine.
//!
//! A closed set of pixel transforms (dithering, ASCII mapping, Sobel edges,
//! halftone, pixelation, scanlines) plus a continuously-animated matrix-rain
//! overlay, all over in-memory RGBA8 buffers:
//!
//! - Decode media with [`LoadedMedia`]
//! - Pick an [`EffectKind`] and build its [`EffectSettings`]
//! - Run static transforms through [`pipeline::render_frame`], or drive an
//!   animated loop through an [`AnimationDriver`]
//!
//! Drawing goes through the [`Surface`] trait so hosts can back rendering
//! with their own target; [`RasterSurface`] is the built-in buffer-backed
//! implementation.
#![forbid(unsafe_code)]

pub mod ascii;
pub mod dither;
pub mod edge;
pub mod error;
pub mod fx;
pub mod halftone;
pub mod media;
pub mod palette;
pub mod pipeline;
pub mod pixelate;
pub mod rain;
pub mod raster;
pub mod scanlines;
pub mod surface;

pub use ascii::{render_ascii, AsciiSettings, Charset, ColorMode};
pub use error::{RasterfxError, RasterfxResult};
pub use fx::{apply_buffer_effect, DitherSettings, EffectKind, EffectSettings};
pub use media::LoadedMedia;
pub use palette::{luminance, Palette, PaletteKind, Rgb};
pub use pipeline::{render_frame, scale_source, AnimationDriver};
pub use rain::{RainSession, RainSettings};
pub use raster::{RasterBuffer, Rgba};
pub use surface::{RasterSurface, Surface};
