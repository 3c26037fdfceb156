//! Media acquisition: turns encoded bytes into raster buffers via the
//! `image` crate. Static images yield a single frame; animated GIFs yield a
//! pull-based current-frame view advanced by elapsed time. Decode failures
//! are the only expected runtime failure of the engine and surface as
//! [`RasterfxError::Decode`] with a human-readable reason.
//!
//! Releasing media is dropping the value; frames are owned memory with no
//! external handles.

use std::io::Cursor;
use std::path::Path;

use anyhow::Context as _;
use image::AnimationDecoder as _;

use crate::{
    error::{RasterfxError, RasterfxResult},
    raster::RasterBuffer,
};

pub const DEFAULT_MAX_WIDTH: u32 = 800;
pub const DEFAULT_MAX_HEIGHT: u32 = 600;

/// Shrinks (never grows) source dimensions to fit within the given maximums
/// while preserving aspect ratio.
pub fn fit_dimensions(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    let mut width = src_w;
    let mut height = src_h;
    if width > max_w {
        height = (f64::from(height) * f64::from(max_w) / f64::from(width)).round() as u32;
        width = max_w;
    }
    if height > max_h {
        width = (f64::from(width) * f64::from(max_h) / f64::from(height)).round() as u32;
        height = max_h;
    }
    (width, height)
}

/// A decoded media source. One frame for static images; for animated GIFs
/// every frame is pre-decoded with its delay so `current_frame` is a pure
/// lookup.
#[derive(Debug)]
pub struct LoadedMedia {
    width: u32,
    height: u32,
    animated: bool,
    frames: Vec<(RasterBuffer, u32)>,
    total_ms: u64,
}

impl LoadedMedia {
    #[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn from_bytes(bytes: &[u8], max_w: u32, max_h: u32) -> RasterfxResult<Self> {
        let format = image::guess_format(bytes)
            .context("unrecognized media container")
            .map_err(|e| RasterfxError::decode(format!("{e:#}")))?;

        if format == image::ImageFormat::Gif {
            return Self::from_gif(bytes, max_w, max_h);
        }

        let dyn_img = image::load_from_memory(bytes)
            .context("decode image from memory")
            .map_err(|e| RasterfxError::decode(format!("{e:#}")))?;
        let rgba = dyn_img.to_rgba8();
        let (src_w, src_h) = rgba.dimensions();
        let full = RasterBuffer::from_rgba8(src_w, src_h, rgba.into_raw());
        let (width, height) = fit_dimensions(src_w, src_h, max_w, max_h);
        let frame = full.resample_nearest(width, height);

        Ok(Self {
            width,
            height,
            animated: false,
            frames: vec![(frame, 0)],
            total_ms: 0,
        })
    }

    pub fn from_path(path: &Path) -> RasterfxResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read media file {}", path.display()))
            .map_err(RasterfxError::Other)?;
        Self::from_bytes(&bytes, DEFAULT_MAX_WIDTH, DEFAULT_MAX_HEIGHT)
    }

    fn from_gif(bytes: &[u8], max_w: u32, max_h: u32) -> RasterfxResult<Self> {
        let decoder = image::codecs::gif::GifDecoder::new(Cursor::new(bytes))
            .context("open gif stream")
            .map_err(|e| RasterfxError::decode(format!("{e:#}")))?;
        let raw_frames = decoder
            .into_frames()
            .collect_frames()
            .context("decode gif frames")
            .map_err(|e| RasterfxError::decode(format!("{e:#}")))?;
        if raw_frames.is_empty() {
            return Err(RasterfxError::decode("gif contains no frames"));
        }

        let mut frames = Vec::with_capacity(raw_frames.len());
        let mut total_ms = 0u64;
        let mut dims = (0, 0);
        for frame in raw_frames {
            let (numer, denom) = frame.delay().numer_denom_ms();
            // A zero delay would stall the animation clock; 100ms is the
            // common viewer fallback.
            let mut delay_ms = if denom == 0 { 0 } else { numer / denom };
            if delay_ms == 0 {
                delay_ms = 100;
            }
            let buffer = frame.into_buffer();
            let (src_w, src_h) = buffer.dimensions();
            let full = RasterBuffer::from_rgba8(src_w, src_h, buffer.into_raw());
            let (w, h) = fit_dimensions(src_w, src_h, max_w, max_h);
            dims = (w, h);
            frames.push((full.resample_nearest(w, h), delay_ms));
            total_ms += u64::from(delay_ms);
        }

        let animated = frames.len() > 1;
        Ok(Self {
            width: dims.0,
            height: dims.1,
            animated,
            frames,
            total_ms,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn animated(&self) -> bool {
        self.animated
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// The initial frame, always present.
    pub fn first_frame(&self) -> &RasterBuffer {
        &self.frames[0].0
    }

    /// The frame visible `elapsed_ms` into a looping playback.
    pub fn current_frame(&self, elapsed_ms: u64) -> &RasterBuffer {
        if !self.animated || self.total_ms == 0 {
            return self.first_frame();
        }
        let mut t = elapsed_ms % self.total_ms;
        for (frame, delay) in &self.frames {
            if t < u64::from(*delay) {
                return frame;
            }
            t -= u64::from(*delay);
        }
        self.first_frame()
    }
}
