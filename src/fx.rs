//! The closed effect catalog: one enum member per effect, one default
//! settings record per member, JSON settings parsing for callers that
//! configure effects from documents, and dispatch for the buffer-to-buffer
//! transforms.

use crate::{
    ascii::AsciiSettings,
    dither::{self, MatrixSize},
    edge::{self, EdgeDetectSettings},
    error::{RasterfxError, RasterfxResult},
    halftone::HalftoneSettings,
    palette::{Palette, PaletteKind},
    pixelate::{self, PixelateSettings},
    rain::RainSettings,
    raster::RasterBuffer,
    scanlines::{self, ScanlineSettings},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    Ascii,
    FloydSteinberg,
    Atkinson,
    Ordered,
    MatrixRain,
    EdgeDetect,
    Halftone,
    Pixelate,
    Scanlines,
}

impl EffectKind {
    pub const ALL: [EffectKind; 9] = [
        EffectKind::Ascii,
        EffectKind::FloydSteinberg,
        EffectKind::Atkinson,
        EffectKind::Ordered,
        EffectKind::MatrixRain,
        EffectKind::EdgeDetect,
        EffectKind::Halftone,
        EffectKind::Pixelate,
        EffectKind::Scanlines,
    ];

    pub fn id(self) -> &'static str {
        match self {
            EffectKind::Ascii => "ascii",
            EffectKind::FloydSteinberg => "floyd-steinberg",
            EffectKind::Atkinson => "atkinson",
            EffectKind::Ordered => "ordered",
            EffectKind::MatrixRain => "matrix-rain",
            EffectKind::EdgeDetect => "edge-detect",
            EffectKind::Halftone => "halftone",
            EffectKind::Pixelate => "pixelate",
            EffectKind::Scanlines => "scanlines",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EffectKind::Ascii => "ASCII Art",
            EffectKind::FloydSteinberg => "Floyd-Steinberg Dither",
            EffectKind::Atkinson => "Atkinson Dither",
            EffectKind::Ordered => "Ordered Dither",
            EffectKind::MatrixRain => "Matrix Rain",
            EffectKind::EdgeDetect => "Edge Detection",
            EffectKind::Halftone => "Halftone",
            EffectKind::Pixelate => "Pixel Art",
            EffectKind::Scanlines => "Scanlines",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            EffectKind::Ascii => "Map pixels to characters by brightness",
            EffectKind::FloydSteinberg => "Error diffusion dithering",
            EffectKind::Atkinson => "Higher contrast dithering",
            EffectKind::Ordered => "Bayer matrix ordered dithering",
            EffectKind::MatrixRain => "Falling green characters animation",
            EffectKind::EdgeDetect => "Sobel operator edge outlines",
            EffectKind::Halftone => "CMYK-style dot pattern",
            EffectKind::Pixelate => "Block-level color averaging",
            EffectKind::Scanlines => "CRT monitor horizontal lines",
        }
    }

    pub fn parse(id: &str) -> RasterfxResult<Self> {
        EffectKind::ALL
            .into_iter()
            .find(|k| k.id() == id)
            .ok_or_else(|| RasterfxError::validation(format!("unknown effect '{id}'")))
    }

    /// Whether the effect is continuously animated on its own (as opposed to
    /// a static transform that may be re-applied per source frame).
    pub fn is_animated(self) -> bool {
        matches!(self, EffectKind::MatrixRain)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DitherSettings {
    pub palette: PaletteKind,
    pub matrix_size: MatrixSize,
}

impl Default for DitherSettings {
    fn default() -> Self {
        Self {
            palette: PaletteKind::Bw,
            matrix_size: MatrixSize::Four,
        }
    }
}

/// One settings record per effect, all at their documented defaults.
/// Settings are immutable inputs to a transform call; a new bundle is built
/// per settings change.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectSettings {
    pub ascii: AsciiSettings,
    pub dither: DitherSettings,
    pub edge_detect: EdgeDetectSettings,
    pub halftone: HalftoneSettings,
    pub pixelate: PixelateSettings,
    pub scanlines: ScanlineSettings,
    pub matrix_rain: RainSettings,
}

impl EffectSettings {
    /// Parses a settings document; absent sections and fields keep their
    /// defaults, unknown sections are rejected.
    pub fn from_json(json: &str) -> RasterfxResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| RasterfxError::validation(format!("bad settings document: {e}")))
    }
}

/// Applies one of the buffer-to-buffer transforms. The surface-bound effects
/// (ascii, halftone, matrix-rain) are driven through the pipeline instead.
pub fn apply_buffer_effect(
    kind: EffectKind,
    src: &RasterBuffer,
    settings: &EffectSettings,
) -> RasterfxResult<RasterBuffer> {
    match kind {
        EffectKind::FloydSteinberg => Ok(dither::floyd_steinberg(
            src,
            &Palette::preset(settings.dither.palette),
        )),
        EffectKind::Atkinson => Ok(dither::atkinson(
            src,
            &Palette::preset(settings.dither.palette),
        )),
        EffectKind::Ordered => Ok(dither::ordered(
            src,
            &Palette::preset(settings.dither.palette),
            settings.dither.matrix_size,
        )),
        EffectKind::EdgeDetect => Ok(edge::edge_detect(src, &settings.edge_detect)),
        EffectKind::Pixelate => Ok(pixelate::pixelate(src, &settings.pixelate)),
        EffectKind::Scanlines => Ok(scanlines::scanlines(src, &settings.scanlines)),
        EffectKind::Ascii | EffectKind::Halftone | EffectKind::MatrixRain => Err(
            RasterfxError::validation(format!("effect '{}' renders to a surface", kind.id())),
        ),
    }
}
