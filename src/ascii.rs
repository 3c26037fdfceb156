//! ASCII renderer: maps a raster to a glyph grid through an adjustable color
//! pipeline, draws the glyphs onto a [`Surface`] and returns the newline-
//! joined transcript. Pure function of (source, settings); no randomness.

use crate::{
    palette::{clamp_channel, luminance, Rgb},
    raster::{RasterBuffer, Rgba},
    surface::Surface,
};

/// Built-in character ramps, ordered sparse to dense (darkest glyph first).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    #[default]
    Standard,
    Blocks,
    Binary,
    Detailed,
    Minimal,
    Alphabetic,
    Numeric,
    Math,
    Symbols,
    Braille,
    Matrix,
}

impl Charset {
    pub fn ramp(self) -> &'static str {
        match self {
            Charset::Standard => " .:-=+*#%@",
            Charset::Blocks => " ░▒▓█",
            Charset::Binary => " 01",
            Charset::Detailed => {
                " .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$"
            }
            Charset::Minimal => " .oO@",
            Charset::Alphabetic => " abcdefghijklmnopqrstuvwxyz",
            Charset::Numeric => " 0123456789",
            Charset::Math => " +-=<>~^*/|\\%",
            Charset::Symbols => " !@#$%^&*()_+-=[]{}|;:',.<>?/~`",
            Charset::Braille => " ⠁⠃⠇⠏⠟⠿⡿⣿",
            Charset::Matrix => " 0123456789ABCDEFabcdef@#$%",
        }
    }
}

/// How the drawn glyph is painted. Never affects glyph selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// True adjusted source color.
    #[default]
    Original,
    /// Monochrome green scaled by luminance.
    Green,
    /// Grayscale brightness.
    Mono,
    /// User-chosen tint scaled by luminance.
    Custom,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AsciiSettings {
    pub charset: Charset,
    pub scale: f32,
    pub spacing: f32,
    pub output_width: u32,
    pub color_mode: ColorMode,
    pub character_color: Rgb,
    pub background_color: Rgb,
    pub intensity: f32,
    pub invert: bool,
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub hue_rotation: f32,
    pub gamma: f32,
}

impl Default for AsciiSettings {
    fn default() -> Self {
        Self {
            charset: Charset::Standard,
            scale: 1.0,
            spacing: 0.2,
            output_width: 200,
            color_mode: ColorMode::Original,
            character_color: Rgb::new(9, 200, 22),
            background_color: Rgb::new(0, 0, 0),
            intensity: 1.0,
            invert: false,
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            hue_rotation: 0.0,
            gamma: 1.0,
        }
    }
}

/// Fixed-order color pipeline: brightness offset, contrast stretch around
/// 128, saturation about per-pixel luminance, optional YIQ-style hue
/// rotation, gamma on clamped [0,1] channels, intensity multiplier, final
/// round and clamp.
fn adjust_pixel(rgb: Rgb, s: &AsciiSettings) -> Rgb {
    let mut r = f32::from(rgb.r) + s.brightness * 2.55;
    let mut g = f32::from(rgb.g) + s.brightness * 2.55;
    let mut b = f32::from(rgb.b) + s.brightness * 2.55;

    let factor = (259.0 * (s.contrast + 255.0)) / (255.0 * (259.0 - s.contrast));
    r = factor * (r - 128.0) + 128.0;
    g = factor * (g - 128.0) + 128.0;
    b = factor * (b - 128.0) + 128.0;

    let gray = 0.299 * r + 0.587 * g + 0.114 * b;
    let sat = 1.0 + s.saturation / 100.0;
    r = gray + sat * (r - gray);
    g = gray + sat * (g - gray);
    b = gray + sat * (b - gray);

    if s.hue_rotation != 0.0 {
        let rad = s.hue_rotation.to_radians();
        let (sin, cos) = rad.sin_cos();
        let nr = r * (0.213 + cos * 0.787 - sin * 0.213)
            + g * (0.715 - cos * 0.715 - sin * 0.715)
            + b * (0.072 - cos * 0.072 + sin * 0.928);
        let ng = r * (0.213 - cos * 0.213 + sin * 0.143)
            + g * (0.715 + cos * 0.285 + sin * 0.140)
            + b * (0.072 - cos * 0.072 - sin * 0.283);
        let nb = r * (0.213 - cos * 0.213 - sin * 0.787)
            + g * (0.715 - cos * 0.715 + sin * 0.715)
            + b * (0.072 + cos * 0.928 + sin * 0.072);
        r = nr;
        g = ng;
        b = nb;
    }

    if s.gamma != 1.0 {
        let inv_gamma = 1.0 / s.gamma;
        r = 255.0 * (r.clamp(0.0, 255.0) / 255.0).powf(inv_gamma);
        g = 255.0 * (g.clamp(0.0, 255.0) / 255.0).powf(inv_gamma);
        b = 255.0 * (b.clamp(0.0, 255.0) / 255.0).powf(inv_gamma);
    }

    r *= s.intensity;
    g *= s.intensity;
    b *= s.intensity;

    Rgb::new(clamp_channel(r), clamp_channel(g), clamp_channel(b))
}

/// Renders `src` as a glyph grid onto `target` (logical size `width` x
/// `height`) and returns the row-major text transcript.
pub fn render_ascii(
    src: &RasterBuffer,
    target: &mut dyn Surface,
    width: u32,
    height: u32,
    settings: &AsciiSettings,
) -> String {
    let ramp: Vec<char> = settings.charset.ramp().chars().collect();
    let ramp_len = ramp.len();

    let base_size = 4.0 + settings.scale * 1.5;
    let cols = (settings.output_width)
        .min((width as f32 / (base_size * (0.6 + settings.spacing * 0.4))).floor() as u32);
    if cols == 0 {
        return String::new();
    }
    let cell_w = width as f32 / cols as f32;
    let cell_h = cell_w * (1.6 + settings.spacing * 0.8);
    let rows = (height as f32 / cell_h).floor() as u32;

    let font_size = (cell_h * 0.9).max(4.0);

    target.clear();
    target.set_fill(Rgba::from_rgb(settings.background_color));
    target.fill_rect(0.0, 0.0, width as f32, height as f32);

    let mut lines = Vec::with_capacity(rows as usize);
    for row in 0..rows {
        let mut line = String::with_capacity(cols as usize);
        for col in 0..cols {
            // Nearest-pixel sample at the proportionally scaled coordinate.
            let sx = ((col as f32 / cols as f32) * src.width() as f32).floor() as u32;
            let sy = ((row as f32 / rows as f32) * src.height() as f32).floor() as u32;
            let adjusted = adjust_pixel(src.rgb_at(sx, sy), settings);

            let mut lum = luminance(adjusted.r, adjusted.g, adjusted.b) / 255.0;
            if settings.invert {
                lum = 1.0 - lum;
            }
            let char_idx = (lum * (ramp_len - 1) as f32).floor() as usize;
            let ch = ramp[char_idx.min(ramp_len - 1)];
            line.push(ch);

            let paint = match settings.color_mode {
                ColorMode::Original => adjusted,
                ColorMode::Green => Rgb::new(0, (lum * 255.0).round() as u8, 0),
                ColorMode::Mono => {
                    let v = (lum * 255.0).round() as u8;
                    Rgb::new(v, v, v)
                }
                ColorMode::Custom => {
                    let c = settings.character_color;
                    Rgb::new(
                        (f32::from(c.r) * lum).round() as u8,
                        (f32::from(c.g) * lum).round() as u8,
                        (f32::from(c.b) * lum).round() as u8,
                    )
                }
            };
            target.set_fill(Rgba::from_rgb(paint));
            target.draw_glyph(ch, col as f32 * cell_w, row as f32 * cell_h, font_size);
        }
        lines.push(line);
    }
    lines.join("\n")
}
