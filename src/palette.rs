//! Color utilities shared by every effect: luminance, channel quantization
//! and nearest-palette-color search.

/// Opaque RGB triple used for palette entries and effect colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// BT.601-style luminance. No rounding; callers consume the float directly.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)
}

/// Clamps and rounds a float channel value into u8 range.
#[inline]
pub fn clamp_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Snaps a channel to the nearest of `levels` evenly spaced steps over [0,255].
/// `levels` must be >= 2.
pub fn quantize_channel(value: f32, levels: u32) -> u8 {
    let step = 255.0 / (levels - 1) as f32;
    clamp_channel((value / step).round() * step)
}

/// Ordered, non-empty set of candidate output colors. Order matters only for
/// tie-breaking in [`Palette::nearest`]: the first minimal-distance entry wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

/// The built-in palettes exposed through settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteKind {
    Bw,
    Cga,
    Gameboy,
    Sepia,
    Neon,
}

impl Palette {
    /// Non-emptiness is a precondition for every palette operation.
    pub fn new(colors: Vec<Rgb>) -> Self {
        debug_assert!(!colors.is_empty());
        Self { colors }
    }

    pub fn preset(kind: PaletteKind) -> Self {
        let colors = match kind {
            PaletteKind::Bw => vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)],
            PaletteKind::Cga => vec![
                Rgb::new(0, 0, 0),
                Rgb::new(0, 170, 170),
                Rgb::new(170, 0, 170),
                Rgb::new(170, 170, 170),
            ],
            PaletteKind::Gameboy => vec![
                Rgb::new(15, 56, 15),
                Rgb::new(48, 98, 48),
                Rgb::new(139, 172, 15),
                Rgb::new(155, 188, 15),
            ],
            PaletteKind::Sepia => vec![
                Rgb::new(44, 28, 10),
                Rgb::new(100, 70, 35),
                Rgb::new(180, 140, 80),
                Rgb::new(240, 210, 160),
            ],
            PaletteKind::Neon => vec![
                Rgb::new(0, 0, 0),
                Rgb::new(255, 0, 128),
                Rgb::new(0, 255, 128),
                Rgb::new(0, 128, 255),
                Rgb::new(255, 255, 0),
            ],
        };
        Self { colors }
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Minimizes squared Euclidean RGB distance over the palette. Channel
    /// inputs are floats because error diffusion queries with corrected
    /// (non-integral) values.
    pub fn nearest(&self, r: f32, g: f32, b: f32) -> Rgb {
        let mut min_dist = f32::INFINITY;
        let mut closest = self.colors[0];
        for &c in &self.colors {
            let dr = r - f32::from(c.r);
            let dg = g - f32::from(c.g);
            let db = b - f32::from(c.b);
            let dist = dr * dr + dg * dg + db * db;
            if dist < min_dist {
                min_dist = dist;
                closest = c;
            }
        }
        closest
    }
}
