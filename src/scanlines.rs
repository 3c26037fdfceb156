use crate::{palette::clamp_channel, raster::RasterBuffer};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScanlineSettings {
    pub line_width: u32,
    pub opacity: f32,
    pub gap: u32,
}

impl Default for ScanlineSettings {
    fn default() -> Self {
        Self {
            line_width: 2,
            opacity: 0.5,
            gap: 4,
        }
    }
}

/// Darkens rows in a repeating pattern of `line_width` darkened rows followed
/// by `gap` untouched rows. RGB channels are scaled by `1 - opacity`; alpha
/// is never modified.
pub fn scanlines(src: &RasterBuffer, settings: &ScanlineSettings) -> RasterBuffer {
    let mut out = src.clone();
    let period = settings.line_width + settings.gap;
    if period == 0 {
        return out;
    }
    let darken = 1.0 - settings.opacity;
    let (width, height) = (out.width(), out.height());

    for y in 0..height {
        if y % period >= settings.line_width {
            continue;
        }
        for x in 0..width {
            let i = out.index(x, y);
            let data = out.data_mut();
            data[i] = clamp_channel(f32::from(data[i]) * darken);
            data[i + 1] = clamp_channel(f32::from(data[i + 1]) * darken);
            data[i + 2] = clamp_channel(f32::from(data[i + 2]) * darken);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{RasterBuffer, Rgba};

    #[test]
    fn zero_opacity_is_identity() {
        let mut buf = RasterBuffer::new(4, 9);
        buf.fill(Rgba::new(10, 20, 30, 200));
        let out = scanlines(
            &buf,
            &ScanlineSettings {
                opacity: 0.0,
                ..Default::default()
            },
        );
        assert_eq!(out, buf);
    }

    #[test]
    fn full_opacity_no_gap_blackens_every_row() {
        let mut buf = RasterBuffer::new(4, 9);
        buf.fill(Rgba::new(10, 20, 30, 200));
        let out = scanlines(
            &buf,
            &ScanlineSettings {
                line_width: 2,
                opacity: 1.0,
                gap: 0,
            },
        );
        for px in out.data().chunks_exact(4) {
            assert_eq!(&px[..3], &[0, 0, 0]);
            assert_eq!(px[3], 200); // alpha untouched
        }
    }

    #[test]
    fn rows_follow_the_period() {
        let mut buf = RasterBuffer::new(1, 6);
        buf.fill(Rgba::opaque(100, 100, 100));
        let out = scanlines(
            &buf,
            &ScanlineSettings {
                line_width: 1,
                opacity: 0.5,
                gap: 2,
            },
        );
        assert_eq!(out.rgb_at(0, 0).r, 50);
        assert_eq!(out.rgb_at(0, 1).r, 100);
        assert_eq!(out.rgb_at(0, 2).r, 100);
        assert_eq!(out.rgb_at(0, 3).r, 50);
    }
}
