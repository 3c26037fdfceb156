use crate::{
    palette::luminance,
    raster::{RasterBuffer, Rgba},
    surface::Surface,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HalftoneSettings {
    pub dot_size: f32,
    pub spacing: f32,
    pub angle_deg: f32,
}

impl Default for HalftoneSettings {
    fn default() -> Self {
        Self {
            dot_size: 6.0,
            spacing: 10.0,
            angle_deg: 15.0,
        }
    }
}

/// Renders the source as a rotated grid of dots whose radius grows with
/// darkness. Each dot keeps the original source color at its sample point;
/// dots under 0.5 px radius are skipped. The surface is filled black first.
///
/// Grid points are rotated forward by `angle_deg` and immediately rotated
/// back before sampling, so the two rotations cancel up to intermediate
/// rounding and the angle only perturbs sample positions by round-off. This
/// mirrors the reference behavior on purpose; changing it would change every
/// output.
pub fn halftone(src: &RasterBuffer, target: &mut dyn Surface, settings: &HalftoneSettings) {
    let (width, height) = (src.width() as i64, src.height() as i64);
    let spacing = settings.spacing;
    let rad = settings.angle_deg.to_radians();
    let (sin_a, cos_a) = rad.sin_cos();

    target.clear();
    target.set_fill(Rgba::BLACK);
    target.fill_rect(0.0, 0.0, target.width() as f32, target.height() as f32);

    let mut gy = -spacing;
    while gy < height as f32 + spacing {
        let mut gx = -spacing;
        while gx < width as f32 + spacing {
            let rx = (gx * cos_a - gy * sin_a).round();
            let ry = (gx * sin_a + gy * cos_a).round();

            let sx = (rx * cos_a + ry * sin_a).round() as i64;
            let sy = (-rx * sin_a + ry * cos_a).round() as i64;

            if sx >= 0 && sx < width && sy >= 0 && sy < height {
                let c = src.rgb_at(sx as u32, sy as u32);
                let lum = luminance(c.r, c.g, c.b) / 255.0;
                let radius = (1.0 - lum) * settings.dot_size * 0.5;
                if radius >= 0.5 {
                    target.set_fill(Rgba::from_rgb(c));
                    target.fill_circle(sx as f32, sy as f32, radius);
                }
            }
            gx += spacing;
        }
        gy += spacing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RasterSurface;

    #[test]
    fn white_source_draws_no_dots() {
        let mut src = RasterBuffer::new(32, 32);
        src.fill(Rgba::WHITE);
        let mut surface = RasterSurface::new(32, 32);
        halftone(&src, &mut surface, &HalftoneSettings::default());
        // Only the black background remains.
        for px in surface.buffer().data().chunks_exact(4) {
            assert_eq!(&px[..3], &[0, 0, 0]);
        }
    }

    #[test]
    fn dark_source_draws_dots_at_grid_points() {
        let mut src = RasterBuffer::new(32, 32);
        src.fill(Rgba::opaque(120, 0, 0));
        let mut surface = RasterSurface::new(32, 32);
        halftone(
            &src,
            &mut surface,
            &HalftoneSettings {
                dot_size: 6.0,
                spacing: 10.0,
                angle_deg: 0.0,
            },
        );
        // angle 0: grid point (10,10) samples (10,10) exactly.
        assert_eq!(surface.buffer().pixel(10, 10), Rgba::opaque(120, 0, 0));
    }

    #[test]
    fn dots_keep_original_color_not_palette() {
        let mut src = RasterBuffer::new(16, 16);
        src.fill(Rgba::opaque(40, 90, 200));
        let mut surface = RasterSurface::new(16, 16);
        halftone(
            &src,
            &mut surface,
            &HalftoneSettings {
                dot_size: 8.0,
                spacing: 8.0,
                angle_deg: 0.0,
            },
        );
        assert_eq!(surface.buffer().pixel(8, 8), Rgba::opaque(40, 90, 200));
    }

    #[test]
    fn rotation_round_trip_only_perturbs_by_rounding() {
        // With and without angle, a mid-gray uniform source must produce dot
        // coverage of similar density: the forward/backward rotation cancels.
        let mut src = RasterBuffer::new(64, 64);
        src.fill(Rgba::opaque(80, 80, 80));
        let count_lit = |angle: f32| {
            let mut surface = RasterSurface::new(64, 64);
            halftone(
                &src,
                &mut surface,
                &HalftoneSettings {
                    dot_size: 6.0,
                    spacing: 8.0,
                    angle_deg: angle,
                },
            );
            surface
                .buffer()
                .data()
                .chunks_exact(4)
                .filter(|px| px[0] > 0)
                .count() as i64
        };
        let plain = count_lit(0.0);
        let rotated = count_lit(15.0);
        assert!((plain - rotated).abs() < plain / 4);
    }
}
