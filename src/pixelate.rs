use crate::{
    palette::{Palette, PaletteKind},
    raster::RasterBuffer,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PixelateSettings {
    pub block_size: u32,
    pub palette: Option<PaletteKind>,
}

impl Default for PixelateSettings {
    fn default() -> Self {
        Self {
            block_size: 8,
            palette: None,
        }
    }
}

/// Replaces each `block_size` x `block_size` tile with the arithmetic mean of
/// its member pixels. Trailing partial tiles at the right/bottom edges
/// average over their actual smaller area. When a palette is configured the
/// averaged color is snapped once per tile, after averaging. Alpha is forced
/// opaque.
pub fn pixelate(src: &RasterBuffer, settings: &PixelateSettings) -> RasterBuffer {
    let (width, height) = (src.width(), src.height());
    let mut out = RasterBuffer::new(width, height);
    // Block 0 would never advance the tile cursor.
    let block = settings.block_size.max(1);
    let palette = settings.palette.map(Palette::preset);

    let mut by = 0;
    while by < height {
        let end_y = (by + block).min(height);
        let mut bx = 0;
        while bx < width {
            let end_x = (bx + block).min(width);

            let mut total = [0u64; 3];
            for y in by..end_y {
                for x in bx..end_x {
                    let i = src.index(x, y);
                    total[0] += u64::from(src.data()[i]);
                    total[1] += u64::from(src.data()[i + 1]);
                    total[2] += u64::from(src.data()[i + 2]);
                }
            }
            let count = u64::from(end_y - by) * u64::from(end_x - bx);
            let mut avg_r = ((total[0] as f64 / count as f64).round()) as u8;
            let mut avg_g = ((total[1] as f64 / count as f64).round()) as u8;
            let mut avg_b = ((total[2] as f64 / count as f64).round()) as u8;

            if let Some(p) = &palette {
                let c = p.nearest(f32::from(avg_r), f32::from(avg_g), f32::from(avg_b));
                avg_r = c.r;
                avg_g = c.g;
                avg_b = c.b;
            }

            for y in by..end_y {
                for x in bx..end_x {
                    let i = out.index(x, y);
                    let data = out.data_mut();
                    data[i] = avg_r;
                    data[i + 1] = avg_g;
                    data[i + 2] = avg_b;
                    data[i + 3] = 255;
                }
            }
            bx = end_x;
        }
        by = end_y;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{RasterBuffer, Rgba};

    #[test]
    fn uniform_input_is_a_fixed_point() {
        let mut buf = RasterBuffer::new(13, 7);
        buf.fill(Rgba::opaque(42, 43, 44));
        let out = pixelate(&buf, &PixelateSettings::default());
        assert_eq!(out, buf);
    }

    #[test]
    fn two_by_two_block_averages_to_gray() {
        // Red, green, blue, white averages channel-wise to (127,127,127) rounded.
        let mut buf = RasterBuffer::new(2, 2);
        buf.put_pixel(0, 0, Rgba::opaque(255, 0, 0));
        buf.put_pixel(1, 0, Rgba::opaque(0, 255, 0));
        buf.put_pixel(0, 1, Rgba::opaque(0, 0, 255));
        buf.put_pixel(1, 1, Rgba::opaque(255, 255, 255));
        let out = pixelate(
            &buf,
            &PixelateSettings {
                block_size: 2,
                palette: None,
            },
        );
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(out.pixel(x, y), Rgba::opaque(128, 128, 128));
            }
        }
    }

    #[test]
    fn partial_edge_tiles_average_their_actual_area() {
        // 3 wide with block 2: the trailing 1-wide column keeps its own color.
        let mut buf = RasterBuffer::new(3, 1);
        buf.put_pixel(0, 0, Rgba::opaque(0, 0, 0));
        buf.put_pixel(1, 0, Rgba::opaque(255, 255, 255));
        buf.put_pixel(2, 0, Rgba::opaque(10, 20, 30));
        let out = pixelate(
            &buf,
            &PixelateSettings {
                block_size: 2,
                palette: None,
            },
        );
        assert_eq!(out.pixel(0, 0), Rgba::opaque(128, 128, 128));
        assert_eq!(out.pixel(1, 0), Rgba::opaque(128, 128, 128));
        assert_eq!(out.pixel(2, 0), Rgba::opaque(10, 20, 30));
    }

    #[test]
    fn palette_snap_applies_once_per_tile() {
        let mut buf = RasterBuffer::new(2, 2);
        buf.fill(Rgba::opaque(200, 200, 200));
        let out = pixelate(
            &buf,
            &PixelateSettings {
                block_size: 2,
                palette: Some(PaletteKind::Bw),
            },
        );
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(out.pixel(x, y), Rgba::opaque(255, 255, 255));
            }
        }
    }
}
