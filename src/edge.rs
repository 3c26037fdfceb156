//! Sobel edge detection over a luminance grayscale plane.

use crate::{palette::luminance, raster::RasterBuffer};

const SOBEL_GX: [f32; 9] = [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0];
const SOBEL_GY: [f32; 9] = [-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0];

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EdgeDetectSettings {
    pub threshold: f32,
    pub invert: bool,
}

impl Default for EdgeDetectSettings {
    fn default() -> Self {
        Self {
            threshold: 50.0,
            invert: false,
        }
    }
}

/// Convolves interior pixels with the fixed 3x3 Sobel kernels and binarizes
/// the gradient magnitude against `threshold`. The one-pixel border is not
/// computed and stays transparent black in the output.
pub fn edge_detect(src: &RasterBuffer, settings: &EdgeDetectSettings) -> RasterBuffer {
    let (width, height) = (src.width(), src.height());
    let mut out = RasterBuffer::new(width, height);
    if width < 3 || height < 3 {
        return out;
    }

    let w = width as usize;
    let mut gray = vec![0.0f32; w * height as usize];
    for (i, px) in src.data().chunks_exact(4).enumerate() {
        gray[i] = luminance(px[0], px[1], px[2]);
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut sum_x = 0.0f32;
            let mut sum_y = 0.0f32;
            let mut ki = 0;
            for ky in -1i64..=1 {
                for kx in -1i64..=1 {
                    let gi = (y as i64 + ky) as usize * w + (x as i64 + kx) as usize;
                    sum_x += gray[gi] * SOBEL_GX[ki];
                    sum_y += gray[gi] * SOBEL_GY[ki];
                    ki += 1;
                }
            }
            let magnitude = (sum_x * sum_x + sum_y * sum_y).sqrt();
            let mut v: u8 = if magnitude > settings.threshold { 255 } else { 0 };
            if settings.invert {
                v = 255 - v;
            }
            let i = out.index(x, y);
            let data = out.data_mut();
            data[i] = v;
            data[i + 1] = v;
            data[i + 2] = v;
            data[i + 3] = 255;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{RasterBuffer, Rgba};

    fn vertical_split(width: u32, height: u32) -> RasterBuffer {
        let mut buf = RasterBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = if x < width / 2 { 0 } else { 255 };
                buf.put_pixel(x, y, Rgba::opaque(v, v, v));
            }
        }
        buf
    }

    #[test]
    fn uniform_input_has_no_edges() {
        let mut buf = RasterBuffer::new(8, 8);
        buf.fill(Rgba::opaque(100, 100, 100));
        let out = edge_detect(&buf, &EdgeDetectSettings::default());
        for y in 1..7 {
            for x in 1..7 {
                assert_eq!(out.pixel(x, y), Rgba::opaque(0, 0, 0));
            }
        }
    }

    #[test]
    fn step_edge_is_detected_and_binary() {
        let buf = vertical_split(8, 8);
        let out = edge_detect(&buf, &EdgeDetectSettings::default());
        // The column next to the step must light up; all interior values are 0 or 255.
        assert_eq!(out.rgb_at(3, 4).r, 255);
        for y in 1..7 {
            for x in 1..7 {
                let v = out.rgb_at(x, y).r;
                assert!(v == 0 || v == 255);
            }
        }
    }

    #[test]
    fn border_is_left_transparent() {
        let buf = vertical_split(8, 8);
        let out = edge_detect(&buf, &EdgeDetectSettings::default());
        for x in 0..8 {
            assert_eq!(out.pixel(x, 0).a, 0);
            assert_eq!(out.pixel(x, 7).a, 0);
        }
    }

    #[test]
    fn invert_flips_binary_output() {
        let buf = vertical_split(8, 8);
        let plain = edge_detect(&buf, &EdgeDetectSettings::default());
        let inverted = edge_detect(
            &buf,
            &EdgeDetectSettings {
                invert: true,
                ..Default::default()
            },
        );
        for y in 1..7 {
            for x in 1..7 {
                assert_eq!(plain.rgb_at(x, y).r, 255 - inverted.rgb_at(x, y).r);
            }
        }
    }

    #[test]
    fn tiny_buffer_yields_empty_output() {
        let buf = vertical_split(2, 2);
        let out = edge_detect(&buf, &EdgeDetectSettings::default());
        assert!(out.data().iter().all(|&b| b == 0));
    }
}
