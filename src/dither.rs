//! Palette dithering: two error-diffusion variants (Floyd-Steinberg and
//! Atkinson) and ordered Bayer thresholding.
//!
//! Error diffusion runs in raster-scan order over an owned copy of the
//! source, so corrections written into forward neighbors are visible when
//! those pixels are visited. Neighbors outside the buffer are skipped; the
//! error that would have gone there is lost, which is the accepted boundary
//! behavior.

use crate::{
    palette::{clamp_channel, Palette},
    raster::RasterBuffer,
};

/// Size of the Bayer threshold matrix for ordered dithering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MatrixSize {
    #[serde(rename = "2")]
    Two,
    #[default]
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "8")]
    Eight,
}

const FLOYD_STEINBERG_KERNEL: [(i64, i64, f32); 4] = [
    (1, 0, 7.0 / 16.0),
    (-1, 1, 3.0 / 16.0),
    (0, 1, 5.0 / 16.0),
    (1, 1, 1.0 / 16.0),
];

// Atkinson distributes only 6/8 of the error; the remaining quarter is
// discarded, which is what gives the variant its higher contrast.
const ATKINSON_KERNEL: [(i64, i64, f32); 6] = [
    (1, 0, 1.0 / 8.0),
    (2, 0, 1.0 / 8.0),
    (-1, 1, 1.0 / 8.0),
    (0, 1, 1.0 / 8.0),
    (1, 1, 1.0 / 8.0),
    (0, 2, 1.0 / 8.0),
];

pub fn floyd_steinberg(src: &RasterBuffer, palette: &Palette) -> RasterBuffer {
    error_diffuse(src, palette, &FLOYD_STEINBERG_KERNEL)
}

pub fn atkinson(src: &RasterBuffer, palette: &Palette) -> RasterBuffer {
    error_diffuse(src, palette, &ATKINSON_KERNEL)
}

fn error_diffuse(src: &RasterBuffer, palette: &Palette, kernel: &[(i64, i64, f32)]) -> RasterBuffer {
    let mut out = src.clone();
    let (width, height) = (out.width(), out.height());

    for y in 0..height {
        for x in 0..width {
            let i = out.index(x, y);
            let data = out.data_mut();
            let old_r = f32::from(data[i]);
            let old_g = f32::from(data[i + 1]);
            let old_b = f32::from(data[i + 2]);

            let nearest = palette.nearest(old_r, old_g, old_b);
            data[i] = nearest.r;
            data[i + 1] = nearest.g;
            data[i + 2] = nearest.b;

            let err_r = old_r - f32::from(nearest.r);
            let err_g = old_g - f32::from(nearest.g);
            let err_b = old_b - f32::from(nearest.b);

            for &(dx, dy, factor) in kernel {
                let nx = i64::from(x) + dx;
                let ny = i64::from(y) + dy;
                if nx < 0 || nx >= i64::from(width) || ny < 0 || ny >= i64::from(height) {
                    continue;
                }
                let j = out.index(nx as u32, ny as u32);
                let data = out.data_mut();
                data[j] = clamp_channel(f32::from(data[j]) + err_r * factor);
                data[j + 1] = clamp_channel(f32::from(data[j + 1]) + err_g * factor);
                data[j + 2] = clamp_channel(f32::from(data[j + 2]) + err_b * factor);
            }
        }
    }
    out
}

const BAYER_2: [[u32; 2]; 2] = [[0, 2], [3, 1]];

const BAYER_4: [[u32; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// Canonical 8x8 Bayer matrix, generated by interleaving the bits of
/// (x XOR y, y) from most significant downward.
fn bayer_8() -> [[u32; 8]; 8] {
    let mut m = [[0u32; 8]; 8];
    for (y, row) in m.iter_mut().enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            let mut v = 0u32;
            let mut xc = (x ^ y) as u32;
            let mut yc = y as u32;
            for _ in 0..3 {
                v = (v << 2) | (((yc & 1) << 1) | (xc & 1));
                xc >>= 1;
                yc >>= 1;
            }
            *cell = v;
        }
    }
    m
}

/// Ordered dithering: each pixel is biased by a spatially periodic threshold
/// and snapped to the nearest palette color. No error propagates between
/// pixels, so re-running on its own output is a fixed point.
pub fn ordered(src: &RasterBuffer, palette: &Palette, matrix_size: MatrixSize) -> RasterBuffer {
    let matrix: Vec<Vec<u32>> = match matrix_size {
        MatrixSize::Two => BAYER_2.iter().map(|r| r.to_vec()).collect(),
        MatrixSize::Four => BAYER_4.iter().map(|r| r.to_vec()).collect(),
        MatrixSize::Eight => bayer_8().iter().map(|r| r.to_vec()).collect(),
    };
    let n = matrix.len() as u32;
    let levels = (n * n) as f32;

    let mut out = src.clone();
    let (width, height) = (out.width(), out.height());
    for y in 0..height {
        for x in 0..width {
            let threshold =
                (matrix[(y % n) as usize][(x % n) as usize] as f32 / levels - 0.5) * 64.0;
            let i = out.index(x, y);
            let data = out.data_mut();
            let r = (f32::from(data[i]) + threshold).clamp(0.0, 255.0);
            let g = (f32::from(data[i + 1]) + threshold).clamp(0.0, 255.0);
            let b = (f32::from(data[i + 2]) + threshold).clamp(0.0, 255.0);
            let nearest = palette.nearest(r, g, b);
            data[i] = nearest.r;
            data[i + 1] = nearest.g;
            data[i + 2] = nearest.b;
        }
    }
    out
}
