use crate::palette::Rgb;

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_rgb(c: Rgb) -> Self {
        Self::opaque(c.r, c.g, c.b)
    }
}

/// Row-major RGBA8 pixel buffer. Dimensions are fixed for the buffer's
/// lifetime; transforms never alias a caller's buffer, they copy or allocate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Transparent-black buffer of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize * 4],
        }
    }

    /// Wraps an existing RGBA8 byte vector. `data.len()` must equal
    /// `width * height * 4`; this is the only place the invariant is checked.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * 4);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_rgba8(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let i = self.index(x, y);
        Rgba::new(self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3])
    }

    #[inline]
    pub fn rgb_at(&self, x: u32, y: u32) -> Rgb {
        let i = self.index(x, y);
        Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, px: Rgba) {
        let i = self.index(x, y);
        self.data[i] = px.r;
        self.data[i + 1] = px.g;
        self.data[i + 2] = px.b;
        self.data[i + 3] = px.a;
    }

    /// Fills the whole buffer with one color.
    pub fn fill(&mut self, px: Rgba) {
        for chunk in self.data.chunks_exact_mut(4) {
            chunk[0] = px.r;
            chunk[1] = px.g;
            chunk[2] = px.b;
            chunk[3] = px.a;
        }
    }

    /// Nearest-neighbor resample to the given dimensions. Returns a clone
    /// when the dimensions already match.
    pub fn resample_nearest(&self, new_w: u32, new_h: u32) -> RasterBuffer {
        if new_w == self.width && new_h == self.height {
            return self.clone();
        }
        let mut out = RasterBuffer::new(new_w, new_h);
        if new_w == 0 || new_h == 0 || self.width == 0 || self.height == 0 {
            return out;
        }
        for y in 0..new_h {
            let sy = (y as u64 * self.height as u64 / new_h as u64) as u32;
            let sy = sy.min(self.height - 1);
            for x in 0..new_w {
                let sx = (x as u64 * self.width as u64 / new_w as u64) as u32;
                let sx = sx.min(self.width - 1);
                out.put_pixel(x, y, self.pixel(sx, sy));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_roundtrip_row_major() {
        let mut buf = RasterBuffer::new(3, 2);
        buf.put_pixel(2, 1, Rgba::opaque(10, 20, 30));
        assert_eq!(buf.pixel(2, 1), Rgba::opaque(10, 20, 30));
        // last pixel of a 3x2 buffer starts at byte (1*3+2)*4 = 20
        assert_eq!(buf.data()[20], 10);
    }

    #[test]
    fn resample_identity_is_clone() {
        let mut buf = RasterBuffer::new(2, 2);
        buf.fill(Rgba::opaque(7, 8, 9));
        let out = buf.resample_nearest(2, 2);
        assert_eq!(out, buf);
    }

    #[test]
    fn resample_upscale_replicates_pixels() {
        let mut buf = RasterBuffer::new(1, 1);
        buf.put_pixel(0, 0, Rgba::opaque(1, 2, 3));
        let out = buf.resample_nearest(4, 4);
        assert_eq!(out.width(), 4);
        assert_eq!(out.height(), 4);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.pixel(x, y), Rgba::opaque(1, 2, 3));
            }
        }
    }

    #[test]
    fn resample_downscale_samples_nearest() {
        // 2x1 buffer: left red, right blue. Downscale to 1x1 samples the left.
        let mut buf = RasterBuffer::new(2, 1);
        buf.put_pixel(0, 0, Rgba::opaque(255, 0, 0));
        buf.put_pixel(1, 0, Rgba::opaque(0, 0, 255));
        let out = buf.resample_nearest(1, 1);
        assert_eq!(out.pixel(0, 0), Rgba::opaque(255, 0, 0));
    }
}
