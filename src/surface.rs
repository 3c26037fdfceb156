//! The rendering-target seam. Effects that draw shapes or glyphs (halftone,
//! ASCII, matrix rain) write through [`Surface`] instead of owning a pixel
//! buffer, so hosts can back it with whatever drawing stack they have.
//!
//! [`RasterSurface`] is the built-in buffer-backed implementation used by the
//! CLI and tests. It has no text rasterizer: a glyph is approximated as a
//! filled block at glyph metrics, which preserves the color and brightness
//! structure of the output. Hosts with a real text stack implement
//! `draw_glyph` with actual glyph coverage; the ASCII transcript string is
//! the canonical text artifact either way.

use crate::raster::{RasterBuffer, Rgba};

pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Sets the fill color used by subsequent shape and glyph calls.
    /// Alpha below 255 blends src-over.
    fn set_fill(&mut self, color: Rgba);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32);

    /// Draws one glyph with its top-left corner at (x, y) and a nominal
    /// size of `size_px` pixels.
    fn draw_glyph(&mut self, ch: char, x: f32, y: f32, size_px: f32);

    /// Replaces the surface pixels with the buffer contents, anchored at the
    /// top-left corner and clipped to the surface.
    fn put_raster(&mut self, raster: &RasterBuffer);

    /// Resets every pixel to transparent black.
    fn clear(&mut self);
}

pub struct RasterSurface {
    buffer: RasterBuffer,
    fill: Rgba,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: RasterBuffer::new(width, height),
            fill: Rgba::BLACK,
        }
    }

    pub fn buffer(&self) -> &RasterBuffer {
        &self.buffer
    }

    pub fn into_buffer(self) -> RasterBuffer {
        self.buffer
    }

    fn blend_pixel(&mut self, x: u32, y: u32) {
        let Rgba { r, g, b, a } = self.fill;
        if a == 255 {
            self.buffer.put_pixel(x, y, self.fill);
            return;
        }
        if a == 0 {
            return;
        }
        let dst = self.buffer.pixel(x, y);
        let sa = u16::from(a);
        let blend = |s: u8, d: u8| -> u8 {
            ((u16::from(s) * sa + u16::from(d) * (255 - sa) + 127) / 255) as u8
        };
        let out_a = (sa + u16::from(dst.a) * (255 - sa) / 255) as u8;
        self.buffer
            .put_pixel(x, y, Rgba::new(blend(r, dst.r), blend(g, dst.g), blend(b, dst.b), out_a));
    }

    fn fill_span(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        let w = self.buffer.width() as f32;
        let h = self.buffer.height() as f32;
        let x_start = x0.max(0.0).floor() as u32;
        let y_start = y0.max(0.0).floor() as u32;
        let x_end = x1.min(w).ceil() as u32;
        let y_end = y1.min(h).ceil() as u32;
        for y in y_start..y_end.min(self.buffer.height()) {
            for x in x_start..x_end.min(self.buffer.width()) {
                self.blend_pixel(x, y);
            }
        }
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.buffer.width()
    }

    fn height(&self) -> u32 {
        self.buffer.height()
    }

    fn set_fill(&mut self, color: Rgba) {
        self.fill = color;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        self.fill_span(x, y, x + w, y + h);
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32) {
        if radius <= 0.0 {
            return;
        }
        let x_start = (cx - radius).floor().max(0.0) as u32;
        let y_start = (cy - radius).floor().max(0.0) as u32;
        let x_end = ((cx + radius).ceil() as u32).min(self.buffer.width());
        let y_end = ((cy + radius).ceil() as u32).min(self.buffer.height());
        let r2 = radius * radius;
        for y in y_start..y_end {
            for x in x_start..x_end {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend_pixel(x, y);
                }
            }
        }
    }

    fn draw_glyph(&mut self, ch: char, x: f32, y: f32, size_px: f32) {
        if ch.is_whitespace() {
            return;
        }
        // Block approximation at typical monospace metrics.
        self.fill_rect(x, y, size_px * 0.6, size_px * 0.9);
    }

    fn put_raster(&mut self, raster: &RasterBuffer) {
        let w = raster.width().min(self.buffer.width());
        let h = raster.height().min(self.buffer.height());
        for y in 0..h {
            for x in 0..w {
                self.buffer.put_pixel(x, y, raster.pixel(x, y));
            }
        }
    }

    fn clear(&mut self) {
        self.buffer.fill(Rgba::transparent());
    }
}
