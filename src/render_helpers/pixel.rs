//! CPU-side ARGB8888 pixel buffers.

use std::fmt;

use smithay::{
    backend::renderer::Color32F,
    utils::{Physical, Rectangle, Size},
};

/// Premultiplied ARGB8888 pixels, row-major, one `u32` per pixel.
#[derive(Clone, PartialEq)]
pub struct PixelBuffer {
    size: Size<i32, Physical>,
    pixels: Vec<u32>,
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl PixelBuffer {
    /// Transparent buffer; negative dimensions are clamped to zero.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            size: Size::from((width, height)),
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn size(&self) -> Size<i32, Physical> {
        self.size
    }

    pub fn width(&self) -> i32 {
        self.size.w
    }

    pub fn height(&self) -> i32 {
        self.size.h
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Raw bytes for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|index| self.pixels[index])
    }

    pub fn blend_pixel(&mut self, x: i32, y: i32, argb: u32) {
        if let Some(index) = self.index(x, y) {
            self.pixels[index] = blend(self.pixels[index], argb);
        }
    }

    /// Blends `color` over every pixel of `rect` that lies inside the buffer.
    pub fn fill_rect(&mut self, rect: Rectangle<i32, Physical>, color: Color32F) {
        let argb = argb_from_color(color);
        let x0 = rect.loc.x.max(0);
        let y0 = rect.loc.y.max(0);
        let x1 = (rect.loc.x + rect.size.w).min(self.size.w);
        let y1 = (rect.loc.y + rect.size.h).min(self.size.h);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_pixel(x, y, argb);
            }
        }
    }

    /// Number of pixels with non-zero alpha.
    pub fn covered_pixels(&self) -> usize {
        self.pixels.iter().filter(|pixel| **pixel >> 24 != 0).count()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.size.w || y >= self.size.h {
            return None;
        }
        Some(y as usize * self.size.w as usize + x as usize)
    }
}

pub fn argb_from_color(color: Color32F) -> u32 {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(color.a()) << 24)
        | (channel(color.r()) << 16)
        | (channel(color.g()) << 8)
        | channel(color.b())
}

/// Source-over for premultiplied ARGB.
pub fn blend(dst: u32, src: u32) -> u32 {
    let src_alpha = src >> 24;
    if src_alpha == 0xff {
        return src;
    }
    if src_alpha == 0 {
        return dst;
    }

    let inv = 255 - src_alpha;
    let mix = |shift: u32| {
        let s = (src >> shift) & 0xff;
        let d = (dst >> shift) & 0xff;
        (s + (d * inv + 127) / 255).min(255) << shift
    };
    mix(24) | mix(16) | mix(8) | mix(0)
}
