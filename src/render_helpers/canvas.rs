//! Software render target backed by a [`PixelBuffer`].

use std::convert::Infallible;

use smithay::{
    backend::renderer::Color32F,
    utils::{Physical, Rectangle, Scale, Size},
};

use super::{PixelBuffer, RenderTarget};

#[derive(Debug, Clone)]
pub struct Canvas {
    buffer: PixelBuffer,
    scale: Scale<f64>,
}

impl Canvas {
    pub fn new(size: impl Into<Size<i32, Physical>>, scale: f64) -> Self {
        let size = size.into();
        Self {
            buffer: PixelBuffer::new(size.w, size.h),
            scale: Scale::from(scale),
        }
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.buffer.pixel(x, y)
    }

    pub fn clear(&mut self) {
        let size = self.buffer.size();
        self.buffer = PixelBuffer::new(size.w, size.h);
    }

    fn bounds(&self) -> Rectangle<i32, Physical> {
        Rectangle::from_size(self.buffer.size())
    }
}

impl RenderTarget for Canvas {
    type Error = Infallible;

    fn scale(&self) -> Scale<f64> {
        self.scale
    }

    fn fill(
        &mut self,
        dst: Rectangle<i32, Physical>,
        scissor: Rectangle<i32, Physical>,
        color: Color32F,
    ) -> Result<(), Self::Error> {
        if let Some(clipped) = dst.intersection(scissor) {
            self.buffer.fill_rect(clipped, color);
        }
        Ok(())
    }

    fn blit(
        &mut self,
        buffer: &PixelBuffer,
        dst: Rectangle<i32, Physical>,
        scissor: Rectangle<i32, Physical>,
    ) -> Result<(), Self::Error> {
        if dst.size.w <= 0 || dst.size.h <= 0 || buffer.width() == 0 || buffer.height() == 0 {
            return Ok(());
        }

        let Some(clipped) = dst
            .intersection(scissor)
            .and_then(|rect| rect.intersection(self.bounds()))
        else {
            return Ok(());
        };

        // Nearest-neighbour sampling when the buffer and destination sizes differ.
        for y in clipped.loc.y..clipped.loc.y + clipped.size.h {
            let src_y = (y - dst.loc.y) * buffer.height() / dst.size.h;
            for x in clipped.loc.x..clipped.loc.x + clipped.size.w {
                let src_x = (x - dst.loc.x) * buffer.width() / dst.size.w;
                if let Some(argb) = buffer.pixel(src_x, src_y) {
                    self.buffer.blend_pixel(x, y, argb);
                }
            }
        }
        Ok(())
    }
}
