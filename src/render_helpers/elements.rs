//! Render target that turns decoration draws into smithay render elements.

use std::convert::Infallible;

use smithay::{
    backend::renderer::{Color32F, element::Kind},
    utils::{Physical, Rectangle, Scale},
};

use super::{PixelBuffer, RenderTarget, SolidColorBuffer, SolidColorRenderElement};

/// A CPU-rendered buffer waiting to be uploaded and drawn by the host.
#[derive(Debug, Clone)]
pub struct TextureBlit {
    pub buffer: PixelBuffer,
    pub dst: Rectangle<i32, Physical>,
    pub scissor: Rectangle<i32, Physical>,
}

/// Collects fills as [`SolidColorRenderElement`]s and title blits as
/// [`TextureBlit`]s for one frame.
///
/// Fill buffers are reused slot by slot between frames, so an unchanged
/// decoration keeps its element ids and commits.
#[derive(Debug)]
pub struct ElementTarget {
    scale: Scale<f64>,
    buffers: Vec<SolidColorBuffer>,
    elements: Vec<SolidColorRenderElement>,
    blits: Vec<TextureBlit>,
}

impl ElementTarget {
    pub fn new(scale: f64) -> Self {
        Self {
            scale: Scale::from(scale),
            buffers: Vec::new(),
            elements: Vec::new(),
            blits: Vec::new(),
        }
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = Scale::from(scale);
    }

    /// Drops the previous frame's output; fill buffers are kept for reuse.
    pub fn begin_frame(&mut self) {
        self.elements.clear();
        self.blits.clear();
    }

    pub fn elements(&self) -> &[SolidColorRenderElement] {
        &self.elements
    }

    pub fn blits(&self) -> &[TextureBlit] {
        &self.blits
    }
}

impl RenderTarget for ElementTarget {
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
        let Some(clipped) = dst.intersection(scissor) else {
            return Ok(());
        };

        let slot = self.elements.len();
        if slot == self.buffers.len() {
            self.buffers.push(SolidColorBuffer::default());
        }
        let buffer = &mut self.buffers[slot];
        buffer.update(clipped.size, color);
        self.elements.push(SolidColorRenderElement::from_buffer(
            buffer,
            clipped.loc,
            Kind::Unspecified,
        ));
        Ok(())
    }

    fn blit(
        &mut self,
        buffer: &PixelBuffer,
        dst: Rectangle<i32, Physical>,
        scissor: Rectangle<i32, Physical>,
    ) -> Result<(), Self::Error> {
        if dst.intersection(scissor).is_some() {
            self.blits.push(TextureBlit {
                buffer: buffer.clone(),
                dst,
                scissor,
            });
        }
        Ok(())
    }
}
