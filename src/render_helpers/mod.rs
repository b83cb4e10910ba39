//! Render targets the decoration can paint into.
//!
//! The decoration only ever fills rectangles and blits CPU-rendered pixel
//! buffers, both clipped to a scissor box in physical coordinates.

pub mod canvas;
pub mod elements;
pub mod pixel;
pub mod solid_color;

use smithay::{
    backend::renderer::Color32F,
    utils::{Physical, Rectangle, Scale},
};

pub use canvas::Canvas;
pub use elements::{ElementTarget, TextureBlit};
pub use pixel::PixelBuffer;
pub use solid_color::{SolidColorBuffer, SolidColorRenderElement};

pub trait RenderTarget {
    type Error;

    /// Output scale the target renders at.
    fn scale(&self) -> Scale<f64>;

    fn fill(
        &mut self,
        dst: Rectangle<i32, Physical>,
        scissor: Rectangle<i32, Physical>,
        color: Color32F,
    ) -> Result<(), Self::Error>;

    /// Draws `buffer` stretched over `dst`, touching only pixels inside `scissor`.
    fn blit(
        &mut self,
        buffer: &PixelBuffer,
        dst: Rectangle<i32, Physical>,
        scissor: Rectangle<i32, Physical>,
    ) -> Result<(), Self::Error>;
}
