//! Decoration metrics and pixel content.

use std::{fmt, rc::Rc};

use smithay::{
    backend::renderer::Color32F,
    utils::{Physical, Rectangle},
};

use crate::{
    config::{DecorationConfig, metric_px},
    layout::{ButtonKind, ButtonVisual, LayoutMetrics},
    render_helpers::{PixelBuffer, RenderTarget},
};

/// Rasterizes a line of text into a pixel buffer.
///
/// Hosts plug their font stack in here; the decoration only cares that the
/// output is deterministic for a given text, size and color.
pub trait TextRasterizer: fmt::Debug {
    fn draw_text(&self, text: &str, font_size: f64, color: Color32F, buffer: &mut PixelBuffer);
}

/// Draws one solid cell per visible character. Used when no font backend is
/// wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockTextRasterizer;

impl TextRasterizer for BlockTextRasterizer {
    fn draw_text(&self, text: &str, font_size: f64, color: Color32F, buffer: &mut PixelBuffer) {
        let advance = (font_size * 0.5).round() as i32;
        let glyph_width = (advance * 3 / 4).max(1);
        let glyph_height = (font_size * 0.6).round() as i32;
        if advance <= 0 || glyph_height <= 0 {
            return;
        }

        let y = (buffer.height() - glyph_height) / 2;
        let mut x = advance / 2;
        for ch in text.chars() {
            if x >= buffer.width() {
                break;
            }
            if !ch.is_whitespace() {
                buffer.fill_rect(
                    Rectangle::new((x, y).into(), (glyph_width, glyph_height).into()),
                    color,
                );
            }
            x += advance;
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecorationTheme {
    config: DecorationConfig,
    text: Rc<dyn TextRasterizer>,
}

impl DecorationTheme {
    pub fn new(config: DecorationConfig) -> Self {
        Self::with_text_rasterizer(config, Rc::new(BlockTextRasterizer))
    }

    pub fn with_text_rasterizer(config: DecorationConfig, text: Rc<dyn TextRasterizer>) -> Self {
        Self { config, text }
    }

    pub fn config(&self) -> &DecorationConfig {
        &self.config
    }

    /// Left, right and bottom frame thickness in logical pixels.
    pub fn border_size(&self) -> i32 {
        metric_px(self.config.border_size)
    }

    pub fn title_height(&self) -> i32 {
        metric_px(self.config.title_height)
    }

    pub fn layout_metrics(&self) -> LayoutMetrics {
        LayoutMetrics::from_config(&self.config)
    }

    pub fn render_background<T: RenderTarget>(
        &self,
        target: &mut T,
        geometry: Rectangle<i32, Physical>,
        scissor: Rectangle<i32, Physical>,
        active: bool,
    ) -> Result<(), T::Error> {
        let color = if active {
            self.config.colors.active
        } else {
            self.config.colors.inactive
        };
        target.fill(geometry, scissor, color)
    }

    /// Renders `text` into a `width` x `height` buffer, left aligned and
    /// vertically centered.
    pub fn render_text(&self, text: &str, width: i32, height: i32) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(width, height);
        if buffer.width() > 0 && buffer.height() > 0 && !text.is_empty() {
            let font_size = f64::from(buffer.height()) * self.config.font_size_ratio;
            self.text
                .draw_text(text, font_size, self.config.colors.title, &mut buffer);
        }
        buffer
    }

    pub fn button_background(&self, kind: ButtonKind, visual: ButtonVisual) -> Option<Color32F> {
        let colors = &self.config.colors;
        match visual {
            ButtonVisual::Idle => None,
            ButtonVisual::Hovered if kind == ButtonKind::Close => Some(colors.close_hovered),
            ButtonVisual::Hovered => Some(colors.button_hovered),
            ButtonVisual::Pressed => Some(colors.button_pressed),
        }
    }

    pub fn icon_color(&self) -> Color32F {
        self.config.colors.icon
    }
}
