//! Title bar buttons: hover/press background plus a flat icon.

use smithay::utils::{Physical, Rectangle};

use crate::{
    layout::{ButtonKind, ButtonVisual},
    render_helpers::RenderTarget,
    theme::DecorationTheme,
};

/// Draws the button `kind` filling `dst`, clipped to `scissor`.
pub fn render_button<T: RenderTarget>(
    target: &mut T,
    theme: &DecorationTheme,
    kind: ButtonKind,
    visual: ButtonVisual,
    dst: Rectangle<i32, Physical>,
    scissor: Rectangle<i32, Physical>,
) -> Result<(), T::Error> {
    if let Some(color) = theme.button_background(kind, visual) {
        target.fill(dst, scissor, color)?;
    }

    let side = dst.size.w.min(dst.size.h) / 2;
    if side <= 0 {
        return Ok(());
    }
    let stroke = (side / 8).max(1);
    let x = dst.loc.x + (dst.size.w - side) / 2;
    let y = dst.loc.y + (dst.size.h - side) / 2;
    let color = theme.icon_color();
    let rect = |x: i32, y: i32, w: i32, h: i32| {
        Rectangle::<i32, Physical>::new((x, y).into(), (w, h).into())
    };

    match kind {
        ButtonKind::Close => {
            for step in 0..=(side - stroke) {
                target.fill(rect(x + step, y + step, stroke, stroke), scissor, color)?;
                let mirrored = rect(x + side - stroke - step, y + step, stroke, stroke);
                target.fill(mirrored, scissor, color)?;
            }
        }
        ButtonKind::Maximize => {
            target.fill(rect(x, y, side, stroke), scissor, color)?;
            target.fill(rect(x, y + side - stroke, side, stroke), scissor, color)?;
            target.fill(rect(x, y, stroke, side), scissor, color)?;
            target.fill(rect(x + side - stroke, y, stroke, side), scissor, color)?;
        }
        ButtonKind::Minimize => {
            target.fill(rect(x, y + side - stroke, side, stroke), scissor, color)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{config::DecorationConfig, render_helpers::Canvas};

    use super::*;

    fn draw(kind: ButtonKind, visual: ButtonVisual) -> Canvas {
        let theme = DecorationTheme::new(DecorationConfig::default());
        let mut canvas = Canvas::new((30, 20), 1.0);
        let full = Rectangle::from_size((30, 20).into());
        render_button(&mut canvas, &theme, kind, visual, full, full).unwrap();
        canvas
    }

    #[test]
    fn idle_buttons_draw_only_the_icon() {
        let canvas = draw(ButtonKind::Minimize, ButtonVisual::Idle);
        // 10px wide bar, 1px stroke.
        assert_eq!(canvas.buffer().covered_pixels(), 10);
    }

    #[test]
    fn hovered_buttons_fill_their_box() {
        let canvas = draw(ButtonKind::Close, ButtonVisual::Hovered);
        assert_eq!(canvas.buffer().covered_pixels(), 30 * 20);
    }

    #[test]
    fn icons_differ_per_kind() {
        let close = draw(ButtonKind::Close, ButtonVisual::Idle);
        let maximize = draw(ButtonKind::Maximize, ButtonVisual::Idle);
        assert_ne!(close.buffer(), maximize.buffer());
        assert_eq!(maximize.buffer().covered_pixels(), 36);
    }

    #[test]
    fn scissor_limits_the_icon() {
        let theme = DecorationTheme::new(DecorationConfig::default());
        let mut canvas = Canvas::new((30, 20), 1.0);
        let full = Rectangle::from_size((30, 20).into());
        let nothing = Rectangle::new((0, 0).into(), (2, 2).into());
        let visual = ButtonVisual::Pressed;
        render_button(&mut canvas, &theme, ButtonKind::Maximize, visual, full, nothing).unwrap();
        assert_eq!(canvas.buffer().covered_pixels(), 4);
    }
}
