//! The compositor-facing decoration surface.
//!
//! Wraps a window with a title bar and borders: converts between the
//! decorated frame and the window's own geometry, keeps the cached
//! decoration region in sync with window size changes, and turns input on
//! the frame into window-management requests.

use smithay::{
    backend::input::ButtonState,
    utils::{Logical, Physical, Point, Rectangle, Size},
};

use crate::{
    action::DecorationAction,
    button::render_button,
    geometry::Region,
    layout::{Area, AreaKind, DecorationLayout},
    render_helpers::{PixelBuffer, RenderTarget},
    signals::{SignalKind, SubscriptionId, WindowSignal},
    theme::DecorationTheme,
    window::{DecoratedWindow, WindowOutput},
};

/// Linux evdev code of the left mouse button.
pub const BTN_LEFT: u32 = 0x110;

/// Current frame dimensions. Thickness and title bar are zero while the
/// window is fullscreen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecorationGeometry {
    /// Full decorated frame size, as last reported by the host.
    pub size: Size<i32, Logical>,
    /// Left, right and bottom border.
    pub thickness: i32,
    /// Everything above the content: top border plus title.
    pub titlebar: i32,
}

#[derive(Debug, Default)]
struct TitleTexture {
    text: String,
    buffer: Option<PixelBuffer>,
}

impl TitleTexture {
    /// Returns the rendered title, re-rendering only when the text or the
    /// target pixel size changed.
    fn update(
        &mut self,
        theme: &DecorationTheme,
        text: &str,
        size: Size<i32, Physical>,
    ) -> &PixelBuffer {
        let fresh = self.text == text
            && self.buffer.as_ref().is_some_and(|buffer| buffer.size() == size);
        if !fresh {
            self.text = text.to_owned();
            self.buffer = None;
        }

        self.buffer.get_or_insert_with(|| {
            tracing::trace!(text, width = size.w, height = size.h, "rendering title");
            theme.render_text(text, size.w, size.h)
        })
    }
}

#[derive(Debug)]
pub struct DecorationSurface<W: DecoratedWindow> {
    window: W,
    theme: DecorationTheme,
    layout: DecorationLayout,
    geometry: DecorationGeometry,
    cached_region: Region,
    title: TitleTexture,
    active: bool,
    mapped: bool,
    title_subscription: SubscriptionId,
}

impl<W: DecoratedWindow> DecorationSurface<W> {
    /// Decorates `window` and attaches the decoration to it.
    pub fn new(window: W, theme: DecorationTheme) -> Self {
        let title_subscription = window.connect_signal(SignalKind::TitleChanged);
        let layout = DecorationLayout::new(theme.layout_metrics());

        let mut surface = Self {
            window,
            theme,
            layout,
            geometry: DecorationGeometry::default(),
            cached_region: Region::new(),
            title: TitleTexture::default(),
            // Windows are usually activated as they map.
            active: true,
            mapped: true,
            title_subscription,
        };

        surface.update_decoration_size();
        let frame = surface.expand_wm_geometry(surface.window.wm_geometry());
        surface.notify_view_resized(frame);

        surface.window.set_decoration_attached(true);
        surface.window.damage();
        tracing::debug!(title = %surface.window.title(), "decoration attached");
        surface
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn layout(&self) -> &DecorationLayout {
        &self.layout
    }

    pub fn decoration_geometry(&self) -> DecorationGeometry {
        self.geometry
    }

    pub fn cached_region(&self) -> &Region {
        &self.cached_region
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    pub fn get_size(&self) -> Size<i32, Logical> {
        self.geometry.size
    }

    /// Position of the frame relative to the window's content origin.
    pub fn get_offset(&self) -> Point<i32, Logical> {
        Point::from((-self.geometry.thickness, -self.geometry.titlebar))
    }

    pub fn accepts_input(&self, x: i32, y: i32) -> bool {
        self.cached_region.contains((x, y))
    }

    pub fn expand_wm_geometry(
        &self,
        contained: Rectangle<i32, Logical>,
    ) -> Rectangle<i32, Logical> {
        let DecorationGeometry {
            thickness, titlebar, ..
        } = self.geometry;
        Rectangle::new(
            (
                contained.loc.x.saturating_sub(thickness),
                contained.loc.y.saturating_sub(titlebar),
            )
                .into(),
            (
                contained.size.w.saturating_add(2 * thickness),
                contained.size.h.saturating_add(thickness + titlebar),
            )
                .into(),
        )
    }

    /// Content size left for a frame resized to `target`, at least 1x1.
    pub fn calculate_resize_size(&self, target: Size<i32, Logical>) -> Size<i32, Logical> {
        let DecorationGeometry {
            thickness, titlebar, ..
        } = self.geometry;
        Size::from((
            target.w.saturating_sub(2 * thickness).max(1),
            target.h.saturating_sub(thickness + titlebar).max(1),
        ))
    }

    pub fn notify_view_activated(&mut self, active: bool) {
        if self.active != active {
            self.window.damage();
        }
        self.active = active;
    }

    /// Takes the new decorated frame geometry.
    pub fn notify_view_resized(&mut self, frame: Rectangle<i32, Logical>) {
        self.window.damage();
        self.geometry.size = Size::from((frame.size.w.max(0), frame.size.h.max(0)));

        if self.window.state().fullscreen {
            self.layout.resize(0, 0);
        } else {
            self.layout.resize(frame.size.w, frame.size.h);
            self.cached_region = self.layout.calculate_region();
        }
        self.flush_layout_feedback();

        tracing::trace!(
            width = frame.size.w,
            height = frame.size.h,
            "decoration resized"
        );
        self.window.damage();
    }

    pub fn notify_view_tiled(&mut self) {}

    pub fn notify_view_fullscreen(&mut self) {
        self.update_decoration_size();

        if !self.window.state().fullscreen {
            let frame = self.expand_wm_geometry(self.window.wm_geometry());
            self.notify_view_resized(frame);
        }
    }

    /// Handles signals queued on the window since the last call.
    pub fn dispatch_signals(&mut self) {
        for signal in self.window.take_signals(self.title_subscription) {
            if signal == WindowSignal::TitleChanged {
                self.window.damage();
            }
        }
    }

    pub fn on_pointer_enter(&mut self, x: i32, y: i32) {
        self.layout.handle_motion(x, y);
        self.flush_layout_feedback();
    }

    pub fn on_pointer_leave(&mut self) {
        self.layout.handle_focus_lost();
        self.flush_layout_feedback();
    }

    pub fn on_pointer_motion(&mut self, x: i32, y: i32) {
        self.layout.handle_motion(x, y);
        self.flush_layout_feedback();
    }

    /// Only the left button interacts with the decoration.
    pub fn on_pointer_button(&mut self, button: u32, state: ButtonState) -> DecorationAction {
        if button != BTN_LEFT {
            return DecorationAction::None;
        }

        let action = self.layout.handle_press_event(state == ButtonState::Pressed);
        self.handle_action(action)
    }

    pub fn on_touch_down(&mut self, x: i32, y: i32) -> DecorationAction {
        let action = self.layout.touch_down(x, y);
        self.handle_action(action)
    }

    pub fn on_touch_motion(&mut self, x: i32, y: i32) {
        self.on_pointer_motion(x, y);
    }

    pub fn on_touch_up(&mut self) -> DecorationAction {
        let action = self.layout.touch_up();
        self.handle_action(action)
    }

    /// Paints the parts of the decoration covered by `damage`.
    ///
    /// `origin` is where the frame's top-left corner lands in the target, in
    /// logical coordinates; `damage` is in the target's physical pixels.
    pub fn render<T: RenderTarget>(
        &mut self,
        target: &mut T,
        origin: Point<i32, Logical>,
        damage: &[Rectangle<i32, Physical>],
    ) -> Result<(), T::Error> {
        let frame = self.cached_region.translated(origin).to_physical(target.scale());
        let damage = Region::from_rects(damage.iter().copied());

        for scissor in frame.intersect(&damage).rects() {
            self.render_scissor_box(target, origin, *scissor)?;
        }
        Ok(())
    }

    fn render_scissor_box<T: RenderTarget>(
        &mut self,
        target: &mut T,
        origin: Point<i32, Logical>,
        scissor: Rectangle<i32, Physical>,
    ) -> Result<(), T::Error> {
        let scale = target.scale();
        let background: Rectangle<i32, Physical> =
            Rectangle::new(origin, self.geometry.size).to_physical_precise_round(scale);
        self.theme
            .render_background(target, background, scissor, self.active)?;

        let areas: Vec<Area> = self.layout.renderable_areas().copied().collect();
        for area in areas {
            let geometry = Rectangle::new(area.geometry.loc + origin, area.geometry.size);
            match area.kind {
                AreaKind::Title => {
                    let dst: Rectangle<i32, Physical> = geometry.to_physical_precise_round(scale);
                    let text = self.window.title();
                    let buffer = self.title.update(&self.theme, &text, dst.size);
                    target.blit(buffer, dst, scissor)?;
                }
                AreaKind::Button(kind) => {
                    let metrics = self.layout.metrics();
                    let padding = metrics.button_padding();
                    let button = Rectangle::new(
                        geometry.loc + Point::from((padding, padding)),
                        Size::from((metrics.button_width, metrics.button_height)),
                    );
                    let dst: Rectangle<i32, Physical> = button.to_physical_precise_round(scale);
                    let visual = self.layout.button_visual(kind);
                    render_button(target, &self.theme, kind, visual, dst, scissor)?;
                }
                AreaKind::Border(_) => {}
            }
        }
        Ok(())
    }

    fn handle_action(&mut self, action: DecorationAction) -> DecorationAction {
        self.flush_layout_feedback();
        if action != DecorationAction::None {
            tracing::debug!(?action, "decoration action");
            action.execute(&self.window);
        }
        action
    }

    /// Forwards layout damage (as window-local rectangles) and cursor changes.
    fn flush_layout_feedback(&mut self) {
        let offset = self.get_offset();
        for rect in self.layout.take_damage() {
            self.window
                .damage_rect(Rectangle::new(rect.loc + offset, rect.size));
        }

        if let Some(cursor) = self.layout.take_cursor_change() {
            match self.window.output() {
                Some(output) => output.set_cursor(cursor),
                None => tracing::trace!(cursor = cursor.name(), "no output for cursor change"),
            }
        }
    }

    fn update_decoration_size(&mut self) {
        if self.window.state().fullscreen {
            self.geometry.thickness = 0;
            self.geometry.titlebar = 0;
            self.cached_region.clear();
            self.layout.resize(0, 0);
            self.flush_layout_feedback();
        } else {
            self.geometry.thickness = self.theme.border_size();
            self.geometry.titlebar = self.theme.title_height() + self.theme.border_size();
            self.cached_region = self.layout.calculate_region();
        }
    }
}

impl<W: DecoratedWindow> Drop for DecorationSurface<W> {
    fn drop(&mut self) {
        self.mapped = false;
        self.window
            .emit_signal(WindowSignal::DecorationMapState { mapped: false });
        self.window.disconnect_signal(self.title_subscription);
        self.window.set_decoration_attached(false);
        tracing::debug!("decoration detached");
    }
}
