//! Decoration area partition and the pointer interaction state machine.
//!
//! Everything here works in decoration-local logical coordinates: `(0, 0)` is
//! the top-left corner of the outer frame, borders included.

use smithay::utils::{Logical, Point, Rectangle, Size};

use crate::{
    action::DecorationAction,
    config::{DecorationConfig, MAX_METRIC, metric_px},
    edges::{CursorShape, ResizeEdge},
    geometry::Region,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonKind {
    Close,
    Maximize,
    Minimize,
}

impl ButtonKind {
    const ACTIONS: [DecorationAction; 3] = [
        DecorationAction::Close,
        DecorationAction::ToggleMaximize,
        DecorationAction::Minimize,
    ];

    pub fn action(self) -> DecorationAction {
        Self::ACTIONS[self as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            ButtonKind::Close => "close",
            ButtonKind::Maximize => "maximize",
            ButtonKind::Minimize => "minimize",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [ButtonKind::Close, ButtonKind::Maximize, ButtonKind::Minimize]
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AreaKind {
    Title,
    Button(ButtonKind),
    /// Border hit zone; carries the edge the zone lies on; corners are
    /// resolved from the pointer position at press time.
    Border(ResizeEdge),
}

impl AreaKind {
    pub fn is_renderable(self) -> bool {
        !matches!(self, AreaKind::Border(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    pub kind: AreaKind,
    pub geometry: Rectangle<i32, Logical>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Hovering(AreaKind),
    Armed(ButtonKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVisual {
    #[default]
    Idle,
    Hovered,
    Pressed,
}

/// Pixel metrics the partition is computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutMetrics {
    pub border_size: i32,
    pub title_height: i32,
    pub button_width: i32,
    pub button_height: i32,
    pub corner_margin: i32,
    pub buttons: Vec<ButtonKind>,
}

impl LayoutMetrics {
    pub fn from_config(config: &DecorationConfig) -> Self {
        let title_height = metric_px(config.title_height);
        let largest = f64::from(MAX_METRIC);
        let button_height =
            (f64::from(title_height) * config.button_height_ratio).clamp(0.0, largest);
        let button_width = (button_height * config.button_aspect_ratio).clamp(0.0, largest);
        Self {
            border_size: metric_px(config.border_size),
            title_height,
            button_width: button_width as i32,
            button_height: button_height as i32,
            corner_margin: metric_px(config.corner_margin),
            buttons: config.buttons.clone(),
        }
    }

    /// Vertical gap around a button inside the title bar, reused horizontally.
    pub fn button_padding(&self) -> i32 {
        ((self.title_height - self.button_height) / 2).max(0)
    }

    fn slot_width(&self) -> i32 {
        self.button_width + 2 * self.button_padding()
    }
}

/// Frame edges after clamping the metrics to the frame size.
#[derive(Debug, Clone, Copy, Default)]
struct Bands {
    left: i32,
    right: i32,
    top: i32,
    title_bottom: i32,
    bottom: i32,
}

impl Bands {
    fn new(metrics: &LayoutMetrics, size: Size<i32, Logical>) -> Self {
        let border = metrics.border_size.max(0);
        let title = metrics.title_height.max(0);

        let left = border.min(size.w);
        let right = (size.w - border).max(left);
        let top = border.min(size.h);
        let bottom = (size.h - border).max(top);
        let title_bottom = (border + title).min(bottom).max(top);

        Self {
            left,
            right,
            top,
            title_bottom,
            bottom,
        }
    }
}

#[derive(Debug)]
pub struct DecorationLayout {
    metrics: LayoutMetrics,
    size: Size<i32, Logical>,
    bands: Bands,
    areas: Vec<Area>,
    state: InteractionState,
    pointer: Option<Point<i32, Logical>>,
    cursor: CursorShape,
    cursor_changed: bool,
    damage: Vec<Rectangle<i32, Logical>>,
}

impl DecorationLayout {
    pub fn new(metrics: LayoutMetrics) -> Self {
        Self {
            metrics,
            size: Size::default(),
            bands: Bands::default(),
            areas: Vec::new(),
            state: InteractionState::Idle,
            pointer: None,
            cursor: CursorShape::Default,
            cursor_changed: false,
            damage: Vec::new(),
        }
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn size(&self) -> Size<i32, Logical> {
        self.size
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Title and button areas, in layout order.
    pub fn renderable_areas(&self) -> impl Iterator<Item = &Area> + '_ {
        self.areas.iter().filter(|area| area.kind.is_renderable())
    }

    pub fn area_at(&self, x: i32, y: i32) -> Option<Area> {
        let point = Point::<i32, Logical>::from((x, y));
        self.areas
            .iter()
            .find(|area| area.geometry.contains(point))
            .copied()
    }

    /// Recomputes every area for a frame of `width` x `height`.
    ///
    /// Buttons are placed right to left from the right end of the title bar
    /// in configured order, as long as a whole slot still fits.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.areas.clear();

        if width <= 0 || height <= 0 {
            self.size = Size::default();
            self.bands = Bands::default();
            self.set_state(InteractionState::Idle);
            return;
        }

        self.size = Size::from((width, height));
        let bands = Bands::new(&self.metrics, self.size);
        self.bands = bands;

        if bands.title_bottom > bands.top {
            let slot_width = self.metrics.slot_width();
            let mut slot_right = bands.right;
            let mut buttons = Vec::new();
            if slot_width > 0 {
                for kind in &self.metrics.buttons {
                    let slot_left = slot_right - slot_width;
                    if slot_left < bands.left {
                        break;
                    }
                    buttons.extend(
                        span(slot_left, bands.top, slot_right, bands.title_bottom)
                            .map(|geometry| Area {
                                kind: AreaKind::Button(*kind),
                                geometry,
                            }),
                    );
                    slot_right = slot_left;
                }
            }

            self.areas.extend(
                span(bands.left, bands.top, slot_right, bands.title_bottom).map(|geometry| Area {
                    kind: AreaKind::Title,
                    geometry,
                }),
            );
            self.areas.extend(buttons.into_iter().rev());
        }

        let zones = [
            (ResizeEdge::TOP, span(0, 0, width, bands.top)),
            (ResizeEdge::BOTTOM, span(0, bands.bottom, width, height)),
            (ResizeEdge::LEFT, span(0, bands.top, bands.left, bands.bottom)),
            (ResizeEdge::RIGHT, span(bands.right, bands.top, width, bands.bottom)),
        ];
        for (edge, geometry) in zones {
            if let Some(geometry) = geometry {
                self.areas.push(Area {
                    kind: AreaKind::Border(edge),
                    geometry,
                });
            }
        }

        let still_present = match self.state {
            InteractionState::Idle => true,
            InteractionState::Hovering(kind) => self.has_area(kind),
            InteractionState::Armed(button) => self.has_area(AreaKind::Button(button)),
        };
        if !still_present {
            self.set_state(InteractionState::Idle);
        }

        tracing::trace!(width, height, areas = self.areas.len(), "decoration layout resized");
    }

    /// Title-bar strip plus the four border strips; the content rectangle
    /// is never part of it.
    pub fn calculate_region(&self) -> Region {
        if self.areas.is_empty() {
            return Region::new();
        }

        let Bands {
            left,
            right,
            title_bottom,
            bottom,
            ..
        } = self.bands;
        let (width, height) = (self.size.w, self.size.h);

        Region::from_rects(
            [
                span(0, 0, width, title_bottom),
                span(0, bottom, width, height),
                span(0, title_bottom, left, bottom),
                span(right, title_bottom, width, bottom),
            ]
            .into_iter()
            .flatten(),
        )
    }

    pub fn handle_motion(&mut self, x: i32, y: i32) {
        self.pointer = Some(Point::from((x, y)));
        let hovered = self.area_at(x, y);

        let next = match (self.state, hovered) {
            (InteractionState::Armed(button), Some(area))
                if area.kind == AreaKind::Button(button) =>
            {
                InteractionState::Armed(button)
            }
            (_, Some(area)) => InteractionState::Hovering(area.kind),
            (_, None) => InteractionState::Idle,
        };
        self.set_state(next);

        let cursor = match hovered.map(|area| area.kind) {
            Some(AreaKind::Border(edge)) => CursorShape::from_edges(self.edges_at(edge, x, y)),
            _ => CursorShape::Default,
        };
        self.set_cursor(cursor);
    }

    pub fn handle_focus_lost(&mut self) {
        self.pointer = None;
        self.set_state(InteractionState::Idle);
        self.set_cursor(CursorShape::Default);
    }

    /// Feeds a left-button press or release at the last pointer position.
    pub fn handle_press_event(&mut self, pressed: bool) -> DecorationAction {
        let Some(pointer) = self.pointer else {
            return DecorationAction::None;
        };
        let hovered = self.area_at(pointer.x, pointer.y).map(|area| area.kind);

        if pressed {
            return match hovered {
                Some(AreaKind::Title) => DecorationAction::Move,
                Some(AreaKind::Border(edge)) => {
                    DecorationAction::Resize(self.edges_at(edge, pointer.x, pointer.y))
                }
                Some(AreaKind::Button(button)) => {
                    self.set_state(InteractionState::Armed(button));
                    DecorationAction::None
                }
                None => DecorationAction::None,
            };
        }

        let InteractionState::Armed(button) = self.state else {
            return DecorationAction::None;
        };

        if hovered == Some(AreaKind::Button(button)) {
            self.set_state(InteractionState::Hovering(AreaKind::Button(button)));
            tracing::debug!(button = button.name(), "decoration button clicked");
            button.action()
        } else {
            self.set_state(hovered.map_or(InteractionState::Idle, InteractionState::Hovering));
            DecorationAction::None
        }
    }

    pub fn touch_down(&mut self, x: i32, y: i32) -> DecorationAction {
        self.handle_motion(x, y);
        self.handle_press_event(true)
    }

    pub fn touch_up(&mut self) -> DecorationAction {
        let action = self.handle_press_event(false);
        self.handle_focus_lost();
        action
    }

    pub fn button_visual(&self, kind: ButtonKind) -> ButtonVisual {
        match self.state {
            InteractionState::Armed(button) if button == kind => ButtonVisual::Pressed,
            InteractionState::Hovering(AreaKind::Button(button)) if button == kind => {
                ButtonVisual::Hovered
            }
            _ => ButtonVisual::Idle,
        }
    }

    /// Decoration-local rectangles that need repainting since the last call.
    pub fn take_damage(&mut self) -> Vec<Rectangle<i32, Logical>> {
        std::mem::take(&mut self.damage)
    }

    /// The cursor to show, if it changed since the last call.
    pub fn take_cursor_change(&mut self) -> Option<CursorShape> {
        std::mem::take(&mut self.cursor_changed).then_some(self.cursor)
    }

    /// Edge mask for a press at `(x, y)` inside the border zone on `edge`.
    fn edges_at(&self, edge: ResizeEdge, x: i32, y: i32) -> ResizeEdge {
        let margin = self.metrics.corner_margin.max(self.metrics.border_size);
        let margin_x = margin.min(self.size.w / 2);
        let margin_y = margin.min(self.size.h / 2);

        let mut edges = edge;
        if edge.intersects(ResizeEdge::TOP | ResizeEdge::BOTTOM) {
            if x < margin_x {
                edges |= ResizeEdge::LEFT;
            } else if x >= self.size.w - margin_x {
                edges |= ResizeEdge::RIGHT;
            }
        } else if y < margin_y {
            edges |= ResizeEdge::TOP;
        } else if y >= self.size.h - margin_y {
            edges |= ResizeEdge::BOTTOM;
        }
        edges
    }

    fn has_area(&self, kind: AreaKind) -> bool {
        self.areas.iter().any(|area| area.kind == kind)
    }

    fn area_geometry(&self, kind: AreaKind) -> Option<Rectangle<i32, Logical>> {
        self.areas
            .iter()
            .find(|area| area.kind == kind)
            .map(|area| area.geometry)
    }

    fn set_state(&mut self, next: InteractionState) {
        if next == self.state {
            return;
        }

        // Only buttons change appearance with the interaction state.
        for state in [self.state, next] {
            let button = match state {
                InteractionState::Hovering(AreaKind::Button(button))
                | InteractionState::Armed(button) => button,
                _ => continue,
            };
            if let Some(geometry) = self.area_geometry(AreaKind::Button(button)) {
                self.damage.push(geometry);
            }
        }

        tracing::trace!(from = ?self.state, to = ?next, "decoration interaction state");
        self.state = next;
    }

    fn set_cursor(&mut self, cursor: CursorShape) {
        if cursor != self.cursor {
            self.cursor = cursor;
            self.cursor_changed = true;
        }
    }
}

/// Rectangle spanning `[x0, x1) x [y0, y1)`, or `None` when empty.
fn span(x0: i32, y0: i32, x1: i32, y1: i32) -> Option<Rectangle<i32, Logical>> {
    (x1 > x0 && y1 > y0).then(|| Rectangle::new((x0, y0).into(), (x1 - x0, y1 - y0).into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(width: i32, height: i32) -> DecorationLayout {
        let metrics = LayoutMetrics::from_config(&DecorationConfig::default());
        let mut layout = DecorationLayout::new(metrics);
        layout.resize(width, height);
        layout
    }

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Rectangle<i32, Logical> {
        Rectangle::new((x, y).into(), (w, h).into())
    }

    #[test]
    fn default_metrics() {
        let metrics = LayoutMetrics::from_config(&DecorationConfig::default());
        assert_eq!(metrics.button_height, 19);
        assert_eq!(metrics.button_width, 30);
        assert_eq!(metrics.button_padding(), 2);
        assert_eq!(metrics.slot_width(), 34);
    }

    #[test]
    fn areas_are_ordered_left_to_right() {
        let layout = layout(300, 200);
        let kinds: Vec<_> = layout.areas().iter().map(|area| area.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AreaKind::Title,
                AreaKind::Button(ButtonKind::Minimize),
                AreaKind::Button(ButtonKind::Maximize),
                AreaKind::Button(ButtonKind::Close),
                AreaKind::Border(ResizeEdge::TOP),
                AreaKind::Border(ResizeEdge::BOTTOM),
                AreaKind::Border(ResizeEdge::LEFT),
                AreaKind::Border(ResizeEdge::RIGHT),
            ]
        );

        assert_eq!(layout.areas()[0].geometry, rect(4, 4, 190, 24));
        assert_eq!(layout.areas()[3].geometry, rect(262, 4, 34, 24));
    }

    #[test]
    fn narrow_frames_drop_buttons_that_do_not_fit() {
        let narrow = layout(50, 100);
        let buttons = narrow
            .areas()
            .iter()
            .filter(|area| matches!(area.kind, AreaKind::Button(_)))
            .count();
        assert_eq!(buttons, 1);

        let narrower = layout(30, 100);
        assert_eq!(narrower.area_at(15, 12).map(|area| area.kind), Some(AreaKind::Title));
    }

    #[test]
    fn non_positive_sizes_have_no_areas() {
        let mut layout = layout(300, 200);
        layout.handle_motion(150, 12);
        layout.resize(0, 200);
        assert!(layout.areas().is_empty());
        assert!(layout.calculate_region().is_empty());
        assert_eq!(layout.state(), InteractionState::Idle);

        layout.resize(-5, -5);
        assert!(layout.areas().is_empty());
        assert_eq!(layout.handle_press_event(true), DecorationAction::None);
    }

    #[test]
    fn region_excludes_the_content() {
        let layout = layout(300, 200);
        let region = layout.calculate_region();
        assert!(region.contains((0, 0)));
        assert!(region.contains((150, 20)));
        assert!(region.contains((299, 199)));
        assert!(!region.contains((150, 100)));
        assert_eq!(region.area(), 300 * 200 - 292 * 168);
    }

    #[test]
    fn leaving_an_armed_button_disarms() {
        let mut layout = layout(300, 200);
        layout.handle_motion(290, 12);
        assert_eq!(layout.handle_press_event(true), DecorationAction::None);
        assert_eq!(layout.state(), InteractionState::Armed(ButtonKind::Close));
        assert_eq!(layout.button_visual(ButtonKind::Close), ButtonVisual::Pressed);

        layout.handle_motion(285, 10);
        assert_eq!(layout.state(), InteractionState::Armed(ButtonKind::Close));

        layout.handle_motion(150, 12);
        assert_eq!(layout.state(), InteractionState::Hovering(AreaKind::Title));
        assert_eq!(layout.handle_press_event(false), DecorationAction::None);
    }

    #[test]
    fn release_elsewhere_fires_nothing() {
        let mut layout = layout(300, 200);
        layout.handle_motion(245, 12);
        layout.handle_press_event(true);
        assert_eq!(layout.state(), InteractionState::Armed(ButtonKind::Maximize));
        layout.handle_motion(150, 100);
        assert_eq!(layout.handle_press_event(false), DecorationAction::None);
        assert_eq!(layout.state(), InteractionState::Idle);
    }

    #[test]
    fn hover_changes_damage_buttons() {
        let mut layout = layout(300, 200);
        layout.handle_motion(150, 12);
        assert!(layout.take_damage().is_empty());

        layout.handle_motion(290, 12);
        assert_eq!(layout.take_damage(), vec![rect(262, 4, 34, 24)]);

        layout.handle_motion(245, 12);
        assert_eq!(
            layout.take_damage(),
            vec![rect(262, 4, 34, 24), rect(228, 4, 34, 24)]
        );
    }

    #[test]
    fn cursor_follows_border_edges() {
        let mut layout = layout(300, 200);
        layout.handle_motion(150, 1);
        assert_eq!(layout.take_cursor_change(), Some(CursorShape::Top));
        layout.handle_motion(151, 2);
        assert_eq!(layout.take_cursor_change(), None);
        layout.handle_motion(1, 1);
        assert_eq!(layout.take_cursor_change(), Some(CursorShape::TopLeft));
        layout.handle_motion(150, 12);
        assert_eq!(layout.take_cursor_change(), Some(CursorShape::Default));
    }

    #[test]
    fn touch_sequence_commits_and_resets() {
        let mut layout = layout(300, 200);
        assert_eq!(layout.touch_down(210, 12), DecorationAction::None);
        assert_eq!(layout.touch_up(), DecorationAction::Minimize);
        assert_eq!(layout.state(), InteractionState::Idle);
    }

    #[test]
    fn button_names_round_trip() {
        assert_eq!(ButtonKind::from_name("Close"), Some(ButtonKind::Close));
        assert_eq!(ButtonKind::from_name("shade"), None);
        assert_eq!(ButtonKind::Maximize.action(), DecorationAction::ToggleMaximize);
    }

    #[test]
    fn region_stays_inside_the_frame_at_every_size() {
        for width in (1..=400).step_by(3) {
            for height in (1..=300).step_by(7) {
                let layout = layout(width, height);
                let region = layout.calculate_region();
                let frame = rect(0, 0, width, height);
                let content = span(4, 28, width - 4, height - 4);

                for piece in region.rects() {
                    assert_eq!(piece.intersection(frame), Some(*piece), "{width}x{height}");
                    if let Some(content) = content {
                        assert!(!piece.overlaps(content), "{width}x{height}: {piece:?}");
                    }
                }

                let content_area =
                    content.map_or(0, |content| i64::from(content.size.w * content.size.h));
                let frame_area = i64::from(width) * i64::from(height);
                assert_eq!(region.area(), frame_area - content_area, "{width}x{height}");

                let areas = Region::from_rects(layout.areas().iter().map(|area| area.geometry));
                let summed: i64 = layout
                    .areas()
                    .iter()
                    .map(|area| i64::from(area.geometry.size.w * area.geometry.size.h))
                    .sum();
                assert_eq!(areas.area(), summed, "{width}x{height}: areas overlap");
                assert_eq!(areas.intersect(&region).area(), region.area(), "{width}x{height}");
            }
        }
    }

    /// Deterministic xorshift stream driving the event sequences below.
    struct Events(u64);

    impl Events {
        fn next(&mut self, bound: i32) -> i32 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            (self.0 % bound as u64) as i32
        }
    }

    #[test]
    fn buttons_arm_only_on_press() {
        let mut layout = layout(300, 200);
        let mut events = Events(0x9e37_79b9_7f4a_7c15);
        let mut pointer = None;
        let mut armed = 0;

        for _ in 0..5000 {
            let before = layout.state();
            let step = events.next(10);
            let mut pressed = false;
            match step {
                0..=5 => {
                    let (x, y) = (events.next(320) - 10, events.next(220) - 10);
                    layout.handle_motion(x, y);
                    pointer = Some((x, y));
                }
                6 => {
                    layout.handle_press_event(true);
                    pressed = true;
                }
                7 => {
                    layout.handle_press_event(false);
                }
                8 => {
                    layout.handle_focus_lost();
                    pointer = None;
                }
                _ => {
                    let (x, y) = (events.next(320) - 10, events.next(220) - 10);
                    layout.touch_down(x, y);
                    pointer = Some((x, y));
                    pressed = true;
                }
            }

            let after = layout.state();
            if let InteractionState::Armed(button) = after {
                if before != after {
                    assert!(pressed, "{before:?} -> {after:?} without a press");
                    armed += 1;
                }
                let (x, y) = pointer.expect("armed without a pointer");
                let hovered = layout.area_at(x, y).map(|area| area.kind);
                assert_eq!(hovered, Some(AreaKind::Button(button)));
            } else if step <= 5 {
                let (x, y) = pointer.expect("motion sets the pointer");
                let expected = layout
                    .area_at(x, y)
                    .map_or(InteractionState::Idle, |area| InteractionState::Hovering(area.kind));
                assert_eq!(after, expected);
            }
        }

        assert!(armed > 0, "sequence never armed a button");
    }

    #[test]
    fn unvalidated_metrics_are_clamped() {
        let config = DecorationConfig {
            border_size: u32::MAX,
            title_height: 2_000_000_000,
            corner_margin: u32::MAX,
            button_aspect_ratio: 1e300,
            ..DecorationConfig::default()
        };
        let metrics = LayoutMetrics::from_config(&config);
        assert_eq!(metrics.border_size, MAX_METRIC as i32);
        assert_eq!(metrics.title_height, MAX_METRIC as i32);
        assert_eq!(metrics.button_width, MAX_METRIC as i32);
        assert!(metrics.slot_width() > metrics.button_width);

        let mut layout = DecorationLayout::new(metrics);
        layout.resize(300, 200);
        assert_eq!(layout.calculate_region().area(), 300 * 200);
    }
}
