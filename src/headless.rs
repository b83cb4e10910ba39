//! In-memory window and output that record everything a decoration asks of
//! them. Backs the replay tool and the tests.

use std::{cell::RefCell, rc::Rc};

use smithay::utils::{Logical, Rectangle};

use crate::{
    edges::{CursorShape, ResizeEdge, TiledEdges},
    signals::{SignalHub, SignalKind, SubscriptionId, WindowSignal},
    window::{DecoratedWindow, WindowOutput, WindowState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRequest {
    Close,
    Tile(TiledEdges),
    Minimize(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputRequest {
    Move,
    Resize(ResizeEdge),
    Cursor(CursorShape),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowDamage {
    Full,
    Rect(Rectangle<i32, Logical>),
}

#[derive(Debug)]
struct OutputInner {
    accepts_requests: bool,
    requests: Vec<OutputRequest>,
}

#[derive(Debug, Clone)]
pub struct HeadlessOutput {
    inner: Rc<RefCell<OutputInner>>,
}

impl Default for HeadlessOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessOutput {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(OutputInner {
                accepts_requests: true,
                requests: Vec::new(),
            })),
        }
    }

    /// Makes the output refuse (or accept again) move and resize requests.
    pub fn set_accepts_requests(&self, accepts: bool) {
        self.inner.borrow_mut().accepts_requests = accepts;
    }

    pub fn take_requests(&self) -> Vec<OutputRequest> {
        std::mem::take(&mut self.inner.borrow_mut().requests)
    }

    fn grab_request(&self, request: OutputRequest) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.accepts_requests {
            inner.requests.push(request);
        }
        inner.accepts_requests
    }
}

impl WindowOutput<HeadlessWindow> for HeadlessOutput {
    fn move_request(&self, _window: &HeadlessWindow) -> bool {
        self.grab_request(OutputRequest::Move)
    }

    fn resize_request(&self, _window: &HeadlessWindow, edges: ResizeEdge) -> bool {
        self.grab_request(OutputRequest::Resize(edges))
    }

    fn set_cursor(&self, cursor: CursorShape) {
        self.inner
            .borrow_mut()
            .requests
            .push(OutputRequest::Cursor(cursor));
    }
}

#[derive(Debug)]
struct WindowInner {
    geometry: Rectangle<i32, Logical>,
    state: WindowState,
    title: String,
    output: Option<HeadlessOutput>,
    decoration_attached: bool,
    requests: Vec<WindowRequest>,
    damage: Vec<WindowDamage>,
    signals: SignalHub,
    emitted: Vec<WindowSignal>,
}

#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    inner: Rc<RefCell<WindowInner>>,
}

impl HeadlessWindow {
    /// Window with content `geometry`, living on `output`.
    pub fn new(
        title: impl Into<String>,
        geometry: Rectangle<i32, Logical>,
        output: Option<HeadlessOutput>,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(WindowInner {
                geometry,
                state: WindowState::default(),
                title: title.into(),
                output,
                decoration_attached: false,
                requests: Vec::new(),
                damage: Vec::new(),
                signals: SignalHub::new(),
                emitted: Vec::new(),
            })),
        }
    }

    pub fn set_title(&self, title: impl Into<String>) {
        let mut inner = self.inner.borrow_mut();
        inner.title = title.into();
        inner.signals.emit(WindowSignal::TitleChanged);
    }

    pub fn set_geometry(&self, geometry: Rectangle<i32, Logical>) {
        self.inner.borrow_mut().geometry = geometry;
    }

    pub fn set_fullscreen(&self, fullscreen: bool) {
        self.inner.borrow_mut().state.fullscreen = fullscreen;
    }

    pub fn take_requests(&self) -> Vec<WindowRequest> {
        std::mem::take(&mut self.inner.borrow_mut().requests)
    }

    pub fn take_damage(&self) -> Vec<WindowDamage> {
        std::mem::take(&mut self.inner.borrow_mut().damage)
    }

    /// Signals the decoration emitted on this window.
    pub fn take_emitted(&self) -> Vec<WindowSignal> {
        std::mem::take(&mut self.inner.borrow_mut().emitted)
    }

    pub fn subscribers(&self, kind: SignalKind) -> usize {
        self.inner.borrow().signals.subscribers(kind)
    }

    pub fn decoration_attached(&self) -> bool {
        self.inner.borrow().decoration_attached
    }
}

impl DecoratedWindow for HeadlessWindow {
    type Output = HeadlessOutput;

    fn wm_geometry(&self) -> Rectangle<i32, Logical> {
        self.inner.borrow().geometry
    }

    fn state(&self) -> WindowState {
        self.inner.borrow().state
    }

    fn title(&self) -> String {
        self.inner.borrow().title.clone()
    }

    fn output(&self) -> Option<HeadlessOutput> {
        self.inner.borrow().output.clone()
    }

    fn close(&self) {
        self.inner.borrow_mut().requests.push(WindowRequest::Close);
    }

    fn tile_request(&self, edges: TiledEdges) {
        let mut inner = self.inner.borrow_mut();
        inner.state.tiled_edges = edges;
        inner.requests.push(WindowRequest::Tile(edges));
    }

    fn minimize_request(&self, minimized: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.state.minimized = minimized;
        inner.requests.push(WindowRequest::Minimize(minimized));
    }

    fn damage(&self) {
        self.inner.borrow_mut().damage.push(WindowDamage::Full);
    }

    fn damage_rect(&self, rect: Rectangle<i32, Logical>) {
        self.inner.borrow_mut().damage.push(WindowDamage::Rect(rect));
    }

    fn connect_signal(&self, kind: SignalKind) -> SubscriptionId {
        self.inner.borrow_mut().signals.subscribe(kind)
    }

    fn disconnect_signal(&self, id: SubscriptionId) {
        self.inner.borrow_mut().signals.unsubscribe(id);
    }

    fn take_signals(&self, id: SubscriptionId) -> Vec<WindowSignal> {
        self.inner.borrow_mut().signals.take(id)
    }

    fn emit_signal(&self, signal: WindowSignal) {
        let mut inner = self.inner.borrow_mut();
        inner.signals.emit(signal.clone());
        inner.emitted.push(signal);
    }

    fn set_decoration_attached(&self, attached: bool) {
        self.inner.borrow_mut().decoration_attached = attached;
    }
}
