//! What a decoration needs from the window it frames and the output that
//! window lives on.
//!
//! Hosts implement these on their own cheap, clonable window handles; every
//! method takes `&self`, so any mutable state sits behind the handle.

use smithay::utils::{Logical, Rectangle};

use crate::{
    edges::{CursorShape, ResizeEdge, TiledEdges},
    signals::{SignalKind, SubscriptionId, WindowSignal},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowState {
    pub fullscreen: bool,
    pub tiled_edges: TiledEdges,
    pub minimized: bool,
    pub sticky: bool,
}

pub trait WindowOutput<W> {
    /// Starts an interactive move. `false` means the output refused it.
    fn move_request(&self, window: &W) -> bool;

    /// Starts an interactive resize on `edges`. `false` means refused.
    fn resize_request(&self, window: &W, edges: ResizeEdge) -> bool;

    fn set_cursor(&self, cursor: CursorShape);
}

pub trait DecoratedWindow: Sized {
    type Output: WindowOutput<Self>;

    /// Window-managed geometry, without decorations.
    fn wm_geometry(&self) -> Rectangle<i32, Logical>;
    fn state(&self) -> WindowState;
    fn title(&self) -> String;
    fn output(&self) -> Option<Self::Output>;

    fn close(&self);
    fn tile_request(&self, edges: TiledEdges);
    fn minimize_request(&self, minimized: bool);

    /// Damages the whole window, decoration included.
    fn damage(&self);
    /// Damages `rect`, given relative to the window's content origin.
    fn damage_rect(&self, rect: Rectangle<i32, Logical>);

    fn connect_signal(&self, kind: SignalKind) -> SubscriptionId;
    fn disconnect_signal(&self, id: SubscriptionId);
    fn take_signals(&self, id: SubscriptionId) -> Vec<WindowSignal>;
    fn emit_signal(&self, signal: WindowSignal);

    /// Records whether a decoration currently occupies the window's slot.
    fn set_decoration_attached(&self, attached: bool);
}
