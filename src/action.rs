use crate::{
    edges::{ResizeEdge, TiledEdges},
    window::{DecoratedWindow, WindowOutput},
};

/// Window-management request produced by decoration input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecorationAction {
    #[default]
    None,
    Move,
    Resize(ResizeEdge),
    Close,
    ToggleMaximize,
    Minimize,
}

impl DecorationAction {
    pub fn execute<W: DecoratedWindow>(self, window: &W) {
        match self {
            DecorationAction::None => {}
            DecorationAction::Move => {
                let accepted = window
                    .output()
                    .is_some_and(|output| output.move_request(window));
                if !accepted {
                    tracing::debug!("move request refused");
                }
            }
            DecorationAction::Resize(edges) => {
                let accepted = window
                    .output()
                    .is_some_and(|output| output.resize_request(window, edges));
                if !accepted {
                    tracing::debug!(edges = edges.bits(), "resize request refused");
                }
            }
            DecorationAction::Close => {
                tracing::info!("Closing decorated window");
                window.close();
            }
            DecorationAction::ToggleMaximize => toggle_maximize(window),
            DecorationAction::Minimize => window.minimize_request(true),
        }
    }
}

fn toggle_maximize<W: DecoratedWindow>(window: &W) {
    let edges = if window.state().tiled_edges.is_empty() {
        TiledEdges::ALL
    } else {
        TiledEdges::empty()
    };
    tracing::debug!(edges = edges.bits(), "toggling maximize");
    window.tile_request(edges);
}
