//! Edge masks shared between the layout engine and the window contracts.

use bitflags::bitflags;

bitflags! {
    /// Edges affected by an interactive resize.
    ///
    /// Bit values match `xdg_toplevel.resize_edge`, so hosts can forward the
    /// raw bits to a client or a resize grab unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ResizeEdge: u32 {
        const TOP = 0b0001;
        const BOTTOM = 0b0010;
        const LEFT = 0b0100;
        const RIGHT = 0b1000;

        const TOP_LEFT = Self::TOP.bits() | Self::LEFT.bits();
        const BOTTOM_LEFT = Self::BOTTOM.bits() | Self::LEFT.bits();

        const TOP_RIGHT = Self::TOP.bits() | Self::RIGHT.bits();
        const BOTTOM_RIGHT = Self::BOTTOM.bits() | Self::RIGHT.bits();
    }
}

bitflags! {
    /// Edges a window is tiled against.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TiledEdges: u32 {
        const TOP = 0b0001;
        const BOTTOM = 0b0010;
        const LEFT = 0b0100;
        const RIGHT = 0b1000;

        const ALL = Self::TOP.bits() | Self::BOTTOM.bits() | Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

/// Pointer cursor the decoration wants while hovering one of its areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorShape {
    #[default]
    Default,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl CursorShape {
    pub fn from_edges(edges: ResizeEdge) -> Self {
        const SHAPES: [(ResizeEdge, CursorShape); 8] = [
            (ResizeEdge::TOP, CursorShape::Top),
            (ResizeEdge::BOTTOM, CursorShape::Bottom),
            (ResizeEdge::LEFT, CursorShape::Left),
            (ResizeEdge::RIGHT, CursorShape::Right),
            (ResizeEdge::TOP_LEFT, CursorShape::TopLeft),
            (ResizeEdge::TOP_RIGHT, CursorShape::TopRight),
            (ResizeEdge::BOTTOM_LEFT, CursorShape::BottomLeft),
            (ResizeEdge::BOTTOM_RIGHT, CursorShape::BottomRight),
        ];

        SHAPES
            .iter()
            .find(|(candidate, _)| *candidate == edges)
            .map(|(_, shape)| *shape)
            .unwrap_or_default()
    }

    /// Name of the shape in an xcursor theme.
    pub fn name(self) -> &'static str {
        match self {
            CursorShape::Default => "default",
            CursorShape::Top => "top_side",
            CursorShape::Bottom => "bottom_side",
            CursorShape::Left => "left_side",
            CursorShape::Right => "right_side",
            CursorShape::TopLeft => "top_left_corner",
            CursorShape::TopRight => "top_right_corner",
            CursorShape::BottomLeft => "bottom_left_corner",
            CursorShape::BottomRight => "bottom_right_corner",
        }
    }
}
