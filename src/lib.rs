pub mod action;
pub mod button;
pub mod config;
pub mod edges;
pub mod errors;
pub mod geometry;
pub mod headless;
pub mod layout;
pub mod render_helpers;
pub mod replay;
pub mod signals;
pub mod surface;
pub mod theme;
pub mod window;

pub use errors::{DecorationError, Result};
pub use surface::DecorationSurface;
