//! Tile implementations for the imgtools GUI

mod channel_packer;
pub mod pan_zoom;
mod split_preview;
mod splitter;

pub use channel_packer::*;
pub use split_preview::*;
pub use splitter::*;
