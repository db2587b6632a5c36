//! Conquest Map - territory map regions and composited map images
//!
//! `map` turns a color-coded bitmap plus an adjacency list into immutable
//! region geometry. `render` keeps ownership state and serves the base
//! composite, hover previews and cached attack-arrow overlays. `sim` drives
//! the renderer with random game events.

pub mod core;
pub mod map;
pub mod render;
pub mod sim;
