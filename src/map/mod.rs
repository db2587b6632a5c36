//! Map geometry: labeled regions extracted from a bitmap

pub mod adjacency;
pub mod grid;
pub mod loader;
pub mod region_map;
pub mod walker;

pub use adjacency::{parse_adjacency, AdjacencyEntry, AdjacencyTable};
pub use grid::{Grid, PixelGrid};
pub use region_map::{Region, RegionMap};
