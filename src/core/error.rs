use thiserror::Error;

use crate::core::types::{PlayerId, RegionId};
use crate::render::colors::Color;

/// Failure while building a map from its bitmap and adjacency list.
///
/// Every variant is fatal: no partially constructed map is handed out.
#[derive(Error, Debug)]
pub enum MapLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bitmap could not be decoded: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Bitmap is empty ({width}x{height})")]
    EmptyBitmap { width: usize, height: usize },

    #[error("Bitmap contains no labeled regions")]
    NoRegions,

    #[error("Adjacency line {line}: {reason}")]
    MalformedAdjacency { line: usize, reason: String },

    #[error("Adjacency line {line} references region {id}, outside 1..={countries}")]
    RegionOutOfRange { line: usize, id: u32, countries: u16 },
}

/// Query that the renderer cannot answer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("No attack overlay cached for {attacker} -> {defender} in {color}")]
    MissingOverlay {
        attacker: RegionId,
        defender: RegionId,
        color: Color,
    },

    #[error("Unknown region: {0}")]
    UnknownRegion(RegionId),

    #[error("No color assigned to player {0}")]
    UnknownPlayer(PlayerId),

    #[error("Malformed image request: {0}")]
    MalformedRequest(String),
}

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Map load error: {0}")]
    Load(#[from] MapLoadError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;
