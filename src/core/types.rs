//! Core type definitions used throughout the codebase

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identifier of a labeled map region (a "country")
///
/// Id 0 is the reserved "no region" sentinel used for unclaimed pixels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct RegionId(pub u16);

impl RegionId {
    /// Sentinel for pixels that belong to no region
    pub const NONE: RegionId = RegionId(0);

    pub fn new(id: u16) -> Self {
        Self(id)
    }

    /// Label derived from a bitmap intensity value (255 is unclaimed)
    pub fn from_intensity(value: u8) -> Self {
        if value == u8::MAX {
            Self::NONE
        } else {
            Self(value as u16)
        }
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a player owning regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// The neutral "nobody" player every region starts with
    pub const NEUTRAL: PlayerId = PlayerId(0);

    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer pixel position on the map bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelCoord {
    pub x: u32,
    pub y: u32,
}

impl PixelCoord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Position as a float vector (pixel corner, not center)
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

impl From<(usize, usize)> for PixelCoord {
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x as u32, y as u32)
    }
}
