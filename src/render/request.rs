//! Image requests served by the composite renderer
//!
//! The UI addresses images by textual ids such as `background`,
//! `background 120 48` or `attack 3 7 #00ff00`. Those ids are parsed once at
//! the boundary into [`ImageRequest`]; the renderer only sees the enum.

use std::str::FromStr;

use crate::core::error::LookupError;
use crate::core::types::{PixelCoord, RegionId};
use crate::render::colors::Color;

/// Which image the UI wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageRequest {
    /// The composite map, optionally previewing a hover highlight
    Background { hover: Option<PixelCoord> },
    /// Arrow overlay from `attacker` to `defender` drawn in `color`
    Attack {
        attacker: RegionId,
        defender: RegionId,
        color: Color,
    },
}

impl ImageRequest {
    pub fn background() -> Self {
        Self::Background { hover: None }
    }

    pub fn hover(x: u32, y: u32) -> Self {
        Self::Background {
            hover: Some(PixelCoord::new(x, y)),
        }
    }

    pub fn attack(attacker: RegionId, defender: RegionId, color: Color) -> Self {
        Self::Attack {
            attacker,
            defender,
            color,
        }
    }
}

impl std::fmt::Display for ImageRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Background { hover: None } => write!(f, "background"),
            Self::Background { hover: Some(p) } => write!(f, "background {} {}", p.x, p.y),
            Self::Attack {
                attacker,
                defender,
                color,
            } => write!(f, "attack {} {} {}", attacker, defender, color),
        }
    }
}

impl FromStr for ImageRequest {
    type Err = LookupError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        let malformed = || LookupError::MalformedRequest(id.to_string());
        let mut parts = id.split_whitespace();

        match parts.next() {
            Some("background") => {
                let hover = match (parts.next(), parts.next()) {
                    (None, _) => None,
                    (Some(x), Some(y)) => Some(PixelCoord::new(
                        x.parse().map_err(|_| malformed())?,
                        y.parse().map_err(|_| malformed())?,
                    )),
                    (Some(_), None) => return Err(malformed()),
                };
                if parts.next().is_some() {
                    return Err(malformed());
                }
                Ok(Self::Background { hover })
            }
            Some("attack") => {
                let (Some(attacker), Some(defender), Some(color), None) =
                    (parts.next(), parts.next(), parts.next(), parts.next())
                else {
                    return Err(malformed());
                };
                Ok(Self::Attack {
                    attacker: RegionId(attacker.parse().map_err(|_| malformed())?),
                    defender: RegionId(defender.parse().map_err(|_| malformed())?),
                    color: Color::from_hex(color).ok_or_else(malformed)?,
                })
            }
            _ => Err(malformed()),
        }
    }
}
