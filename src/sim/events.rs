//! Scene events emitted towards the (external) presentation layer

use serde::{Deserialize, Serialize};

use crate::core::types::{PixelCoord, RegionId};
use crate::render::colors::Color;

/// Instruction for the UI scene; countries are addressed by their centroid
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneEvent {
    AddCountry { region: RegionId, at: PixelCoord },
    SetCountryColor { at: PixelCoord, color: Color },
    SetCountryArmy { at: PixelCoord, armies: u32 },
    AddAttack { attacker: RegionId, defender: RegionId, color: Color },
    ShowAttack { attacker: RegionId, defender: RegionId, color: Color },
    HideAttack { attacker: RegionId, defender: RegionId },
    /// Images changed; the scene should re-request them
    Reload,
}

/// Receiver of scene events
pub trait SceneSink {
    fn emit(&mut self, event: SceneEvent);
}

impl SceneSink for Vec<SceneEvent> {
    fn emit(&mut self, event: SceneEvent) {
        self.push(event);
    }
}
