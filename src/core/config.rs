//! Renderer and driver configuration
//!
//! Every field has a default, so a TOML file only needs the keys it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{MapError, Result};
use crate::render::colors::{Color, BACKGROUND, NEUTRAL};

/// Shading and geometry parameters for the composite renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Fill for pixels that belong to no region
    pub background_color: Color,

    /// Display color of the neutral player (owner of every region at start)
    pub neutral_color: Color,

    /// Darkening factor for region border pixels
    ///
    /// Percent, same scale as `QColor::darker`: 200 halves the HSV value.
    pub border_darken: u32,

    /// Lightening factor for region interiors in the base image
    ///
    /// Percent, same scale as `QColor::lighter`: 125 raises HSV value by 25%.
    pub normal_lighten: u32,

    /// Lightening factor for the hovered region in a hover preview
    pub hover_lighten: u32,

    /// Half-width of an attack arrow's base, in pixels
    pub arrow_radius: f32,

    /// Outline drawn around attack arrows; `None` draws fill only
    pub arrow_outline: Option<Color>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background_color: BACKGROUND,
            neutral_color: NEUTRAL,
            border_darken: 200,
            normal_lighten: 125,
            hover_lighten: 170,
            arrow_radius: 8.0,
            arrow_outline: Some(Color::BLACK),
        }
    }
}

impl RenderConfig {
    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.border_darken == 0 {
            return Err("border_darken must be positive".into());
        }

        if self.normal_lighten < 100 || self.hover_lighten < 100 {
            return Err(format!(
                "lighten factors must be >= 100 (normal {}, hover {})",
                self.normal_lighten, self.hover_lighten
            ));
        }

        if self.hover_lighten < self.normal_lighten {
            return Err(format!(
                "hover_lighten ({}) should be >= normal_lighten ({})",
                self.hover_lighten, self.normal_lighten
            ));
        }

        if !self.arrow_radius.is_finite() || self.arrow_radius <= 0.0 {
            return Err(format!("arrow_radius ({}) must be positive", self.arrow_radius));
        }

        Ok(())
    }
}

/// Parameters for the random event driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the driver's RNG; random when absent
    pub seed: Option<u64>,

    /// Colors of players 1..=N, in order
    pub player_colors: Vec<Color>,

    /// Upper bound of the army count handed out at setup
    pub max_initial_army: u32,

    /// Upper bound of army counts rolled during ticks
    pub max_army: u32,

    /// Delay between ticks when driven by a timer
    pub tick_interval_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            player_colors: vec![Color::GREEN, Color::RED, Color::BLUE],
            max_initial_army: 20,
            max_army: 99,
            tick_interval_ms: 300,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.player_colors.is_empty() {
            return Err("at least one player color is required".into());
        }

        if self.max_initial_army == 0 || self.max_army == 0 {
            return Err("army bounds must be at least 1".into());
        }

        Ok(())
    }
}

/// Whole-application configuration as read from a TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub render: RenderConfig,
    pub simulation: SimulationConfig,
}

impl AppConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.render.validate().map_err(MapError::Invalid)?;
        self.simulation.validate().map_err(MapError::Invalid)?;
        Ok(())
    }
}
