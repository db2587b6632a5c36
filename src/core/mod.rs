pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, RenderConfig, SimulationConfig};
pub use error::{LookupError, MapError, MapLoadError, Result};
pub use types::{PixelCoord, PlayerId, RegionId};
