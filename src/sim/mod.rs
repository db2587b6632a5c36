//! Demo event source driving the renderer like a running game would

pub mod driver;
pub mod events;

pub use driver::SimulationDriver;
pub use events::{SceneEvent, SceneSink};
