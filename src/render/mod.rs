//! Map rendering: the base ownership composite, hover previews and
//! attack-arrow overlays.
//!
//! Single writer: all mutation goes through `&mut CompositeRenderer`.
//! Readers get either a borrow of the base image, a private copy, or an
//! `Arc` snapshot of an overlay.

pub mod colors;
pub mod composite;
pub mod raster;
pub mod request;

pub use colors::Color;
pub use composite::{CompositeRenderer, MapImage, OverlayKey};
pub use request::ImageRequest;
