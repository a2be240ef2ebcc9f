// ABOUTME: Per-frame generative background animations for multipass-labs.
// ABOUTME: A CPU raster surface, the animation contract, and all variants.

pub mod engine;
pub mod glyph;
pub mod surface;
pub mod variants;

pub use engine::{create, Animation, FramePump};
pub use surface::Surface;
