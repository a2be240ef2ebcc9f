// ABOUTME: The per-entity background animation variants.
// ABOUTME: Each is a self-contained implementation of the Animation contract.

mod circuit;
mod corrupted_terminal;
mod feedback;
mod flow_field;
mod glitch_grid;
mod hex_waterfall;
mod interference;
mod oscilloscope;
mod rotation;
mod soft_particles;

pub use circuit::Circuit;
pub use corrupted_terminal::CorruptedTerminal;
pub use feedback::FeedbackLoop;
pub use flow_field::FlowField;
pub use glitch_grid::GlitchGrid;
pub use hex_waterfall::HexWaterfall;
pub use interference::WaveInterference;
pub use oscilloscope::Oscilloscope;
pub use rotation::Rotation;
pub use soft_particles::SoftParticles;
