// ABOUTME: Offline procedural audio for multipass-labs boot and UI cues.
// ABOUTME: Deterministic synthesis into f32 PCM, no platform audio stack.

pub mod engine;
pub mod synth;

pub use engine::{AudioEngine, EntityToneParams};
pub use synth::{Biquad, Envelope, Oscillator, Waveform};
