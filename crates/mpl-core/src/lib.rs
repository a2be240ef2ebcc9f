// ABOUTME: Shared types and configuration for multipass-labs.
// ABOUTME: Defines colors, lab entities, locales, and config file handling.

pub mod color;
pub mod config;
pub mod entity;
pub mod locale;
pub mod state;

pub use color::Color;
pub use config::{AnimConfig, AudioConfig, BootConfig, Config, ServerConfig};
pub use entity::{string_hash, AnimationKind, LabEntity};
pub use locale::Locale;
pub use state::ClientState;
