// ABOUTME: Application configuration handling.
// ABOUTME: Loads and saves settings from TOML config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listening port; MPL_PORT overrides at runtime
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

/// Boot/intro sequence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    /// Show the boot intro on first run
    pub show_intro: bool,

    /// Delay between typed characters in milliseconds
    pub typewriter_ms: u64,

    /// Chance per typed character of a transient glitch burst
    pub glitch_frequency: f32,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            show_intro: true,
            typewriter_ms: 25,
            glitch_frequency: 0.1,
        }
    }
}

/// Procedural audio settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Master gain (0.0 = silent, 1.0 = full)
    pub master_volume: f32,

    pub muted: bool,

    /// Render sample rate in Hz
    pub sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            master_volume: 0.3,
            muted: false,
            sample_rate: 44_100,
        }
    }
}

/// Animation engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimConfig {
    /// Target frames per second for the demo frame pump
    pub fps: u32,

    /// Frames rendered by `--demo` before exiting (0 = run until interrupted)
    pub demo_frames: u64,
}

impl Default for AnimConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            demo_frames: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub boot: BootConfig,
    pub audio: AudioConfig,
    pub anim: AnimConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

impl Config {
    /// Get the default config file path (~/.config/multipass-labs/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("multipass-labs").join("config.toml"))
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        Self::default_path()
            .and_then(|path| Self::load(&path).ok())
            .unwrap_or_default()
    }

    /// Save config to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save config to default path
    pub fn save_to_default(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::ReadError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save(&path)?;
        Ok(path)
    }

    /// Listening port with the MPL_PORT environment override applied
    pub fn effective_port(&self) -> u16 {
        std::env::var("MPL_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.server.port = 8080;
        config.audio.muted = true;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.server.port, 8080);
        assert!(loaded.audio.muted);
        assert_eq!(loaded.boot.typewriter_ms, 25);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 4444\n").unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.server.port, 4444);
        assert_eq!(loaded.audio.sample_rate, 44_100);
        assert!(loaded.boot.show_intro);
    }

    #[test]
    fn test_default_path() {
        if let Some(p) = Config::default_path() {
            assert!(p.ends_with("multipass-labs/config.toml"));
        }
    }
}
