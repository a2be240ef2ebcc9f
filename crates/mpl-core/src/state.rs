// ABOUTME: Client-persisted state flags for the boot/intro sequence.
// ABOUTME: Stores a small versioned JSON file under the state directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Flags that survive between runs. Gate whether the first-visit
/// boot intro plays again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientState {
    pub version: u32,
    pub intro_seen: bool,
}

impl ClientState {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            intro_seen: false,
        }
    }

    /// Get the default state file path (~/.local/state/multipass-labs/state.json)
    pub fn default_path() -> Option<PathBuf> {
        // Use state_dir on macOS/Linux, fall back to data_local_dir
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .map(|p| p.join("multipass-labs").join("state.json"))
    }

    /// Save state to disk
    pub fn save(&self, path: &std::path::Path) -> Result<(), StateError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Save state to default path
    pub fn save_to_default(&self) -> Result<PathBuf, StateError> {
        let path = Self::default_path().ok_or(StateError::NoStatePath)?;
        self.save(&path)?;
        Ok(path)
    }

    /// Load state from disk
    pub fn load(path: &std::path::Path) -> Result<Self, StateError> {
        let json = std::fs::read(path)?;
        let state: ClientState = serde_json::from_slice(&json)?;

        // Version check - for future compatibility
        if state.version > Self::CURRENT_VERSION {
            return Err(StateError::UnsupportedVersion(state.version));
        }

        Ok(state)
    }

    /// Load state from default path, returns fresh state if not found or invalid
    pub fn load_or_new() -> Self {
        Self::default_path()
            .and_then(|path| Self::load(&path).ok())
            .unwrap_or_else(Self::new)
    }

    /// Delete the state file
    pub fn clear_default() -> Result<(), StateError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

impl Default for ClientState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not determine state directory")]
    NoStatePath,

    #[error("Unsupported state version: {0}")]
    UnsupportedVersion(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut state = ClientState::new();
        state.intro_seen = true;
        state.save(&path).unwrap();

        let loaded = ClientState::load(&path).unwrap();
        assert_eq!(loaded.version, ClientState::CURRENT_VERSION);
        assert!(loaded.intro_seen);
    }

    #[test]
    fn test_future_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"version": 99, "intro_seen": false}"#).unwrap();

        assert!(matches!(
            ClientState::load(&path),
            Err(StateError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn test_default_path() {
        if let Some(p) = ClientState::default_path() {
            assert!(p.ends_with("multipass-labs/state.json"));
        }
    }
}
