//! Game configuration
//!
//! ```toml
//! [engine]
//! title = "Ledge"
//! target_frame_rate = 60
//! frames = 600
//!
//! [viewport]
//! width = 1280
//! height = 720
//!
//! [paths]
//! player = "assets/player.toml"
//! map = "assets/map.toml"
//! input_script = "assets/script.toml"
//!
//! [audio]
//! music = "assets/audio/theme.ogg"
//! music_volume = 0.5
//! fx_volume = 1.0
//!
//! [physics]
//! gravity = [0.0, 10.0]
//! pixels_per_meter = 50.0
//! ```

use ledge_physics::PhysicsConfig;
use ledge_player::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Frame pacing and run length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub title: String,
    /// Frames per second; the fixed frame delta is `1000 / target_frame_rate` ms
    pub target_frame_rate: u32,
    /// Frames to run headless; 0 runs until the input script ends
    pub frames: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Ledge".to_string(),
            target_frame_rate: 60,
            frames: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Other documents the game loads; relative paths resolve against the
/// directory of the game config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub player: String,
    pub map: String,
    pub input_script: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Looping background music; empty for none
    pub music: String,
    pub music_volume: f32,
    pub fx_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music: String::new(),
            music_volume: 0.5,
            fx_volume: 1.0,
        }
    }
}

/// Top-level game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub engine: EngineConfig,
    pub viewport: ViewportConfig,
    pub paths: PathsConfig,
    pub audio: AudioConfig,
    pub physics: PhysicsConfig,
    /// Write a JSON trace of every frame here when set
    pub trace_path: Option<String>,
    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl GameConfig {
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Load the game config, logging and falling back to defaults on failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded game config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!(
                    "Failed to load game config {}: {}; using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.viewport.width <= 0 || self.viewport.height <= 0 {
            return Err(ConfigError::Validation(format!(
                "viewport must be positive, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        self.physics
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }

    /// Fixed frame delta in milliseconds
    pub fn frame_delta(&self) -> f32 {
        1000.0 / self.frame_rate() as f32
    }

    /// Configured frame rate; zero means the default
    pub fn frame_rate(&self) -> u32 {
        if self.engine.target_frame_rate == 0 {
            EngineConfig::default().target_frame_rate
        } else {
            self.engine.target_frame_rate
        }
    }

    /// Resolve a configured path against the config's directory; `None`
    /// when the path is empty
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        if path.is_empty() {
            return None;
        }
        let path = Path::new(path);
        Some(if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        })
    }

    pub fn trace_path(&self) -> Option<PathBuf> {
        self.trace_path.as_deref().and_then(|p| self.resolve(p))
    }
}
