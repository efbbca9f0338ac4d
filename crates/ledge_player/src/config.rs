//! Player configuration
//!
//! Loaded from a TOML document. Every section and field is optional. Missing
//! gameplay values (spawn, speeds, dash timings, sprite size) are zero, while
//! the tuning constants in [`MovementConfig`] keep their defaults.
//!
//! ```toml
//! position = { x = 100.0, y = 500.0 }
//!
//! [movement]
//! speed = 4.0
//! jump_force = 2.5
//! dash_force = 10.0
//! dash_duration = 200.0
//! dash_cooldown = 500.0
//!
//! [texture]
//! path = "assets/textures/player.png"
//! width = 32
//! height = 32
//!
//! [audio]
//! pickup_fx = "assets/audio/coin.wav"
//! ```

use ledge_math::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Movement tuning; durations and timers are in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Horizontal run speed
    pub speed: f32,
    /// Upward impulse of the first jump
    pub jump_force: f32,
    /// Horizontal dash velocity
    pub dash_force: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    /// Pixels below the map bottom at which the player dies
    pub fall_margin: f32,
    /// Time spent dead before respawning
    pub respawn_delay: f32,
    /// Pixels within which a checkpoint is reached
    pub checkpoint_radius: f32,
    /// Pixels the player center must be above a one-way platform's center
    /// for a contact to count as landing
    pub one_way_landing_margin: f32,
    /// Double jump sets vertical velocity to `-jump_force * factor`
    pub double_jump_velocity_factor: f32,
    /// Extra upward impulse on double jump, as a fraction of `jump_force`
    pub double_jump_impulse_factor: f32,
    /// Dash impulse, as a fraction of `dash_force`
    pub dash_impulse_factor: f32,
    /// God mode flight speed multiplier
    pub god_speed_factor: f32,
    /// Where the debug teleport key sends the player
    pub teleport_position: Vec2,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 0.0,
            jump_force: 0.0,
            dash_force: 0.0,
            dash_duration: 0.0,
            dash_cooldown: 0.0,
            fall_margin: 100.0,
            respawn_delay: 1500.0,
            checkpoint_radius: 48.0,
            one_way_landing_margin: 8.0,
            double_jump_velocity_factor: 1.8,
            double_jump_impulse_factor: 0.3,
            dash_impulse_factor: 0.5,
            god_speed_factor: 2.0,
            teleport_position: Vec2::new(96.0, 96.0),
        }
    }
}

/// Sprite sheet and on-screen size
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub path: String,
    pub width: i32,
    pub height: i32,
}

/// A named clip cut from consecutive tiles of the sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipConfig {
    pub name: String,
    /// Tile index of the first frame, counting row-major from 0
    pub first_tile: u32,
    pub frame_count: u32,
    /// Milliseconds per frame
    pub frame_duration: f32,
    pub looping: bool,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            first_tile: 0,
            frame_count: 1,
            frame_duration: 100.0,
            looping: true,
        }
    }
}

impl ClipConfig {
    pub fn new(name: impl Into<String>, first_tile: u32, frame_count: u32) -> Self {
        Self {
            name: name.into(),
            first_tile,
            frame_count,
            ..Default::default()
        }
    }
}

/// Tileset grid and the clips cut from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub tile_width: i32,
    pub tile_height: i32,
    /// Tiles per row
    pub columns: u32,
    pub clips: Vec<ClipConfig>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tile_width: 32,
            tile_height: 32,
            columns: 11,
            clips: vec![
                ClipConfig::new("idle", 0, 11),
                ClipConfig::new("move", 11, 11),
                ClipConfig::new("jump", 22, 11),
            ],
        }
    }
}

/// Effect paths; empty means no sound
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerAudioConfig {
    pub pickup_fx: String,
    pub jump_fx: String,
    pub death_fx: String,
}

/// Everything needed to spawn the player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Initial spawn position in pixels
    pub position: Vec2,
    pub movement: MovementConfig,
    pub texture: TextureConfig,
    pub animations: AnimationConfig,
    pub audio: PlayerAudioConfig,
}

impl PlayerConfig {
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and parse a player config from a file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a player config, logging and falling back to defaults on failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Player config loaded from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!(
                    "Failed to load player config {}: {}; using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.texture.width < 0 || self.texture.height < 0 {
            return Err(ConfigError::Validation(format!(
                "texture size must not be negative, got {}x{}",
                self.texture.width, self.texture.height
            )));
        }
        let m = &self.movement;
        if m.dash_duration < 0.0 || m.dash_cooldown < 0.0 || m.respawn_delay < 0.0 {
            return Err(ConfigError::Validation(
                "dash and respawn timings must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Collider radius derived from the sprite width, at least one pixel
    pub fn body_radius(&self) -> i32 {
        (self.texture.width / 2).max(1)
    }
}
