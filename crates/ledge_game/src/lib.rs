//! # ledge_game - Ledge Game
//!
//! Everything around the player controller that turns the workspace into a
//! runnable game: configuration documents, the level built from a map, the
//! collision router that hands contacts to entities, texture bookkeeping and
//! the [`Engine`] that drives the frame pipeline.
//!
//! ## Example
//!
//! ```ignore
//! use ledge_game::prelude::*;
//!
//! let config = GameConfig::load_or_default("assets/game.toml");
//! let input = Box::new(ScriptedInput::new(InputScript::load("assets/script.toml")?));
//! let mut engine = Engine::new(config, input, ledge_audio::open_default());
//! engine.awake()?;
//! engine.start()?;
//! let summary = engine.run()?;
//! engine.clean_up()?;
//! ```

pub mod config;
pub mod engine;
pub mod level;
pub mod textures;

pub use config::{AudioConfig, EngineConfig, GameConfig, PathsConfig, ViewportConfig};
pub use engine::{Engine, EngineError, FrameSample, FrameStats, RunSummary, CAPPED_FRAME_RATE};
pub use level::{CollisionRouter, Entity, Level, LevelError, LevelMap, MapProvider, Marker};
pub use textures::{TextureError, TextureHandle, TextureInfo, TextureService};

pub mod prelude {
    pub use crate::config::GameConfig;
    pub use crate::engine::{Engine, EngineError, RunSummary};
    pub use crate::level::{Level, LevelMap, MapProvider};
    pub use ledge_input::{InputScript, ScriptedInput};
}
