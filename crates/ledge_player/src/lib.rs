//! # ledge_player - Player Controller
//!
//! The platformer's core: jump and double-jump gating, dash with cooldown,
//! one-way-platform landing, fall and hazard death, checkpoint respawn, and
//! a camera that follows the physics-resolved position.
//!
//! ## Frame order
//!
//! ```text
//! input ──► PlayerController::update ──► PhysicsWorld::step ──► post_update
//!                 (stage velocity)        (collision callbacks)  (sync + camera)
//! ```
//!
//! The controller never owns its body. It reaches physics, input, audio and
//! checkpoints through the [`FrameContext`] handed to it each frame.

pub mod animation;
pub mod camera;
pub mod config;
pub mod controller;
pub mod error;
pub mod state;

pub use animation::{AnimationClip, AnimationSet};
pub use camera::{camera_offset, Camera};
pub use config::{
    AnimationConfig, ClipConfig, ConfigError, ConfigResult, MovementConfig, PlayerAudioConfig,
    PlayerConfig, TextureConfig,
};
pub use controller::{CollisionResponse, FrameContext, PlayerController, Sprite};
pub use error::{PlayerError, Result};
pub use state::{Dash, Direction, Footing, JumpPhase, Outcome, PlayerState, Trigger};

pub mod prelude {
    pub use crate::camera::Camera;
    pub use crate::config::{MovementConfig, PlayerConfig};
    pub use crate::controller::{CollisionResponse, FrameContext, PlayerController};
    pub use crate::error::{PlayerError, Result};
    pub use crate::state::PlayerState;
}
