//! Player controller errors

use ledge_physics::PhysicsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    /// The controller was driven before its body was created
    #[error("Player has no physics body")]
    BodyMissing,

    #[error(transparent)]
    Physics(#[from] PhysicsError),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
