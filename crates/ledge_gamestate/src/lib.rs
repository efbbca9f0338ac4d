//! Ledge GameState - Checkpoints
//!
//! In-memory checkpoint state for a level. Checkpoints are registered from
//! the map, found by proximity, and activated as the player reaches them.
//!
//! # Example
//!
//! ```ignore
//! use ledge_gamestate::prelude::*;
//!
//! let mut checkpoints = CheckpointSet::new();
//! checkpoints.register(Checkpoint::new("cave").with_position(Vec2::new(640.0, 480.0)));
//!
//! if let Some(found) = checkpoints.find_nearest(player_pos, 48.0) {
//!     checkpoints.activate(&found.id);
//! }
//! ```

pub mod checkpoint;

pub mod prelude {
    pub use crate::checkpoint::{Checkpoint, CheckpointProvider, CheckpointSet};
}

pub use prelude::*;
