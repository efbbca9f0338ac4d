//! # ledge_input - Input Service
//!
//! Per-key discrete state for gameplay code. Each frame every key reports one
//! of [`KeyState::Idle`], [`KeyState::Down`], [`KeyState::Repeat`] or
//! [`KeyState::Up`], so "pressed this frame" and "held" can be told apart
//! without the caller keeping history.
//!
//! Two sources implement [`InputService`]: [`KeyboardState`] for live
//! devices, and [`ScriptedInput`] which replays a TOML key script.

pub mod key;
pub mod keyboard;
pub mod script;

pub use key::{Key, KeyState};
pub use keyboard::KeyboardState;
pub use script::{InputScript, ScriptStep, ScriptedInput};

use thiserror::Error;

/// Source of per-frame key state
pub trait InputService {
    /// State of `key` for the current frame
    fn key_state(&self, key: Key) -> KeyState;

    /// Advance every key by one frame
    fn poll(&mut self);

    fn is_down(&self, key: Key) -> bool {
        self.key_state(key) == KeyState::Down
    }

    fn is_repeat(&self, key: Key) -> bool {
        self.key_state(key) == KeyState::Repeat
    }

    fn is_held(&self, key: Key) -> bool {
        self.key_state(key).is_held()
    }

    /// A finite source has nothing left to replay
    fn is_finished(&self) -> bool {
        false
    }
}

/// Input script errors
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read input script {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse input script: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, InputError>;

pub mod prelude {
    pub use crate::key::{Key, KeyState};
    pub use crate::keyboard::KeyboardState;
    pub use crate::script::{InputScript, ScriptStep, ScriptedInput};
    pub use crate::InputService;
}
