//! Ledge Audio - Audio Service
//!
//! Sound effects and background music behind the [`AudioService`] trait.
//!
//! # Features
//!
//! - Effects loaded once and addressed by [`EffectId`]
//! - Looping background music
//! - Independent effect and music volumes, clamped to 0..1
//! - A silent implementation for headless runs
//!
//! # Example
//!
//! ```ignore
//! use ledge_audio::prelude::*;
//!
//! let mut audio = open_default();
//! let jump = audio.load_effect("assets/audio/jump.wav");
//! audio.play_effect(jump, None);
//! audio.play_music("assets/audio/theme.ogg")?;
//! ```

pub mod error;
pub mod rodio_backend;
pub mod service;
pub mod silent;

pub use error::{AudioError, Result};
pub use rodio_backend::RodioAudio;
pub use service::{clamp_volume, AudioService, EffectId};
pub use silent::SilentAudio;

/// Open the default output device, falling back to [`SilentAudio`] when
/// none is available
pub fn open_default() -> Box<dyn AudioService> {
    match RodioAudio::new() {
        Ok(audio) => Box::new(audio),
        Err(e) => {
            log::warn!("{}; continuing without sound", e);
            Box::new(SilentAudio::new())
        }
    }
}

pub mod prelude {
    pub use crate::error::{AudioError, Result};
    pub use crate::open_default;
    pub use crate::rodio_backend::RodioAudio;
    pub use crate::service::{AudioService, EffectId};
    pub use crate::silent::SilentAudio;
}
