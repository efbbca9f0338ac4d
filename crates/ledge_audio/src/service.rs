//! Audio service contract

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a loaded sound effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EffectId(pub u32);

impl EffectId {
    /// No effect loaded; playing it does nothing
    pub const UNSET: EffectId = EffectId(0);

    #[inline]
    pub const fn is_unset(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unset() {
            write!(f, "fx(unset)")
        } else {
            write!(f, "fx#{}", self.0)
        }
    }
}

/// Clamp a volume to the 0..1 range, treating NaN as silence
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Sound effect and music playback
pub trait AudioService {
    /// Load a sound effect. Empty paths and load failures yield
    /// [`EffectId::UNSET`]; failures are logged.
    fn load_effect(&mut self, path: &str) -> EffectId;

    /// Play a loaded effect, scaled by `volume` (default 1.0) and the
    /// effects volume. Playing [`EffectId::UNSET`] is a no-op.
    fn play_effect(&mut self, id: EffectId, volume: Option<f32>);

    /// Stop every effect currently playing; music keeps going
    fn stop_all_effects(&mut self);

    /// Start looping background music, replacing any current track
    fn play_music(&mut self, path: &str) -> Result<()>;

    fn set_music_volume(&mut self, volume: f32);

    fn set_fx_volume(&mut self, volume: f32);

    fn music_volume(&self) -> f32;

    fn fx_volume(&self) -> f32;
}
