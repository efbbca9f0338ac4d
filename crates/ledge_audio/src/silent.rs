//! Audio service without a device

use crate::error::Result;
use crate::service::{clamp_volume, AudioService, EffectId};

/// Audio service that plays nothing and remembers what it was asked to do
///
/// Used for headless runs and whenever no output device can be opened.
#[derive(Debug, Clone)]
pub struct SilentAudio {
    /// Paths of loaded effects; `EffectId(n)` is at `n - 1`
    loaded: Vec<String>,
    /// Every non-sentinel play request with its effective volume
    played: Vec<(EffectId, f32)>,
    stop_all_calls: usize,
    music: Option<String>,
    music_volume: f32,
    fx_volume: f32,
}

impl Default for SilentAudio {
    fn default() -> Self {
        Self {
            loaded: Vec::new(),
            played: Vec::new(),
            stop_all_calls: 0,
            music: None,
            music_volume: 1.0,
            fx_volume: 1.0,
        }
    }
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> &[(EffectId, f32)] {
        &self.played
    }

    /// How many times `id` was played
    pub fn play_count(&self, id: EffectId) -> usize {
        self.played.iter().filter(|(played, _)| *played == id).count()
    }

    pub fn stop_all_calls(&self) -> usize {
        self.stop_all_calls
    }

    pub fn current_music(&self) -> Option<&str> {
        self.music.as_deref()
    }

    /// Path an effect was loaded from
    pub fn effect_path(&self, id: EffectId) -> Option<&str> {
        if id.is_unset() {
            return None;
        }
        self.loaded.get(id.0 as usize - 1).map(String::as_str)
    }
}

impl AudioService for SilentAudio {
    fn load_effect(&mut self, path: &str) -> EffectId {
        if path.is_empty() {
            return EffectId::UNSET;
        }
        self.loaded.push(path.to_string());
        EffectId(self.loaded.len() as u32)
    }

    fn play_effect(&mut self, id: EffectId, volume: Option<f32>) {
        if id.is_unset() {
            return;
        }
        let volume = clamp_volume(volume.unwrap_or(1.0)) * self.fx_volume;
        log::trace!("Silent play {} at {:.2}", id, volume);
        self.played.push((id, volume));
    }

    fn stop_all_effects(&mut self) {
        self.stop_all_calls += 1;
    }

    fn play_music(&mut self, path: &str) -> Result<()> {
        self.music = Some(path.to_string());
        Ok(())
    }

    fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = clamp_volume(volume);
    }

    fn set_fx_volume(&mut self, volume: f32) {
        self.fx_volume = clamp_volume(volume);
    }

    fn music_volume(&self) -> f32 {
        self.music_volume
    }

    fn fx_volume(&self) -> f32 {
        self.fx_volume
    }
}
