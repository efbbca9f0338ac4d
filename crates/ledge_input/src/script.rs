//! Scripted input for headless runs

use crate::key::{Key, KeyState};
use crate::keyboard::KeyboardState;
use crate::{InputError, InputService, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One run of identical frames in a script
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptStep {
    /// Number of frames to hold `keys`
    pub frames: u32,
    /// Keys physically pressed during those frames
    pub keys: Vec<Key>,
}

impl ScriptStep {
    pub fn hold(frames: u32, keys: &[Key]) -> Self {
        Self {
            frames,
            keys: keys.to_vec(),
        }
    }

    pub fn idle(frames: u32) -> Self {
        Self {
            frames,
            keys: Vec::new(),
        }
    }
}

/// A per-frame key script
///
/// ```toml
/// [[steps]]
/// frames = 30
/// keys = ["d"]
///
/// [[steps]]
/// frames = 1
/// keys = ["d", "space"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputScript {
    pub steps: Vec<ScriptStep>,
}

impl InputScript {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| InputError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&source)
    }

    /// Total frames covered by the script
    pub fn frame_count(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.frames)).sum()
    }
}

/// Replays an [`InputScript`], one frame per [`InputService::poll`]
///
/// Once the script is exhausted every key is released.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    script: InputScript,
    step: usize,
    frame_in_step: u32,
    keyboard: KeyboardState,
}

impl ScriptedInput {
    pub fn new(script: InputScript) -> Self {
        Self {
            script,
            ..Default::default()
        }
    }

    /// Keys the script presses on the next poll
    fn next_keys(&mut self) -> Vec<Key> {
        while let Some(step) = self.script.steps.get(self.step) {
            if self.frame_in_step < step.frames {
                self.frame_in_step += 1;
                return step.keys.clone();
            }
            self.step += 1;
            self.frame_in_step = 0;
        }
        Vec::new()
    }
}

impl InputService for ScriptedInput {
    fn key_state(&self, key: Key) -> KeyState {
        self.keyboard.key_state(key)
    }

    fn poll(&mut self) {
        let keys = self.next_keys();
        if !keys.is_empty() {
            log::trace!("Scripted keys: {:?}", keys);
        }
        self.keyboard.set_pressed(keys);
        self.keyboard.poll();
    }

    fn is_finished(&self) -> bool {
        self.step >= self.script.steps.len()
    }
}
