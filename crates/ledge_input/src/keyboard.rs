//! Keyboard state tracker

use crate::key::{Key, KeyState};
use crate::InputService;
use std::collections::HashSet;

/// Tracks discrete key states from the set of physically pressed keys
///
/// Feed raw presses and releases as they arrive, then call
/// [`InputService::poll`] once per frame to advance every key.
#[derive(Debug, Default)]
pub struct KeyboardState {
    /// Keys currently held down at the device
    pressed: HashSet<Key>,
    /// State seen by gameplay this frame
    states: [KeyState; Key::COUNT],
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    /// Replace the pressed set wholesale
    pub fn set_pressed<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        self.pressed.clear();
        self.pressed.extend(keys);
    }

    /// Release everything (e.g., on focus loss)
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.states = [KeyState::Idle; Key::COUNT];
    }
}

impl InputService for KeyboardState {
    fn key_state(&self, key: Key) -> KeyState {
        self.states[key.slot()]
    }

    fn poll(&mut self) {
        for key in Key::ALL {
            let slot = key.slot();
            self.states[slot] = self.states[slot].advance(self.pressed.contains(&key));
        }
    }
}
