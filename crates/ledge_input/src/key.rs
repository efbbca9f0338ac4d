//! Keys and per-key discrete state

use serde::{Deserialize, Serialize};

/// Keys the game reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    W,
    A,
    S,
    D,
    /// Debug teleport
    T,
    Space,
    LeftShift,
    RightShift,
    /// Debug help toggle
    H,
    /// God mode toggle
    F10,
    /// Frame cap toggle
    F11,
    /// Quit
    Escape,
}

impl Key {
    pub const COUNT: usize = 12;

    pub const ALL: [Key; Self::COUNT] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::T,
        Key::Space,
        Key::LeftShift,
        Key::RightShift,
        Key::H,
        Key::F10,
        Key::F11,
        Key::Escape,
    ];

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}

/// Discrete state of a key for the current frame
///
/// A key held across frames walks `Idle -> Down -> Repeat ... -> Up -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyState {
    #[default]
    Idle,
    /// First frame the key is pressed
    Down,
    /// Pressed on this frame and the previous one
    Repeat,
    /// First frame after release
    Up,
}

impl KeyState {
    /// Pressed this frame, whether newly or continuously
    #[inline]
    pub const fn is_held(self) -> bool {
        matches!(self, Self::Down | Self::Repeat)
    }

    /// Next state given whether the key is physically pressed this frame
    pub const fn advance(self, pressed: bool) -> Self {
        match (self, pressed) {
            (Self::Idle | Self::Up, true) => Self::Down,
            (Self::Down | Self::Repeat, true) => Self::Repeat,
            (Self::Down | Self::Repeat, false) => Self::Up,
            (Self::Idle | Self::Up, false) => Self::Idle,
        }
    }
}
