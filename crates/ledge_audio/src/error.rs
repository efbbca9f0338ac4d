//! Audio error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    /// Failed to initialize audio device
    #[error("Failed to initialize audio device: {0}")]
    DeviceInit(String),

    /// Failed to decode audio data
    #[error("Failed to load audio {path}: {reason}")]
    LoadError { path: String, reason: String },

    #[error("Audio file not found: {path}")]
    FileNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AudioError>;
