use std::path::PathBuf;

use thiserror::Error;

use crate::domain::SoundEvent;

/// Failure to play an event sound. Never fatal to a draw.
#[derive(Debug, Error)]
pub enum SoundError {
    #[error("no sound asset for '{}' at {}", event.key(), path.display())]
    MissingAsset { event: SoundEvent, path: PathBuf },
    #[error("audio output unavailable: {0}")]
    OutputUnavailable(String),
    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("playback failed: {0}")]
    Playback(String),
}

impl SoundError {
    pub fn missing(event: SoundEvent, path: impl Into<PathBuf>) -> Self {
        Self::MissingAsset {
            event,
            path: path.into(),
        }
    }
}
