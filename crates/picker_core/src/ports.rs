//! Effect sinks the selection machine fires without waiting on them.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use shared::{
    domain::{ConfettiBurst, SoundEvent},
    error::SoundError,
};
use tracing::{debug, info};

#[async_trait]
pub trait SoundPlayer: Send + Sync {
    async fn play(&self, event: SoundEvent) -> Result<(), SoundError>;
}

pub trait CelebrationEffect: Send + Sync {
    fn celebrate(&self, burst: &ConfettiBurst);
}

pub fn sound_asset_path(sounds_dir: &Path, event: SoundEvent) -> PathBuf {
    sounds_dir.join(event.asset_file_name())
}

/// Resolves each cue to its asset and logs it instead of producing audio.
pub struct LoggingSoundPlayer {
    sounds_dir: PathBuf,
}

impl LoggingSoundPlayer {
    pub fn new(sounds_dir: impl Into<PathBuf>) -> Self {
        Self {
            sounds_dir: sounds_dir.into(),
        }
    }
}

#[async_trait]
impl SoundPlayer for LoggingSoundPlayer {
    async fn play(&self, event: SoundEvent) -> Result<(), SoundError> {
        let path = sound_asset_path(&self.sounds_dir, event);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(SoundError::missing(event, path));
        }
        debug!(event = event.key(), path = %path.display(), "sound cue");
        Ok(())
    }
}

pub struct MutedSoundPlayer;

#[async_trait]
impl SoundPlayer for MutedSoundPlayer {
    async fn play(&self, _event: SoundEvent) -> Result<(), SoundError> {
        Ok(())
    }
}

pub struct LoggingCelebration;

impl CelebrationEffect for LoggingCelebration {
    fn celebrate(&self, burst: &ConfettiBurst) {
        info!(
            particles = burst.particle_count,
            spread = burst.spread_degrees,
            "celebration burst"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn logging_player_reports_missing_asset() {
        let player = LoggingSoundPlayer::new("/nonexistent/winner_picker/sounds");
        let err = player.play(SoundEvent::Start).await.expect_err("missing");
        assert!(matches!(
            err,
            SoundError::MissingAsset {
                event: SoundEvent::Start,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn muted_player_always_succeeds() {
        assert!(MutedSoundPlayer.play(SoundEvent::Winner).await.is_ok());
    }

    #[test]
    fn asset_path_uses_event_key() {
        assert_eq!(
            sound_asset_path(Path::new("public/sounds"), SoundEvent::Stage),
            PathBuf::from("public/sounds/stage.mp3")
        );
    }
}
