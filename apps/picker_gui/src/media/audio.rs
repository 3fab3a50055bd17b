use std::{
    fs::File,
    io::BufReader,
    path::PathBuf,
    sync::mpsc::{self, Sender},
    thread,
};

use async_trait::async_trait;
use picker_core::{ports::sound_asset_path, SoundPlayer};
use rodio::{Decoder, OutputStream, Sink};
use shared::{domain::SoundEvent, error::SoundError};
use tokio::sync::oneshot;
use tracing::{debug, warn};

struct PlayRequest {
    event: SoundEvent,
    path: PathBuf,
    reply: oneshot::Sender<Result<(), SoundError>>,
}

/// Plays event sounds on the default output device.
///
/// The output stream is not `Send`, so it lives on a dedicated thread that
/// owns every sink; callers only learn whether the sound was queued.
pub struct AudioSoundPlayer {
    sounds_dir: PathBuf,
    tx: Sender<PlayRequest>,
}

impl AudioSoundPlayer {
    pub fn new(sounds_dir: impl Into<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel::<PlayRequest>();
        thread::spawn(move || {
            let mut output = OutputStream::try_default().ok();
            if output.is_none() {
                warn!("audio output unavailable; event sounds disabled until device is available");
            }
            let mut active_sinks: Vec<Sink> = Vec::new();

            while let Ok(req) = rx.recv() {
                active_sinks.retain(|sink| !sink.empty());
                let result = play_on(&mut output, &mut active_sinks, &req);
                let _ = req.reply.send(result);
            }
        });
        Self {
            sounds_dir: sounds_dir.into(),
            tx,
        }
    }
}

fn play_on(
    output: &mut Option<(OutputStream, rodio::OutputStreamHandle)>,
    active_sinks: &mut Vec<Sink>,
    req: &PlayRequest,
) -> Result<(), SoundError> {
    let file = match File::open(&req.path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(SoundError::missing(req.event, req.path.clone()));
        }
        Err(err) => return Err(SoundError::Playback(err.to_string())),
    };
    let decoder = Decoder::new(BufReader::new(file)).map_err(|err| SoundError::Decode {
        path: req.path.clone(),
        reason: err.to_string(),
    })?;

    if output.is_none() {
        *output = OutputStream::try_default().ok();
    }
    let Some((_, handle)) = output.as_ref() else {
        return Err(SoundError::OutputUnavailable(
            "no default output device".to_string(),
        ));
    };

    match Sink::try_new(handle) {
        Ok(sink) => {
            sink.append(decoder);
            active_sinks.push(sink);
            debug!(event = req.event.key(), path = %req.path.display(), "playing sound");
            Ok(())
        }
        Err(err) => {
            // Drop the stream so the next cue retries the device.
            *output = None;
            Err(SoundError::OutputUnavailable(err.to_string()))
        }
    }
}

#[async_trait]
impl SoundPlayer for AudioSoundPlayer {
    async fn play(&self, event: SoundEvent) -> Result<(), SoundError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(PlayRequest {
                event,
                path: sound_asset_path(&self.sounds_dir, event),
                reply,
            })
            .map_err(|_| SoundError::Playback("audio thread stopped".to_string()))?;
        response
            .await
            .map_err(|_| SoundError::Playback("audio thread dropped the request".to_string()))?
    }
}
