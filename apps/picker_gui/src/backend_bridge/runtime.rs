//! Worker thread owning the tokio runtime and the selection machine.

use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};
use picker_core::{CelebrationEffect, SelectionMachine, Settings, SoundPlayer};
use rand::{rngs::StdRng, SeedableRng};
use shared::domain::ConfettiBurst;
use tokio::sync::broadcast::error::RecvError;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Hands each burst to the UI thread, which owns the particle field.
struct GuiCelebration {
    ui_tx: Sender<UiEvent>,
}

impl CelebrationEffect for GuiCelebration {
    fn celebrate(&self, burst: &ConfettiBurst) {
        if self.ui_tx.try_send(UiEvent::Celebrate(burst.clone())).is_err() {
            tracing::debug!("ui queue unavailable; dropping celebration burst");
        }
    }
}

#[cfg(feature = "audio")]
fn build_sound_player(settings: &Settings) -> Arc<dyn SoundPlayer> {
    Arc::new(crate::media::audio::AudioSoundPlayer::new(&settings.sounds_dir))
}

#[cfg(not(feature = "audio"))]
fn build_sound_player(settings: &Settings) -> Arc<dyn SoundPlayer> {
    Arc::new(picker_core::LoggingSoundPlayer::new(&settings.sounds_dir))
}

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    settings: Settings,
    seed: Option<u64>,
) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Draw engine starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("draw engine startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build draw runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let sound = build_sound_player(&settings);
            let celebration = Arc::new(GuiCelebration {
                ui_tx: ui_tx.clone(),
            });
            let machine = match seed {
                Some(seed) => SelectionMachine::new_with_dependencies(
                    settings.timeline(),
                    settings.confetti.clone(),
                    sound,
                    celebration,
                    StdRng::seed_from_u64(seed),
                ),
                None => SelectionMachine::new(&settings, sound, celebration),
            };

            let mut events = machine.subscribe();
            let forward_machine = Arc::clone(&machine);
            let forward_tx = ui_tx.clone();
            let forwarder = tokio::spawn(async move {
                loop {
                    match events.recv().await {
                        Ok(event) => {
                            let snapshot = forward_machine.snapshot();
                            if forward_tx.try_send(UiEvent::Picker(event)).is_err()
                                || forward_tx.try_send(UiEvent::Snapshot(snapshot)).is_err()
                            {
                                tracing::debug!("ui event queue full or closed; dropping update");
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "ui forwarder lagged behind the draw");
                            let _ = forward_tx.try_send(UiEvent::Snapshot(forward_machine.snapshot()));
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            });

            let _ = ui_tx.try_send(UiEvent::Info("Draw engine ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::StartDraw { entrants } => {
                        // Blank input is ignored by the machine without feedback.
                        machine.start(&entrants);
                    }
                    BackendCommand::Shutdown => break,
                }
            }

            machine.shutdown();
            forwarder.abort();
            tracing::info!("draw engine stopped");
        });
    });
}
