use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::{rngs::StdRng, SeedableRng};
use shared::{
    domain::{
        ConfettiBurst, ParticipantList, RunId, RunState, SoundEvent, Stage, StageIndicator,
    },
    protocol::{DisplayModel, PickerEvent, RunSnapshot},
};
use tokio::{
    sync::broadcast,
    task::JoinHandle,
    time::{sleep, sleep_until, Instant},
};
use tracing::{debug, info, warn};

pub mod config;
pub mod draw;
pub mod ports;
pub mod shuffler;

pub use config::{load_settings, Settings, Timeline};
pub use ports::{
    CelebrationEffect, LoggingCelebration, LoggingSoundPlayer, MutedSoundPlayer, SoundPlayer,
};

use crate::{draw::draw_winner, shuffler::ShuffleAnimation};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Drives a draw from the start request through the staged countdown to the
/// revealed winner.
///
/// Must be used from within a tokio runtime: every transition after `start`
/// is a spawned task.
pub struct SelectionMachine {
    timeline: Timeline,
    confetti: ConfettiBurst,
    sound: Arc<dyn SoundPlayer>,
    celebration: Arc<dyn CelebrationEffect>,
    inner: Mutex<MachineState>,
    events: broadcast::Sender<PickerEvent>,
}

struct MachineState {
    snapshot: RunSnapshot,
    next_run_id: u64,
    rng: StdRng,
    // Separate stream so the number of shuffle frames never moves the draw.
    shuffle_rng: StdRng,
    tasks: PendingTasks,
}

#[derive(Default)]
struct PendingTasks {
    timeline: Option<JoinHandle<()>>,
    shuffle: Option<JoinHandle<()>>,
    idle_reset: Option<JoinHandle<()>>,
}

impl PendingTasks {
    fn abort_all(&mut self) {
        for handle in [
            self.timeline.take(),
            self.shuffle.take(),
            self.idle_reset.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
    }
}

impl SelectionMachine {
    pub fn new(
        settings: &Settings,
        sound: Arc<dyn SoundPlayer>,
        celebration: Arc<dyn CelebrationEffect>,
    ) -> Arc<Self> {
        Self::new_with_dependencies(
            settings.timeline(),
            settings.confetti.clone(),
            sound,
            celebration,
            StdRng::from_os_rng(),
        )
    }

    pub fn new_with_dependencies(
        timeline: Timeline,
        confetti: ConfettiBurst,
        sound: Arc<dyn SoundPlayer>,
        celebration: Arc<dyn CelebrationEffect>,
        mut rng: StdRng,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let shuffle_rng = StdRng::from_rng(&mut rng);
        Arc::new(Self {
            timeline,
            confetti,
            sound,
            celebration,
            inner: Mutex::new(MachineState {
                snapshot: RunSnapshot::default(),
                next_run_id: 0,
                rng,
                shuffle_rng,
                tasks: PendingTasks::default(),
            }),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PickerEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> RunSnapshot {
        self.state().snapshot.clone()
    }

    pub fn display(&self) -> DisplayModel {
        DisplayModel::project(&self.state().snapshot)
    }

    /// Starts a new run over the names in `name_text`, one per line.
    ///
    /// Returns `false` and changes nothing when no name survives trimming.
    /// A run already in flight is cancelled and replaced.
    pub fn start(self: &Arc<Self>, name_text: &str) -> bool {
        let participants = ParticipantList::parse(name_text);
        if participants.is_empty() {
            debug!("ignoring start request without participants");
            return false;
        }

        let count = participants.len();
        let run_id = {
            let mut state = self.state();
            if state.snapshot.run_state.is_running() {
                info!(
                    run_id = %state.snapshot.run_id,
                    "superseding run that is still in progress"
                );
            }
            state.tasks.abort_all();
            state.next_run_id += 1;
            let run_id = RunId(state.next_run_id);
            state.snapshot = RunSnapshot {
                run_id,
                shuffle_buffer: participants.names().to_vec(),
                participants,
                run_state: RunState::Running {
                    stage: Stage::INITIAL,
                },
                indicator: StageIndicator::Stage(Stage::INITIAL),
            };
            let started_at = Instant::now();
            state.tasks.timeline = Some(tokio::spawn(
                Arc::clone(self).run_timeline(run_id, started_at),
            ));
            run_id
        };

        info!(%run_id, participants = count, "selection run started");
        self.emit(PickerEvent::RunStarted {
            run_id,
            participants: count,
        });
        self.play(SoundEvent::Start);
        true
    }

    /// Cancels every pending transition. The current snapshot is kept.
    pub fn shutdown(&self) {
        self.state().tasks.abort_all();
    }

    fn state(&self) -> MutexGuard<'_, MachineState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run_timeline(self: Arc<Self>, run_id: RunId, started_at: Instant) {
        for stage in Stage::ticks() {
            sleep_until(started_at + self.timeline.stage_delay * u32::from(stage.index())).await;
            if !self.advance(run_id, stage) {
                return;
            }
        }
        let reveal_at = u32::from(Stage::FINAL.index()) + 1;
        sleep_until(started_at + self.timeline.stage_delay * reveal_at).await;
        self.reveal(run_id);
    }

    fn advance(self: &Arc<Self>, run_id: RunId, stage: Stage) -> bool {
        {
            let mut state = self.state();
            if state.snapshot.run_id != run_id {
                return false;
            }
            state.snapshot.run_state = RunState::Running { stage };
            state.snapshot.indicator = StageIndicator::Stage(stage);
            if stage.is_shuffle_stage() {
                if let Some(previous) = state.tasks.shuffle.take() {
                    previous.abort();
                }
                let names = state.snapshot.participants.names().to_vec();
                state.tasks.shuffle = Some(tokio::spawn(
                    Arc::clone(self).run_shuffle(run_id, names),
                ));
            }
        }

        debug!(%run_id, stage = stage.index(), message = stage.message(), "stage advanced");
        self.emit(PickerEvent::StageAdvanced { run_id, stage });
        self.play(SoundEvent::Stage);
        true
    }

    async fn run_shuffle(self: Arc<Self>, run_id: RunId, names: Vec<String>) {
        let period = self.timeline.shuffle_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        let mut animation = ShuffleAnimation::new(names, self.timeline.shuffle_iterations);

        loop {
            ticker.tick().await;
            let frame = {
                let mut guard = self.state();
                let state = &mut *guard;
                if state.snapshot.run_id != run_id {
                    return;
                }
                let Some(frame) = animation.step(&mut state.shuffle_rng) else {
                    break;
                };
                state.snapshot.shuffle_buffer = frame.to_vec();
                frame.to_vec()
            };
            self.emit(PickerEvent::ShuffleFrame {
                run_id,
                names: frame,
            });
        }
        debug!(%run_id, "shuffle animation finished");
    }

    fn reveal(self: &Arc<Self>, run_id: RunId) {
        let winner = {
            let mut guard = self.state();
            let state = &mut *guard;
            if state.snapshot.run_id != run_id {
                return;
            }
            let Some(winner) = draw_winner(&state.snapshot.participants, &mut state.rng) else {
                warn!(%run_id, "reveal reached with an empty participant list");
                return;
            };
            state.snapshot.run_state = RunState::Revealed {
                winner: winner.clone(),
            };
            state.snapshot.indicator = StageIndicator::Complete;
            state.tasks.timeline = None;
            if let Some(shuffle) = state.tasks.shuffle.take() {
                shuffle.abort();
            }
            state.tasks.idle_reset = Some(tokio::spawn(
                Arc::clone(self).run_idle_reset(run_id),
            ));
            winner
        };

        info!(%run_id, winner = %winner, "winner revealed");
        self.play(SoundEvent::Winner);
        self.celebration.celebrate(&self.confetti);
        self.emit(PickerEvent::WinnerRevealed { run_id, winner });
    }

    async fn run_idle_reset(self: Arc<Self>, run_id: RunId) {
        sleep(self.timeline.idle_reset).await;
        {
            let mut state = self.state();
            if state.snapshot.run_id != run_id || state.snapshot.run_state.is_running() {
                return;
            }
            state.snapshot.indicator = StageIndicator::Neutral;
            state.tasks.idle_reset = None;
        }
        debug!(%run_id, "stage indicator reset");
        self.emit(PickerEvent::IndicatorReset { run_id });
    }

    fn play(&self, event: SoundEvent) {
        let sound = Arc::clone(&self.sound);
        tokio::spawn(async move {
            if let Err(err) = sound.play(event).await {
                warn!(event = event.key(), "failed to play sound: {err}");
            }
        });
    }

    fn emit(&self, event: PickerEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
