//! Folds worker events into the state the window renders from.

use std::time::{Duration, Instant};

use shared::{
    domain::ConfettiBurst,
    protocol::{DisplayModel, PickerEvent, RunSnapshot},
};

use crate::controller::events::{UiError, UiEvent};

#[derive(Default)]
pub struct PickerViewState {
    snapshot: RunSnapshot,
    stage_started_at: Option<Instant>,
    revealed_at: Option<Instant>,
    status: Option<String>,
    banner: Option<UiError>,
    pending_bursts: Vec<ConfettiBurst>,
}

impl PickerViewState {
    pub fn apply(&mut self, event: UiEvent, now: Instant) {
        match event {
            UiEvent::Info(message) => self.status = Some(message),
            UiEvent::Error(error) => {
                tracing::warn!(context = ?error.context(), "{}", error.message());
                if error.is_blocking() {
                    self.banner = Some(error);
                } else {
                    self.status = Some(error.message().to_string());
                }
            }
            UiEvent::Picker(event) => self.apply_picker_event(&event, now),
            UiEvent::Snapshot(snapshot) => {
                // Snapshots can trail a newer run's events when the queue is busy.
                if snapshot.run_id.0 >= self.snapshot.run_id.0 {
                    self.snapshot = snapshot;
                }
            }
            UiEvent::Celebrate(burst) => self.pending_bursts.push(burst),
        }
    }

    fn apply_picker_event(&mut self, event: &PickerEvent, now: Instant) {
        if event.run_id().0 < self.snapshot.run_id.0 {
            return;
        }
        match event {
            PickerEvent::RunStarted { .. } => {
                self.stage_started_at = Some(now);
                self.revealed_at = None;
            }
            PickerEvent::StageAdvanced { .. } => self.stage_started_at = Some(now),
            PickerEvent::WinnerRevealed { .. } => {
                self.stage_started_at = None;
                self.revealed_at = Some(now);
            }
            PickerEvent::ShuffleFrame { .. } | PickerEvent::IndicatorReset { .. } => {}
        }
    }

    pub fn display(&self) -> DisplayModel {
        DisplayModel::project(&self.snapshot)
    }

    pub fn snapshot(&self) -> &RunSnapshot {
        &self.snapshot
    }

    /// Fraction of the current stage that has elapsed, for the progress bar.
    pub fn stage_progress(&self, now: Instant, stage_delay: Duration) -> f32 {
        match self.stage_started_at {
            Some(started) if !stage_delay.is_zero() => {
                let elapsed = now.saturating_duration_since(started);
                (elapsed.as_secs_f32() / stage_delay.as_secs_f32()).clamp(0.0, 1.0)
            }
            Some(_) => 1.0,
            None => 0.0,
        }
    }

    pub fn revealed_at(&self) -> Option<Instant> {
        self.revealed_at
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn banner(&self) -> Option<&UiError> {
        self.banner.as_ref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    pub fn take_bursts(&mut self) -> Vec<ConfettiBurst> {
        std::mem::take(&mut self.pending_bursts)
    }
}
