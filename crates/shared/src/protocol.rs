use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ParticipantList, RunId, RunState, Stage, StageIndicator};

pub const START_LABEL_IDLE: &str = "Start Selection";
pub const START_LABEL_RUNNING: &str = "Selecting...";

/// Full state of the selection machine at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub run_id: RunId,
    pub participants: ParticipantList,
    pub run_state: RunState,
    pub indicator: StageIndicator,
    pub shuffle_buffer: Vec<String>,
}

/// What a front end renders, derived from a [`RunSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayModel {
    pub start_enabled: bool,
    pub start_label: &'static str,
    pub stage: Option<Stage>,
    pub stage_message: Option<&'static str>,
    pub show_shuffle: bool,
    pub shuffled_names: Vec<String>,
    pub winner: Option<String>,
}

impl DisplayModel {
    pub fn project(snapshot: &RunSnapshot) -> Self {
        let stage = snapshot.run_state.stage();
        let show_shuffle = stage.is_some_and(Stage::is_shuffle_stage);
        Self {
            start_enabled: !snapshot.run_state.is_running(),
            start_label: if stage.is_some() {
                START_LABEL_RUNNING
            } else {
                START_LABEL_IDLE
            },
            stage,
            stage_message: stage.map(Stage::message),
            show_shuffle,
            shuffled_names: if show_shuffle {
                snapshot.shuffle_buffer.clone()
            } else {
                Vec::new()
            },
            winner: snapshot.run_state.winner().map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum PickerEvent {
    RunStarted {
        run_id: RunId,
        participants: usize,
    },
    StageAdvanced {
        run_id: RunId,
        stage: Stage,
    },
    ShuffleFrame {
        run_id: RunId,
        names: Vec<String>,
    },
    WinnerRevealed {
        run_id: RunId,
        winner: String,
    },
    IndicatorReset {
        run_id: RunId,
    },
}

impl PickerEvent {
    pub fn run_id(&self) -> RunId {
        match self {
            PickerEvent::RunStarted { run_id, .. }
            | PickerEvent::StageAdvanced { run_id, .. }
            | PickerEvent::ShuffleFrame { run_id, .. }
            | PickerEvent::WinnerRevealed { run_id, .. }
            | PickerEvent::IndicatorReset { run_id } => *run_id,
        }
    }
}

/// Summary of a finished draw, printed by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawOutcome {
    pub run_id: RunId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub participants: usize,
    pub winner: String,
    pub drawn_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(run_state: RunState) -> RunSnapshot {
        RunSnapshot {
            run_id: RunId(1),
            participants: ParticipantList::parse("Alice\nBob"),
            run_state,
            indicator: StageIndicator::Neutral,
            shuffle_buffer: vec!["Bob".into(), "Alice".into()],
        }
    }

    #[test]
    fn idle_projection_enables_start() {
        let model = DisplayModel::project(&RunSnapshot::default());
        assert!(model.start_enabled);
        assert_eq!(model.start_label, START_LABEL_IDLE);
        assert_eq!(model.stage_message, None);
        assert_eq!(model.winner, None);
    }

    #[test]
    fn running_projection_disables_start_and_shows_message() {
        let stage = Stage::new(2).expect("stage");
        let model = DisplayModel::project(&snapshot(RunState::Running { stage }));
        assert!(!model.start_enabled);
        assert_eq!(model.start_label, START_LABEL_RUNNING);
        assert_eq!(model.stage_message, Some("Analyzing candidates..."));
        assert!(!model.show_shuffle);
        assert!(model.shuffled_names.is_empty());
        assert_eq!(model.winner, None);
    }

    #[test]
    fn shuffle_stage_exposes_buffer() {
        let stage = Stage::new(3).expect("stage");
        let model = DisplayModel::project(&snapshot(RunState::Running { stage }));
        assert!(model.show_shuffle);
        assert_eq!(model.shuffled_names, vec!["Bob", "Alice"]);
    }

    #[test]
    fn winner_only_visible_once_revealed() {
        let model = DisplayModel::project(&snapshot(RunState::Revealed {
            winner: "Alice".into(),
        }));
        assert!(model.start_enabled);
        assert_eq!(model.stage_message, None);
        assert_eq!(model.winner.as_deref(), Some("Alice"));
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = PickerEvent::WinnerRevealed {
            run_id: RunId(4),
            winner: "Carol".into(),
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "winner_revealed");
        assert_eq!(json["payload"]["winner"], "Carol");
        assert_eq!(event.run_id(), RunId(4));
    }
}
