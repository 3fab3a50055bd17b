use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(RunId);

pub const STAGE_MESSAGES: [&str; 7] = [
    "Initializing selection process...",
    "Shuffling names...",
    "Analyzing candidates...",
    "Reshuffling for fairness...",
    "Narrowing down options...",
    "Final shuffle...",
    "Drum roll, please!",
];

/// Names entered for a draw, one per line, trimmed and without blanks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantList(Vec<String>);

impl ParticipantList {
    pub fn parse(text: &str) -> Self {
        Self(
            text.split('\n')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Stage(u8);

impl TryFrom<u8> for Stage {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index).ok_or_else(|| format!("stage {index} is out of range 0..=6"))
    }
}

impl From<Stage> for u8 {
    fn from(stage: Stage) -> u8 {
        stage.0
    }
}

impl Stage {
    pub const INITIAL: Stage = Stage(0);
    pub const FINAL: Stage = Stage(6);

    pub fn new(index: u8) -> Option<Self> {
        (index <= Self::FINAL.0).then_some(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn message(self) -> &'static str {
        STAGE_MESSAGES[usize::from(self.0)]
    }

    /// Stages during which the name list is scrambled on screen.
    pub fn is_shuffle_stage(self) -> bool {
        matches!(self.0, 1 | 3 | 5)
    }

    /// Every stage after the initial one, in timeline order.
    pub fn ticks() -> impl Iterator<Item = Stage> {
        (1..=Self::FINAL.0).map(Stage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Running {
        stage: Stage,
    },
    Revealed {
        winner: String,
    },
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running { .. })
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            RunState::Running { stage } => Some(*stage),
            _ => None,
        }
    }

    pub fn winner(&self) -> Option<&str> {
        match self {
            RunState::Revealed { winner } => Some(winner),
            _ => None,
        }
    }
}

/// Stage value shown by the UI. Unlike [`RunState`] it falls back to
/// `Neutral` a few seconds after a run stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "indicator", content = "stage", rename_all = "snake_case")]
pub enum StageIndicator {
    #[default]
    Neutral,
    Stage(Stage),
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundEvent {
    Start,
    Stage,
    Winner,
}

impl SoundEvent {
    pub fn key(self) -> &'static str {
        match self {
            SoundEvent::Start => "start",
            SoundEvent::Stage => "stage",
            SoundEvent::Winner => "winner",
        }
    }

    pub fn asset_file_name(self) -> String {
        format!("{}.mp3", self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub x: f32,
    pub y: f32,
}

/// Parameters for the one-shot particle burst fired on reveal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiBurst {
    pub particle_count: u32,
    pub spread_degrees: f32,
    /// Relative to the viewport, `0.0..=1.0` on both axes.
    pub origin: Origin,
    /// `#RRGGBB` strings.
    pub colors: Vec<String>,
}

impl Default for ConfettiBurst {
    fn default() -> Self {
        Self {
            particle_count: 100,
            spread_degrees: 70.0,
            origin: Origin { x: 0.5, y: 0.6 },
            colors: vec!["#2D61A7".into(), "#F78F25".into()],
        }
    }
}

/// Parses a `#RRGGBB` string into its channels.
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_dropping_blank_lines() {
        let list = ParticipantList::parse("Alice\n\n  Bob  \r\n\t\nCarol\n\n\n");
        assert_eq!(list.names(), ["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn whitespace_only_input_is_empty() {
        assert!(ParticipantList::parse("").is_empty());
        assert!(ParticipantList::parse(" \n\t\n\r\n").is_empty());
    }

    #[test]
    fn stage_messages_cover_every_stage() {
        assert_eq!(Stage::INITIAL.message(), "Initializing selection process...");
        assert_eq!(Stage::FINAL.message(), "Drum roll, please!");
        assert!(Stage::new(7).is_none());
        let ticks: Vec<u8> = Stage::ticks().map(Stage::index).collect();
        assert_eq!(ticks, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn only_odd_stages_shuffle() {
        let shuffling: Vec<u8> = (0..=6)
            .filter_map(Stage::new)
            .filter(|stage| stage.is_shuffle_stage())
            .map(Stage::index)
            .collect();
        assert_eq!(shuffling, vec![1, 3, 5]);
    }

    #[test]
    fn sound_events_map_to_mp3_assets() {
        assert_eq!(SoundEvent::Start.asset_file_name(), "start.mp3");
        assert_eq!(SoundEvent::Stage.key(), "stage");
        assert_eq!(SoundEvent::Winner.asset_file_name(), "winner.mp3");
    }

    #[test]
    fn parses_brand_colors() {
        assert_eq!(parse_hex_color("#2D61A7"), Some([0x2d, 0x61, 0xa7]));
        assert_eq!(parse_hex_color("#f78f25"), Some([0xf7, 0x8f, 0x25]));
        assert_eq!(parse_hex_color("2D61A7"), None);
        assert_eq!(parse_hex_color("#2D61"), None);
    }

    #[test]
    fn run_state_serializes_with_state_tag() {
        let json = serde_json::to_value(RunState::Revealed {
            winner: "Alice".into(),
        })
        .expect("serialize");
        assert_eq!(json["state"], "revealed");
        assert_eq!(json["winner"], "Alice");
    }

    #[test]
    fn out_of_range_stage_is_rejected_when_deserializing() {
        assert!(serde_json::from_str::<Stage>("9").is_err());
        let stage: Stage = serde_json::from_str("3").expect("stage 3");
        assert_eq!(stage.message(), Stage::new(3).expect("stage").message());
        assert_eq!(serde_json::to_string(&stage).expect("serialize"), "3");
    }
}
