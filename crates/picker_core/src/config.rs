use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared::domain::ConfettiBurst;
use tracing::warn;

pub const DEFAULT_SETTINGS_FILE: &str = "picker.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub stage_delay_ms: u64,
    pub shuffle_interval_ms: u64,
    pub shuffle_iterations: u32,
    pub idle_reset_ms: u64,
    pub sounds_dir: PathBuf,
    pub logo_path: PathBuf,
    pub heading: String,
    pub subheading: String,
    pub title_label: String,
    pub confetti: ConfettiBurst,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stage_delay_ms: 3_000,
            shuffle_interval_ms: 200,
            shuffle_iterations: 15,
            idle_reset_ms: 5_000,
            sounds_dir: PathBuf::from("public/sounds"),
            logo_path: PathBuf::from("public/logo.png"),
            heading: "7th Anniversary Sale".into(),
            subheading: "Winner Selection".into(),
            title_label: "Diamond Ring Winner Selection".into(),
            confetti: ConfettiBurst::default(),
        }
    }
}

impl Settings {
    pub fn timeline(&self) -> Timeline {
        Timeline {
            stage_delay: Duration::from_millis(self.stage_delay_ms),
            // tokio intervals reject a zero period
            shuffle_interval: Duration::from_millis(self.shuffle_interval_ms.max(1)),
            shuffle_iterations: self.shuffle_iterations,
            idle_reset: Duration::from_millis(self.idle_reset_ms),
        }
    }
}

/// Fixed pacing of a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    pub stage_delay: Duration,
    pub shuffle_interval: Duration,
    pub shuffle_iterations: u32,
    pub idle_reset: Duration,
}

impl Default for Timeline {
    fn default() -> Self {
        Settings::default().timeline()
    }
}

/// Loads settings from `path`, or from `picker.toml` in the working directory
/// when no path is given, then applies `APP__*` environment overrides.
///
/// An explicit path must exist; the implicit file is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match path {
        Some(path) => read_settings_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_SETTINGS_FILE);
            if default_path.exists() {
                read_settings_file(default_path)?
            } else {
                Settings::default()
            }
        }
    };

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    parse_settings(&raw).with_context(|| format!("invalid settings file '{}'", path.display()))
}

pub fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    Ok(toml::from_str::<Settings>(raw)?)
}

pub(crate) fn apply_env_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let number = |name: &str| -> Option<u64> {
        let raw = lookup(name)?;
        match raw.trim().parse::<u64>() {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(variable = name, value = %raw, "ignoring invalid override: {err}");
                None
            }
        }
    };

    if let Some(v) = number("APP__STAGE_DELAY_MS") {
        settings.stage_delay_ms = v;
    }
    if let Some(v) = number("APP__SHUFFLE_INTERVAL_MS") {
        settings.shuffle_interval_ms = v;
    }
    if let Some(v) = number("APP__SHUFFLE_ITERATIONS") {
        match u32::try_from(v) {
            Ok(v) => settings.shuffle_iterations = v,
            Err(_) => warn!(value = v, "ignoring out of range APP__SHUFFLE_ITERATIONS"),
        }
    }
    if let Some(v) = number("APP__IDLE_RESET_MS") {
        settings.idle_reset_ms = v;
    }
    if let Some(v) = lookup("APP__SOUNDS_DIR") {
        settings.sounds_dir = PathBuf::from(v);
    }
    if let Some(v) = lookup("APP__LOGO_PATH") {
        settings.logo_path = PathBuf::from(v);
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
