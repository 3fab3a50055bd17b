use super::{apply_env_overrides, load_settings, parse_settings, Settings};

use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn defaults_match_original_timing() {
    let timeline = Settings::default().timeline();
    assert_eq!(timeline.stage_delay, Duration::from_secs(3));
    assert_eq!(timeline.shuffle_interval, Duration::from_millis(200));
    assert_eq!(timeline.shuffle_iterations, 15);
    assert_eq!(timeline.idle_reset, Duration::from_secs(5));
}

#[test]
fn partial_file_keeps_remaining_defaults() {
    let settings = parse_settings(
        r#"
stage_delay_ms = 100
heading = "Spring Raffle"

[confetti]
particle_count = 250
"#,
    )
    .expect("parse");

    assert_eq!(settings.stage_delay_ms, 100);
    assert_eq!(settings.heading, "Spring Raffle");
    assert_eq!(settings.shuffle_iterations, 15);
    assert_eq!(settings.confetti.particle_count, 250);
    assert_eq!(settings.confetti.spread_degrees, 70.0);
    assert_eq!(settings.confetti.colors, vec!["#2D61A7", "#F78F25"]);
}

#[test]
fn rejects_malformed_file() {
    assert!(parse_settings("stage_delay_ms = \"soon\"").is_err());
}

#[test]
fn env_overrides_replace_file_values() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        lookup_from(&[
            ("APP__STAGE_DELAY_MS", "50"),
            ("APP__SHUFFLE_ITERATIONS", "3"),
            ("APP__SOUNDS_DIR", "/opt/picker/sounds"),
        ]),
    );

    assert_eq!(settings.stage_delay_ms, 50);
    assert_eq!(settings.shuffle_iterations, 3);
    assert_eq!(settings.sounds_dir, PathBuf::from("/opt/picker/sounds"));
    assert_eq!(settings.idle_reset_ms, 5_000);
}

#[test]
fn invalid_env_values_are_ignored() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        lookup_from(&[
            ("APP__STAGE_DELAY_MS", "three seconds"),
            ("APP__SHUFFLE_ITERATIONS", "99999999999"),
        ]),
    );

    assert_eq!(settings, Settings::default());
}

#[test]
fn zero_shuffle_interval_is_clamped() {
    let settings = Settings {
        shuffle_interval_ms: 0,
        ..Settings::default()
    };
    assert_eq!(settings.timeline().shuffle_interval, Duration::from_millis(1));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let missing = env::temp_dir().join("winner_picker_settings_that_do_not_exist.toml");
    let err = load_settings(Some(&missing)).expect_err("missing file");
    assert!(err.to_string().contains("failed to read settings file"));
}

#[test]
fn loads_explicit_settings_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("winner_picker_settings_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("picker.toml");
    fs::write(&path, "idle_reset_ms = 1234\nsubheading = \"Grand Prize\"\n").expect("write");

    let settings = load_settings(Some(&path)).expect("load");
    assert_eq!(settings.subheading, "Grand Prize");
    assert_eq!(settings.idle_reset_ms, 1234);
    assert_eq!(settings.stage_delay_ms, 3_000);

    fs::remove_dir_all(temp_root).expect("cleanup");
}
