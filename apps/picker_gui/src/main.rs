use std::path::{Path, PathBuf};

use clap::Parser;
use crossbeam_channel::bounded;
use picker_core::{config::DEFAULT_SETTINGS_FILE, load_settings, Settings};

mod backend_bridge;
mod controller;
mod media;
mod ui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::PickerApp;

const APP_DIR_NAME: &str = "winner_picker";

#[derive(Debug, Parser)]
#[command(name = "picker_gui", about = "Sweepstakes winner picker window")]
struct Args {
    /// Settings file; defaults to ./picker.toml, then the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed the draw for a reproducible winner.
    #[arg(long)]
    seed: Option<u64>,
}

/// Explicit path first, then the working directory, then the per-user config dir.
fn settings_candidates(explicit: Option<&Path>, config_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(DEFAULT_SETTINGS_FILE);
    if local.exists() {
        return Some(local);
    }
    config_dir
        .map(|dir| dir.join(APP_DIR_NAME).join(DEFAULT_SETTINGS_FILE))
        .filter(|path| path.exists())
}

fn resolve_settings(explicit: Option<&Path>) -> anyhow::Result<Settings> {
    let path = settings_candidates(explicit, dirs::config_dir());
    if let Some(path) = &path {
        tracing::info!(path = %path.display(), "loading settings");
    }
    load_settings(path.as_deref())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();
    let settings = resolve_settings(args.config.as_deref())?;

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings.clone(), args.seed);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Winner Picker")
            .with_inner_size([560.0, 900.0])
            .with_min_inner_size([420.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Winner Picker",
        options,
        Box::new(move |_cc| Ok(Box::new(PickerApp::new(cmd_tx, ui_rx, settings)))),
    )
    .map_err(|err| anyhow::anyhow!("window failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins_even_when_missing() {
        let explicit = Path::new("/nonexistent/winner_picker/custom.toml");
        assert_eq!(
            settings_candidates(Some(explicit), None),
            Some(explicit.to_path_buf())
        );
    }

    #[test]
    fn falls_back_to_user_config_dir() {
        let root = std::env::temp_dir().join(format!("picker_gui_cfg_{}", std::process::id()));
        let app_dir = root.join(APP_DIR_NAME);
        std::fs::create_dir_all(&app_dir).expect("create config dir");
        std::fs::write(app_dir.join(DEFAULT_SETTINGS_FILE), "stage_delay_ms = 10\n")
            .expect("write settings");

        // Tests run from the crate directory, which has no picker.toml.
        let found = settings_candidates(None, Some(root.clone()));
        assert_eq!(found, Some(app_dir.join(DEFAULT_SETTINGS_FILE)));

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn missing_user_config_yields_defaults() {
        let root = std::env::temp_dir().join("picker_gui_cfg_absent");
        assert_eq!(settings_candidates(None, Some(root)), None);
    }
}
