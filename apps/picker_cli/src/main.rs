use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use picker_core::{
    load_settings, CelebrationEffect, LoggingSoundPlayer, MutedSoundPlayer, SelectionMachine,
    SoundPlayer,
};
use rand::{rngs::StdRng, SeedableRng};
use shared::{
    domain::{ConfettiBurst, Stage},
    protocol::{DrawOutcome, PickerEvent},
};
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Run a sweepstakes winner draw in the terminal.
#[derive(Parser, Debug)]
struct Args {
    /// File with one participant per line. Reads stdin when omitted.
    #[arg(long)]
    entrants: Option<PathBuf>,
    /// Event title shown above the result.
    #[arg(long)]
    title: Option<String>,
    /// Seed for a reproducible draw.
    #[arg(long)]
    seed: Option<u64>,
    /// Print the outcome as JSON.
    #[arg(long)]
    json: bool,
    /// Settings file (defaults to ./picker.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the delay between stages.
    #[arg(long)]
    stage_delay_ms: Option<u64>,
    /// Skip sound cues entirely.
    #[arg(long)]
    mute: bool,
}

/// Prints a sparkle banner on stderr so stdout stays parseable.
struct TerminalCelebration;

impl CelebrationEffect for TerminalCelebration {
    fn celebrate(&self, burst: &ConfettiBurst) {
        eprintln!("{}", sparkle_banner(burst));
    }
}

fn sparkle_banner(burst: &ConfettiBurst) -> String {
    let width = (burst.particle_count / 10).clamp(1, 40) as usize;
    "✨".repeat(width)
}

fn stage_line(stage: Stage) -> String {
    format!(
        "[{}/{}] {}",
        stage.index(),
        Stage::FINAL.index(),
        stage.message()
    )
}

fn read_entrants(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read entrants file '{}'", path.display())),
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read entrants from stdin")?;
            Ok(raw)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(ms) = args.stage_delay_ms {
        settings.stage_delay_ms = ms;
    }
    let entrants = read_entrants(args.entrants.as_deref())?;

    let sound: Arc<dyn SoundPlayer> = if args.mute {
        Arc::new(MutedSoundPlayer)
    } else {
        Arc::new(LoggingSoundPlayer::new(&settings.sounds_dir))
    };
    let celebration = Arc::new(TerminalCelebration);
    let machine = match args.seed {
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
    if !machine.start(&entrants) {
        bail!("no participants given; enter at least one non-blank name per line");
    }

    let participants = machine.snapshot().participants.len();
    if !args.json {
        if let Some(title) = &args.title {
            println!("{title}");
        }
        println!("{participants} participants");
        println!("{}", stage_line(Stage::INITIAL));
    }

    let mut stdout = io::stdout();
    let (run_id, winner) = loop {
        match events.recv().await {
            Ok(PickerEvent::StageAdvanced { stage, .. }) if !args.json => {
                println!("\r{}", stage_line(stage));
            }
            Ok(PickerEvent::ShuffleFrame { names, .. }) if !args.json => {
                print!("\r  {}", names.join(", "));
                stdout.flush().ok();
            }
            Ok(PickerEvent::WinnerRevealed { run_id, winner }) => break (run_id, winner),
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "terminal fell behind the draw; skipping frames");
            }
            Err(RecvError::Closed) => bail!("selection machine stopped before a winner was drawn"),
        }
    };
    machine.shutdown();

    let outcome = DrawOutcome {
        run_id,
        title: args.title,
        participants,
        winner,
        drawn_at: Utc::now(),
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("Winner: {}", outcome.winner);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    #[test]
    fn stage_lines_show_progress() {
        assert_eq!(
            stage_line(Stage::INITIAL),
            "[0/6] Initializing selection process..."
        );
        assert_eq!(stage_line(Stage::FINAL), "[6/6] Drum roll, please!");
    }

    #[test]
    fn banner_scales_with_particle_count() {
        assert_eq!(sparkle_banner(&ConfettiBurst::default()).chars().count(), 10);
        let tiny = ConfettiBurst {
            particle_count: 0,
            ..ConfettiBurst::default()
        };
        assert_eq!(sparkle_banner(&tiny).chars().count(), 1);
    }

    #[test]
    fn reads_entrants_from_file() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("winner_picker_entrants_{suffix}.txt"));
        fs::write(&path, "Alice\nBob\n").expect("write");

        assert_eq!(read_entrants(Some(&path)).expect("read"), "Alice\nBob\n");

        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn missing_entrants_file_names_the_path() {
        let err = read_entrants(Some(Path::new("/nonexistent/entrants.txt"))).expect_err("missing");
        assert!(err.to_string().contains("/nonexistent/entrants.txt"));
    }

    #[test]
    fn parses_cli_flags() {
        let args = Args::try_parse_from([
            "picker_cli",
            "--entrants",
            "names.txt",
            "--seed",
            "7",
            "--json",
        ])
        .expect("args");
        assert_eq!(args.entrants, Some(PathBuf::from("names.txt")));
        assert_eq!(args.seed, Some(7));
        assert!(args.json);
        assert!(!args.mute);
    }
}
