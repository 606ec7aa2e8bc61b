#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Delivery Rush headlessly.

mod store;
mod text;

use std::{fs, io, path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result as AnyResult};
use clap::{Parser, ValueEnum};
use delivery_rush_core::{MovementIntent, WorldSegment};
use delivery_rush_presentation::{Presentation, PresentationBackend, View};
use delivery_rush_system_session::{SceneRequest, Session, SessionConfig, Transition};
use delivery_rush_system_world_extension::{decorations_for, Decoration};
use delivery_rush_world::INITIAL_WORLD_WIDTH;
use log::info;

use crate::{store::FileHighScoreStore, text::TextBackend};

/// Scripted input fed to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Autopilot {
    /// Always run right.
    Right,
    /// Never move.
    Idle,
    /// Run right, briefly step back, repeat.
    Zigzag,
}

impl Autopilot {
    fn intent(self, frame: u64, tick_rate: u32) -> MovementIntent {
        match self {
            Self::Right => MovementIntent::Right,
            Self::Idle => MovementIntent::Idle,
            Self::Zigzag => {
                let second = frame / u64::from(tick_rate.max(1));
                if second % 4 == 3 {
                    MovementIntent::Left
                } else {
                    MovementIntent::Right
                }
            }
        }
    }
}

/// Command-line arguments for the Delivery Rush runner.
#[derive(Debug, Parser)]
#[command(name = "delivery-rush", about = "Plays Delivery Rush without a window")]
struct CliArgs {
    /// TOML file overriding session parameters.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Levels to play before stopping.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    levels: u32,

    /// Scripted player input.
    #[arg(long, value_enum, default_value_t = Autopilot::Right)]
    autopilot: Autopilot,

    /// Overrides the configured global seed.
    #[arg(long)]
    seed: Option<u64>,

    /// File holding the persisted high score.
    #[arg(long, value_name = "PATH", default_value = "delivery-rush-score.toml")]
    high_score_file: PathBuf,

    /// Simulation steps per second.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    tick_rate: u32,

    /// Simulated seconds between HUD lines.
    #[arg(long, default_value_t = 1)]
    hud_interval: u64,

    /// Simulated seconds after which a level is abandoned.
    #[arg(long, default_value_t = 900)]
    level_timeout: u64,
}

/// Entry point for the Delivery Rush command-line interface.
fn main() -> AnyResult<()> {
    let _ = env_logger::Builder::from_default_env().try_init();
    let args = CliArgs::parse();

    let mut config = load_config(args.config.as_ref())?;
    if let Some(seed) = args.seed {
        config.global_seed = seed;
    }

    let store = FileHighScoreStore::new(&args.high_score_file);
    info!("high score kept in {}", store.path().display());
    let mut session = Session::new(config, store).context("invalid session configuration")?;
    let config = session.config();
    info!(
        "{} lives and {} waves per level, seed {:#x}",
        config.starting_lives, config.max_waves, config.global_seed
    );

    let stdout = io::stdout();
    let mut backend = TextBackend::new(
        stdout.lock(),
        args.hud_interval.saturating_mul(u64::from(args.tick_rate)),
    );
    play(&mut session, &mut backend, &args)
}

fn load_config(path: Option<&PathBuf>) -> AnyResult<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    SessionConfig::from_toml_str(&contents)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

fn play<B: PresentationBackend>(
    session: &mut Session<FileHighScoreStore>,
    backend: &mut B,
    args: &CliArgs,
) -> AnyResult<()> {
    let presentation = Presentation::default();
    let dt = Duration::from_secs(1) / args.tick_rate;
    let frame_limit = args.level_timeout.saturating_mul(u64::from(args.tick_rate));

    session.request(SceneRequest::StartGame);
    let mut scenery = initial_scenery();
    let mut frame = 0_u64;
    let mut completed = 0_u32;

    loop {
        for segment in session.take_new_segments() {
            scenery.extend(decorations_for(segment));
        }

        let intent = args.autopilot.intent(frame, args.tick_rate);
        let transition = session.step(dt, intent);
        frame += 1;
        backend.present(&presentation, &View::capture(session, &scenery))?;

        let Some(transition) = transition else {
            if frame >= frame_limit {
                bail!(
                    "level {} did not finish within {} simulated seconds",
                    session.run().level(),
                    args.level_timeout
                );
            }
            continue;
        };

        let stats = transition.stats();
        info!("level {} ended with a total of {}", stats.level, stats.score);
        if matches!(transition, Transition::GameOver(_)) {
            return Ok(());
        }
        completed += 1;
        if completed >= args.levels {
            return Ok(());
        }
        session.request(SceneRequest::NextLevel(Some(stats.next_level().into())));
        scenery = initial_scenery();
        frame = 0;
    }
}

fn initial_scenery() -> Vec<Decoration> {
    decorations_for(WorldSegment::new(0, INITIAL_WORLD_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_steps_back_every_fourth_second() {
        let pilot = Autopilot::Zigzag;
        assert_eq!(pilot.intent(0, 60), MovementIntent::Right);
        assert_eq!(pilot.intent(179, 60), MovementIntent::Right);
        assert_eq!(pilot.intent(180, 60), MovementIntent::Left);
        assert_eq!(pilot.intent(240, 60), MovementIntent::Right);
    }

    #[test]
    fn arguments_parse_with_defaults() {
        let args = CliArgs::try_parse_from(["delivery-rush", "--autopilot", "idle", "--seed", "7"])
            .expect("valid arguments");
        assert_eq!(args.autopilot, Autopilot::Idle);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.levels, 1);
        assert_eq!(args.tick_rate, 60);
    }

    #[test]
    fn zero_levels_is_rejected() {
        assert!(CliArgs::try_parse_from(["delivery-rush", "--levels", "0"]).is_err());
    }
}
