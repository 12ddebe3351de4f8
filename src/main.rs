use std::fs::File;
use std::io;
use std::sync::Mutex;

use anyhow::{Context, Result};
use maze_chase::game::{self, Outcome, Services};
use maze_chase::terminal::{
    MonotonicClock, SleepGovernor, TerminalGuard, TerminalInput, TerminalRenderer,
};
use maze_chase::GameConfig;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_logging()?;
    let mut config = GameConfig::from_env().context("reading MAZE_CHASE_* settings")?;
    let seed = *config.seed.get_or_insert_with(rand::random);
    info!(seed, "seeding maze and pursuit");

    let guard = TerminalGuard::enter().context("entering raw terminal mode")?;
    let result = play(config);
    drop(guard);

    let outcome = result?;
    println!("Final score: {}", outcome.score());
    Ok(())
}

fn play(config: GameConfig) -> Result<Outcome> {
    let rng = ChaCha8Rng::seed_from_u64(config.seed.unwrap_or_default());
    let mut renderer = TerminalRenderer::new(
        io::stdout(),
        config.width,
        config.height,
        config.cell_columns,
    );
    let mut input = TerminalInput::new();
    let clock = MonotonicClock::new();
    let mut governor = SleepGovernor::new();

    let outcome = game::run(
        config,
        rng,
        Services {
            renderer: &mut renderer,
            input: &mut input,
            clock: &clock,
            governor: &mut governor,
        },
    )?;

    if !matches!(outcome, Outcome::Quit { .. }) {
        renderer.show_outcome(outcome)?;
        input.wait_for_quit()?;
    }
    Ok(outcome)
}

/// Logs go to the file named by `MAZE_CHASE_LOG`; the terminal is busy.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os("MAZE_CHASE_LOG") else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("creating log file {}", path.to_string_lossy()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
