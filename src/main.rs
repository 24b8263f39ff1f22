use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use rust_2048::config::AppConfig;
use rust_2048::render::render_grid;
use rust_2048::terminal::{RawModeGuard, TerminalInput};
use rust_2048::{BoardEngine, GameRng, GameSession, JsonFileStore, ScriptedInput, TextRenderer};

#[derive(Debug, Parser)]
#[command(author, version, about = "Play 2048 in the terminal")]
struct Cli {
    /// TOML config file (defaults to ./rust-2048.toml if present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Board side length
    #[arg(long, value_name = "N")]
    size: Option<usize>,

    /// RNG seed for a replayable game
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// JSON file holding the best score
    #[arg(long, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Disable tile colors
    #[arg(long)]
    no_color: bool,

    /// Play these moves headless (e.g. "LLURD") and print the result
    #[arg(long, value_name = "MOVES")]
    moves: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(size) = cli.size {
        config.game.size = size;
    }
    if let Some(seed) = cli.seed {
        config.game.seed = Some(seed);
    }
    if let Some(store) = cli.store {
        config.storage.path = store;
    }
    if cli.no_color {
        config.display.color = false;
    }

    let engine_config = config.engine_config().context("checking game settings")?;
    let rng = match config.game.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };
    info!("playing with seed {}", rng.seed());
    let engine = BoardEngine::new(engine_config, rng);
    let store = JsonFileStore::new(&config.storage.path);

    match cli.moves {
        Some(script) => {
            let mut input = ScriptedInput::parse(&script).context("parsing --moves")?;
            let mut session = GameSession::new(engine, TextRenderer::new(io::sink()), store);
            let summary = session.run(&mut input).context("playing scripted moves")?;

            println!("{}", render_grid(session.engine().grid(), config.display.color));
            println!(
                "Score: {}   Best: {}   Games finished: {}",
                session.engine().score(),
                summary.best_score,
                summary.games_finished
            );
        }
        None => {
            let renderer = TextRenderer::new(io::stdout())
                .colored(config.display.color)
                .clear_screen(true)
                .raw_line_endings();
            let mut session = GameSession::new(engine, renderer, store);

            let summary = {
                let _guard = RawModeGuard::enter().context("entering raw terminal mode")?;
                session.run(&mut TerminalInput::new())
            }
            .context("running game")?;

            println!(
                "Best score: {} ({} games finished, {} won)",
                summary.best_score, summary.games_finished, summary.wins
            );
        }
    }
    Ok(())
}
