use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ludus_core::Player;
use ludus_engine::{Algorithm, SearchConfig};
use ludus_games::GameKind;
use ludus_shell::Shell;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Play two-player board games against a search engine",
    long_about = None
)]
struct Args {
    /// Game to start with: tictactoe, mancala or gobbletgobblers
    #[arg(long, default_value = "tictactoe")]
    game: GameKind,

    /// Deepest search iteration
    #[arg(long, default_value_t = 64)]
    depth: u8,

    /// Search budget per move in seconds, 0 for unlimited
    #[arg(long, default_value_t = 5.0)]
    time: f64,

    /// Search algorithm: negamax, alphabeta, pvs or pvs-hash
    #[arg(long, default_value = "pvs-hash")]
    algorithm: Algorithm,

    /// Transposition table slots
    #[arg(long, default_value_t = 1_000_000)]
    tt_capacity: usize,

    /// Side the computer plays from the first move: 1 or 2
    #[arg(long, value_parser = parse_player)]
    computer: Option<Player>,
}

fn parse_player(s: &str) -> Result<Player> {
    match s {
        "1" => Ok(Player::One),
        "2" => Ok(Player::Two),
        _ => anyhow::bail!("invalid side {s:?}: use 1 or 2"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let max_time = if args.time > 0.0 {
        Some(Duration::try_from_secs_f64(args.time)?)
    } else {
        None
    };
    let config = SearchConfig {
        max_depth: args.depth,
        max_time,
        tt_capacity: args.tt_capacity,
        algorithm: args.algorithm,
        ..SearchConfig::default()
    };
    info!(game = %args.game, ?config, "ludus starting");

    let stdin = io::stdin();
    Shell::new(stdin.lock(), io::stdout().lock(), args.game, config)
        .with_computer(args.computer)
        .run()?;
    Ok(())
}
