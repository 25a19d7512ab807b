//! Command-line interface for tictac.

use clap::Parser;
use std::path::PathBuf;
use tictac_engine::Mark;

/// Tictac - terminal tic-tac-toe against a friend or a random-move computer
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "tictac")]
#[command(about = "Terminal tic-tac-toe against a friend or the computer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (missing file means defaults)
    #[arg(short, long, default_value = "tictac.toml")]
    pub config: PathBuf,

    /// Start in human-vs-computer mode
    #[arg(long)]
    pub vs_computer: bool,

    /// Mark the human plays against the computer (X or O)
    #[arg(long)]
    pub human_mark: Option<Mark>,

    /// Computer thinking delay in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Fixed seed for the computer's random moves
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where to write logs
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
