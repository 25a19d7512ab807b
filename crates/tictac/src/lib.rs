//! Tictac - terminal tic-tac-toe
//!
//! Front end for [`tictac_engine`]: configuration, a per-run scoreboard and
//! a ratatui interface that plays against a friend or a random-move computer.
//!
//! # Example
//!
//! ```no_run
//! use tictac::{AppConfig, run};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::load("tictac.toml")?;
//! run(config.settings()).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod config;
mod scoreboard;
mod tui;

pub use cli::Cli;
pub use config::{AppConfig, ConfigError, Settings};
pub use scoreboard::Scoreboard;
pub use tui::{App, digit_position, move_cursor, run};
