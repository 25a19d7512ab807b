//! Application configuration: TOML file with command-line overrides.

use crate::cli::Cli;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tictac_engine::{COMPUTER_DELAY, Mark};
use tracing::{debug, info, instrument};

/// Configuration loaded from `tictac.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Computer thinking delay in milliseconds.
    #[serde(default = "default_delay_ms")]
    computer_delay_ms: u64,

    /// Start in human-vs-computer mode.
    #[serde(default)]
    vs_computer: bool,

    /// Human's mark against the computer.
    #[serde(default = "default_human_mark")]
    human_mark: Mark,

    /// Fixed RNG seed for reproducible computer moves.
    #[serde(default)]
    seed: Option<u64>,

    /// Log file path.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

fn default_delay_ms() -> u64 {
    COMPUTER_DELAY.as_millis() as u64
}

fn default_human_mark() -> Mark {
    Mark::X
}

fn default_log_file() -> PathBuf {
    PathBuf::from("tictac.log")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            computer_delay_ms: default_delay_ms(),
            vs_computer: false,
            human_mark: default_human_mark(),
            seed: None,
            log_file: default_log_file(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(?config, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if it exists, otherwise falls back to defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides on top of the file values.
    #[instrument(skip(self, cli))]
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if cli.vs_computer {
            self.vs_computer = true;
        }
        if let Some(mark) = cli.human_mark {
            self.human_mark = mark;
        }
        if let Some(delay_ms) = cli.delay_ms {
            self.computer_delay_ms = delay_ms;
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        if let Some(log_file) = &cli.log_file {
            self.log_file = log_file.clone();
        }
        self
    }

    /// The settings a new session starts from.
    pub fn settings(&self) -> Settings {
        Settings::new(
            self.vs_computer,
            self.human_mark,
            Duration::from_millis(self.computer_delay_ms),
            self.seed,
        )
    }
}

/// Initial session settings derived from [`AppConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, new)]
pub struct Settings {
    /// Start against the computer.
    vs_computer: bool,
    /// Human's mark.
    human_mark: Mark,
    /// Computer thinking delay.
    delay: Duration,
    /// RNG seed, if fixed.
    seed: Option<u64>,
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
