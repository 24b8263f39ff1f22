//! Application configuration for the terminal game.
//!
//! Values come from three layers, later ones winning:
//!
//! 1. built-in defaults
//! 2. a TOML file (`rust-2048.toml` unless a path is given)
//! 3. `RUST_2048_*` environment variables
//!
//! ```toml
//! [game]
//! size = 5
//! win_tile = 4096
//! seed = 7
//!
//! [storage]
//! path = "scores.json"
//!
//! [display]
//! color = false
//! ```

use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::{DEFAULT_FOUR_PROBABILITY, DEFAULT_SIZE, DEFAULT_WIN_TILE};
use crate::core::{EngineConfig, EngineConfigError, Tile};

/// File read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "rust-2048.toml";

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "RUST_2048_";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(#[from] EngineConfigError),
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameSection,
    pub storage: StorageSection,
    pub display: DisplaySection,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameSection {
    pub size: usize,
    pub win_tile: Tile,
    pub four_probability: f64,
    /// Fixed seed for replayable games; drawn from entropy when absent.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// JSON file holding the best score.
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub color: bool,
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            win_tile: DEFAULT_WIN_TILE,
            four_probability: DEFAULT_FOUR_PROBABILITY,
            seed: None,
        }
    }
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".rust-2048/scores.json"),
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self { color: true }
    }
}

impl AppConfig {
    /// Load from `path` (or [`DEFAULT_CONFIG_FILE`]), then apply environment
    /// overrides. A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// `load` with overrides taken from `lookup` instead of the process
    /// environment.
    pub fn load_with(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            info!("{} not found, using defaults", path.display());
            Self::default()
        };

        config.merge_vars(lookup);
        info!(
            "config: {}x{} board, win at {}, seed {:?}, store {}",
            config.game.size,
            config.game.size,
            config.game.win_tile,
            config.game.seed,
            config.storage.path.display()
        );
        Ok(config)
    }

    /// Parse a TOML file without environment overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `RUST_2048_*` variables from the process environment.
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`, which receives the full variable name.
    /// Unparsable values are logged and skipped.
    pub fn merge_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key).map(|value| (key, value))
        };

        if let Some((key, val)) = var("SIZE") {
            match val.trim().parse() {
                Ok(parsed) => self.game.size = parsed,
                Err(_) => warn!("ignoring {key}={val:?}: not a board size"),
            }
        }
        if let Some((key, val)) = var("WIN_TILE") {
            match val.trim().parse() {
                Ok(parsed) => self.game.win_tile = parsed,
                Err(_) => warn!("ignoring {key}={val:?}: not a tile value"),
            }
        }
        if let Some((key, val)) = var("SEED") {
            match val.trim().parse() {
                Ok(parsed) => self.game.seed = Some(parsed),
                Err(_) => warn!("ignoring {key}={val:?}: not a seed"),
            }
        }
        if let Some((_, val)) = var("STORE") {
            if !val.is_empty() {
                self.storage.path = PathBuf::from(val);
            }
        }
        if let Some((key, val)) = var("COLOR") {
            match parse_flag(&val) {
                Some(parsed) => self.display.color = parsed,
                None => warn!("ignoring {key}={val:?}: expected a boolean"),
            }
        }
    }

    /// Engine parameters, checked.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let config = EngineConfig {
            size: self.game.size,
            win_tile: self.game.win_tile,
            four_probability: self.game.four_probability,
        };
        config.validate()?;
        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
