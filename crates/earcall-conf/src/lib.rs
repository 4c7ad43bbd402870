//! Minimal configuration loading for earcall.
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/earcall/config.toml` (system)
//! 2. `~/.config/earcall/config.toml` (user)
//! 3. `./earcall.toml` (local override)
//! 4. Environment variables (`EARCALL_*`)
//!
//! # Example Config
//!
//! ```toml
//! [score]
//! velocity = 64
//! ticks_per_beat = 480
//! sustain_ticks = 960
//!
//! [quiz]
//! round_ttl_secs = 600
//!
//! [quiz.tiers]
//! easy = ["major", "minor"]
//! medium = ["major", "minor", "7th", "minor7", "dim", "aug", "sus4"]
//!
//! [paths]
//! score_dir = "~/.local/share/earcall/scores"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

/// Score generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Note-on velocity (1-127). Default: 64
    #[serde(default = "ScoreConfig::default_velocity")]
    pub velocity: u8,

    /// Ticks per quarter note. Default: 480
    #[serde(default = "ScoreConfig::default_ticks_per_beat")]
    pub ticks_per_beat: u16,

    /// Chord sounding length in ticks. Default: 960
    #[serde(default = "ScoreConfig::default_sustain_ticks")]
    pub sustain_ticks: u32,
}

impl ScoreConfig {
    fn default_velocity() -> u8 {
        64
    }

    fn default_ticks_per_beat() -> u16 {
        480
    }

    fn default_sustain_ticks() -> u32 {
        960
    }
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            velocity: Self::default_velocity(),
            ticks_per_beat: Self::default_ticks_per_beat(),
            sustain_ticks: Self::default_sustain_ticks(),
        }
    }
}

/// Difficulty tier overrides, by canonical quality name.
///
/// A tier left out keeps its built-in quality set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TiersConfig {
    pub easy: Option<Vec<String>>,
    pub medium: Option<Vec<String>>,
    pub hard: Option<Vec<String>>,
}

/// Quiz behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// How long an unanswered round is kept before cleanup. Default: 600
    #[serde(default = "QuizConfig::default_round_ttl_secs")]
    pub round_ttl_secs: u64,

    #[serde(default)]
    pub tiers: TiersConfig,
}

impl QuizConfig {
    fn default_round_ttl_secs() -> u64 {
        600
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            round_ttl_secs: Self::default_round_ttl_secs(),
            tiers: TiersConfig::default(),
        }
    }
}

/// Filesystem paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Where rendered chord scores are written.
    /// Default: ~/.local/share/earcall/scores
    #[serde(default = "PathsConfig::default_score_dir")]
    pub score_dir: PathBuf,
}

impl PathsConfig {
    fn default_score_dir() -> PathBuf {
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".local/share/earcall/scores"))
            .unwrap_or_else(|| PathBuf::from(".local/share/earcall/scores"))
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            score_dir: Self::default_score_dir(),
        }
    }
}

/// Complete earcall configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EarcallConfig {
    #[serde(default)]
    pub score: ScoreConfig,

    #[serde(default)]
    pub quiz: QuizConfig,

    #[serde(default)]
    pub paths: PathsConfig,
}

impl EarcallConfig {
    /// Load configuration from all standard sources.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, optionally forcing a specific file as the local
    /// override.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for path in discover_config_files(config_path) {
            apply_file(&mut config, &path)?;
        }

        apply_env(&mut config, std::env::vars());
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.score.velocity == 0 || self.score.velocity > 127 {
            return Err(ConfigError::InvalidValue {
                field: "score.velocity",
                message: format!("{} is outside 1-127", self.score.velocity),
            });
        }
        if self.score.ticks_per_beat == 0 {
            return Err(ConfigError::InvalidValue {
                field: "score.ticks_per_beat",
                message: "must be nonzero".into(),
            });
        }
        Ok(())
    }
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local/cli). Only returns
/// files that exist, except for an explicit CLI path which is always
/// returned so a missing file surfaces as an error.
fn discover_config_files(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/earcall/config.toml");
    if system.exists() {
        files.push(system);
    }

    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("earcall/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        files.push(path.to_path_buf());
        return files;
    }

    let local = PathBuf::from("earcall.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Overlay one TOML file onto the config. Only keys present in the file are
/// touched, so later files override earlier ones field by field.
fn apply_file(config: &mut EarcallConfig, path: &Path) -> Result<(), ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    apply_toml(config, &contents, path)
}

fn apply_toml(config: &mut EarcallConfig, contents: &str, path: &Path) -> Result<(), ConfigError> {
    let table: toml::Table = contents
        .parse()
        .map_err(|e: toml::de::Error| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if let Some(score) = table.get("score").and_then(|v| v.as_table()) {
        if let Some(v) = score.get("velocity").and_then(|v| v.as_integer()) {
            config.score.velocity = v as u8;
        }
        if let Some(v) = score.get("ticks_per_beat").and_then(|v| v.as_integer()) {
            config.score.ticks_per_beat = v as u16;
        }
        if let Some(v) = score.get("sustain_ticks").and_then(|v| v.as_integer()) {
            config.score.sustain_ticks = v as u32;
        }
    }

    if let Some(quiz) = table.get("quiz").and_then(|v| v.as_table()) {
        if let Some(v) = quiz.get("round_ttl_secs").and_then(|v| v.as_integer()) {
            config.quiz.round_ttl_secs = v as u64;
        }
        if let Some(tiers) = quiz.get("tiers").and_then(|v| v.as_table()) {
            for (name, slot) in [
                ("easy", &mut config.quiz.tiers.easy),
                ("medium", &mut config.quiz.tiers.medium),
                ("hard", &mut config.quiz.tiers.hard),
            ] {
                if let Some(list) = tiers.get(name).and_then(|v| v.as_array()) {
                    *slot = Some(
                        list.iter()
                            .filter_map(|v| v.as_str())
                            .map(str::to_string)
                            .collect(),
                    );
                }
            }
        }
    }

    if let Some(paths) = table.get("paths").and_then(|v| v.as_table()) {
        if let Some(v) = paths.get("score_dir").and_then(|v| v.as_str()) {
            config.paths.score_dir = expand_path(v);
        }
    }

    Ok(())
}

/// Overlay `EARCALL_*` environment variables.
fn apply_env(config: &mut EarcallConfig, vars: impl Iterator<Item = (String, String)>) {
    for (key, value) in vars {
        match key.as_str() {
            "EARCALL_SCORE_DIR" => config.paths.score_dir = expand_path(&value),
            "EARCALL_ROUND_TTL_SECS" => {
                if let Ok(secs) = value.parse() {
                    config.quiz.round_ttl_secs = secs;
                }
            }
            "EARCALL_VELOCITY" => {
                if let Ok(velocity) = value.parse() {
                    config.score.velocity = velocity;
                }
            }
            _ => {}
        }
    }
}

/// Expand a leading `~` to the home directory.
fn expand_path(value: &str) -> PathBuf {
    if let Some(rest) = value.strip_prefix("~/") {
        if let Some(dirs) = directories::BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(value)
}
