//! `orbitmap` configuration file.
//!
//! Every key is optional; anything left out falls back to the built-in
//! defaults, which reproduce the public FIO infrastructure feed setup.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_FEED_URL: &str = "https://rest.fnar.net/csv/infrastructure/allreports";
pub const DEFAULT_OUTPUT: &str = "population_data.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

const MAX_RETRIES_LIMIT: u32 = 10;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OrbitmapConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub json: PathBuf,
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: PathBuf::from(DEFAULT_OUTPUT),
            pretty: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    Read { path: PathBuf, message: String },
    /// TOML parse / deserialization error.
    Parse(String),
    /// A value is out of range or malformed.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read config {}: {message}", path.display()),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Validation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Parse + Validate + Locate
// ---------------------------------------------------------------------------

impl OrbitmapConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: OrbitmapConfig =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&input)
    }

    /// Per-user config location, e.g. `~/.config/orbitmap/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("orbitmap").join("config.toml"))
    }

    /// Explicit path if given, else the per-user file if it exists, else
    /// built-in defaults. Returns the path actually loaded, if any.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                let config = Self::load(&path)?;
                Ok((config, Some(path)))
            }
            _ => Ok((Self::default(), None)),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_feed_url(&self.source.url)?;

        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Validation("source.timeout_secs must be greater than 0".into()));
        }

        if self.source.max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigError::Validation(format!(
                "source.max_retries must be at most {MAX_RETRIES_LIMIT}, got {}",
                self.source.max_retries
            )));
        }

        if self.output.json.as_os_str().is_empty() {
            return Err(ConfigError::Validation("output.json must not be empty".into()));
        }

        Ok(())
    }
}

/// Feed URLs must be absolute http(s) URLs.
pub fn validate_feed_url(raw: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| ConfigError::Validation(format!("invalid feed url '{raw}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Validation(format!(
            "feed url must use http or https, got '{other}'"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
