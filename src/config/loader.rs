//! Configuration file loading with precedence handling.

use crate::serializer::SerializeConfig;
use crate::store::DEFAULT_CAPACITY;
use crate::view_state::ScrollerConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SATCON_CONFIG";
/// Environment override for the entry store capacity.
pub const CAPACITY_ENV_VAR: &str = "SATCON_CAPACITY";
/// Environment override for the search debounce delay in milliseconds.
pub const DEBOUNCE_ENV_VAR: &str = "SATCON_DEBOUNCE_MS";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/satcon/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Maximum number of retained entries.
    #[serde(default)]
    pub store_capacity: Option<usize>,

    /// Serializer nesting limit.
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Serializer string limit, in chars.
    #[serde(default)]
    pub max_string_length: Option<usize>,

    /// Serializer array limit.
    #[serde(default)]
    pub max_array_length: Option<usize>,

    /// Serializer object key limit.
    #[serde(default)]
    pub max_object_keys: Option<usize>,

    /// Rows per entry slot.
    #[serde(default)]
    pub item_height: Option<usize>,

    /// Entries materialized beyond each viewport edge.
    #[serde(default)]
    pub buffer_size: Option<usize>,

    /// Scroll delta (rows) below which a recompute is skipped.
    #[serde(default)]
    pub scroll_threshold: Option<usize>,

    /// Search input debounce delay.
    #[serde(default)]
    pub search_debounce_ms: Option<u64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Maximum number of retained entries.
    pub store_capacity: usize,
    /// Serializer nesting limit.
    pub max_depth: usize,
    /// Serializer string limit, in chars.
    pub max_string_length: usize,
    /// Serializer array limit.
    pub max_array_length: usize,
    /// Serializer object key limit.
    pub max_object_keys: usize,
    /// Rows per entry slot.
    pub item_height: usize,
    /// Entries materialized beyond each viewport edge.
    pub buffer_size: usize,
    /// Smallest scroll move, in rows, that triggers a re-render.
    pub scroll_threshold: usize,
    /// Delay before typed search text is applied.
    pub search_debounce_ms: u64,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let serializer = SerializeConfig::default();
        let scroller = ScrollerConfig::default();
        Self {
            store_capacity: DEFAULT_CAPACITY,
            max_depth: serializer.max_depth,
            max_string_length: serializer.max_string_length,
            max_array_length: serializer.max_array_length,
            max_object_keys: serializer.max_object_keys,
            item_height: scroller.item_height,
            buffer_size: scroller.buffer_size,
            scroll_threshold: scroller.scroll_threshold,
            search_debounce_ms: 300,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Serializer limits (depth clamped to the supported ceiling).
    pub fn serialize_config(&self) -> SerializeConfig {
        SerializeConfig {
            max_depth: self.max_depth,
            max_string_length: self.max_string_length,
            max_array_length: self.max_array_length,
            max_object_keys: self.max_object_keys,
        }
        .validated()
    }

    /// Scroller geometry; a zero item height is raised to one row.
    pub fn scroller_config(&self) -> ScrollerConfig {
        ScrollerConfig {
            item_height: self.item_height.max(1),
            buffer_size: self.buffer_size,
            scroll_threshold: self.scroll_threshold,
        }
    }

    /// Search debounce delay.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/satcon/satcon.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("satcon").join("satcon.log"),
        None => PathBuf::from("satcon.log"),
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/satcon/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("satcon").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `SATCON_CONFIG` environment variable
/// 3. Default path `~/.config/satcon/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Some(env_path) = std::env::var_os(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        store_capacity: config.store_capacity.unwrap_or(defaults.store_capacity),
        max_depth: config.max_depth.unwrap_or(defaults.max_depth),
        max_string_length: config
            .max_string_length
            .unwrap_or(defaults.max_string_length),
        max_array_length: config.max_array_length.unwrap_or(defaults.max_array_length),
        max_object_keys: config.max_object_keys.unwrap_or(defaults.max_object_keys),
        item_height: config.item_height.unwrap_or(defaults.item_height),
        buffer_size: config.buffer_size.unwrap_or(defaults.buffer_size),
        scroll_threshold: config.scroll_threshold.unwrap_or(defaults.scroll_threshold),
        search_debounce_ms: config
            .search_debounce_ms
            .unwrap_or(defaults.search_debounce_ms),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `SATCON_CAPACITY`: store capacity
/// - `SATCON_DEBOUNCE_MS`: search debounce delay
///
/// Unparseable values are logged and ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(capacity) = env_number::<usize>(CAPACITY_ENV_VAR) {
        config.store_capacity = capacity;
    }
    if let Some(delay) = env_number::<u64>(DEBOUNCE_ENV_VAR) {
        config.search_debounce_ms = delay;
    }
    config
}

fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, "ignoring non-numeric environment override");
            None
        }
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    capacity_override: Option<usize>,
) -> ResolvedConfig {
    if let Some(capacity) = capacity_override {
        config.store_capacity = capacity;
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
