//! Configuration system: TOML file + env var overrides + CLI overlay.
//!
//! Precedence, lowest to highest: built-in defaults, config file,
//! `VIGIL_*` environment variables, command-line flags. The merged result
//! is validated once; the watch loop only ever sees a valid [`Config`].

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, VigilError};

/// Default capture buffer size: 16 MiB.
pub const DEFAULT_BUFFER_SIZE: usize = 16 * 1024 * 1024;
/// Default refresh interval in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 2;
/// Default capture timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
/// Default tab stop width used for column accounting.
pub const DEFAULT_TAB_STOP: usize = 8;

/// Interval and timeout bounds, in seconds.
const SECONDS_RANGE: std::ops::RangeInclusive<u64> = 1..=60;
/// Tab stop bounds.
const TAB_STOP_RANGE: std::ops::RangeInclusive<usize> = 1..=16;
/// Smallest usable buffer (one content byte plus the reserved terminator slot).
const MIN_BUFFER_SIZE: usize = 2;
/// Largest accepted buffer.
const MAX_BUFFER_SIZE: usize = i32::MAX as usize;

/// Full vigil configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Seconds between command executions (1-60).
    pub interval_secs: u64,
    /// Seconds a single execution may run before it is timed out (1-60).
    pub timeout_secs: u64,
    /// Capture buffer capacity in bytes.
    pub buffer_size: usize,
    /// Whether to draw the line-number gutter.
    pub show_lineno: bool,
    /// Tab stop width for column accounting.
    pub tab_stop: usize,
    /// Optional JSONL event log destination.
    pub log_file: Option<PathBuf>,
    /// The command string handed to the shell. CLI-only, never read from file.
    #[serde(skip)]
    pub command: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            buffer_size: DEFAULT_BUFFER_SIZE,
            show_lineno: false,
            tab_stop: DEFAULT_TAB_STOP,
            log_file: None,
            command: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// An explicitly requested path must exist; the default path
    /// (`$XDG_CONFIG_HOME/vigil/config.toml`) is optional and silently
    /// skipped when absent.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let (path, required) = match explicit_path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if required {
                return Err(VigilError::MissingConfig { path });
            }
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path).map_err(|source| VigilError::io("config", source))?;
        let config: Self = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Overlay `VIGIL_*` environment variables onto this configuration.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(v) = env_var("VIGIL_INTERVAL") {
            self.interval_secs = parse_seconds("VIGIL_INTERVAL", &v)?;
        }
        if let Some(v) = env_var("VIGIL_TIMEOUT") {
            self.timeout_secs = parse_seconds("VIGIL_TIMEOUT", &v)?;
        }
        if let Some(v) = env_var("VIGIL_BUFFER_SIZE") {
            self.buffer_size = parse_buffer_size(&v)?;
        }
        if let Some(v) = env_var("VIGIL_LINE_NUMBERS") {
            self.show_lineno = matches!(v.as_str(), "1" | "true" | "yes");
        }
        if let Some(v) = env_var("VIGIL_TAB_STOP") {
            self.tab_stop = v.parse().map_err(|_| VigilError::InvalidConfig {
                details: format!("VIGIL_TAB_STOP: '{v}' is not a number"),
            })?;
        }
        if let Some(v) = env_var("VIGIL_LOG_FILE") {
            self.log_file = Some(PathBuf::from(v));
        }
        Ok(())
    }

    /// Validate all ranges. Called once after the final overlay.
    pub fn validate(&self) -> Result<()> {
        if !SECONDS_RANGE.contains(&self.interval_secs) {
            return Err(VigilError::InvalidConfig {
                details: format!("interval {} out of range [1-60]", self.interval_secs),
            });
        }
        if !SECONDS_RANGE.contains(&self.timeout_secs) {
            return Err(VigilError::InvalidConfig {
                details: format!("timeout {} out of range [1-60]", self.timeout_secs),
            });
        }
        if self.buffer_size < MIN_BUFFER_SIZE {
            return Err(VigilError::InvalidConfig {
                details: format!("buffer size {} too small", self.buffer_size),
            });
        }
        if self.buffer_size > MAX_BUFFER_SIZE {
            return Err(VigilError::InvalidConfig {
                details: format!("buffer size {} too large", self.buffer_size),
            });
        }
        if !TAB_STOP_RANGE.contains(&self.tab_stop) {
            return Err(VigilError::InvalidConfig {
                details: format!("tab stop {} out of range [1-16]", self.tab_stop),
            });
        }
        if self.command.trim().is_empty() {
            return Err(VigilError::InvalidConfig {
                details: "no command given".to_string(),
            });
        }
        Ok(())
    }
}

/// Parse an interval/timeout value, range-checked to [1-60] seconds.
pub fn parse_seconds(what: &str, raw: &str) -> Result<u64> {
    let value: u64 = raw.parse().map_err(|_| VigilError::InvalidConfig {
        details: format!("{what}: '{raw}' is not a number"),
    })?;
    if !SECONDS_RANGE.contains(&value) {
        return Err(VigilError::InvalidConfig {
            details: format!("{what}: {value} out of range [1-60]"),
        });
    }
    Ok(value)
}

/// Parse a buffer size with an optional `k`/`m`/`g` suffix (powers of 1024,
/// case-insensitive). The result must be in [2, `i32::MAX`].
pub fn parse_buffer_size(raw: &str) -> Result<usize> {
    let invalid = || VigilError::InvalidConfig {
        details: format!("invalid buffer size: '{raw}'"),
    };

    let (digits, multiplier) = match raw.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        None => (raw, 1usize),
        Some((idx, suffix)) => {
            if idx + suffix.len_utf8() != raw.len() {
                return Err(invalid());
            }
            let multiplier = match suffix.to_ascii_lowercase() {
                'k' => 1024,
                'm' => 1024 * 1024,
                'g' => 1024 * 1024 * 1024,
                _ => return Err(invalid()),
            };
            (&raw[..idx], multiplier)
        }
    };

    let base: usize = digits.parse().map_err(|_| invalid())?;
    let bytes = base.checked_mul(multiplier).ok_or_else(invalid)?;

    if bytes < MIN_BUFFER_SIZE {
        return Err(VigilError::InvalidConfig {
            details: format!("buffer size {bytes} too small"),
        });
    }
    if bytes > MAX_BUFFER_SIZE {
        return Err(VigilError::InvalidConfig {
            details: format!("buffer size {bytes} too large"),
        });
    }
    Ok(bytes)
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// `$XDG_CONFIG_HOME/vigil/config.toml`, falling back to
/// `$HOME/.config/vigil/config.toml`.
fn default_config_path() -> Option<PathBuf> {
    if let Some(base) = env_var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(base).join("vigil").join("config.toml"));
    }
    env_var("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("vigil")
            .join("config.toml")
    })
}
