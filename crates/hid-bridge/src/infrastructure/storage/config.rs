//! TOML-based configuration for the bridge.
//!
//! Reads `AppConfig` from `--config PATH` or from the platform-appropriate
//! config file:
//! - Windows:  `%APPDATA%\HidBridge\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/hid-bridge/config.toml` or `~/.config/hid-bridge/config.toml`
//! - macOS:    `~/Library/Application Support/HidBridge/config.toml`
//!
//! Example:
//!
//! ```toml
//! [serial]
//! port = "/dev/ttyACM0"
//! baud_rate = 115200
//!
//! [input]
//! mouse_sensitivity = 1.5
//!
//! [logging]
//! log_level = "debug"
//! ```
//!
//! # Serde default values
//!
//! Every section and field is optional.  Fields annotated with
//! `#[serde(default = "some_fn")]` use the return value of `some_fn()` when
//! absent, so a missing file, an empty file and a partial file all work.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::application::session::SessionTiming;
use crate::infrastructure::serial::SerialSettings;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is unusable.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Serial port settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SerialConfig {
    /// Port name, e.g. `COM8` or `/dev/ttyUSB0`.
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Read timeout in milliseconds.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    /// Pause after opening before the buffers are cleared, in milliseconds.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

/// Input translation settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InputConfig {
    /// Linear multiplier applied to every mouse delta.
    #[serde(default = "default_mouse_sensitivity")]
    pub mouse_sensitivity: f64,
}

/// Read loop pauses.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SessionConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_error_pause_ms")]
    pub error_pause_ms: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

/// Serial port used when none is configured.
pub fn default_port() -> String {
    if cfg!(target_os = "windows") {
        "COM8".to_string()
    } else {
        "/dev/ttyUSB0".to_string()
    }
}
fn default_baud_rate() -> u32 {
    115_200
}
fn default_read_timeout_ms() -> u64 {
    10
}
fn default_settle_ms() -> u64 {
    150
}
fn default_mouse_sensitivity() -> f64 {
    1.0
}
fn default_poll_interval_ms() -> u64 {
    2
}
fn default_error_pause_ms() -> u64 {
    50
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: default_baud_rate(),
            read_timeout_ms: default_read_timeout_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: default_mouse_sensitivity(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            error_pause_ms: default_error_pause_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Rejects values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serial.port.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "serial.port",
                reason: "must not be empty".to_string(),
            });
        }
        if self.serial.baud_rate == 0 {
            return Err(ConfigError::InvalidValue {
                field: "serial.baud_rate",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !self.input.mouse_sensitivity.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "input.mouse_sensitivity",
                reason: format!("must be finite, got {}", self.input.mouse_sensitivity),
            });
        }
        Ok(())
    }

    pub fn serial_settings(&self) -> SerialSettings {
        SerialSettings {
            port: self.serial.port.clone(),
            baud_rate: self.serial.baud_rate,
            read_timeout: Duration::from_millis(self.serial.read_timeout_ms),
            settle_delay: Duration::from_millis(self.serial.settle_ms),
        }
    }

    pub fn session_timing(&self) -> SessionTiming {
        SessionTiming {
            poll_interval: Duration::from_millis(self.session.poll_interval_ms),
            error_pause: Duration::from_millis(self.session.error_pause_ms),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the platform config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads the configuration from `explicit` if given, otherwise from the
/// platform config file.
///
/// Without an explicit path, a missing file or an undeterminable config
/// directory yields [`AppConfig::default()`].  An explicit path must exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`], [`ConfigError::Parse`] or
/// [`ConfigError::InvalidValue`].
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let config = match explicit {
        Some(path) => parse_file(path)?,
        None => match config_file_path() {
            Ok(path) => read_if_present(&path)?.unwrap_or_default(),
            Err(ConfigError::NoPlatformConfigDir) => AppConfig::default(),
            Err(e) => return Err(e),
        },
    };
    config.validate()?;
    Ok(config)
}

fn parse_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

fn read_if_present(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(toml::from_str(&content)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Resolves the platform config base directory including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("HidBridge"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("hid-bridge"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("HidBridge")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
