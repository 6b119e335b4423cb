//! TOML-based settings persistence for the engine.
//!
//! Reads and writes [`AppConfig`] to the platform-appropriate file:
//! - Windows:  `%APPDATA%\TouchBridge\config.toml`
//! - Linux:    `~/.config/touchbridge/config.toml`
//! - macOS:    `~/Library/Application Support/TouchBridge/config.toml`
//!
//! # Serde default values
//!
//! Every field falls back to its default when absent from the file, so
//! a first run (no file), a hand-trimmed file, and a file written by an
//! older build all load cleanly. The `[thresholds]` and `[strokes]`
//! sections deserialize straight into the domain's [`ThresholdPolicy`]
//! and [`StrokeTuning`]; there is no separate storage schema to keep in
//! sync.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use touchbridge_core::{StrokeTuning, SurfaceGeometry, ThresholdPolicy};

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Settings schema ───────────────────────────────────────────────────────────

/// Top-level settings stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineSettings,
    /// Classification thresholds, staged into the engine at startup.
    #[serde(default)]
    pub thresholds: ThresholdPolicy,
    /// Synthetic stroke durations and scroll shaping.
    #[serde(default)]
    pub strokes: StrokeTuning,
}

/// General engine behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineSettings {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Whether touch translation starts enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Width of the touch surface samples are captured on, in pixels.
    #[serde(default = "default_source_width")]
    pub source_width_px: f64,
    /// Height of the touch surface samples are captured on, in pixels.
    #[serde(default = "default_source_height")]
    pub source_height_px: f64,
    /// Width of the surface strokes are rendered on, in pixels.
    #[serde(default = "default_target_width")]
    pub target_width_px: f64,
    /// Height of the surface strokes are rendered on, in pixels.
    #[serde(default = "default_target_height")]
    pub target_height_px: f64,
}

impl EngineSettings {
    /// The configured capture surface as a geometry value.
    pub fn source_geometry(&self) -> SurfaceGeometry {
        SurfaceGeometry::new(self.source_width_px, self.source_height_px)
    }

    /// The configured render surface as a geometry value.
    pub fn target_geometry(&self) -> SurfaceGeometry {
        SurfaceGeometry::new(self.target_width_px, self.target_height_px)
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_source_width() -> f64 {
    720.0
}
fn default_source_height() -> f64 {
    748.0
}
fn default_target_width() -> f64 {
    1080.0
}
fn default_target_height() -> f64 {
    2640.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
            thresholds: ThresholdPolicy::default(),
            strokes: StrokeTuning::default(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            enabled: default_true(),
            source_width_px: default_source_width(),
            source_height_px: default_source_height(),
            target_width_px: default_target_width(),
            target_height_px: default_target_height(),
        }
    }
}

// ── Settings repository ───────────────────────────────────────────────────────

/// On-disk location of the settings file for this platform.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the environment
/// gives no usable config base directory.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    let dir = platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)?;
    Ok(dir.join("config.toml"))
}

/// Reads the settings file, falling back to `AppConfig::default()` when
/// no file exists yet (first run).
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not
/// found", and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = config_file_path()?;

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(e) => return Err(ConfigError::Io { path, source: e }),
    };
    Ok(toml::from_str(&content)?)
}

/// Writes `config` to the settings file, creating the settings
/// directory on first save.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    let path = config_file_path()?;
    let dir = path.parent().ok_or(ConfigError::NoPlatformConfigDir)?;
    std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content).map_err(|source| ConfigError::Io { path, source })
}

/// Platform config base directory, `TouchBridge`-suffixed.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        Some(PathBuf::from(std::env::var_os("APPDATA")?).join("TouchBridge"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = match std::env::var_os("XDG_CONFIG_HOME") {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(std::env::var_os("HOME")?).join(".config"),
        };
        Some(base.join("touchbridge"))
    }

    #[cfg(target_os = "macos")]
    {
        let home = PathBuf::from(std::env::var_os("HOME")?);
        Some(home.join("Library/Application Support/TouchBridge"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
