//! TOML-based configuration for the viewport service.
//!
//! `AppConfig` is read from the platform-appropriate config file unless an
//! explicit path is given on the command line:
//! - Windows:  `%APPDATA%\viewportd\config.toml`
//! - Linux:    `~/.config/viewportd/config.toml`
//! - macOS:    `~/Library/Application Support/viewportd/config.toml`
//!
//! ```toml
//! [service]
//! log_level = "info"
//! notify_capacity = 64
//!
//! [routing]
//! clamp_to_logical_frame = false
//!
//! [[frame_adjustments]]
//! unique_id = "local:0"
//! offset_x = 0
//! offset_y = 160
//!
//! [[viewports]]
//! unique_id = "local:0"
//! logical_display_id = 0
//! orientation = 0
//! logical_frame = [0, 0, 1080, 1760]
//! physical_frame = [0, 0, 1080, 1760]
//! device_width = 1080
//! device_height = 1920
//! ```
//!
//! Every field has a default, so a missing file or a partial file both load.
//! Rectangles are `[left, top, right, bottom]`; orientation is in degrees.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use viewport_core::{FrameAdjustment, Orientation, Rect, ViewportModel};

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

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A seed viewport names a rotation that is not a quarter turn.
    #[error("viewport '{unique_id}' has unsupported orientation {degrees}°")]
    InvalidOrientation { unique_id: String, degrees: u32 },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub frame_adjustments: Vec<FrameAdjustmentEntry>,
    /// Snapshots published once at start-up.
    #[serde(default)]
    pub viewports: Vec<ViewportEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Per-subscriber buffer of the viewport change channel.
    #[serde(default = "default_notify_capacity")]
    pub notify_capacity: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoutingConfig {
    /// Pin routed pointer positions to the logical frame instead of extrapolating.
    #[serde(default)]
    pub clamp_to_logical_frame: bool,
}

/// A fixed physical-frame offset for one device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameAdjustmentEntry {
    pub unique_id: String,
    #[serde(default)]
    pub offset_x: i32,
    #[serde(default)]
    pub offset_y: i32,
}

impl FrameAdjustmentEntry {
    pub fn to_adjustment(&self) -> FrameAdjustment {
        FrameAdjustment {
            offset_x: self.offset_x,
            offset_y: self.offset_y,
        }
    }
}

/// A statically configured viewport snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewportEntry {
    pub unique_id: String,
    #[serde(default = "default_true")]
    pub valid: bool,
    #[serde(default)]
    pub logical_display_id: i32,
    #[serde(default)]
    pub orientation: u32,
    #[serde(default)]
    pub logical_frame: [i32; 4],
    #[serde(default)]
    pub physical_frame: [i32; 4],
    #[serde(default)]
    pub device_width: i32,
    #[serde(default)]
    pub device_height: i32,
}

impl ViewportEntry {
    /// Builds the snapshot this entry describes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOrientation`] unless `orientation` is a
    /// multiple of 90 degrees.
    pub fn to_snapshot(&self) -> Result<ViewportModel, ConfigError> {
        let orientation =
            Orientation::from_degrees(self.orientation).ok_or_else(|| ConfigError::InvalidOrientation {
                unique_id: self.unique_id.clone(),
                degrees: self.orientation,
            })?;
        Ok(ViewportModel::builder()
            .valid(self.valid)
            .logical_display_id(self.logical_display_id)
            .orientation(orientation)
            .logical_frame(rect_from(self.logical_frame))
            .physical_frame(rect_from(self.physical_frame))
            .device_size(self.device_width, self.device_height)
            .unique_id(self.unique_id.clone())
            .build())
    }
}

fn rect_from([left, top, right, bottom]: [i32; 4]) -> Rect {
    Rect::new(left, top, right, bottom)
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_notify_capacity() -> usize {
    64
}
fn default_true() -> bool {
    true
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            notify_capacity: default_notify_capacity(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config base directory with the `viewportd` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("viewportd"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("viewportd"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("viewportd")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
