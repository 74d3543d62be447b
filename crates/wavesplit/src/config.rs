//! Application configuration
//!
//! Stored as YAML in the platform config directory.
//! Default location: ~/.config/wavesplit/wavesplit.yaml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wavesplit_core::export::{ConcatSettings, ExportSettings};
use wavesplit_core::silence::{DEFAULT_MIN_DURATION, DEFAULT_THRESHOLD_DB};

pub use wavesplit_core::config::{default_config_path, default_output_folder, save_config};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub silence: SilenceConfig,
    /// Last used split export settings
    pub export: ExportSettings,
    /// Last used concat settings
    pub concat: ConcatSettings,
    pub folders: FolderConfig,
}

impl Config {
    /// Clamp every section into its supported range
    pub fn validate(&mut self) {
        self.display.validate();
        self.silence.validate();
        self.export.validate();
        self.concat.validate();
        if self.export.output_folder.as_os_str().is_empty() {
            self.export.output_folder = default_output_folder();
        }
        if self.concat.output_folder.as_os_str().is_empty() {
            self.concat.output_folder = self.export.output_folder.clone();
        }
    }
}

/// Waveform view settings restored on startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Horizontal zoom factor (1-100)
    pub zoom: f64,
    /// Vertical zoom slider position (1-50); the waveform scale is this / 10
    pub vertical_zoom: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            vertical_zoom: 10,
        }
    }
}

impl DisplayConfig {
    pub fn validate(&mut self) {
        self.zoom = if self.zoom.is_finite() {
            self.zoom.clamp(1.0, 100.0)
        } else {
            1.0
        };
        self.vertical_zoom = self.vertical_zoom.clamp(1, 50);
    }

    pub fn vertical_scale(&self) -> f32 {
        self.vertical_zoom as f32 / 10.0
    }
}

/// Silence detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SilenceConfig {
    /// Frames quieter than this (dB below the loudest frame) count as silent
    pub threshold_db: f32,
    /// Shortest silent stretch that becomes a marker, in seconds
    pub min_duration: f64,
}

impl Default for SilenceConfig {
    fn default() -> Self {
        Self {
            threshold_db: DEFAULT_THRESHOLD_DB,
            min_duration: DEFAULT_MIN_DURATION,
        }
    }
}

impl SilenceConfig {
    pub fn validate(&mut self) {
        self.threshold_db = if self.threshold_db.is_finite() {
            self.threshold_db.clamp(-80.0, 0.0)
        } else {
            DEFAULT_THRESHOLD_DB
        };
        self.min_duration = if self.min_duration.is_finite() {
            self.min_duration.clamp(0.05, 10.0)
        } else {
            DEFAULT_MIN_DURATION
        };
    }
}

/// Folders the file dialogs open in
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderConfig {
    pub last_audio: Option<PathBuf>,
    pub last_markers: Option<PathBuf>,
}

/// Load and validate the config at `path`
///
/// Missing or broken files fall back to defaults.
pub fn load_config(path: &Path) -> Config {
    let mut config: Config = wavesplit_core::config::load_config(path);
    config.validate();
    config
}
