//! Export and concatenation settings
//!
//! Persisted as part of the YAML config, so every struct is
//! `#[serde(default)]` and tolerates missing fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Sample rates offered for export
pub const SAMPLE_RATES: &[u32] = &[
    8000, 11025, 16000, 22050, 32000, 44100, 48000, 88200, 96000, 176400, 192000,
];

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Output container/codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Wav,
    Flac,
    Mp3,
    Ogg,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [Self::Wav, Self::Flac, Self::Mp3, Self::Ogg];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Flac => "flac",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
        }
    }

    /// Guess from a file extension (used to default to the input format)
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(ext))
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelLayout {
    Mono,
    #[default]
    Stereo,
}

impl ChannelLayout {
    pub const ALL: [ChannelLayout; 2] = [Self::Mono, Self::Stereo];

    pub fn count(&self) -> u16 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mono => "Mono",
            Self::Stereo => "Stereo",
        })
    }
}

/// Bitrate preset for lossy formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn bitrate_kbps(&self) -> u32 {
        match self {
            Self::Low => 128,
            Self::Medium => 192,
            Self::High => 320,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        write!(f, "{} ({} kbps)", name, self.bitrate_kbps())
    }
}

/// Target encoding shared by split export and concatenation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeTarget {
    pub format: ExportFormat,
    pub sample_rate: u32,
    pub channels: ChannelLayout,
    pub quality: Quality,
}

impl Default for EncodeTarget {
    fn default() -> Self {
        Self {
            format: ExportFormat::Wav,
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: ChannelLayout::Stereo,
            quality: Quality::Medium,
        }
    }
}

/// Snap a sample rate to the nearest entry of [`SAMPLE_RATES`]
pub fn snap_sample_rate(rate: u32) -> u32 {
    if SAMPLE_RATES.contains(&rate) {
        return rate;
    }
    let nearest = SAMPLE_RATES
        .iter()
        .copied()
        .min_by_key(|r| r.abs_diff(rate))
        .unwrap_or(DEFAULT_SAMPLE_RATE);
    log::warn!("snap_sample_rate: Unsupported sample rate {}, using {}", rate, nearest);
    nearest
}

/// One file per included split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub format: ExportFormat,
    pub sample_rate: u32,
    pub channels: ChannelLayout,
    pub quality: Quality,
    /// Output files are `<prefix>_<index>.<ext>`
    pub prefix: String,
    /// Trim leading/trailing silence from each split
    pub trim_silence: bool,
    pub output_folder: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        let target = EncodeTarget::default();
        Self {
            format: target.format,
            sample_rate: target.sample_rate,
            channels: target.channels,
            quality: target.quality,
            prefix: "split".to_string(),
            trim_silence: false,
            output_folder: PathBuf::new(),
        }
    }
}

/// Included splits joined into one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcatSettings {
    pub format: ExportFormat,
    pub sample_rate: u32,
    pub channels: ChannelLayout,
    pub quality: Quality,
    /// Output file name without extension
    pub filename: String,
    /// Gap of digital silence between splits
    pub silence_ms: u32,
    pub trim_silence: bool,
    pub output_folder: PathBuf,
}

impl ExportSettings {
    pub fn target(&self) -> EncodeTarget {
        EncodeTarget {
            format: self.format,
            sample_rate: self.sample_rate,
            channels: self.channels,
            quality: self.quality,
        }
    }

    pub fn set_target(&mut self, target: EncodeTarget) {
        self.format = target.format;
        self.sample_rate = snap_sample_rate(target.sample_rate);
        self.channels = target.channels;
        self.quality = target.quality;
    }

    pub fn validate(&mut self) {
        self.sample_rate = snap_sample_rate(self.sample_rate);
        if self.prefix.trim().is_empty() {
            self.prefix = "split".to_string();
        }
    }
}

impl Default for ConcatSettings {
    fn default() -> Self {
        let target = EncodeTarget::default();
        Self {
            format: target.format,
            sample_rate: target.sample_rate,
            channels: target.channels,
            quality: target.quality,
            filename: "concatenated".to_string(),
            silence_ms: 500,
            trim_silence: false,
            output_folder: PathBuf::new(),
        }
    }
}

impl ConcatSettings {
    pub fn target(&self) -> EncodeTarget {
        EncodeTarget {
            format: self.format,
            sample_rate: self.sample_rate,
            channels: self.channels,
            quality: self.quality,
        }
    }

    pub fn set_target(&mut self, target: EncodeTarget) {
        self.format = target.format;
        self.sample_rate = snap_sample_rate(target.sample_rate);
        self.channels = target.channels;
        self.quality = target.quality;
    }

    pub fn validate(&mut self) {
        self.sample_rate = snap_sample_rate(self.sample_rate);
        self.silence_ms = self.silence_ms.min(10_000);
        if self.filename.trim().is_empty() {
            self.filename = "concatenated".to_string();
        }
    }
}
