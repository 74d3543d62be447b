//! Export error types

use std::path::PathBuf;
use thiserror::Error;

use super::settings::ExportFormat;

/// Errors from rendering or encoding a single output file
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Failed to create output folder: {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("WAV encoding failed for {path}")]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("FLAC encoding failed: {0}")]
    Flac(String),

    #[error("Failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error("MP3 encoding failed: {0}")]
    Mp3(String),

    #[error("Ogg Vorbis encoding failed: {0}")]
    Ogg(String),

    #[error("{format} cannot be written at {sample_rate} Hz")]
    UnsupportedSampleRate { format: ExportFormat, sample_rate: u32 },
}

pub type EncodeResult<T> = std::result::Result<T, EncodeError>;
