//! Audio file error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while decoding an audio file
#[derive(Error, Debug)]
pub enum AudioFileError {
    #[error("Failed to open audio file: {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("No audio track found in {0}")]
    NoAudioTrack(PathBuf),

    #[error("Unknown sample rate in {0}")]
    UnknownSampleRate(PathBuf),

    #[error("Decoder error: {0}")]
    Decode(#[from] symphonia::core::errors::Error),
}

pub type AudioFileResult<T> = std::result::Result<T, AudioFileError>;
