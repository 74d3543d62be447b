//! Playback error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaybackError {
    /// No output device could be opened
    #[error("No audio output device: {0}")]
    NoDevice(String),

    #[error("Failed to get device config: {0}")]
    Config(String),

    #[error("Failed to build audio stream: {0}")]
    StreamBuild(String),

    #[error("Failed to start audio stream: {0}")]
    StreamPlay(String),
}

pub type PlaybackResult<T> = Result<T, PlaybackError>;
