//! Marker file error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarkerFileError {
    #[error("Failed to read marker file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write marker file: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid marker file: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type MarkerFileResult<T> = std::result::Result<T, MarkerFileError>;
