//! Wavesplit Core - viewport mapping and region tracking for the split editor
//!
//! The engine is organised leaf-first:
//!
//! - [`timeline`]: time/pixel mapping, split derivation, and the region store
//!   that owns markers and exclusions
//! - [`viewport`]: composition of the above for rendering and hit-testing,
//!   plus the pointer drag state machine and waveform peak extraction
//! - collaborators: [`audio_file`] (decode), [`silence`] (auto markers),
//!   [`markers`] (JSON persistence), [`export`] (encode splits),
//!   [`playback`] (transport), [`config`] (YAML settings)

pub mod audio_file;
pub mod config;
pub mod export;
pub mod markers;
pub mod playback;
pub mod silence;
pub mod timeline;
pub mod types;
pub mod viewport;

pub use types::*;
