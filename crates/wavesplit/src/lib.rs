//! Wavesplit - cut one recording into many files
//!
//! Load an audio file, place split markers on its waveform (by hand or from
//! detected silence), exclude the regions you don't want, then either:
//!
//! 1. **Export** every included split as its own numbered file, or
//! 2. **Concat** the included splits into one file with silence gaps.
//!
//! Marker layouts can be saved to and loaded from JSON next to the audio.

pub mod config;
pub mod ui;
