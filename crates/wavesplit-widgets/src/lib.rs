//! UI widgets for the wavesplit editor
//!
//! Follows the iced 0.14 split between pure state structs, view functions
//! taking callbacks, and canvas programs that draw and translate events.
//!
//! - [`waveform`]: the split editor surface (ruler, split lane, waveform)
//! - [`time_format`]: time labels and ruler tick spacing
//! - [`theme`]: shared colors and sizes

pub mod theme;
pub mod time_format;
pub mod waveform;

pub use time_format::{format_time, tick_interval};
pub use waveform::{split_editor, EditorState, MarkerMark, PointerEvent};
