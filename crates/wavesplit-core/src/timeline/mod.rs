//! Timeline model: time/pixel mapping, splits, and the region store
//!
//! Markers and exclusions are keyed by time value, never by ordinal split
//! position. Splits are derived on demand from the marker set, so their
//! numbering cannot drift from what is on screen.

mod axis;
mod regions;
mod splits;

pub use axis::{column_range, TimeAxis, ViewportState, MAX_VERTICAL_SCALE, MAX_ZOOM, MIN_VERTICAL_SCALE};
pub use regions::{RegionStore, MARKER_EPSILON};
pub use splits::{derive_splits, format_index, pad_width, split_filename, Split, TimeRange, BOUNDARY_EPSILON};
