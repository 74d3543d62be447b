//! Render-time composition of the time axis and region store
//!
//! - [`Viewport`]: per-document engine (view state, cursor, hit-testing)
//! - [`DragMachine`]: pointer gesture state machine
//! - [`compute_peaks`]: min/max per pixel column for the visible window

mod controller;
mod drag;
mod peaks;

pub use controller::{
    sync_playback_cursor, Hit, Lane, LaneLayout, PlaybackRequest, Viewport, VisibleSplit,
    FOLLOW_MARGIN, MARKER_GRAB_PX, PLAYBACK_ICON_HIT_PX, RULER_HEIGHT, SPLITS_LANE_HEIGHT,
};
pub use drag::{DragEffect, DragMachine, DragPhase, DragTarget, DEAD_ZONE_PX};
pub use peaks::{compute_peaks, Peak};
