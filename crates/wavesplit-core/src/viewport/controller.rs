//! Viewport controller: one engine instance per open document
//!
//! Combines the time axis with the region store to answer render-time
//! queries (visible splits, what is under the pointer) and routes pointer
//! gestures through the [`DragMachine`]. Derived views are recomputed on
//! every call; callers must not keep them past a frame.

use super::drag::{DragEffect, DragMachine, DragTarget};
use crate::timeline::{RegionStore, TimeAxis, TimeRange, ViewportState, MAX_ZOOM};
use crate::types::AudioSource;

// =============================================================================
// Layout constants
// =============================================================================

/// Height of the ruler lane holding the playback icon
pub const RULER_HEIGHT: f64 = 30.0;

/// Height of the splits preview lane below the ruler
pub const SPLITS_LANE_HEIGHT: f64 = 40.0;

/// Horizontal reach of the playback icon hit area, each side of the cursor
pub const PLAYBACK_ICON_HIT_PX: f64 = 12.0;

/// How close (px) the pointer must be to grab a marker
pub const MARKER_GRAB_PX: f64 = 10.0;

/// Fraction of the visible window kept clear at each edge during playback
pub const FOLLOW_MARGIN: f64 = 0.1;

/// Vertical lanes of the editor surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    Ruler,
    Splits,
    Waveform,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneLayout {
    pub ruler_height: f64,
    pub splits_height: f64,
    /// Total surface height; the waveform fills what is left
    pub height: f64,
}

impl Default for LaneLayout {
    fn default() -> Self {
        Self {
            ruler_height: RULER_HEIGHT,
            splits_height: SPLITS_LANE_HEIGHT,
            height: 300.0,
        }
    }
}

impl LaneLayout {
    pub fn waveform_top(&self) -> f64 {
        self.ruler_height + self.splits_height
    }

    pub fn lane_at(&self, y: f64) -> Option<Lane> {
        if y < 0.0 || y > self.height {
            None
        } else if y < self.ruler_height {
            Some(Lane::Ruler)
        } else if y < self.waveform_top() {
            Some(Lane::Splits)
        } else {
            Some(Lane::Waveform)
        }
    }
}

// =============================================================================
// Query results
// =============================================================================

/// What lies under a pointer position, in priority order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    PlaybackIcon,
    /// Ruler lane away from the icon, at this time
    Ruler(f64),
    Marker(f64),
    Split(TimeRange),
    /// Waveform area away from any marker, at this time
    Waveform(f64),
    Empty,
}

/// A split mapped into pixel space and clipped to the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleSplit {
    pub pixel_start: f64,
    pub pixel_end: f64,
    pub excluded: bool,
    /// 1-based position in time order
    pub number: usize,
    pub range: TimeRange,
}

/// Transport action requested by a pointer gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackRequest {
    /// Stop if playing, seek, and play
    RestartAt(f64),
}

/// Scroll offset that keeps the cursor visible during playback
///
/// Pure: returns the current offset when no change is needed. When the
/// cursor drifts into the 10% margin at either edge (or off-screen), the
/// window is re-centred on it and clamped to the scrollable range. At zoom
/// 1.0 everything is visible, so nothing moves.
pub fn sync_playback_cursor(view: &ViewportState, duration: f64, cursor: f64) -> f64 {
    if duration <= 0.0 || view.zoom <= 1.0 {
        return view.scroll_seconds;
    }
    let visible = view.visible_seconds(duration);
    let start = view.scroll_seconds;
    let end = start + visible;
    let margin = visible * FOLLOW_MARGIN;

    if cursor < start + margin || cursor > end - margin {
        (cursor - visible / 2.0).clamp(0.0, view.max_scroll(duration))
    } else {
        view.scroll_seconds
    }
}

// =============================================================================
// Viewport
// =============================================================================

#[derive(Debug, Clone)]
pub struct Viewport {
    regions: RegionStore,
    sample_rate: u32,
    view: ViewportState,
    layout: LaneLayout,
    cursor: f64,
    drag: DragMachine,
}

impl Viewport {
    pub fn new(duration: f64, sample_rate: u32) -> Self {
        let regions = RegionStore::new(duration);
        let view = ViewportState::default().sanitized(regions.duration());
        Self {
            regions,
            sample_rate: sample_rate.max(1),
            view,
            layout: LaneLayout::default(),
            cursor: 0.0,
            drag: DragMachine::new(),
        }
    }

    /// Engine for a fully decoded source
    pub fn for_source(source: &AudioSource) -> Self {
        Self::new(source.duration(), source.sample_rate())
    }

    pub fn regions(&self) -> &RegionStore {
        &self.regions
    }

    pub fn regions_mut(&mut self) -> &mut RegionStore {
        &mut self.regions
    }

    pub fn duration(&self) -> f64 {
        self.regions.duration()
    }

    pub fn view(&self) -> &ViewportState {
        &self.view
    }

    pub fn layout(&self) -> &LaneLayout {
        &self.layout
    }

    pub fn drag(&self) -> &DragMachine {
        &self.drag
    }

    pub fn axis(&self) -> TimeAxis {
        TimeAxis::new(self.duration(), self.sample_rate, self.view)
    }

    /// Playback cursor position in seconds
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn set_cursor(&mut self, t: f64) {
        self.cursor = if t.is_finite() {
            t.clamp(0.0, self.duration())
        } else {
            0.0
        };
    }

    // -------------------------------------------------------------------------
    // View parameters
    // -------------------------------------------------------------------------

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.view.width_px = width;
        self.layout.height = height.max(self.layout.waveform_top());
        self.view = self.view.sanitized(self.duration());
    }

    /// Set horizontal zoom, keeping the time under `anchor_x` in place
    ///
    /// Without an anchor the centre of the view is kept.
    pub fn set_zoom(&mut self, zoom: f64, anchor_x: Option<f64>) {
        let anchor_x = anchor_x.unwrap_or(self.view.width_px / 2.0);
        let anchor_t = self.axis().time_for_pixel(anchor_x);
        self.view.zoom = zoom.clamp(1.0, MAX_ZOOM);
        let visible = self.view.visible_seconds(self.duration());
        self.view.scroll_seconds = anchor_t - anchor_x / self.view.width_px * visible;
        self.view = self.view.sanitized(self.duration());
    }

    pub fn set_scroll(&mut self, seconds: f64) {
        self.view.scroll_seconds = seconds;
        self.view = self.view.sanitized(self.duration());
    }

    /// Scroll position as a fraction of the scrollable range
    pub fn scroll_fraction(&self) -> f64 {
        let max = self.view.max_scroll(self.duration());
        if max <= 0.0 {
            0.0
        } else {
            self.view.scroll_seconds / max
        }
    }

    pub fn set_scroll_fraction(&mut self, fraction: f64) {
        let max = self.view.max_scroll(self.duration());
        self.set_scroll(fraction.clamp(0.0, 1.0) * max);
    }

    pub fn set_vertical_scale(&mut self, scale: f32) {
        self.view.vertical_scale = scale;
        self.view = self.view.sanitized(self.duration());
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Splits intersecting the view, in pixels, clipped to `[0, width)`
    pub fn visible_splits(&self) -> Vec<VisibleSplit> {
        let axis = self.axis();
        let width = axis.width();
        self.regions
            .splits()
            .into_iter()
            .enumerate()
            .filter_map(|(i, split)| {
                let start = axis.pixel_for_time(split.start());
                let end = axis.pixel_for_time(split.end());
                if end <= 0.0 || start >= width {
                    return None;
                }
                Some(VisibleSplit {
                    pixel_start: start.max(0.0),
                    pixel_end: end.min(width),
                    excluded: split.excluded,
                    number: i + 1,
                    range: split.range,
                })
            })
            .collect()
    }

    /// Marker drawn nearest `x`, within the grab tolerance
    fn marker_near_pixel(&self, x: f64) -> Option<f64> {
        let axis = self.axis();
        self.regions
            .markers()
            .iter()
            .map(|&m| (m, (axis.pixel_for_time(m) - x).abs()))
            .filter(|&(_, d)| d <= MARKER_GRAB_PX)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(m, _)| m)
    }

    /// Classify a pointer position
    ///
    /// The ruler lane belongs to the playback cursor exclusively. Below it
    /// markers win over split bodies, and split bodies over the waveform.
    pub fn hit_test(&self, x: f64, y: f64) -> Hit {
        if !(0.0..self.view.width_px).contains(&x) {
            return Hit::Empty;
        }
        let Some(lane) = self.layout.lane_at(y) else {
            return Hit::Empty;
        };
        let axis = self.axis();

        if lane == Lane::Ruler {
            let cursor_x = axis.pixel_for_time(self.cursor);
            return if (cursor_x - x).abs() <= PLAYBACK_ICON_HIT_PX {
                Hit::PlaybackIcon
            } else {
                Hit::Ruler(axis.time_for_pixel(x))
            };
        }

        if let Some(marker) = self.marker_near_pixel(x) {
            return Hit::Marker(marker);
        }

        let t = axis.time_for_pixel(x);
        match lane {
            Lane::Splits => Hit::Split(self.regions.split_at(t)),
            _ => Hit::Waveform(t),
        }
    }

    // -------------------------------------------------------------------------
    // Playback follow
    // -------------------------------------------------------------------------

    /// Periodic position report from the transport
    ///
    /// Ignored while the pointer holds the cursor; the release restarts
    /// playback from wherever it was dropped.
    pub fn on_position_changed(&mut self, t: f64) {
        if self.drag.is_scrubbing() {
            return;
        }
        self.set_cursor(t);
        if self.drag.is_dragging() {
            return;
        }
        self.view.scroll_seconds = sync_playback_cursor(&self.view, self.duration(), self.cursor);
    }

    // -------------------------------------------------------------------------
    // Pointer gestures
    // -------------------------------------------------------------------------

    /// Primary button pressed; returns the hit for hover/cursor feedback
    pub fn pointer_pressed(&mut self, x: f64, y: f64) -> Hit {
        let hit = self.hit_test(x, y);
        let target = match hit {
            Hit::PlaybackIcon => Some(DragTarget::PlaybackIcon),
            Hit::Ruler(_) => Some(DragTarget::Ruler),
            Hit::Marker(t) => Some(DragTarget::Marker(t)),
            Hit::Split(range) => Some(DragTarget::Split(range.start)),
            Hit::Waveform(t) => Some(DragTarget::Waveform(t)),
            Hit::Empty => None,
        };
        match target {
            Some(target) => self.drag.press(target, x),
            None => self.drag.cancel(),
        }
        hit
    }

    /// Pointer moved while a gesture may be active
    pub fn pointer_moved(&mut self, x: f64) -> Option<PlaybackRequest> {
        let effect = self.drag.motion(x, &self.axis())?;
        self.apply_effect(effect)
    }

    /// Primary button released
    pub fn pointer_released(&mut self, x: f64) -> Option<PlaybackRequest> {
        let effect = self.drag.release(x, &self.axis())?;
        self.apply_effect(effect)
    }

    /// Secondary click in the waveform lane removes the marker under the
    /// pointer
    pub fn pointer_secondary(&mut self, x: f64, y: f64) -> Option<f64> {
        if self.layout.lane_at(y) != Some(Lane::Waveform) {
            return None;
        }
        match self.hit_test(x, y) {
            Hit::Marker(t) => self.regions.remove_marker(t, 0.0),
            _ => None,
        }
    }

    /// Apply a gesture outcome to the store and cursor
    pub fn apply_effect(&mut self, effect: DragEffect) -> Option<PlaybackRequest> {
        match effect {
            DragEffect::MoveMarker { from, to } => {
                if let Some(actual) = self.regions.move_marker(from, to, 0.0) {
                    self.drag.track_marker(actual);
                }
                None
            }
            DragEffect::Scrub(t) => {
                self.set_cursor(t);
                None
            }
            DragEffect::RestartPlaybackAt(t) => {
                self.set_cursor(t);
                Some(PlaybackRequest::RestartAt(self.cursor))
            }
            DragEffect::ToggleExclusion(t) => {
                self.regions.toggle_exclusion(t);
                None
            }
            DragEffect::AddMarker(t) => {
                self.regions.add_marker(t);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1000 px over 100 s (1 px == 0.1 s), 300 px tall
    fn viewport() -> Viewport {
        let mut v = Viewport::new(100.0, 44100);
        v.set_size(1000.0, 300.0);
        v.regions_mut().set_markers([25.0, 50.0, 75.0]);
        v
    }

    #[test]
    fn test_visible_splits_clipped() {
        let mut v = viewport();
        v.set_zoom(4.0, Some(0.0));
        v.set_scroll(40.0);
        let splits = v.visible_splits();
        assert_eq!(splits.len(), 2);
        assert_eq!(splits[0].number, 2);
        assert_eq!(splits[0].pixel_start, 0.0);
        assert!((splits[0].pixel_end - 400.0).abs() < 1e-9);
        assert_eq!(splits[1].pixel_end, 1000.0);
    }

    #[test]
    fn test_hit_priority() {
        let mut v = viewport();
        v.set_cursor(25.0);
        // Ruler lane over both the cursor and a marker: icon wins
        assert_eq!(v.hit_test(250.0, 10.0), Hit::PlaybackIcon);
        assert!(matches!(v.hit_test(600.0, 10.0), Hit::Ruler(_)));
        // Splits lane near a marker: marker wins over split body
        assert_eq!(v.hit_test(505.0, 50.0), Hit::Marker(50.0));
        assert_eq!(v.hit_test(600.0, 50.0), Hit::Split(TimeRange::new(50.0, 75.0)));
        assert!(matches!(v.hit_test(600.0, 200.0), Hit::Waveform(t) if (t - 60.0).abs() < 1e-9));
        assert_eq!(v.hit_test(600.0, 400.0), Hit::Empty);
        assert_eq!(v.hit_test(-1.0, 200.0), Hit::Empty);
    }

    #[test]
    fn test_follow_keeps_cursor_visible() {
        let view = ViewportState {
            zoom: 4.0,
            scroll_seconds: 0.0,
            width_px: 1000.0,
            vertical_scale: 1.0,
        };
        // Visible 25 s; margin 2.5 s
        assert_eq!(sync_playback_cursor(&view, 100.0, 10.0), 0.0);
        assert_eq!(sync_playback_cursor(&view, 100.0, 23.0), 10.5);
        assert_eq!(sync_playback_cursor(&view, 100.0, 99.0), 75.0);

        let zoomed_out = ViewportState { zoom: 1.0, ..view };
        assert_eq!(sync_playback_cursor(&zoomed_out, 100.0, 99.0), 0.0);
    }

    #[test]
    fn test_position_report_scrolls() {
        let mut v = viewport();
        v.set_zoom(4.0, Some(0.0));
        v.on_position_changed(60.0);
        assert_eq!(v.cursor(), 60.0);
        assert_eq!(v.view().scroll_seconds, 47.5);
    }

    #[test]
    fn test_zoom_keeps_anchor_time() {
        let mut v = viewport();
        let before = v.axis().time_for_pixel(300.0);
        v.set_zoom(3.3, Some(300.0));
        assert!((v.axis().time_for_pixel(300.0) - before).abs() < 1e-9);
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_icon_click_restarts_playback() {
        let mut v = viewport();
        v.set_cursor(10.0);
        assert_eq!(v.pointer_pressed(101.0, 15.0), Hit::PlaybackIcon);
        let request = v.pointer_released(102.0);
        assert!(matches!(request, Some(PlaybackRequest::RestartAt(t)) if approx(t, 10.2)));
        assert!(approx(v.cursor(), 10.2));
    }

    #[test]
    fn test_marker_drag_through_pointer_events() {
        let mut v = viewport();
        v.regions_mut().toggle_exclusion(60.0);
        assert_eq!(v.pointer_pressed(500.0, 200.0), Hit::Marker(50.0));
        assert_eq!(v.pointer_moved(520.0), None);
        assert_eq!(v.pointer_moved(550.0), None);
        assert_eq!(v.pointer_released(560.0), None);

        let markers = v.regions().markers();
        assert_eq!(markers.len(), 3);
        assert!(approx(markers[1], 56.0));
        let excluded = v.regions().exclusions();
        assert_eq!(excluded.len(), 1);
        assert!(approx(excluded[0].start, 56.0));
        assert_eq!(excluded[0].end, 75.0);
    }

    #[test]
    fn test_clicks_toggle_and_add() {
        let mut v = viewport();
        v.pointer_pressed(600.0, 50.0);
        v.pointer_released(600.0);
        assert!(v.regions().is_excluded(60.0));

        v.pointer_pressed(900.0, 200.0);
        v.pointer_released(900.0);
        assert_eq!(v.regions().markers().len(), 4);
        assert!(approx(v.regions().markers()[3], 90.0));

        let removed = v.pointer_secondary(902.0, 200.0);
        assert!(matches!(removed, Some(t) if approx(t, 90.0)));
        assert_eq!(v.regions().markers(), &[25.0, 50.0, 75.0]);
    }

    #[test]
    fn test_position_reports_ignored_while_scrubbing() {
        let mut v = viewport();
        v.set_cursor(10.0);
        assert_eq!(v.pointer_pressed(100.0, 15.0), Hit::PlaybackIcon);
        v.pointer_moved(500.0);
        assert!(approx(v.cursor(), 50.0));

        v.on_position_changed(10.1);
        assert!(approx(v.cursor(), 50.0));

        let request = v.pointer_released(500.0);
        assert!(matches!(request, Some(PlaybackRequest::RestartAt(t)) if approx(t, 50.0)));
        v.on_position_changed(50.1);
        assert!(approx(v.cursor(), 50.1));
    }

    #[test]
    fn test_secondary_click_only_in_waveform_lane() {
        let mut v = viewport();
        assert_eq!(v.pointer_secondary(502.0, 50.0), None);
        assert_eq!(v.pointer_secondary(502.0, 10.0), None);
        assert_eq!(v.regions().markers(), &[25.0, 50.0, 75.0]);

        assert_eq!(v.pointer_secondary(502.0, 200.0), Some(50.0));
        assert_eq!(v.regions().markers(), &[25.0, 75.0]);
    }
}
