//! Render snapshot of the split editor
//!
//! The canvas never talks to the engine. The application rebuilds this
//! snapshot from the [`Viewport`] whenever the view, regions or cursor
//! change, and the canvas draws only from it.

use wavesplit_core::viewport::{compute_peaks, Peak, Viewport, VisibleSplit};
use wavesplit_core::AudioSource;

/// A marker mapped into the current view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerMark {
    pub x: f32,
    pub time: f64,
    /// Currently held by a drag
    pub held: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub has_audio: bool,
    /// One min/max pair per pixel column
    pub peaks: Vec<Peak>,
    pub vertical_scale: f32,
    pub splits: Vec<VisibleSplit>,
    pub markers: Vec<MarkerMark>,
    /// Playback cursor x, when inside the view
    pub playhead_x: Option<f32>,
    pub ruler_height: f32,
    pub splits_height: f32,
    /// Visible time range `[start, end]`
    pub visible_start: f64,
    pub visible_end: f64,
}

impl EditorState {
    /// Snapshot everything needed to draw one frame
    pub fn from_viewport(viewport: &Viewport, source: &AudioSource) -> Self {
        let (visible_start, visible_end) = viewport.axis().visible_range();
        let mut state = Self {
            has_audio: true,
            peaks: compute_peaks(source, &viewport.axis()),
            vertical_scale: viewport.view().vertical_scale,
            ruler_height: viewport.layout().ruler_height as f32,
            splits_height: viewport.layout().splits_height as f32,
            visible_start,
            visible_end,
            ..Self::default()
        };
        state.sync_regions(viewport);
        state
    }

    /// Refresh markers, splits and the cursor, keeping the cached peaks
    ///
    /// Valid only while the view (zoom, scroll, size) is unchanged.
    pub fn sync_regions(&mut self, viewport: &Viewport) {
        let axis = viewport.axis();
        let width = axis.width();
        let held = viewport.drag().held_marker();

        self.markers = viewport
            .regions()
            .markers()
            .iter()
            .filter_map(|&m| {
                let x = axis.pixel_for_time(m);
                (0.0..=width).contains(&x).then(|| MarkerMark {
                    x: x as f32,
                    time: m,
                    held: held.is_some_and(|h| h == m),
                })
            })
            .collect();
        self.splits = viewport.visible_splits();
        self.vertical_scale = viewport.view().vertical_scale;
        self.update_playhead(viewport);
    }

    /// Refresh only the cursor
    ///
    /// Used on position ticks when the scroll offset did not change.
    pub fn update_playhead(&mut self, viewport: &Viewport) {
        let axis = viewport.axis();
        let x = axis.pixel_for_time(viewport.cursor());
        self.playhead_x = (0.0..=axis.width()).contains(&x).then_some(x as f32);
    }

    pub fn waveform_top(&self) -> f32 {
        self.ruler_height + self.splits_height
    }

    pub fn visible_seconds(&self) -> f64 {
        (self.visible_end - self.visible_start).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(seconds: f64) -> AudioSource {
        let rate = 1000;
        let samples = (0..(seconds * rate as f64) as usize)
            .map(|i| (i as f32 * 0.05).sin())
            .collect();
        AudioSource::new(samples, rate, 1)
    }

    #[test]
    fn test_snapshot_maps_markers_and_splits() {
        let audio = source(40.0);
        let mut viewport = Viewport::for_source(&audio);
        viewport.set_size(400.0, 300.0);
        viewport.regions_mut().set_markers([10.0, 20.0, 30.0]);
        viewport.regions_mut().toggle_exclusion(25.0);
        viewport.set_cursor(5.0);

        let state = EditorState::from_viewport(&viewport, &audio);
        assert!(state.has_audio);
        assert_eq!(state.peaks.len(), 400);
        assert_eq!(state.markers.len(), 3);
        assert!((state.markers[0].x - 100.0).abs() < 1e-3);
        assert_eq!(state.splits.len(), 4);
        assert!(state.splits[2].excluded);
        assert!((state.playhead_x.unwrap() - 50.0).abs() < 1e-3);
        assert_eq!(state.waveform_top(), 70.0);
    }

    #[test]
    fn test_offscreen_items_dropped_when_zoomed() {
        let audio = source(40.0);
        let mut viewport = Viewport::for_source(&audio);
        viewport.set_size(400.0, 300.0);
        viewport.regions_mut().set_markers([5.0, 35.0]);
        viewport.set_zoom(4.0, Some(0.0));
        viewport.set_cursor(30.0);

        let mut state = EditorState::from_viewport(&viewport, &audio);
        assert_eq!(state.markers.len(), 1);
        assert_eq!(state.markers[0].time, 5.0);
        assert!(state.playhead_x.is_none());

        viewport.set_cursor(2.0);
        state.update_playhead(&viewport);
        assert!((state.playhead_x.unwrap() - 80.0).abs() < 1e-3);
    }

    #[test]
    fn test_sync_regions_keeps_peaks() {
        let audio = source(40.0);
        let mut viewport = Viewport::for_source(&audio);
        viewport.set_size(400.0, 300.0);
        let mut state = EditorState::from_viewport(&viewport, &audio);
        let peaks = state.peaks.clone();
        assert!(state.markers.is_empty());
        assert_eq!(state.splits.len(), 1);

        viewport.regions_mut().add_marker(20.0);
        state.sync_regions(&viewport);
        assert_eq!(state.markers.len(), 1);
        assert_eq!(state.splits.len(), 2);
        assert_eq!(state.peaks, peaks);
    }
}
