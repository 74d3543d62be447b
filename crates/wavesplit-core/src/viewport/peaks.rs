//! Min/max peak extraction for the visible window
//!
//! One `(min, max)` pair per pixel column, taken over the channel-averaged
//! signal. Column boundaries come from [`column_range`] with the fractional
//! samples-per-pixel ratio, so the waveform stretches smoothly with zoom.

use crate::timeline::{column_range, TimeAxis};
use crate::types::AudioSource;

/// Per-column amplitude extremes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Peak {
    pub min: f32,
    pub max: f32,
}

/// Compute one peak per visible column
///
/// Columns past the end of the buffer are silent (`0, 0`).
pub fn compute_peaks(source: &AudioSource, axis: &TimeAxis) -> Vec<Peak> {
    let columns = axis.width().ceil() as usize;
    let mono = source.mono();
    let spp = axis.samples_per_pixel();
    let origin = axis.first_visible_frame();

    (0..columns)
        .map(|column| match column_range(origin, column, spp, mono.len()) {
            Some(range) => {
                let chunk = &mono[range];
                let (min, max) = chunk
                    .iter()
                    .fold((f32::MAX, f32::MIN), |(lo, hi), &s| (lo.min(s), hi.max(s)));
                Peak { min, max }
            }
            None => Peak::default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::ViewportState;

    fn ramp(frames: usize, sample_rate: u32) -> AudioSource {
        let samples = (0..frames).map(|i| i as f32 / frames as f32).collect();
        AudioSource::new(samples, sample_rate, 1)
    }

    #[test]
    fn test_one_peak_per_column() {
        let source = ramp(1000, 100);
        let axis = TimeAxis::new(
            source.duration(),
            100,
            ViewportState {
                width_px: 333.0,
                ..ViewportState::default()
            },
        );
        let peaks = compute_peaks(&source, &axis);
        assert_eq!(peaks.len(), 333);
        // Ramp is increasing, so each column's max never decreases
        for pair in peaks.windows(2) {
            assert!(pair[1].max >= pair[0].max);
        }
        assert!(peaks[332].max > 0.99);
    }

    #[test]
    fn test_scrolled_window_starts_at_offset() {
        let source = ramp(1000, 100);
        let axis = TimeAxis::new(
            source.duration(),
            100,
            ViewportState {
                zoom: 2.0,
                scroll_seconds: 5.0,
                width_px: 100.0,
                vertical_scale: 1.0,
            },
        );
        let peaks = compute_peaks(&source, &axis);
        assert!((peaks[0].min - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_deep_zoom_repeats_samples() {
        let source = ramp(10, 10);
        let axis = TimeAxis::new(
            source.duration(),
            10,
            ViewportState {
                zoom: 1.0,
                width_px: 40.0,
                ..ViewportState::default()
            },
        );
        let peaks = compute_peaks(&source, &axis);
        assert_eq!(peaks.len(), 40);
        assert_eq!(peaks[0], peaks[3]);
        assert_ne!(peaks[3], peaks[4]);
    }
}
