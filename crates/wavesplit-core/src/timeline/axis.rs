//! Continuous time <-> pixel mapping
//!
//! Every quantity in the zoom/scale path is an `f64`. Rounding the
//! samples-per-pixel ratio to an integer makes the waveform visibly jump
//! between zoom steps, so nothing here truncates until a caller indexes
//! into a sample buffer.

use std::ops::Range;

/// Maximum horizontal zoom factor
pub const MAX_ZOOM: f64 = 100.0;

/// Vertical amplitude scale bounds
pub const MIN_VERTICAL_SCALE: f32 = 0.1;
pub const MAX_VERTICAL_SCALE: f32 = 5.0;

/// Transient view parameters for one document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    /// Horizontal zoom (1.0 = whole file fits the width)
    pub zoom: f64,
    /// Left edge of the visible window, in seconds
    pub scroll_seconds: f64,
    /// Width of the drawing surface in pixels
    pub width_px: f64,
    /// Amplitude multiplier, independent of the time mapping
    pub vertical_scale: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            scroll_seconds: 0.0,
            width_px: 1000.0,
            vertical_scale: 1.0,
        }
    }
}

impl ViewportState {
    /// Seconds visible across the full width
    pub fn visible_seconds(&self, duration: f64) -> f64 {
        duration / self.zoom
    }

    /// Largest valid scroll offset for a duration
    pub fn max_scroll(&self, duration: f64) -> f64 {
        (duration - self.visible_seconds(duration)).max(0.0)
    }

    /// Clamp every field into its valid range
    pub fn sanitized(mut self, duration: f64) -> Self {
        self.zoom = if self.zoom.is_finite() {
            self.zoom.clamp(1.0, MAX_ZOOM)
        } else {
            1.0
        };
        self.width_px = if self.width_px.is_finite() {
            self.width_px.max(1.0)
        } else {
            1.0
        };
        self.vertical_scale = self
            .vertical_scale
            .clamp(MIN_VERTICAL_SCALE, MAX_VERTICAL_SCALE);
        let max_scroll = self.max_scroll(duration);
        self.scroll_seconds = if self.scroll_seconds.is_finite() {
            self.scroll_seconds.clamp(0.0, max_scroll)
        } else {
            0.0
        };
        self
    }
}

/// Mapper between time, samples, and pixel columns for a fixed view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAxis {
    duration: f64,
    sample_rate: u32,
    view: ViewportState,
}

impl TimeAxis {
    pub fn new(duration: f64, sample_rate: u32, view: ViewportState) -> Self {
        let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        Self {
            duration,
            sample_rate: sample_rate.max(1),
            view: view.sanitized(duration),
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn view(&self) -> &ViewportState {
        &self.view
    }

    pub fn width(&self) -> f64 {
        self.view.width_px
    }

    pub fn visible_seconds(&self) -> f64 {
        self.view.visible_seconds(self.duration)
    }

    /// Visible `(start, end)` window in seconds
    pub fn visible_range(&self) -> (f64, f64) {
        let start = self.view.scroll_seconds;
        (start, start + self.visible_seconds())
    }

    /// Pixel column for a time; may fall outside `[0, width)`
    pub fn pixel_for_time(&self, t: f64) -> f64 {
        let visible = self.visible_seconds();
        if visible <= 0.0 {
            return 0.0;
        }
        (t - self.view.scroll_seconds) / visible * self.view.width_px
    }

    /// Time under a pixel column, clamped to `[0, duration]`
    pub fn time_for_pixel(&self, x: f64) -> f64 {
        let visible = self.visible_seconds();
        if visible <= 0.0 || !x.is_finite() {
            return 0.0;
        }
        let t = self.view.scroll_seconds + x / self.view.width_px * visible;
        t.clamp(0.0, self.duration)
    }

    /// Fractional number of sample frames covered by one pixel column
    pub fn samples_per_pixel(&self) -> f64 {
        self.visible_seconds() * self.sample_rate as f64 / self.view.width_px
    }

    /// Fractional frame index at the left edge of the view
    pub fn first_visible_frame(&self) -> f64 {
        self.view.scroll_seconds * self.sample_rate as f64
    }
}

/// Sample index range for one pixel column
///
/// `origin` is the fractional frame at column 0. Start is
/// `floor(origin + column * spp)`, end is `floor(origin + (column + 1) * spp)`
/// clamped to `len` and never below `start + 1`. Returns `None` once the
/// column starts past the end of the buffer.
pub fn column_range(origin: f64, column: usize, samples_per_pixel: f64, len: usize) -> Option<Range<usize>> {
    let start = (origin + column as f64 * samples_per_pixel).floor();
    if start < 0.0 || start >= len as f64 {
        return None;
    }
    let start = start as usize;
    let end = (origin + (column + 1) as f64 * samples_per_pixel).floor() as usize;
    let end = end.max(start + 1).min(len);
    Some(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(duration: f64, zoom: f64, scroll: f64, width: f64) -> TimeAxis {
        TimeAxis::new(
            duration,
            44100,
            ViewportState {
                zoom,
                scroll_seconds: scroll,
                width_px: width,
                vertical_scale: 1.0,
            },
        )
    }

    #[test]
    fn test_pixel_time_round_trip() {
        let a = axis(45.0, 3.7, 12.25, 913.0);
        let (start, end) = a.visible_range();
        let mut t = start;
        while t <= end {
            let back = a.time_for_pixel(a.pixel_for_time(t));
            assert!((back - t).abs() < 1e-9, "t={} back={}", t, back);
            t += 0.0137;
        }
    }

    #[test]
    fn test_time_pixel_round_trip_within_one_pixel() {
        let a = axis(45.0, 2.0, 22.5, 800.0);
        for x in 0..800 {
            let x = x as f64;
            assert!((a.pixel_for_time(a.time_for_pixel(x)) - x).abs() <= 1.0);
        }
    }

    #[test]
    fn test_time_for_pixel_clamps() {
        let a = axis(10.0, 1.0, 0.0, 100.0);
        assert_eq!(a.time_for_pixel(-50.0), 0.0);
        assert_eq!(a.time_for_pixel(500.0), 10.0);
        assert!(a.pixel_for_time(20.0) > 100.0);
    }

    #[test]
    fn test_samples_per_pixel_monotonic_and_continuous() {
        // Regression for the stepped zoom: spp must fall smoothly as zoom rises
        let mut previous: Option<f64> = None;
        let mut zoom = 1.0;
        while zoom <= 20.0 {
            let spp = axis(180.0, zoom, 0.0, 1237.0).samples_per_pixel();
            if let Some(prev) = previous {
                assert!(spp < prev);
                // Step of 0.01 zoom moves spp by well under one column's worth
                assert!((prev - spp) / prev < 0.011);
            }
            previous = Some(spp);
            zoom += 0.01;
        }
    }

    #[test]
    fn test_samples_per_pixel_is_fractional() {
        let a = axis(1.0, 1.0, 0.0, 1000.0);
        assert!((a.samples_per_pixel() - 44.1).abs() < 1e-9);
    }

    #[test]
    fn test_scroll_clamped_to_window() {
        let a = axis(40.0, 4.0, 100.0, 500.0);
        assert_eq!(a.visible_range(), (30.0, 40.0));
        let b = axis(40.0, 1.0, 5.0, 500.0);
        assert_eq!(b.view().scroll_seconds, 0.0);
    }

    #[test]
    fn test_zero_duration_is_degenerate_not_nan() {
        let a = axis(0.0, 1.0, 0.0, 100.0);
        assert_eq!(a.pixel_for_time(3.0), 0.0);
        assert_eq!(a.time_for_pixel(50.0), 0.0);
        assert_eq!(a.samples_per_pixel(), 0.0);
    }

    #[test]
    fn test_column_range_bounds() {
        let len = 1000;
        let spp = 3.7;
        let mut covered = 0;
        let mut column = 0;
        while let Some(range) = column_range(0.0, column, spp, len) {
            assert!(range.end >= range.start + 1);
            assert!(range.end <= len);
            assert_eq!(range.start, (column as f64 * spp).floor() as usize);
            covered = range.end;
            column += 1;
        }
        assert_eq!(covered, len);
        assert!(column_range(0.0, 0, 3.7, 0).is_none());
    }

    #[test]
    fn test_column_range_below_one_sample_per_pixel() {
        let r = column_range(0.0, 5, 0.25, 100).unwrap();
        assert_eq!(r, 1..2);
    }
}
