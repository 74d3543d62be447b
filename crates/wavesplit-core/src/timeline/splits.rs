//! Split derivation and numbering

use serde::{Deserialize, Serialize};

/// Tolerance when comparing boundary times that may have been through a
/// JSON round trip
pub const BOUNDARY_EPSILON: f64 = 1e-9;

/// Half-open time interval `[start, end)` in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Same boundaries within [`BOUNDARY_EPSILON`]
    pub fn matches(&self, other: &TimeRange) -> bool {
        (self.start - other.start).abs() <= BOUNDARY_EPSILON
            && (self.end - other.end).abs() <= BOUNDARY_EPSILON
    }

    /// `start <= t < end`
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }
}

/// A derived split with its exclusion state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split {
    pub range: TimeRange,
    pub excluded: bool,
}

impl Split {
    pub fn start(&self) -> f64 {
        self.range.start
    }

    pub fn end(&self) -> f64 {
        self.range.end
    }
}

/// Pair 0, each marker, and `duration` into consecutive ranges
///
/// Markers must be ascending; anything outside `(0, duration)` or not
/// strictly increasing is skipped so no zero-length split appears between
/// two markers. With no markers (or `duration == 0`) the result is a single
/// split covering the whole file.
pub fn derive_splits(duration: f64, markers: &[f64]) -> Vec<TimeRange> {
    let duration = duration.max(0.0);
    let mut splits = Vec::with_capacity(markers.len() + 1);
    let mut start = 0.0;
    for &m in markers {
        if m > start && m < duration {
            splits.push(TimeRange::new(start, m));
            start = m;
        }
    }
    splits.push(TimeRange::new(start, duration));
    splits
}

/// Digit count used to zero-pad indices `1..=count`
pub fn pad_width(count: usize) -> usize {
    count.max(1).to_string().len()
}

/// 1-based index zero-padded to the width of `total`
pub fn format_index(index: usize, total: usize) -> String {
    format!("{:0width$}", index, width = pad_width(total))
}

/// Output filename `<prefix>_<padded-index>.<ext>`
pub fn split_filename(prefix: &str, index: usize, total: usize, extension: &str) -> String {
    format!("{}_{}.{}", prefix, format_index(index, total), extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_markers_four_splits() {
        let splits = derive_splits(45.0, &[10.5, 20.3, 30.1]);
        let bounds: Vec<(f64, f64)> = splits.iter().map(|r| (r.start, r.end)).collect();
        assert_eq!(
            bounds,
            vec![(0.0, 10.5), (10.5, 20.3), (20.3, 30.1), (30.1, 45.0)]
        );
    }

    #[test]
    fn test_no_markers_single_split() {
        assert_eq!(derive_splits(12.0, &[]), vec![TimeRange::new(0.0, 12.0)]);
    }

    #[test]
    fn test_zero_duration_single_empty_split() {
        let splits = derive_splits(0.0, &[]);
        assert_eq!(splits, vec![TimeRange::new(0.0, 0.0)]);
        assert_eq!(splits[0].duration(), 0.0);
    }

    #[test]
    fn test_edge_markers_skipped() {
        let splits = derive_splits(10.0, &[0.0, 5.0, 5.0, 10.0]);
        assert_eq!(splits, vec![TimeRange::new(0.0, 5.0), TimeRange::new(5.0, 10.0)]);
    }

    #[test]
    fn test_padding_follows_total() {
        assert_eq!(pad_width(9), 1);
        assert_eq!(pad_width(10), 2);
        assert_eq!(pad_width(100), 3);
        assert_eq!(format_index(7, 150), "007");
        assert_eq!(split_filename("split", 3, 12, "wav"), "split_03.wav");
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = TimeRange::new(1.0, 2.0);
        assert!(r.contains(1.0));
        assert!(!r.contains(2.0));
    }
}
