//! Region store: the single owner of markers and excluded ranges
//!
//! Exclusions are stored as `(start, end)` time ranges. Every marker
//! mutation revalidates them against the freshly derived splits: a range
//! that still matches a split is kept, anything else is dropped. A marker
//! move translates matching boundaries before revalidation, so an excluded
//! region follows its edge instead of drifting onto a neighbouring split.

use super::splits::{derive_splits, Split, TimeRange, BOUNDARY_EPSILON};

/// Two markers closer than this are treated as the same marker (seconds)
pub const MARKER_EPSILON: f64 = 0.01;

/// Markers and exclusions for one document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionStore {
    duration: f64,
    /// Ascending, de-duplicated, strictly inside `(0, duration)`
    markers: Vec<f64>,
    /// Each entry matches one current split
    exclusions: Vec<TimeRange>,
}

impl RegionStore {
    pub fn new(duration: f64) -> Self {
        Self {
            duration: sanitize(duration).max(0.0),
            markers: Vec::new(),
            exclusions: Vec::new(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn markers(&self) -> &[f64] {
        &self.markers
    }

    pub fn exclusions(&self) -> &[TimeRange] {
        &self.exclusions
    }

    fn clamp(&self, t: f64) -> f64 {
        sanitize(t).clamp(0.0, self.duration)
    }

    /// Would a marker at `t` produce a degenerate split?
    fn collides(&self, t: f64, ignore: Option<usize>) -> bool {
        if t <= 0.0 || t >= self.duration {
            return true;
        }
        self.markers
            .iter()
            .enumerate()
            .any(|(i, &m)| Some(i) != ignore && (m - t).abs() < MARKER_EPSILON)
    }

    fn nearest_index(&self, t: f64, tolerance: f64) -> Option<usize> {
        let t = sanitize(t);
        self.markers
            .iter()
            .enumerate()
            .map(|(i, &m)| (i, (m - t).abs()))
            .filter(|&(_, d)| d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Insert a marker; returns false if one already exists within
    /// [`MARKER_EPSILON`] or the clamped time sits on a file edge
    pub fn add_marker(&mut self, t: f64) -> bool {
        let t = self.clamp(t);
        if self.collides(t, None) {
            log::debug!("add_marker: Ignoring marker at {:.3}s (duplicate or edge)", t);
            return false;
        }
        let index = self.markers.partition_point(|&m| m < t);
        self.markers.insert(index, t);
        self.revalidate();
        true
    }

    /// Remove the marker nearest `t` within `tolerance`; returns its time
    pub fn remove_marker(&mut self, t: f64, tolerance: f64) -> Option<f64> {
        let index = self.nearest_index(t, tolerance)?;
        let removed = self.markers.remove(index);
        self.revalidate();
        Some(removed)
    }

    /// Marker nearest `t` within `tolerance`
    pub fn marker_at(&self, t: f64, tolerance: f64) -> Option<f64> {
        self.nearest_index(t, tolerance).map(|i| self.markers[i])
    }

    /// Move the marker nearest `old` (within `tolerance`) to `new`
    ///
    /// Exclusion boundaries equal to the old time are carried to the new
    /// time. Returns the marker's new time, or `None` if no marker was found
    /// or the target collides with another marker or a file edge.
    pub fn move_marker(&mut self, old: f64, new: f64, tolerance: f64) -> Option<f64> {
        let index = self.nearest_index(old, tolerance)?;
        let from = self.markers[index];
        let to = self.clamp(new);
        if self.collides(to, Some(index)) {
            return None;
        }

        self.markers.remove(index);
        let insert_at = self.markers.partition_point(|&m| m < to);
        self.markers.insert(insert_at, to);

        for range in &mut self.exclusions {
            if (range.start - from).abs() <= BOUNDARY_EPSILON {
                range.start = to;
            }
            if (range.end - from).abs() <= BOUNDARY_EPSILON {
                range.end = to;
            }
        }
        self.revalidate();
        Some(to)
    }

    /// Split containing `t` (`s <= t < e`, or the last split at `duration`)
    pub fn split_at(&self, t: f64) -> TimeRange {
        let t = self.clamp(t);
        let splits = derive_splits(self.duration, &self.markers);
        splits
            .iter()
            .copied()
            .find(|r| r.contains(t))
            .or_else(|| splits.last().copied())
            .unwrap_or_else(|| TimeRange::new(0.0, self.duration))
    }

    /// Flip the exclusion state of the split containing `t`; returns the
    /// new state
    pub fn toggle_exclusion(&mut self, t: f64) -> bool {
        let target = self.split_at(t);
        if let Some(pos) = self.exclusions.iter().position(|r| r.matches(&target)) {
            self.exclusions.remove(pos);
            false
        } else {
            self.exclusions.push(target);
            true
        }
    }

    /// True if `t` lies inside any excluded range
    pub fn is_excluded(&self, t: f64) -> bool {
        let t = self.clamp(t);
        self.exclusions
            .iter()
            .any(|r| r.contains(t) || (t == self.duration && (r.end - t).abs() <= BOUNDARY_EPSILON))
    }

    /// Current splits with their exclusion flags, in time order
    pub fn splits(&self) -> Vec<Split> {
        derive_splits(self.duration, &self.markers)
            .into_iter()
            .map(|range| Split {
                range,
                excluded: self.exclusions.iter().any(|r| r.matches(&range)),
            })
            .collect()
    }

    /// Snapshot of splits that are not excluded
    pub fn included_splits(&self) -> Vec<TimeRange> {
        self.splits()
            .into_iter()
            .filter(|s| !s.excluded)
            .map(|s| s.range)
            .collect()
    }

    /// Remove all markers and exclusions
    pub fn clear(&mut self) {
        self.markers.clear();
        self.exclusions.clear();
    }

    /// Replace the marker set; exclusions that no longer fit are dropped
    pub fn set_markers<I: IntoIterator<Item = f64>>(&mut self, markers: I) {
        self.markers.clear();
        for t in markers {
            let t = self.clamp(t);
            if !self.collides(t, None) {
                let index = self.markers.partition_point(|&m| m < t);
                self.markers.insert(index, t);
            }
        }
        self.revalidate();
    }

    /// Replace the exclusion set, keeping only ranges matching a current split
    pub fn set_exclusions<I: IntoIterator<Item = TimeRange>>(&mut self, ranges: I) {
        self.exclusions = ranges.into_iter().collect();
        self.revalidate();
    }

    /// Replace all markers with the given candidate times (e.g. silence
    /// midpoints); returns how many were placed
    pub fn apply_silence_markers<I: IntoIterator<Item = f64>>(&mut self, times: I) -> usize {
        self.clear();
        times.into_iter().filter(|&t| self.add_marker(t)).count()
    }

    fn revalidate(&mut self) {
        let splits = derive_splits(self.duration, &self.markers);
        let before = self.exclusions.len();
        let mut kept: Vec<TimeRange> = Vec::with_capacity(before);
        for range in self.exclusions.drain(..) {
            if let Some(split) = splits.iter().find(|s| s.matches(&range)) {
                if !kept.iter().any(|k| k.matches(split)) {
                    kept.push(*split);
                }
            }
        }
        if kept.len() != before {
            log::debug!(
                "revalidate: Dropped {} exclusion(s) no longer matching a split",
                before - kept.len()
            );
        }
        self.exclusions = kept;
    }
}

fn sanitize(t: f64) -> f64 {
    if t.is_nan() {
        0.0
    } else {
        t
    }
}
