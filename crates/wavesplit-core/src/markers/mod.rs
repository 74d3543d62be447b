//! Marker file persistence
//!
//! Markers and exclusions are saved next to the audio as JSON:
//!
//! ```json
//! {
//!   "audio_filename": "interview.wav",
//!   "markers": [10.5, 20.3, 30.1],
//!   "excluded_splits": [[20.3, 30.1]],
//!   "audio_duration": 45.0
//! }
//! ```
//!
//! Older files stored `excluded_splits` as split indices. Those cannot be
//! mapped back to time ranges without the marker layout they were made
//! against, so they are discarded on load while the markers are kept.

mod error;

pub use error::{MarkerFileError, MarkerFileResult};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::timeline::{RegionStore, TimeRange};

/// On-disk marker document
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MarkerDocument {
    pub audio_filename: Option<String>,
    pub markers: Vec<f64>,
    #[serde(serialize_with = "serialize_ranges")]
    pub excluded_splits: Vec<TimeRange>,
    pub audio_duration: f64,
    /// Set when the file used index-based exclusions that were dropped
    #[serde(skip)]
    pub legacy_exclusions: bool,
}

impl MarkerDocument {
    /// Snapshot the store for saving
    pub fn from_regions(regions: &RegionStore, audio_filename: Option<String>) -> Self {
        Self {
            audio_filename,
            markers: regions.markers().to_vec(),
            excluded_splits: regions.exclusions().to_vec(),
            audio_duration: regions.duration(),
            legacy_exclusions: false,
        }
    }

    /// Load markers then exclusions into a store
    ///
    /// Exclusions that do not line up with a split of the store are
    /// dropped by the store itself.
    pub fn apply_to(&self, regions: &mut RegionStore) {
        if (self.audio_duration - regions.duration()).abs() > 0.01 && self.audio_duration > 0.0 {
            log::warn!(
                "apply_to: Marker file duration {:.2}s differs from audio {:.2}s",
                self.audio_duration,
                regions.duration()
            );
        }
        regions.set_markers(self.markers.iter().copied());
        regions.set_exclusions(self.excluded_splits.iter().copied());
    }
}

fn serialize_ranges<S: serde::Serializer>(ranges: &[TimeRange], s: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeSeq;
    let mut seq = s.serialize_seq(Some(ranges.len()))?;
    for r in ranges {
        seq.serialize_element(&[r.start, r.end])?;
    }
    seq.end()
}

/// Raw shape used for tolerant loading
#[derive(Deserialize)]
///
/// Every field is read as a raw value so one malformed entry cannot fail
/// the whole file.
struct RawDocument {
    #[serde(default)]
    audio_filename: Value,
    #[serde(default)]
    markers: Value,
    #[serde(default)]
    excluded_splits: Value,
    #[serde(default)]
    audio_duration: Value,
}

/// Ensure the path ends in `.json` exactly once
pub fn with_json_extension(path: &Path) -> PathBuf {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".json");
        PathBuf::from(name)
    }
}

/// Save a marker document; returns the path actually written
pub fn save_markers(path: &Path, doc: &MarkerDocument) -> MarkerFileResult<PathBuf> {
    let path = with_json_extension(path);
    let json = serde_json::to_string_pretty(doc)?;
    std::fs::write(&path, json).map_err(|e| MarkerFileError::Write {
        path: path.clone(),
        source: e,
    })?;
    log::info!(
        "save_markers: Saved {} markers, {} exclusions to {:?}",
        doc.markers.len(),
        doc.excluded_splits.len(),
        path
    );
    Ok(path)
}

/// Load a marker document
///
/// Non-numeric or negative marker entries are skipped. Exclusions are only
/// accepted in `[start, end]` pair form; any other shape is treated as the
/// legacy index format and discarded.
pub fn load_markers(path: &Path) -> MarkerFileResult<MarkerDocument> {
    let contents = std::fs::read_to_string(path).map_err(|e| MarkerFileError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let raw: RawDocument = serde_json::from_str(&contents)?;

    if !raw.markers.is_array() {
        log::warn!("load_markers: {:?} has no marker list", path);
    }
    let mut markers: Vec<f64> = raw
        .markers
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_f64)
        .filter(|m| m.is_finite() && *m >= 0.0)
        .collect();
    markers.sort_by(f64::total_cmp);
    markers.dedup();

    let (excluded_splits, legacy_exclusions) = parse_exclusions(&raw.excluded_splits);
    if legacy_exclusions {
        log::warn!(
            "load_markers: {:?} uses index-based exclusions; they were discarded",
            path
        );
    }

    let doc = MarkerDocument {
        audio_filename: raw.audio_filename.as_str().map(str::to_string),
        markers,
        excluded_splits,
        audio_duration: number_or_zero(&raw.audio_duration),
        legacy_exclusions,
    };
    log::info!(
        "load_markers: Loaded {} markers, {} exclusions from {:?}",
        doc.markers.len(),
        doc.excluded_splits.len(),
        path
    );
    Ok(doc)
}

/// Duration as a number or numeric string; anything else reads as 0
fn number_or_zero(value: &Value) -> f64 {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        other => other.as_f64(),
    };
    parsed.filter(|d| d.is_finite() && *d >= 0.0).unwrap_or(0.0)
}

/// Returns the parsed ranges and whether a legacy shape was found
fn parse_exclusions(value: &Value) -> (Vec<TimeRange>, bool) {
    let items = match value {
        Value::Null => return (Vec::new(), false),
        Value::Array(items) => items,
        _ => return (Vec::new(), true),
    };

    let mut ranges = Vec::with_capacity(items.len());
    for item in items {
        let pair = item
            .as_array()
            .filter(|a| a.len() == 2)
            .and_then(|a| Some((a[0].as_f64()?, a[1].as_f64()?)));
        match pair {
            Some((start, end)) => ranges.push(TimeRange::new(start, end)),
            None => return (Vec::new(), true),
        }
    }
    (ranges, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_extension_added_once() {
        assert_eq!(with_json_extension(Path::new("/tmp/markers")), PathBuf::from("/tmp/markers.json"));
        assert_eq!(with_json_extension(Path::new("/tmp/markers.json")), PathBuf::from("/tmp/markers.json"));
        assert_eq!(with_json_extension(Path::new("/tmp/markers.JSON")), PathBuf::from("/tmp/markers.JSON"));
        assert_eq!(with_json_extension(Path::new("/tmp/take.v2")), PathBuf::from("/tmp/take.v2.json"));
    }

    #[test]
    fn test_save_appends_suffix_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut regions = RegionStore::new(45.0);
        regions.set_markers([10.5, 20.3, 30.1]);
        regions.toggle_exclusion(25.0);
        let doc = MarkerDocument::from_regions(&regions, Some("take.wav".to_string()));

        let written = save_markers(&dir.path().join("markers"), &doc).unwrap();
        assert_eq!(written, dir.path().join("markers.json"));
        let again = save_markers(&dir.path().join("markers.json"), &doc).unwrap();
        assert_eq!(again, written);
        assert!(!dir.path().join("markers.json.json").exists());

        let loaded = load_markers(&written).unwrap();
        assert_eq!(loaded.audio_filename.as_deref(), Some("take.wav"));
        assert_eq!(loaded.markers, vec![10.5, 20.3, 30.1]);
        assert!(!loaded.legacy_exclusions);

        let mut restored = RegionStore::new(45.0);
        loaded.apply_to(&mut restored);
        assert_eq!(restored.exclusions().len(), 1);
        assert!(restored.is_excluded(25.0));
    }

    #[test]
    fn test_written_exclusions_are_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let doc = MarkerDocument {
            audio_filename: None,
            markers: vec![1.0],
            excluded_splits: vec![TimeRange::new(1.0, 2.0)],
            audio_duration: 2.0,
            legacy_exclusions: false,
        };
        let path = save_markers(&dir.path().join("m.json"), &doc).unwrap();
        let value: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["excluded_splits"], serde_json::json!([[1.0, 2.0]]));
    }

    #[test]
    fn test_legacy_index_exclusions_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.json");
        std::fs::write(
            &path,
            r#"{"audio_filename": "a.mp3", "markers": [30.1, 10.5, 20.3], "excluded_splits": [0, 2]}"#,
        )
        .unwrap();

        let doc = load_markers(&path).unwrap();
        assert!(doc.legacy_exclusions);
        assert!(doc.excluded_splits.is_empty());
        assert_eq!(doc.markers, vec![10.5, 20.3, 30.1]);
        assert_eq!(doc.audio_duration, 0.0);
    }

    #[test]
    fn test_malformed_marker_entries_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.json");
        std::fs::write(&path, r#"{"markers": [5.0, "x", -1.0, 5.0, null, 2.5], "excluded_splits": []}"#).unwrap();
        let doc = load_markers(&path).unwrap();
        assert_eq!(doc.markers, vec![2.5, 5.0]);
        assert!(!doc.legacy_exclusions);
    }

    #[test]
    fn test_unparseable_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(load_markers(&path), Err(MarkerFileError::Parse(_))));
        assert!(matches!(
            load_markers(&dir.path().join("missing.json")),
            Err(MarkerFileError::Read { .. })
        ));
    }

    #[test]
    fn test_missing_or_null_markers_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_markers.json");
        std::fs::write(&path, r#"{"audio_filename": "a.mp3", "excluded_splits": [0, 2]}"#).unwrap();
        let doc = load_markers(&path).unwrap();
        assert!(doc.markers.is_empty());
        assert!(doc.legacy_exclusions);
        assert_eq!(doc.audio_filename.as_deref(), Some("a.mp3"));

        std::fs::write(&path, r#"{"markers": null, "excluded_splits": [[1.0, 2.0]]}"#).unwrap();
        let doc = load_markers(&path).unwrap();
        assert!(doc.markers.is_empty());
        assert_eq!(doc.excluded_splits, vec![TimeRange::new(1.0, 2.0)]);
    }

    #[test]
    fn test_loose_duration_and_filename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loose.json");

        std::fs::write(&path, r#"{"markers": [1.0], "audio_duration": "45.0"}"#).unwrap();
        assert_eq!(load_markers(&path).unwrap().audio_duration, 45.0);

        std::fs::write(&path, r#"{"markers": [1.0], "audio_duration": {"s": 3}, "audio_filename": 7}"#).unwrap();
        let doc = load_markers(&path).unwrap();
        assert_eq!(doc.audio_duration, 0.0);
        assert_eq!(doc.audio_filename, None);
        assert_eq!(doc.markers, vec![1.0]);
    }
}
