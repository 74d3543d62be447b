//! Silence detection for automatic marker placement
//!
//! Frame-wise RMS energy over the mono mix, in dB relative to the loudest
//! frame. Runs of frames below the threshold that last at least the
//! minimum duration become [`SilentRegion`]s; their midpoints are the
//! suggested split markers.

use crate::types::AudioSource;

/// RMS analysis frame length (samples)
pub const FRAME_LENGTH: usize = 2048;

/// Hop between analysis frames (samples)
pub const HOP_LENGTH: usize = 512;

/// Default silence threshold relative to the loudest frame
pub const DEFAULT_THRESHOLD_DB: f32 = -40.0;

/// Default minimum silence length in seconds
pub const DEFAULT_MIN_DURATION: f64 = 0.5;

/// Amplitude floor for the dB conversion
const AMIN: f32 = 1e-5;

/// Lowest dB value reported below the peak
const TOP_DB: f32 = 80.0;

/// A silent stretch of audio in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilentRegion {
    pub start: f64,
    pub end: f64,
}

impl SilentRegion {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// RMS of each centred analysis frame
///
/// Frame `i` is centred on sample `i * HOP_LENGTH` with zero padding at the
/// edges, so there are `1 + len / HOP_LENGTH` frames.
pub fn rms_frames(mono: &[f32]) -> Vec<f32> {
    if mono.is_empty() {
        return Vec::new();
    }
    let half = (FRAME_LENGTH / 2) as isize;
    let count = 1 + mono.len() / HOP_LENGTH;
    (0..count)
        .map(|i| {
            let centre = (i * HOP_LENGTH) as isize;
            let start = (centre - half).max(0) as usize;
            let end = ((centre + half).max(0) as usize).min(mono.len());
            let energy: f32 = mono[start..end].iter().map(|s| s * s).sum();
            (energy / FRAME_LENGTH as f32).sqrt()
        })
        .collect()
}

/// Convert RMS values to dB relative to the loudest frame
///
/// Values are floored at `max - 80 dB`. If every frame is below the
/// amplitude floor the signal is digital silence and every frame reports
/// `-inf`.
pub fn to_db(rms: &[f32]) -> Vec<f32> {
    let peak = rms.iter().copied().fold(0.0f32, f32::max);
    if peak <= AMIN {
        return vec![f32::NEG_INFINITY; rms.len()];
    }
    let reference = 20.0 * peak.log10();
    rms.iter()
        .map(|&r| (20.0 * r.max(AMIN).log10() - reference).max(-TOP_DB))
        .collect()
}

/// Find silent regions at least `min_duration` long
pub fn detect_silence(source: &AudioSource, threshold_db: f32, min_duration: f64) -> Vec<SilentRegion> {
    let db = to_db(&rms_frames(source.mono()));
    let rate = source.sample_rate() as f64;
    let frame_time = |i: usize| (i * HOP_LENGTH) as f64 / rate;

    let mut regions = Vec::new();
    let mut silence_start: Option<f64> = None;

    for (i, &level) in db.iter().enumerate() {
        let silent = level < threshold_db;
        match (silent, silence_start) {
            (true, None) => silence_start = Some(frame_time(i)),
            (false, Some(start)) => {
                let region = SilentRegion {
                    start,
                    end: frame_time(i),
                };
                if region.duration() >= min_duration {
                    regions.push(region);
                }
                silence_start = None;
            }
            _ => {}
        }
    }

    if let Some(start) = silence_start {
        let region = SilentRegion {
            start,
            end: source.duration(),
        };
        if region.duration() >= min_duration {
            regions.push(region);
        }
    }

    log::info!(
        "detect_silence: Found {} silent regions (threshold {} dB, min {:.2}s)",
        regions.len(),
        threshold_db,
        min_duration
    );
    regions
}

/// Marker candidates: the middle of each silent region
pub fn silence_markers(regions: &[SilentRegion]) -> Vec<f64> {
    regions.iter().map(SilentRegion::midpoint).collect()
}

/// Frame range of `mono` left after trimming silent edges
///
/// Keeps everything from the first to the last frame louder than
/// `threshold_db`. An all-silent segment is left untouched.
pub fn trim_range(mono: &[f32], threshold_db: f32) -> std::ops::Range<usize> {
    let db = to_db(&rms_frames(mono));
    let first = db.iter().position(|&d| d > threshold_db);
    let last = db.iter().rposition(|&d| d > threshold_db);
    match (first, last) {
        (Some(first), Some(last)) => {
            let start = (first * HOP_LENGTH).min(mono.len());
            let end = ((last + 1) * HOP_LENGTH).min(mono.len());
            start..end.max(start)
        }
        _ => 0..mono.len(),
    }
}
