//! Export service with a thread pool for per-split exports
//!
//! The service owns a rayon pool and is created once at startup. Each job
//! carries an owned snapshot of the splits to write and a shared handle to
//! the decoded audio, so editing can continue while the export runs.

use super::encode::{check_encodable, encode_to_file, prepare_output_folder, render_concat, render_segment};
use super::settings::{ConcatSettings, ExportSettings};
use super::ExportProgress;
use crate::timeline::{split_filename, TimeRange};
use crate::types::AudioSource;

use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// One file per split
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub source: Arc<AudioSource>,
    /// Included splits in timeline order
    pub splits: Vec<TimeRange>,
    pub settings: ExportSettings,
}

/// Included splits joined into a single file
#[derive(Debug, Clone)]
pub struct ConcatJob {
    pub source: Arc<AudioSource>,
    pub splits: Vec<TimeRange>,
    pub settings: ConcatSettings,
}

/// Thread pool service for export and concatenation
pub struct ExportService {
    thread_pool: rayon::ThreadPool,
    /// Cancellation flag shared with workers
    cancel_flag: Arc<AtomicBool>,
}

impl ExportService {
    /// Create the service with 4 worker threads
    pub fn new() -> Result<Self, rayon::ThreadPoolBuildError> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .thread_name(|i| format!("split-export-{}", i))
            .build()?;

        Ok(Self {
            thread_pool,
            cancel_flag: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Write each split to `<folder>/<prefix>_<index>.<ext>`
    ///
    /// Returns a receiver for progress messages. The export runs in the
    /// background; the last message is always `Complete` or `Cancelled`.
    pub fn start_export(&self, job: ExportJob) -> Receiver<ExportProgress> {
        self.cancel_flag.store(false, Ordering::SeqCst);

        let (progress_tx, progress_rx) = channel();
        let cancel_flag = self.cancel_flag.clone();

        self.thread_pool.spawn(move || run_export(job, &progress_tx, &cancel_flag));

        progress_rx
    }

    /// Join splits into `<folder>/<filename>.<ext>`
    pub fn start_concat(&self, job: ConcatJob) -> Receiver<ExportProgress> {
        self.cancel_flag.store(false, Ordering::SeqCst);

        let (progress_tx, progress_rx) = channel();
        let cancel_flag = self.cancel_flag.clone();

        self.thread_pool.spawn(move || run_concat(job, &progress_tx, &cancel_flag));

        progress_rx
    }

    /// Workers stop before their next split
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }
}

/// Drop zero-length splits; returns the rest and how many were dropped
fn non_empty_splits(source: &AudioSource, splits: &[TimeRange]) -> (Vec<TimeRange>, usize) {
    let kept: Vec<TimeRange> = splits
        .iter()
        .copied()
        .filter(|r| !source.frames_for(r.start, r.end).is_empty())
        .collect();
    let skipped = splits.len() - kept.len();
    (kept, skipped)
}

fn run_export(job: ExportJob, progress_tx: &Sender<ExportProgress>, cancel_flag: &AtomicBool) {
    let start_time = Instant::now();
    let settings = job.settings;
    let target = settings.target();
    let (splits, skipped) = non_empty_splits(&job.source, &job.splits);
    let total_splits = splits.len();

    let _ = progress_tx.send(ExportProgress::Started { total_splits });
    if skipped > 0 {
        log::info!("run_export: Skipping {} zero-length splits", skipped);
    }

    if let Err(e) = prepare_output_folder(&settings.output_folder) {
        log::error!("run_export: {}", e);
        let _ = progress_tx.send(ExportProgress::Complete {
            duration: start_time.elapsed(),
            exported: 0,
            skipped,
            failed_files: vec![(settings.output_folder.display().to_string(), e.to_string())],
        });
        return;
    }

    let completed = AtomicUsize::new(0);
    let exported = AtomicUsize::new(0);
    let failed_files: Mutex<Vec<(String, String)>> = Mutex::new(Vec::new());

    splits.par_iter().enumerate().for_each(|(index, range)| {
        if cancel_flag.load(Ordering::Relaxed) {
            return;
        }

        let filename = split_filename(&settings.prefix, index + 1, total_splits, target.format.extension());
        let _ = progress_tx.send(ExportProgress::SplitStarted {
            filename: filename.clone(),
            index,
        });

        let path = settings.output_folder.join(&filename);
        let result = check_encodable(&target)
            .and_then(|_| render_segment(&job.source, *range, &target, settings.trim_silence))
            .and_then(|audio| encode_to_file(&path, &audio, &target));

        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        match result {
            Ok(()) => {
                exported.fetch_add(1, Ordering::Relaxed);
                log::debug!("run_export: Wrote {:?}", path);
                let _ = progress_tx.send(ExportProgress::SplitComplete {
                    filename,
                    index,
                    completed: done,
                    total_splits,
                });
            }
            Err(e) => {
                log::error!("run_export: Failed to export {}: {}", filename, e);
                if let Ok(mut failed) = failed_files.lock() {
                    failed.push((filename.clone(), e.to_string()));
                }
                let _ = progress_tx.send(ExportProgress::SplitFailed {
                    filename,
                    index,
                    error: e.to_string(),
                });
            }
        }
    });

    if cancel_flag.load(Ordering::Relaxed) {
        log::info!("run_export: Cancelled");
        let _ = progress_tx.send(ExportProgress::Cancelled);
        return;
    }

    let mut failed_files = failed_files.into_inner().unwrap_or_else(|e| e.into_inner());
    failed_files.sort();
    let exported = exported.load(Ordering::Relaxed);
    log::info!(
        "run_export: Exported {} splits to {:?} ({} failed, {} skipped)",
        exported,
        settings.output_folder,
        failed_files.len(),
        skipped
    );
    let _ = progress_tx.send(ExportProgress::Complete {
        duration: start_time.elapsed(),
        exported,
        skipped,
        failed_files,
    });
}

fn run_concat(job: ConcatJob, progress_tx: &Sender<ExportProgress>, cancel_flag: &AtomicBool) {
    let start_time = Instant::now();
    let settings = job.settings;
    let target = settings.target();
    let (splits, skipped) = non_empty_splits(&job.source, &job.splits);
    let filename = format!("{}.{}", settings.filename, target.format.extension());
    let path = settings.output_folder.join(&filename);

    let _ = progress_tx.send(ExportProgress::Started {
        total_splits: splits.len(),
    });
    let _ = progress_tx.send(ExportProgress::SplitStarted {
        filename: filename.clone(),
        index: 0,
    });

    let fail = |error: String| {
        log::error!("run_concat: Failed to write {}: {}", filename, error);
        let _ = progress_tx.send(ExportProgress::SplitFailed {
            filename: filename.clone(),
            index: 0,
            error: error.clone(),
        });
        let _ = progress_tx.send(ExportProgress::Complete {
            duration: start_time.elapsed(),
            exported: 0,
            skipped,
            failed_files: vec![(filename.clone(), error)],
        });
    };

    if splits.is_empty() {
        fail("No splits to join".to_string());
        return;
    }

    let result = check_encodable(&target)
        .and_then(|_| prepare_output_folder(&settings.output_folder))
        .and_then(|_| {
            render_concat(
                &job.source,
                &splits,
                &target,
                settings.trim_silence,
                settings.silence_ms,
            )
        });
    let audio = match result {
        Ok(audio) => audio,
        Err(e) => return fail(e.to_string()),
    };

    if cancel_flag.load(Ordering::Relaxed) {
        log::info!("run_concat: Cancelled");
        let _ = progress_tx.send(ExportProgress::Cancelled);
        return;
    }

    if let Err(e) = encode_to_file(&path, &audio, &target) {
        return fail(e.to_string());
    }

    log::info!(
        "run_concat: Joined {} splits into {:?} ({:.2}s)",
        splits.len(),
        path,
        audio.frame_count() as f64 / audio.sample_rate() as f64
    );
    let _ = progress_tx.send(ExportProgress::SplitComplete {
        filename,
        index: 0,
        completed: splits.len(),
        total_splits: splits.len(),
    });
    let _ = progress_tx.send(ExportProgress::Complete {
        duration: start_time.elapsed(),
        exported: splits.len(),
        skipped,
        failed_files: Vec::new(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::settings::{ChannelLayout, ExportFormat};
    use std::path::Path;

    fn source(seconds: f64, rate: u32) -> Arc<AudioSource> {
        let frames = (seconds * rate as f64) as usize;
        let samples = (0..frames).map(|i| (i as f32 * 0.1).sin() * 0.5).collect();
        Arc::new(AudioSource::new(samples, rate, 1))
    }

    fn collect(rx: Receiver<ExportProgress>) -> Vec<ExportProgress> {
        let mut messages = Vec::new();
        for msg in rx.iter() {
            let done = msg.is_terminal();
            messages.push(msg);
            if done {
                break;
            }
        }
        messages
    }

    fn export_settings(folder: &Path, format: ExportFormat) -> ExportSettings {
        ExportSettings {
            format,
            sample_rate: 8000,
            channels: ChannelLayout::Mono,
            output_folder: folder.to_path_buf(),
            ..ExportSettings::default()
        }
    }

    #[test]
    fn test_export_writes_numbered_wavs() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("nested").join("out");
        let service = ExportService::new().unwrap();
        let splits: Vec<TimeRange> = (0..10)
            .map(|i| TimeRange::new(i as f64 * 0.5, (i + 1) as f64 * 0.5))
            .collect();

        let messages = collect(service.start_export(ExportJob {
            source: source(5.0, 8000),
            splits,
            settings: export_settings(&folder, ExportFormat::Wav),
        }));

        match messages.last().unwrap() {
            ExportProgress::Complete {
                exported,
                skipped,
                failed_files,
                ..
            } => {
                assert_eq!(*exported, 10);
                assert_eq!(*skipped, 0);
                assert!(failed_files.is_empty());
            }
            other => panic!("unexpected terminal message {:?}", other),
        }

        // Ten splits pad to two digits
        let first = hound::WavReader::open(folder.join("split_01.wav")).unwrap();
        assert_eq!(first.duration(), 4000);
        assert!(folder.join("split_10.wav").exists());
        assert!(!folder.join("split_1.wav").exists());
    }

    #[test]
    fn test_zero_length_splits_skipped_not_failed() {
        let dir = tempfile::tempdir().unwrap();
        let service = ExportService::new().unwrap();
        let splits = vec![
            TimeRange::new(0.0, 1.0),
            TimeRange::new(1.0, 1.00001),
            TimeRange::new(1.00001, 2.0),
        ];

        let messages = collect(service.start_export(ExportJob {
            source: source(2.0, 8000),
            splits,
            settings: export_settings(dir.path(), ExportFormat::Wav),
        }));

        assert!(matches!(
            messages.last().unwrap(),
            ExportProgress::Complete { exported: 2, skipped: 1, failed_files, .. } if failed_files.is_empty()
        ));
        assert!(dir.path().join("split_1.wav").exists());
        assert!(dir.path().join("split_2.wav").exists());
    }

    #[test]
    fn test_unencodable_target_fails_per_split() {
        let dir = tempfile::tempdir().unwrap();
        let service = ExportService::new().unwrap();
        let splits = vec![TimeRange::new(0.0, 1.0), TimeRange::new(1.0, 2.0)];

        let messages = collect(service.start_export(ExportJob {
            source: source(2.0, 8000),
            splits,
            settings: ExportSettings {
                sample_rate: 96000,
                ..export_settings(dir.path(), ExportFormat::Mp3)
            },
        }));

        let failures = messages
            .iter()
            .filter(|m| matches!(m, ExportProgress::SplitFailed { .. }))
            .count();
        assert_eq!(failures, 2);
        match messages.last().unwrap() {
            ExportProgress::Complete {
                exported,
                failed_files,
                ..
            } => {
                assert_eq!(*exported, 0);
                assert_eq!(failed_files.len(), 2);
                assert_eq!(failed_files[0].0, "split_1.mp3");
            }
            other => panic!("unexpected terminal message {:?}", other),
        }
    }

    #[test]
    fn test_concat_joins_with_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let service = ExportService::new().unwrap();
        let settings = ConcatSettings {
            format: ExportFormat::Wav,
            sample_rate: 8000,
            channels: ChannelLayout::Mono,
            filename: "joined".to_string(),
            silence_ms: 250,
            output_folder: dir.path().to_path_buf(),
            ..ConcatSettings::default()
        };

        let messages = collect(service.start_concat(ConcatJob {
            source: source(3.0, 8000),
            splits: vec![
                TimeRange::new(0.0, 1.0),
                TimeRange::new(1.5, 2.0),
                TimeRange::new(2.5, 3.0),
            ],
            settings,
        }));

        assert!(matches!(
            messages.last().unwrap(),
            ExportProgress::Complete { exported: 3, .. }
        ));
        let reader = hound::WavReader::open(dir.path().join("joined.wav")).unwrap();
        assert_eq!(reader.duration(), 8000 + 4000 + 4000 + 2 * 2000);
    }

    #[test]
    fn test_concat_without_splits_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let service = ExportService::new().unwrap();
        let messages = collect(service.start_concat(ConcatJob {
            source: source(1.0, 8000),
            splits: Vec::new(),
            settings: ConcatSettings {
                output_folder: dir.path().to_path_buf(),
                ..ConcatSettings::default()
            },
        }));
        assert!(matches!(
            messages.last().unwrap(),
            ExportProgress::Complete { exported: 0, failed_files, .. } if failed_files.len() == 1
        ));
    }
}
