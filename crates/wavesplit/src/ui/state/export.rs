//! Export dialog state
//!
//! One modal serves both per-split export and concatenation. The encode
//! options edited in the modal live in the config sections of the active
//! mode, so they persist between sessions.

use std::sync::mpsc::Receiver;
use std::time::Duration;
use wavesplit_core::export::ExportProgress;

/// What the dialog writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// One numbered file per included split
    #[default]
    Splits,
    /// All included splits in one file
    Concat,
}

impl ExportMode {
    pub fn title(&self) -> &'static str {
        match self {
            ExportMode::Splits => "Export Splits",
            ExportMode::Concat => "Concat Splits",
        }
    }
}

/// Phase of the export process
#[derive(Debug, Clone, Default)]
pub enum ExportPhase {
    /// Editing options
    #[default]
    Configure,

    /// Workers are running
    Exporting {
        current_file: String,
        completed: usize,
        total: usize,
    },

    Complete {
        duration: Duration,
        exported: usize,
        skipped: usize,
        /// Failed files: (filename, error_message)
        failed_files: Vec<(String, String)>,
        summary: String,
    },

    Cancelled,
}

impl ExportPhase {
    pub fn is_exporting(&self) -> bool {
        matches!(self, ExportPhase::Exporting { .. })
    }

    /// Fraction for the progress bar
    pub fn progress(&self) -> f32 {
        match self {
            ExportPhase::Exporting { completed, total, .. } if *total > 0 => {
                *completed as f32 / *total as f32
            }
            ExportPhase::Complete { .. } => 1.0,
            _ => 0.0,
        }
    }

    /// Get a human-readable status message
    pub fn status_message(&self) -> String {
        match self {
            ExportPhase::Configure => String::new(),
            ExportPhase::Exporting {
                current_file,
                completed,
                total,
            } => format!("Exporting {}/{}: {}", completed, total, current_file),
            ExportPhase::Complete { summary, .. } => summary.clone(),
            ExportPhase::Cancelled => "Export cancelled".to_string(),
        }
    }

    /// Fold one progress message into the phase
    pub fn apply(&mut self, progress: &ExportProgress) {
        match progress {
            ExportProgress::Started { total_splits } => {
                *self = ExportPhase::Exporting {
                    current_file: String::new(),
                    completed: 0,
                    total: *total_splits,
                };
            }
            ExportProgress::SplitStarted { filename, .. } => {
                if let ExportPhase::Exporting { current_file, .. } = self {
                    *current_file = filename.clone();
                }
            }
            ExportProgress::SplitComplete {
                completed: done,
                total_splits,
                ..
            } => {
                if let ExportPhase::Exporting { completed, total, .. } = self {
                    *completed = (*done).max(*completed);
                    *total = *total_splits;
                }
            }
            ExportProgress::SplitFailed { filename, error, .. } => {
                log::warn!("export: {} failed: {}", filename, error);
                if let ExportPhase::Exporting { completed, .. } = self {
                    *completed += 1;
                }
            }
            ExportProgress::Complete {
                duration,
                exported,
                skipped,
                failed_files,
            } => {
                *self = ExportPhase::Complete {
                    duration: *duration,
                    exported: *exported,
                    skipped: *skipped,
                    failed_files: failed_files.clone(),
                    summary: progress.description(),
                };
            }
            ExportProgress::Cancelled => *self = ExportPhase::Cancelled,
        }
    }
}

/// State for the export modal
#[derive(Debug, Default)]
pub struct ExportState {
    pub is_open: bool,
    pub mode: ExportMode,
    pub phase: ExportPhase,
    /// Text of the concat gap field, parsed on change
    pub draft_silence_ms: String,
    /// Progress channel of the running job
    pub progress_rx: Option<Receiver<ExportProgress>>,
}

impl ExportState {
    /// Reset state when opening the modal
    pub fn open(&mut self, mode: ExportMode, silence_ms: u32) {
        self.is_open = true;
        self.mode = mode;
        self.draft_silence_ms = silence_ms.to_string();
        if !self.phase.is_exporting() {
            self.phase = ExportPhase::Configure;
        }
    }

    pub fn is_running(&self) -> bool {
        self.progress_rx.is_some()
    }

    /// Drain pending progress messages; returns the terminal one if seen
    ///
    /// The receiver is dropped once the job has finished or its sender is
    /// gone.
    pub fn poll(&mut self) -> Option<ExportProgress> {
        let rx = self.progress_rx.as_ref()?;
        let mut terminal = None;
        let mut disconnected = false;
        loop {
            match rx.try_recv() {
                Ok(progress) => {
                    self.phase.apply(&progress);
                    if progress.is_terminal() {
                        terminal = Some(progress);
                        break;
                    }
                }
                Err(std::sync::mpsc::TryRecvError::Empty) => break,
                Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        if terminal.is_some() || disconnected {
            self.progress_rx = None;
        }
        if disconnected && terminal.is_none() && self.phase.is_exporting() {
            log::error!("poll: Export workers exited without a final report");
            self.phase = ExportPhase::Cancelled;
        }
        terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn test_poll_folds_progress_until_complete() {
        let (tx, rx) = channel();
        let mut state = ExportState {
            progress_rx: Some(rx),
            ..Default::default()
        };

        tx.send(ExportProgress::Started { total_splits: 2 }).unwrap();
        tx.send(ExportProgress::SplitStarted {
            filename: "split_1.wav".to_string(),
            index: 0,
        })
        .unwrap();
        tx.send(ExportProgress::SplitComplete {
            filename: "split_1.wav".to_string(),
            index: 0,
            completed: 1,
            total_splits: 2,
        })
        .unwrap();

        assert!(state.poll().is_none());
        assert!(state.is_running());
        assert!(state.phase.is_exporting());
        assert_eq!(state.phase.progress(), 0.5);

        tx.send(ExportProgress::Complete {
            duration: Duration::from_millis(1500),
            exported: 2,
            skipped: 0,
            failed_files: Vec::new(),
        })
        .unwrap();

        assert!(matches!(state.poll(), Some(ExportProgress::Complete { .. })));
        assert!(!state.is_running());
        assert_eq!(state.phase.progress(), 1.0);
        assert!(state.phase.status_message().starts_with("Export complete: 2 exported"));
    }

    #[test]
    fn test_dropped_sender_ends_job() {
        let (tx, rx) = channel();
        let mut state = ExportState {
            progress_rx: Some(rx),
            ..Default::default()
        };
        tx.send(ExportProgress::Started { total_splits: 3 }).unwrap();
        drop(tx);

        assert!(state.poll().is_none());
        assert!(!state.is_running());
        assert!(matches!(state.phase, ExportPhase::Cancelled));
    }

    #[test]
    fn test_open_keeps_running_phase() {
        let mut state = ExportState::default();
        state.phase = ExportPhase::Exporting {
            current_file: "x".to_string(),
            completed: 0,
            total: 1,
        };
        state.open(ExportMode::Concat, 750);
        assert!(state.phase.is_exporting());
        assert_eq!(state.mode, ExportMode::Concat);
        assert_eq!(state.draft_silence_ms, "750");
    }
}
