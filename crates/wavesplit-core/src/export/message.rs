//! Export progress messages
//!
//! Sent from the worker pool to the UI over an mpsc channel:
//!
//! Started → SplitStarted → SplitComplete/SplitFailed → ... → Complete/Cancelled

use std::time::Duration;

#[derive(Debug, Clone)]
pub enum ExportProgress {
    /// Export started
    Started {
        /// Number of splits that will be rendered
        total_splits: usize,
    },

    /// A split began rendering
    SplitStarted {
        /// Output file (or, for concatenation, the target file)
        filename: String,
        /// Position in the export queue (0-based)
        index: usize,
    },

    /// A split was rendered and, for per-split export, written
    SplitComplete {
        filename: String,
        index: usize,
        /// Splits finished so far, successful or not
        completed: usize,
        total_splits: usize,
    },

    /// A split could not be rendered or written
    SplitFailed {
        filename: String,
        index: usize,
        error: String,
    },

    /// All splits processed
    Complete {
        duration: Duration,
        /// Files written (per-split export) or splits joined (concatenation)
        exported: usize,
        /// Zero-length splits that produced no output
        skipped: usize,
        /// Files that failed with their error messages
        failed_files: Vec<(String, String)>,
    },

    /// Export was cancelled by the user
    Cancelled,
}

impl ExportProgress {
    /// Human-readable status line
    pub fn description(&self) -> String {
        match self {
            Self::Started { total_splits } => {
                format!("Starting export of {} splits", total_splits)
            }
            Self::SplitStarted { filename, .. } => format!("Exporting: {}", filename),
            Self::SplitComplete {
                completed,
                total_splits,
                ..
            } => format!("Exported {}/{}", completed, total_splits),
            Self::SplitFailed { filename, error, .. } => {
                format!("Failed: {} - {}", filename, error)
            }
            Self::Complete {
                duration,
                exported,
                skipped,
                failed_files,
            } => {
                let mut line = format!(
                    "Export complete: {} exported in {:.1}s",
                    exported,
                    duration.as_secs_f64()
                );
                if *skipped > 0 {
                    line.push_str(&format!(", {} empty skipped", skipped));
                }
                if !failed_files.is_empty() {
                    line.push_str(&format!(", {} failed", failed_files.len()));
                }
                line
            }
            Self::Cancelled => "Export cancelled".to_string(),
        }
    }

    /// Complete or Cancelled
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Cancelled)
    }

    /// Progress from 0.0 to 1.0, when this message carries one
    pub fn progress_fraction(&self) -> Option<f32> {
        match self {
            Self::SplitComplete {
                completed,
                total_splits,
                ..
            } if *total_splits > 0 => Some(*completed as f32 / *total_splits as f32),
            Self::Complete { .. } => Some(1.0),
            Self::Started { .. } => Some(0.0),
            _ => None,
        }
    }
}
