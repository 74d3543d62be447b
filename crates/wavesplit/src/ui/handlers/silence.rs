//! Silence detection handlers
//!
//! Handles: SetSilenceThreshold, SetSilenceMinDuration, DetectSilence,
//! SilenceDetected

use anyhow::Context;
use iced::Task;
use wavesplit_core::silence::{detect_silence, silence_markers, SilentRegion};

use super::super::app::WavesplitApp;
use super::super::confirm_modal::ConfirmTarget;
use super::super::message::Message;
use super::error_chain;

impl WavesplitApp {
    /// Handle SetSilenceThreshold message
    pub fn handle_set_silence_threshold(&mut self, db: f32) -> Task<Message> {
        self.config.silence.threshold_db = db;
        self.config.silence.validate();
        Task::none()
    }

    /// Handle SetSilenceMinDuration message
    pub fn handle_set_silence_min_duration(&mut self, seconds: f64) -> Task<Message> {
        self.config.silence.min_duration = seconds;
        self.config.silence.validate();
        Task::none()
    }

    /// Handle DetectSilence message
    ///
    /// Runs the detector on the blocking pool with the current settings,
    /// which are persisted at the same time.
    pub fn handle_detect_silence(&mut self) -> Task<Message> {
        let Some(doc) = self.document.as_ref() else {
            return Task::none();
        };
        if self.detecting {
            return Task::none();
        }

        let source = doc.source.clone();
        let threshold_db = self.config.silence.threshold_db;
        let min_duration = self.config.silence.min_duration;
        self.detecting = true;
        self.status = String::from("Detecting silence...");

        let detect = Task::perform(
            async move {
                tokio::task::spawn_blocking(move || detect_silence(&source, threshold_db, min_duration))
                    .await
                    .context("Silence detection task panicked")
                    .map_err(error_chain)
            },
            Message::SilenceDetected,
        );
        Task::batch([detect, self.save_config_task()])
    }

    /// Handle SilenceDetected message
    ///
    /// Replaces all markers (and exclusions) with one marker in the middle
    /// of each silent region. Finding nothing leaves the markers alone;
    /// existing markers are only replaced after confirmation.
    pub fn handle_silence_detected(&mut self, result: Result<Vec<SilentRegion>, String>) -> Task<Message> {
        self.detecting = false;
        let regions = match result {
            Ok(regions) => regions,
            Err(e) => {
                log::error!("handle_silence_detected: {}", e);
                self.status = e;
                return Task::none();
            }
        };

        if regions.is_empty() {
            self.status = format!(
                "No silent regions found with threshold {:.0} dB and minimum duration {:.1} s",
                self.config.silence.threshold_db, self.config.silence.min_duration
            );
            return Task::none();
        }

        let existing = self
            .document
            .as_ref()
            .map_or(0, |doc| doc.viewport.regions().markers().len());
        if existing > 0 {
            self.status = format!("Found {} silent regions", regions.len());
            self.confirm
                .show(ConfirmTarget::ReplaceWithSilence { regions, existing });
            return Task::none();
        }

        self.apply_silence(&regions);
        Task::none()
    }

    /// Replace markers and exclusions with one marker per silent region
    pub(super) fn apply_silence(&mut self, regions: &[SilentRegion]) {
        if let Some(doc) = self.document.as_mut() {
            let placed = doc
                .viewport
                .regions_mut()
                .apply_silence_markers(silence_markers(regions));
            doc.refresh_regions();
            self.status = format!(
                "Found {} silent regions, added {} markers",
                regions.len(),
                placed
            );
        }
    }
}
