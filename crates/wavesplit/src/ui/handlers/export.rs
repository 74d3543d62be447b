//! Export dialog message handlers
//!
//! Handles: OpenExport, CloseExport, SetExportFormat, SetExportSampleRate,
//! SetExportChannels, SetExportQuality, SetExportPrefix, SetConcatFilename,
//! SetConcatSilence, SetTrimSilence, PickOutputFolder, OutputFolderPicked,
//! StartExport, CancelExport

use std::path::PathBuf;

use iced::Task;
use wavesplit_core::export::{
    check_encodable, ChannelLayout, ConcatJob, EncodeTarget, ExportFormat, ExportJob, Quality,
};

use super::super::app::WavesplitApp;
use super::super::message::Message;
use super::super::state::{ExportMode, ExportPhase};
use super::error_chain;

impl WavesplitApp {
    /// Handle OpenExport message
    pub fn handle_open_export(&mut self, mode: ExportMode) -> Task<Message> {
        let has_markers = self
            .document
            .as_ref()
            .is_some_and(|doc| !doc.viewport.regions().markers().is_empty());
        if !has_markers {
            self.status = String::from("Add at least one marker before exporting");
            return Task::none();
        }
        if self.export.is_running() && self.export.mode != mode {
            self.status = String::from("Another export is still running");
            return Task::none();
        }

        log::info!("Opening export modal ({:?})", mode);
        self.export.open(mode, self.config.concat.silence_ms);
        Task::none()
    }

    /// Handle CloseExport message
    pub fn handle_close_export(&mut self) -> Task<Message> {
        if self.export.is_running() {
            return Task::none();
        }
        self.export.is_open = false;
        self.export.phase = ExportPhase::Configure;
        Task::none()
    }

    /// Handle SetExportFormat message
    pub fn handle_set_export_format(&mut self, format: ExportFormat) -> Task<Message> {
        self.update_target(|target| target.format = format);
        Task::none()
    }

    /// Handle SetExportSampleRate message
    pub fn handle_set_export_sample_rate(&mut self, rate: u32) -> Task<Message> {
        self.update_target(|target| target.sample_rate = rate);
        Task::none()
    }

    /// Handle SetExportChannels message
    pub fn handle_set_export_channels(&mut self, channels: ChannelLayout) -> Task<Message> {
        self.update_target(|target| target.channels = channels);
        Task::none()
    }

    /// Handle SetExportQuality message
    pub fn handle_set_export_quality(&mut self, quality: Quality) -> Task<Message> {
        self.update_target(|target| target.quality = quality);
        Task::none()
    }

    /// Handle SetExportPrefix message
    pub fn handle_set_export_prefix(&mut self, prefix: String) -> Task<Message> {
        self.config.export.prefix = prefix;
        Task::none()
    }

    /// Handle SetConcatFilename message
    pub fn handle_set_concat_filename(&mut self, name: String) -> Task<Message> {
        self.config.concat.filename = name;
        Task::none()
    }

    /// Handle SetConcatSilence message
    ///
    /// The field keeps whatever was typed; only digits update the setting.
    pub fn handle_set_concat_silence(&mut self, value: String) -> Task<Message> {
        if let Ok(ms) = value.trim().parse::<u32>() {
            self.config.concat.silence_ms = ms;
            self.config.concat.validate();
        } else if value.trim().is_empty() {
            self.config.concat.silence_ms = 0;
        }
        self.export.draft_silence_ms = value;
        Task::none()
    }

    /// Handle SetTrimSilence message
    pub fn handle_set_trim_silence(&mut self, trim: bool) -> Task<Message> {
        match self.export.mode {
            ExportMode::Splits => self.config.export.trim_silence = trim,
            ExportMode::Concat => self.config.concat.trim_silence = trim,
        }
        Task::none()
    }

    /// Handle PickOutputFolder message
    pub fn handle_pick_output_folder(&mut self) -> Task<Message> {
        let current = self.output_folder().clone();
        Task::perform(
            async move {
                let mut dialog = rfd::AsyncFileDialog::new().set_title("Select Output Folder");
                if current.is_dir() {
                    dialog = dialog.set_directory(current);
                }
                dialog.pick_folder().await.map(|f| f.path().to_path_buf())
            },
            Message::OutputFolderPicked,
        )
    }

    /// Handle OutputFolderPicked message
    pub fn handle_output_folder_picked(&mut self, path: Option<PathBuf>) -> Task<Message> {
        if let Some(path) = path {
            match self.export.mode {
                ExportMode::Splits => self.config.export.output_folder = path,
                ExportMode::Concat => self.config.concat.output_folder = path,
            }
        }
        Task::none()
    }

    /// Handle StartExport message
    ///
    /// Snapshots the included splits and hands them to the worker pool.
    /// Settings are persisted with the job.
    pub fn handle_start_export(&mut self) -> Task<Message> {
        if self.export.is_running() {
            return Task::none();
        }
        let Some(doc) = self.document.as_ref() else {
            return Task::none();
        };
        let Some(service) = self.export_service.as_ref() else {
            self.status = String::from("Export is unavailable: worker pool failed to start");
            return Task::none();
        };

        let splits = doc.viewport.regions().included_splits();
        if splits.is_empty() {
            self.status = String::from("Every split is excluded, nothing to export");
            return Task::none();
        }

        let mode = self.export.mode;
        let target = match mode {
            ExportMode::Splits => self.config.export.target(),
            ExportMode::Concat => self.config.concat.target(),
        };
        if let Err(e) = check_encodable(&target) {
            log::warn!("handle_start_export: {}", e);
            self.status = error_chain(e);
            return Task::none();
        }

        let source = doc.source.clone();
        let total = splits.len();
        let rx = match mode {
            ExportMode::Splits => {
                self.config.export.validate();
                log::info!(
                    "Exporting {} splits as {} to {:?}",
                    total,
                    self.config.export.format,
                    self.config.export.output_folder
                );
                service.start_export(ExportJob {
                    source,
                    splits,
                    settings: self.config.export.clone(),
                })
            }
            ExportMode::Concat => {
                self.config.concat.validate();
                log::info!(
                    "Concatenating {} splits as {} to {:?}",
                    total,
                    self.config.concat.format,
                    self.config.concat.output_folder
                );
                service.start_concat(ConcatJob {
                    source,
                    splits,
                    settings: self.config.concat.clone(),
                })
            }
        };

        self.export.progress_rx = Some(rx);
        self.export.phase = ExportPhase::Exporting {
            current_file: String::new(),
            completed: 0,
            total,
        };
        self.status = format!("{}: {} splits", mode.title(), total);
        self.save_config_task()
    }

    /// Handle CancelExport message
    pub fn handle_cancel_export(&mut self) -> Task<Message> {
        if let Some(service) = self.export_service.as_ref() {
            if self.export.is_running() {
                log::info!("Cancelling export");
                service.cancel();
            }
        }
        Task::none()
    }

    /// Edit the encode options of the active mode
    fn update_target(&mut self, edit: impl FnOnce(&mut EncodeTarget)) {
        match self.export.mode {
            ExportMode::Splits => {
                let mut target = self.config.export.target();
                edit(&mut target);
                self.config.export.set_target(target);
            }
            ExportMode::Concat => {
                let mut target = self.config.concat.target();
                edit(&mut target);
                self.config.concat.set_target(target);
            }
        }
    }

    fn output_folder(&self) -> &PathBuf {
        match self.export.mode {
            ExportMode::Splits => &self.config.export.output_folder,
            ExportMode::Concat => &self.config.concat.output_folder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::app_with_audio;
    use super::*;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;
    use wavesplit_core::export::ExportService;

    fn app_with_markers(markers: &[f64]) -> WavesplitApp {
        let mut app = app_with_audio(10, 8000);
        app.document
            .as_mut()
            .unwrap()
            .viewport
            .regions_mut()
            .set_markers(markers.iter().copied());
        app
    }

    /// Tick until the job reports its final message
    fn run_to_end(app: &mut WavesplitApp) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while app.export.is_running() {
            assert!(Instant::now() < deadline, "export did not finish");
            std::thread::sleep(Duration::from_millis(10));
            let _ = app.handle_tick();
        }
    }

    #[test]
    fn test_open_requires_markers() {
        let mut app = app_with_markers(&[]);
        let _ = app.handle_open_export(ExportMode::Splits);
        assert!(!app.export.is_open);

        let mut app = app_with_markers(&[4.0]);
        let _ = app.handle_open_export(ExportMode::Concat);
        assert!(app.export.is_open);
        assert_eq!(app.export.mode, ExportMode::Concat);
        assert_eq!(app.export.draft_silence_ms, "500");
    }

    #[test]
    fn test_options_follow_active_mode() {
        let mut app = app_with_markers(&[4.0]);
        let _ = app.handle_open_export(ExportMode::Concat);
        let _ = app.handle_set_export_format(ExportFormat::Flac);
        let _ = app.handle_set_export_sample_rate(12_345);
        let _ = app.handle_set_trim_silence(true);

        assert_eq!(app.config.concat.format, ExportFormat::Flac);
        assert!(wavesplit_core::export::SAMPLE_RATES.contains(&app.config.concat.sample_rate));
        assert!(app.config.concat.trim_silence);
        assert_eq!(app.config.export.format, ExportFormat::Wav);
        assert!(!app.config.export.trim_silence);
    }

    #[test]
    fn test_concat_gap_draft() {
        let mut app = app_with_markers(&[4.0]);
        let _ = app.handle_open_export(ExportMode::Concat);

        let _ = app.handle_set_concat_silence(String::from("250"));
        assert_eq!(app.config.concat.silence_ms, 250);

        let _ = app.handle_set_concat_silence(String::from("25x"));
        assert_eq!(app.config.concat.silence_ms, 250);
        assert_eq!(app.export.draft_silence_ms, "25x");

        let _ = app.handle_set_concat_silence(String::from("999999"));
        assert_eq!(app.config.concat.silence_ms, 10_000);
    }

    #[test]
    fn test_export_writes_included_splits() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_markers(&[3.0, 6.0]);
        app.export_service = Some(ExportService::new().unwrap());
        app.config.export.output_folder = dir.path().to_path_buf();
        app.document
            .as_mut()
            .unwrap()
            .viewport
            .regions_mut()
            .toggle_exclusion(4.0);

        let _ = app.handle_open_export(ExportMode::Splits);
        let _ = app.handle_start_export();
        assert!(app.export.is_running());
        run_to_end(&mut app);

        match &app.export.phase {
            ExportPhase::Complete {
                exported,
                failed_files,
                ..
            } => {
                assert_eq!(*exported, 2);
                assert!(failed_files.is_empty());
            }
            other => panic!("unexpected phase {:?}", other),
        }
        let written = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(written, 2);
        assert!(app.status.starts_with("Export complete"));
    }

    #[test]
    fn test_unencodable_format_is_refused() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_markers(&[5.0]);
        app.export_service = Some(ExportService::new().unwrap());
        app.config.export.output_folder = dir.path().to_path_buf();
        app.config.export.format = ExportFormat::Mp3;
        app.config.export.sample_rate = 96000;

        let _ = app.handle_open_export(ExportMode::Splits);
        let _ = app.handle_start_export();
        assert!(!app.export.is_running());
        assert!(!app.status.is_empty());
    }

    #[test]
    fn test_close_blocked_while_running() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_markers(&[5.0]);
        app.export_service = Some(ExportService::new().unwrap());
        app.config.concat.output_folder = dir.path().to_path_buf();

        let _ = app.handle_open_export(ExportMode::Concat);
        let _ = app.handle_start_export();
        let _ = app.handle_close_export();
        assert!(app.export.is_open);

        run_to_end(&mut app);
        let _ = app.handle_close_export();
        assert!(!app.export.is_open);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
