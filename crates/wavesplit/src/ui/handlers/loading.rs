//! Audio loading handlers
//!
//! Handles: OpenAudio, AudioPicked, AudioLoaded

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use iced::Task;
use wavesplit_core::audio_file::{decode_audio, SUPPORTED_EXTENSIONS};
use wavesplit_core::export::ExportFormat;
use wavesplit_core::AudioSource;
use wavesplit_widgets::format_time;

use super::super::app::WavesplitApp;
use super::super::message::Message;
use super::super::state::Document;
use super::error_chain;

impl WavesplitApp {
    /// Handle OpenAudio message
    pub fn handle_open_audio(&mut self) -> Task<Message> {
        let folder = self.config.folders.last_audio.clone();
        Task::perform(
            async move {
                let mut dialog = rfd::AsyncFileDialog::new()
                    .set_title("Load Audio File")
                    .add_filter("Audio files", SUPPORTED_EXTENSIONS)
                    .add_filter("All files", &["*"]);
                if let Some(folder) = folder {
                    dialog = dialog.set_directory(folder);
                }
                dialog.pick_file().await.map(|f| f.path().to_path_buf())
            },
            Message::AudioPicked,
        )
    }

    /// Handle AudioPicked message
    ///
    /// Decodes on the blocking pool; the current document stays editable
    /// until the new one arrives.
    pub fn handle_audio_picked(&mut self, path: Option<PathBuf>) -> Task<Message> {
        let Some(path) = path else {
            return Task::none();
        };
        if self.loading {
            log::warn!("handle_audio_picked: Already loading, ignoring {:?}", path);
            return Task::none();
        }

        self.loading = true;
        self.status = format!("Loading {}...", path.display());
        log::info!("handle_audio_picked: Loading {:?}", path);

        Task::perform(
            async move {
                let decoded = tokio::task::spawn_blocking(move || {
                    decode_audio(&path)
                        .with_context(|| format!("Failed to load {}", path.display()))
                        .map(|source| (path, Arc::new(source)))
                })
                .await
                .context("Decoder task panicked")
                .and_then(|result| result);
                decoded.map_err(error_chain)
            },
            Message::AudioLoaded,
        )
    }

    /// Handle AudioLoaded message
    ///
    /// Replaces the document; markers of the previous file are discarded.
    pub fn handle_audio_loaded(&mut self, result: Result<(PathBuf, Arc<AudioSource>), String>) -> Task<Message> {
        self.loading = false;
        match result {
            Ok((path, source)) => {
                if let Some(doc) = self.document.as_mut() {
                    doc.transport.stop();
                }
                self.playing = false;
                self.confirm.cancel();

                self.status = format!(
                    "Loaded {} ({}, {} Hz, {} ch)",
                    path.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    format_time(source.duration()),
                    source.sample_rate(),
                    source.channels()
                );
                log::info!("handle_audio_loaded: {}", self.status);

                self.config.folders.last_audio = path.parent().map(|p| p.to_path_buf());
                // Export in the input's format when it is one we can write
                if let Some(format) = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .and_then(ExportFormat::from_extension)
                {
                    self.config.export.format = format;
                    self.config.concat.format = format;
                }
                self.document = Some(Document::new(path, source, &self.config.display));
                self.save_config_task()
            }
            Err(e) => {
                log::error!("handle_audio_loaded: {}", e);
                self.status = e;
                Task::none()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::app_with_audio;
    use super::*;

    fn loaded(app: &mut WavesplitApp, name: &str) {
        let source = Arc::new(AudioSource::new(vec![0.0; 800], 100, 1));
        let _ = app.handle_audio_loaded(Ok((PathBuf::from(name), source)));
    }

    #[test]
    fn test_export_format_follows_input() {
        let mut app = app_with_audio(1, 100);
        loaded(&mut app, "/music/interview.mp3");
        assert_eq!(app.config.export.format, ExportFormat::Mp3);
        assert_eq!(app.config.concat.format, ExportFormat::Mp3);
        assert_eq!(app.document.as_ref().unwrap().source.duration(), 8.0);

        // Formats we cannot write keep the previous choice
        loaded(&mut app, "/music/interview.m4a");
        assert_eq!(app.config.export.format, ExportFormat::Mp3);
    }

    #[test]
    fn test_failed_load_keeps_document() {
        let mut app = app_with_audio(2, 100);
        app.loading = true;
        let _ = app.handle_audio_loaded(Err(String::from("Failed to load x.wav")));
        assert!(!app.loading);
        assert_eq!(app.status, "Failed to load x.wav");
        assert!(app.document.is_some());
    }
}
