//! Marker file handlers
//!
//! Handles: SaveMarkers, MarkersSavePicked, LoadMarkers, MarkersLoadPicked,
//! MarkersLoaded, ClearMarkers

use std::path::PathBuf;

use iced::Task;
use wavesplit_core::markers::{load_markers, save_markers, MarkerDocument};

use super::super::app::WavesplitApp;
use super::super::confirm_modal::ConfirmTarget;
use super::super::message::Message;
use super::error_chain;

impl WavesplitApp {
    /// Handle SaveMarkers message
    pub fn handle_save_markers(&mut self) -> Task<Message> {
        let Some(doc) = self.document.as_ref() else {
            return Task::none();
        };
        if doc.viewport.regions().markers().is_empty() {
            self.status = String::from("There are no markers to save");
            return Task::none();
        }

        let suggested = doc.default_markers_path();
        let folder = self
            .config
            .folders
            .last_markers
            .clone()
            .or_else(|| doc.folder().map(|p| p.to_path_buf()));
        let file_name = suggested
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("markers.json"));

        Task::perform(
            async move {
                let mut dialog = rfd::AsyncFileDialog::new()
                    .set_title("Save Markers")
                    .add_filter("JSON files", &["json"])
                    .set_file_name(file_name);
                if let Some(folder) = folder {
                    dialog = dialog.set_directory(folder);
                }
                dialog.save_file().await.map(|f| f.path().to_path_buf())
            },
            Message::MarkersSavePicked,
        )
    }

    /// Handle MarkersSavePicked message
    pub fn handle_markers_save_picked(&mut self, path: Option<PathBuf>) -> Task<Message> {
        let (Some(path), Some(doc)) = (path, self.document.as_ref()) else {
            return Task::none();
        };

        let marker_doc = MarkerDocument::from_regions(doc.viewport.regions(), doc.file_name());
        match save_markers(&path, &marker_doc) {
            Ok(written) => {
                self.status = format!(
                    "Saved {} markers to {}",
                    marker_doc.markers.len(),
                    written.display()
                );
                self.config.folders.last_markers = written.parent().map(|p| p.to_path_buf());
                self.save_config_task()
            }
            Err(e) => {
                log::error!("handle_markers_save_picked: {}", e);
                self.status = error_chain(e);
                Task::none()
            }
        }
    }

    /// Handle LoadMarkers message
    pub fn handle_load_markers(&mut self) -> Task<Message> {
        let Some(doc) = self.document.as_ref() else {
            return Task::none();
        };
        let folder = self
            .config
            .folders
            .last_markers
            .clone()
            .or_else(|| doc.folder().map(|p| p.to_path_buf()));

        Task::perform(
            async move {
                let mut dialog = rfd::AsyncFileDialog::new()
                    .set_title("Load Markers")
                    .add_filter("JSON files", &["json"])
                    .add_filter("All files", &["*"]);
                if let Some(folder) = folder {
                    dialog = dialog.set_directory(folder);
                }
                dialog.pick_file().await.map(|f| f.path().to_path_buf())
            },
            Message::MarkersLoadPicked,
        )
    }

    /// Handle MarkersLoadPicked message
    pub fn handle_markers_load_picked(&mut self, path: Option<PathBuf>) -> Task<Message> {
        let Some(path) = path else {
            return Task::none();
        };
        Task::perform(
            async move {
                load_markers(&path)
                    .map(|doc| (path, doc))
                    .map_err(error_chain)
            },
            Message::MarkersLoaded,
        )
    }

    /// Handle MarkersLoaded message
    ///
    /// Replaces markers and exclusions of the open document.
    pub fn handle_markers_loaded(&mut self, result: Result<(PathBuf, MarkerDocument), String>) -> Task<Message> {
        let (path, marker_doc) = match result {
            Ok(loaded) => loaded,
            Err(e) => {
                log::error!("handle_markers_loaded: {}", e);
                self.status = e;
                return Task::none();
            }
        };
        let Some(doc) = self.document.as_mut() else {
            return Task::none();
        };

        marker_doc.apply_to(doc.viewport.regions_mut());
        doc.refresh_regions();

        let regions = doc.viewport.regions();
        let mut status = format!(
            "Loaded {} markers, {} excluded splits",
            regions.markers().len(),
            regions.exclusions().len()
        );
        if marker_doc.legacy_exclusions {
            status.push_str(" (old index-based exclusions were discarded)");
        }
        if let Some(audio) = &marker_doc.audio_filename {
            if doc.file_name().as_deref() != Some(audio.as_str()) {
                status.push_str(&format!(" | saved for {}", audio));
            }
        }
        self.status = status;

        self.config.folders.last_markers = path.parent().map(|p| p.to_path_buf());
        self.save_config_task()
    }

    /// Handle ClearMarkers message
    ///
    /// Only asks; the markers go once the user confirms.
    pub fn handle_clear_markers(&mut self) -> Task<Message> {
        let count = self
            .document
            .as_ref()
            .map_or(0, |doc| doc.viewport.regions().markers().len());
        if count > 0 {
            self.confirm.show(ConfirmTarget::ClearMarkers { count });
        }
        Task::none()
    }

    /// Remove every marker and exclusion of the open document
    pub(super) fn clear_markers(&mut self) {
        if let Some(doc) = self.document.as_mut() {
            let count = doc.viewport.regions().markers().len();
            doc.viewport.regions_mut().clear();
            doc.refresh_regions();
            self.status = format!("Removed {} markers", count);
        }
    }
}
