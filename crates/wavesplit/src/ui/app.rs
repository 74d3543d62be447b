//! Main application state and iced implementation

use super::message::Message;
use super::state::{Document, ExportState};
use super::confirm_modal::ConfirmState;
use super::{confirm_modal, controls, export_modal};
use crate::config::{self, Config};
use iced::widget::{center, column, container, mouse_area, opaque, row, stack, text, Space};
use iced::{Color, Element, Length, Subscription, Task, Theme};
use std::path::PathBuf;
use std::time::Duration;
use wavesplit_core::export::ExportService;
use wavesplit_widgets::split_editor;

/// Position poll interval while playing or exporting
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Main application
pub struct WavesplitApp {
    /// Open audio file, if any
    pub document: Option<Document>,
    /// Persisted settings (written back on export and settings changes)
    pub config: Config,
    pub config_path: PathBuf,
    pub export: ExportState,
    /// Destructive marker action waiting for the user
    pub confirm: ConfirmState,
    /// `None` when the worker pool could not be created
    pub export_service: Option<ExportService>,
    /// Transport was started and has not stopped yet
    pub playing: bool,
    /// A decode is running in the background
    pub loading: bool,
    /// Silence detection is running in the background
    pub detecting: bool,
    /// Status bar text
    pub status: String,
}

impl WavesplitApp {
    /// Create the application, optionally loading `initial_file` right away
    pub fn new(initial_file: Option<PathBuf>) -> (Self, Task<Message>) {
        let config_path = config::default_config_path();
        let config = config::load_config(&config_path);
        log::info!(
            "Loaded config: export {} to {:?}",
            config.export.format,
            config.export.output_folder
        );

        let export_service = match ExportService::new() {
            Ok(service) => Some(service),
            Err(e) => {
                log::error!("Failed to start export workers: {} - export disabled", e);
                None
            }
        };

        let app = Self {
            document: None,
            config,
            config_path,
            export: ExportState::default(),
            confirm: ConfirmState::default(),
            export_service,
            playing: false,
            loading: false,
            detecting: false,
            status: String::from("Open an audio file to start"),
        };

        let cmd = match initial_file {
            Some(path) => Task::done(Message::AudioPicked(Some(path))),
            None => Task::none(),
        };
        (app, cmd)
    }

    /// Window title
    pub fn title(&self) -> String {
        match self.document.as_ref().and_then(|doc| doc.file_name()) {
            Some(name) => format!("wavesplit - {}", name),
            None => String::from("wavesplit"),
        }
    }

    /// Update state based on message
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // Files
            Message::OpenAudio => self.handle_open_audio(),
            Message::AudioPicked(path) => self.handle_audio_picked(path),
            Message::AudioLoaded(result) => self.handle_audio_loaded(result),
            Message::SaveMarkers => self.handle_save_markers(),
            Message::MarkersSavePicked(path) => self.handle_markers_save_picked(path),
            Message::LoadMarkers => self.handle_load_markers(),
            Message::MarkersLoadPicked(path) => self.handle_markers_load_picked(path),
            Message::MarkersLoaded(result) => self.handle_markers_loaded(result),

            // Editor
            Message::Pointer(event) => self.handle_pointer(event),
            Message::SetZoom(zoom) => self.handle_set_zoom(zoom),
            Message::SetVerticalZoom(value) => self.handle_set_vertical_zoom(value),
            Message::SetScroll(fraction) => self.handle_set_scroll(fraction),
            Message::ClearMarkers => self.handle_clear_markers(),

            // Confirmation
            Message::Confirm => self.handle_confirm(),
            Message::CancelConfirm => self.handle_cancel_confirm(),

            // Silence detection
            Message::SetSilenceThreshold(db) => self.handle_set_silence_threshold(db),
            Message::SetSilenceMinDuration(seconds) => self.handle_set_silence_min_duration(seconds),
            Message::DetectSilence => self.handle_detect_silence(),
            Message::SilenceDetected(result) => self.handle_silence_detected(result),

            // Transport
            Message::Play => self.handle_play(),
            Message::Stop => self.handle_stop(),
            Message::Tick => self.handle_tick(),

            // Export
            Message::OpenExport(mode) => self.handle_open_export(mode),
            Message::CloseExport => self.handle_close_export(),
            Message::SetExportFormat(format) => self.handle_set_export_format(format),
            Message::SetExportSampleRate(rate) => self.handle_set_export_sample_rate(rate),
            Message::SetExportChannels(channels) => self.handle_set_export_channels(channels),
            Message::SetExportQuality(quality) => self.handle_set_export_quality(quality),
            Message::SetExportPrefix(prefix) => self.handle_set_export_prefix(prefix),
            Message::SetConcatFilename(name) => self.handle_set_concat_filename(name),
            Message::SetConcatSilence(value) => self.handle_set_concat_silence(value),
            Message::SetTrimSilence(trim) => self.handle_set_trim_silence(trim),
            Message::PickOutputFolder => self.handle_pick_output_folder(),
            Message::OutputFolderPicked(path) => self.handle_output_folder_picked(path),
            Message::StartExport => self.handle_start_export(),
            Message::CancelExport => self.handle_cancel_export(),

            // Settings
            Message::ConfigSaved(result) => self.handle_config_saved(result),
        }
    }

    /// Render the UI
    pub fn view(&self) -> Element<'_, Message> {
        let editor: Element<Message> = match &self.document {
            Some(doc) => split_editor(&doc.editor, Message::Pointer),
            None => container(text(if self.loading {
                "Loading..."
            } else {
                "Open an audio file to start"
            }))
            .center(Length::Fill)
            .into(),
        };

        let main = column![
            controls::view_file_bar(self),
            container(editor).width(Length::Fill).height(Length::Fill),
            controls::view_scroll_bar(self),
            controls::view_control_groups(self),
            self.view_status_bar(),
        ]
        .spacing(10);

        let base: Element<Message> = container(main)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(12)
            .into();

        // Overlay confirmation or export modal if open
        if self.confirm.is_open() {
            let backdrop = modal_backdrop().on_press(Message::CancelConfirm);
            let modal = center(opaque(confirm_modal::view(&self.confirm)))
                .width(Length::Fill)
                .height(Length::Fill);
            stack![base, backdrop, modal].into()
        } else if self.export.is_open {
            let backdrop = modal_backdrop();
            // Clicking outside closes only when nothing is running
            let backdrop = if self.export.is_running() {
                backdrop
            } else {
                backdrop.on_press(Message::CloseExport)
            };

            let modal = center(opaque(export_modal::view(&self.export, &self.config)))
                .width(Length::Fill)
                .height(Length::Fill);

            stack![base, backdrop, modal].into()
        } else {
            base
        }
    }

    /// Application theme
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Periodic tick while the cursor moves or an export reports progress
    pub fn subscription(&self) -> Subscription<Message> {
        if self.playing || self.export.is_running() {
            iced::time::every(TICK_INTERVAL).map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }

    fn view_status_bar(&self) -> Element<'_, Message> {
        let markers = self
            .document
            .as_ref()
            .map(|doc| doc.viewport.regions().markers().len())
            .unwrap_or(0);
        row![
            text(&self.status).size(13),
            Space::new().width(Length::Fill),
            text(format!("Markers: {}", markers)).size(13),
        ]
        .spacing(10)
        .into()
    }
}

/// Dimmed full-window layer behind a modal
fn modal_backdrop<'a>() -> iced::widget::MouseArea<'a, Message> {
    mouse_area(
        container(Space::new())
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.6).into()),
                ..Default::default()
            }),
    )
}
