//! Application messages
//!
//! All message types that can be dispatched in the wavesplit application.

use std::path::PathBuf;
use std::sync::Arc;

use wavesplit_core::export::{ChannelLayout, ExportFormat, Quality};
use wavesplit_core::markers::MarkerDocument;
use wavesplit_core::silence::SilentRegion;
use wavesplit_core::AudioSource;
use wavesplit_widgets::PointerEvent;

use super::state::ExportMode;

/// Application messages
#[derive(Debug, Clone)]
pub enum Message {
    // Files
    OpenAudio,
    AudioPicked(Option<PathBuf>),
    /// Decoding finished on the blocking pool
    AudioLoaded(Result<(PathBuf, Arc<AudioSource>), String>),
    SaveMarkers,
    MarkersSavePicked(Option<PathBuf>),
    LoadMarkers,
    MarkersLoadPicked(Option<PathBuf>),
    MarkersLoaded(Result<(PathBuf, MarkerDocument), String>),

    // Editor
    /// Pointer input from the waveform canvas
    Pointer(PointerEvent),
    /// Horizontal zoom factor (1-100)
    SetZoom(f64),
    /// Vertical zoom slider position (1-50)
    SetVerticalZoom(u32),
    /// Scroll position as a fraction of the scrollable range
    SetScroll(f64),
    ClearMarkers,

    // Confirmation
    /// Run the action waiting in the confirmation modal
    Confirm,
    CancelConfirm,

    // Silence detection
    SetSilenceThreshold(f32),
    SetSilenceMinDuration(f64),
    DetectSilence,
    SilenceDetected(Result<Vec<SilentRegion>, String>),

    // Transport
    Play,
    Stop,
    /// Periodic update while playing or exporting
    Tick,

    // Export
    OpenExport(ExportMode),
    CloseExport,
    SetExportFormat(ExportFormat),
    SetExportSampleRate(u32),
    SetExportChannels(ChannelLayout),
    SetExportQuality(Quality),
    SetExportPrefix(String),
    SetConcatFilename(String),
    SetConcatSilence(String),
    SetTrimSilence(bool),
    PickOutputFolder,
    OutputFolderPicked(Option<PathBuf>),
    StartExport,
    CancelExport,

    // Settings
    ConfigSaved(Result<(), String>),
}
