//! State for the open audio file

use std::path::{Path, PathBuf};
use std::sync::Arc;

use wavesplit_core::playback::{NullTransport, PlaybackTransport};
use wavesplit_core::viewport::Viewport;
use wavesplit_core::AudioSource;
use wavesplit_widgets::EditorState;

use crate::config::DisplayConfig;

/// One decoded file with its editing engine and transport
pub struct Document {
    pub path: PathBuf,
    /// Shared with export jobs and the output stream
    pub source: Arc<AudioSource>,
    pub viewport: Viewport,
    /// Render snapshot for the editor canvas
    pub editor: EditorState,
    pub transport: Box<dyn PlaybackTransport>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("path", &self.path)
            .field("duration", &self.source.duration())
            .field("markers", &self.viewport.regions().markers().len())
            .finish()
    }
}

impl Document {
    pub fn new(path: PathBuf, source: Arc<AudioSource>, display: &DisplayConfig) -> Self {
        let transport = open_transport(&source);
        Self::with_transport(path, source, display, transport)
    }

    pub fn with_transport(
        path: PathBuf,
        source: Arc<AudioSource>,
        display: &DisplayConfig,
        transport: Box<dyn PlaybackTransport>,
    ) -> Self {
        let mut viewport = Viewport::for_source(&source);
        viewport.set_vertical_scale(display.vertical_scale());
        viewport.set_zoom(display.zoom, Some(0.0));
        let editor = EditorState::from_viewport(&viewport, &source);
        Self {
            path,
            source,
            viewport,
            editor,
            transport,
        }
    }

    /// Rebuild the whole snapshot after the view changed
    pub fn refresh_view(&mut self) {
        self.editor = EditorState::from_viewport(&self.viewport, &self.source);
    }

    /// Rebuild markers, splits and cursor after an edit
    pub fn refresh_regions(&mut self) {
        self.editor.sync_regions(&self.viewport);
    }

    /// File name shown in the title and stored in marker files
    pub fn file_name(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    pub fn folder(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// Marker file suggested next to the audio
    pub fn default_markers_path(&self) -> PathBuf {
        self.path.with_extension("json")
    }
}

/// Output transport for a freshly loaded source
///
/// With `audio-output` the default device is tried first; without a device
/// the cursor still runs on the wall clock.
fn open_transport(source: &Arc<AudioSource>) -> Box<dyn PlaybackTransport> {
    #[cfg(feature = "audio-output")]
    {
        match wavesplit_core::playback::CpalTransport::open(Arc::clone(source)) {
            Ok(transport) => return Box::new(transport),
            Err(e) => log::warn!("open_transport: {} - playback will be silent", e),
        }
    }
    Box::new(NullTransport::new(source.duration()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(seconds: f64) -> Document {
        let rate = 1000;
        let samples = (0..(seconds * rate as f64) as usize)
            .map(|i| (i as f32 * 0.01).sin())
            .collect();
        let source = Arc::new(AudioSource::new(samples, rate, 1));
        let transport = Box::new(NullTransport::new(source.duration()));
        Document::with_transport(
            PathBuf::from("/tmp/take.wav"),
            source,
            &DisplayConfig::default(),
            transport,
        )
    }

    #[test]
    fn test_refresh_regions_tracks_edits() {
        let mut doc = document(30.0);
        doc.viewport.set_size(300.0, 200.0);
        doc.refresh_view();
        assert_eq!(doc.editor.peaks.len(), 300);

        doc.viewport.regions_mut().set_markers([10.0, 20.0]);
        doc.refresh_regions();
        assert_eq!(doc.editor.splits.len(), 3);
        assert_eq!(doc.editor.markers.len(), 2);
    }

    #[test]
    fn test_names() {
        let doc = document(1.0);
        assert_eq!(doc.file_name().as_deref(), Some("take.wav"));
        assert_eq!(doc.default_markers_path(), PathBuf::from("/tmp/take.json"));
        assert_eq!(doc.folder(), Some(Path::new("/tmp")));
    }
}
