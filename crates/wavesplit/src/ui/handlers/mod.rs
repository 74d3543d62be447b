//! Message handlers organized by feature domain
//!
//! This module splits the update() function into logical groupings.
//! Each sub-module provides handler methods on WavesplitApp.

pub mod confirm;
pub mod editing;
pub mod export;
pub mod loading;
pub mod markers;
pub mod playback;
pub mod settings;
pub mod silence;
pub mod tick;

/// Render an error with its source chain for the status bar
pub(crate) fn error_chain(error: impl Into<anyhow::Error>) -> String {
    format!("{:#}", error.into())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::super::app::WavesplitApp;
    use super::super::state::Document;
    use crate::config::{Config, DisplayConfig};
    use std::path::PathBuf;
    use std::sync::Arc;
    use wavesplit_core::playback::NullTransport;
    use wavesplit_core::AudioSource;

    /// App with a mono sine document on the clock transport
    ///
    /// Nothing is written to disk: returned tasks are never run.
    pub fn app_with_audio(seconds: usize, sample_rate: u32) -> WavesplitApp {
        let samples = (0..seconds * sample_rate as usize)
            .map(|i| (i as f32 * 0.1).sin())
            .collect();
        let source = Arc::new(AudioSource::new(samples, sample_rate, 1));
        let transport = Box::new(NullTransport::new(source.duration()));
        let doc = Document::with_transport(
            PathBuf::from("take.wav"),
            source,
            &DisplayConfig::default(),
            transport,
        );

        WavesplitApp {
            document: Some(doc),
            config: Config::default(),
            config_path: PathBuf::from("unused.yaml"),
            export: Default::default(),
            confirm: Default::default(),
            export_service: None,
            playing: false,
            loading: false,
            detecting: false,
            status: String::new(),
        }
    }
}
