//! Playback control message handlers
//!
//! Handles: Play, Stop

use iced::Task;
use wavesplit_widgets::format_time;

use super::super::app::WavesplitApp;
use super::super::message::Message;

impl WavesplitApp {
    /// Handle Play message
    ///
    /// Starts from the editor cursor, which may have been scrubbed while
    /// stopped.
    pub fn handle_play(&mut self) -> Task<Message> {
        if let Some(doc) = self.document.as_mut() {
            let from = doc.viewport.cursor();
            doc.transport.seek(from);
            doc.transport.play();
            self.playing = true;
            self.status = format!("Playing from {}", format_time(doc.transport.position()));
        }
        Task::none()
    }

    /// Handle Stop message
    ///
    /// The cursor stays where playback stopped.
    pub fn handle_stop(&mut self) -> Task<Message> {
        if let Some(doc) = self.document.as_mut() {
            doc.transport.stop();
            doc.viewport.set_cursor(doc.transport.position());
            doc.refresh_regions();
        }
        self.playing = false;
        self.status = String::from("Playback stopped");
        Task::none()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::app_with_audio;
    use super::*;

    fn app(seconds: usize) -> WavesplitApp {
        app_with_audio(seconds, 100)
    }

    #[test]
    fn test_play_starts_at_cursor() {
        let mut app = app(60);
        app.document.as_mut().unwrap().viewport.set_cursor(12.0);
        let _ = app.handle_play();

        let doc = app.document.as_ref().unwrap();
        assert!(app.playing);
        assert!(doc.transport.is_playing());
        assert!(doc.transport.position() >= 12.0);
        assert!(app.status.starts_with("Playing from 00:12"));
    }

    #[test]
    fn test_stop_keeps_cursor() {
        let mut app = app(60);
        app.document.as_mut().unwrap().viewport.set_cursor(30.0);
        let _ = app.handle_play();
        let _ = app.handle_stop();

        let doc = app.document.as_ref().unwrap();
        assert!(!app.playing);
        assert!(!doc.transport.is_playing());
        assert!(doc.viewport.cursor() >= 30.0 && doc.viewport.cursor() < 31.0);
    }

    #[test]
    fn test_play_without_document_is_ignored() {
        let mut app = app(1);
        app.document = None;
        let _ = app.handle_play();
        assert!(!app.playing);
    }
}
