//! Periodic tick handler
//!
//! Handles: Tick

use iced::Task;

use super::super::app::WavesplitApp;
use super::super::message::Message;

impl WavesplitApp {
    /// Handle Tick message
    ///
    /// Drains export progress and moves the cursor with the transport. The
    /// view follows the cursor, so peaks are only rebuilt when it scrolled.
    pub fn handle_tick(&mut self) -> Task<Message> {
        if let Some(done) = self.export.poll() {
            log::info!("handle_tick: {}", done.description());
            self.status = done.description();
        }

        if !self.playing {
            return Task::none();
        }
        let Some(doc) = self.document.as_mut() else {
            self.playing = false;
            return Task::none();
        };

        let scroll_before = doc.viewport.view().scroll_seconds;
        doc.viewport.on_position_changed(doc.transport.position());
        if doc.viewport.view().scroll_seconds != scroll_before {
            doc.refresh_view();
        } else {
            doc.editor.update_playhead(&doc.viewport);
        }

        if !doc.transport.is_playing() {
            self.playing = false;
            self.status = String::from("Playback finished");
        }
        Task::none()
    }
}
