//! Editor surface handlers
//!
//! Handles: Pointer, SetZoom, SetVerticalZoom, SetScroll

use iced::Task;
use wavesplit_core::playback::restart_at;
use wavesplit_core::viewport::PlaybackRequest;
use wavesplit_widgets::{format_time, PointerEvent};

use super::super::app::WavesplitApp;
use super::super::message::Message;

/// Zoom change per wheel line
const WHEEL_ZOOM_STEP: f64 = 1.25;

impl WavesplitApp {
    /// Handle Pointer message
    ///
    /// The viewport resolves what a gesture means; this applies any
    /// transport request it returns and refreshes the render snapshot.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Task<Message> {
        let Some(doc) = self.document.as_mut() else {
            return Task::none();
        };

        let mut view_changed = false;
        let request = match event {
            PointerEvent::Resized { width, height } => {
                doc.viewport.set_size(width as f64, height as f64);
                view_changed = true;
                None
            }
            PointerEvent::Pressed { x, y } => {
                doc.viewport.pointer_pressed(x as f64, y as f64);
                None
            }
            PointerEvent::Moved { x, .. } => doc.viewport.pointer_moved(x as f64),
            PointerEvent::Released { x } => doc.viewport.pointer_released(x as f64),
            PointerEvent::SecondaryPressed { x, y } => {
                if let Some(removed) = doc.viewport.pointer_secondary(x as f64, y as f64) {
                    self.status = format!("Removed marker at {}", format_time(removed));
                }
                None
            }
            PointerEvent::Scrolled { x, lines } => {
                let zoom = doc.viewport.view().zoom * WHEEL_ZOOM_STEP.powf(lines as f64);
                doc.viewport.set_zoom(zoom, Some(x as f64));
                self.config.display.zoom = doc.viewport.view().zoom;
                view_changed = true;
                None
            }
        };

        if let Some(PlaybackRequest::RestartAt(t)) = request {
            restart_at(doc.transport.as_mut(), t);
            self.playing = true;
            self.status = format!("Playing from {}", format_time(t));
        }

        if view_changed {
            doc.refresh_view();
        } else {
            doc.refresh_regions();
        }
        Task::none()
    }

    /// Handle SetZoom message
    pub fn handle_set_zoom(&mut self, zoom: f64) -> Task<Message> {
        self.config.display.zoom = zoom;
        self.config.display.validate();
        if let Some(doc) = self.document.as_mut() {
            // Keep the cursor in place when it is on screen
            let anchor = doc.editor.playhead_x.map(|x| x as f64);
            doc.viewport.set_zoom(self.config.display.zoom, anchor);
            doc.refresh_view();
        }
        Task::none()
    }

    /// Handle SetVerticalZoom message
    pub fn handle_set_vertical_zoom(&mut self, value: u32) -> Task<Message> {
        self.config.display.vertical_zoom = value;
        self.config.display.validate();
        if let Some(doc) = self.document.as_mut() {
            doc.viewport.set_vertical_scale(self.config.display.vertical_scale());
            doc.refresh_regions();
        }
        Task::none()
    }

    /// Handle SetScroll message
    pub fn handle_set_scroll(&mut self, fraction: f64) -> Task<Message> {
        if let Some(doc) = self.document.as_mut() {
            doc.viewport.set_scroll_fraction(fraction);
            doc.refresh_view();
        }
        Task::none()
    }
}
