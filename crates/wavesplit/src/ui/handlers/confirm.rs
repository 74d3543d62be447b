//! Confirmation modal handlers
//!
//! Handles: Confirm, CancelConfirm

use iced::Task;

use super::super::app::WavesplitApp;
use super::super::confirm_modal::ConfirmTarget;
use super::super::message::Message;

impl WavesplitApp {
    /// Handle Confirm message
    pub fn handle_confirm(&mut self) -> Task<Message> {
        let Some(target) = self.confirm.take() else {
            return Task::none();
        };
        log::info!("Confirmed {:?}", target);
        match target {
            ConfirmTarget::ClearMarkers { .. } => self.clear_markers(),
            ConfirmTarget::ReplaceWithSilence { regions, .. } => self.apply_silence(&regions),
        }
        Task::none()
    }

    /// Handle CancelConfirm message
    pub fn handle_cancel_confirm(&mut self) -> Task<Message> {
        if let Some(ConfirmTarget::ReplaceWithSilence { .. }) = self.confirm.target {
            self.status = String::from("Kept the existing markers");
        }
        self.confirm.cancel();
        Task::none()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::app_with_audio;
    use super::*;
    use wavesplit_core::silence::SilentRegion;

    fn app_with_markers(markers: &[f64]) -> WavesplitApp {
        let mut app = app_with_audio(10, 100);
        app.document
            .as_mut()
            .unwrap()
            .viewport
            .regions_mut()
            .set_markers(markers.iter().copied());
        app
    }

    fn markers(app: &WavesplitApp) -> Vec<f64> {
        app.document.as_ref().unwrap().viewport.regions().markers().to_vec()
    }

    fn regions() -> Vec<SilentRegion> {
        vec![
            SilentRegion { start: 1.0, end: 2.0 },
            SilentRegion { start: 6.0, end: 8.0 },
        ]
    }

    #[test]
    fn test_clear_waits_for_confirmation() {
        let mut app = app_with_markers(&[2.0, 5.0]);
        let _ = app.handle_clear_markers();
        assert!(app.confirm.is_open());
        assert_eq!(markers(&app), vec![2.0, 5.0]);

        let _ = app.handle_confirm();
        assert!(!app.confirm.is_open());
        assert!(markers(&app).is_empty());
        assert_eq!(app.status, "Removed 2 markers");
    }

    #[test]
    fn test_cancelled_clear_keeps_markers() {
        let mut app = app_with_markers(&[2.0, 5.0]);
        let _ = app.handle_clear_markers();
        let _ = app.handle_cancel_confirm();
        assert!(!app.confirm.is_open());
        assert_eq!(markers(&app), vec![2.0, 5.0]);

        // A stray confirm after cancelling does nothing
        let _ = app.handle_confirm();
        assert_eq!(markers(&app), vec![2.0, 5.0]);
    }

    #[test]
    fn test_clear_without_markers_does_not_ask() {
        let mut app = app_with_markers(&[]);
        let _ = app.handle_clear_markers();
        assert!(!app.confirm.is_open());
    }

    #[test]
    fn test_silence_replaces_existing_markers_after_confirmation() {
        let mut app = app_with_markers(&[4.0]);
        app.detecting = true;
        let _ = app.handle_silence_detected(Ok(regions()));
        assert!(!app.detecting);
        assert!(app.confirm.is_open());
        assert_eq!(markers(&app), vec![4.0]);

        let _ = app.handle_confirm();
        assert_eq!(markers(&app), vec![1.5, 7.0]);
    }

    #[test]
    fn test_silence_cancel_keeps_markers() {
        let mut app = app_with_markers(&[4.0]);
        let _ = app.handle_silence_detected(Ok(regions()));
        let _ = app.handle_cancel_confirm();
        assert_eq!(markers(&app), vec![4.0]);
        assert_eq!(app.status, "Kept the existing markers");
    }

    #[test]
    fn test_silence_on_empty_document_applies_directly() {
        let mut app = app_with_markers(&[]);
        let _ = app.handle_silence_detected(Ok(regions()));
        assert!(!app.confirm.is_open());
        assert_eq!(markers(&app), vec![1.5, 7.0]);
    }
}
