//! Config persistence handlers
//!
//! Handles: ConfigSaved

use iced::Task;

use super::super::app::WavesplitApp;
use super::super::message::Message;
use super::error_chain;
use crate::config::save_config;

impl WavesplitApp {
    /// Write the current config in the background
    pub fn save_config_task(&self) -> Task<Message> {
        let config = self.config.clone();
        let path = self.config_path.clone();
        Task::perform(
            async move { save_config(&config, &path).map_err(error_chain) },
            Message::ConfigSaved,
        )
    }

    /// Handle ConfigSaved message
    pub fn handle_config_saved(&mut self, result: Result<(), String>) -> Task<Message> {
        match result {
            Ok(()) => log::debug!("handle_config_saved: Wrote {:?}", self.config_path),
            Err(e) => {
                log::error!("handle_config_saved: {}", e);
                self.status = format!("Failed to save settings: {}", e);
            }
        }
        Task::none()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::app_with_audio;
    use super::*;

    #[test]
    fn test_save_failure_reaches_status() {
        let mut app = app_with_audio(1, 100);
        let _ = app.handle_config_saved(Err(String::from("disk full")));
        assert_eq!(app.status, "Failed to save settings: disk full");
    }
}
