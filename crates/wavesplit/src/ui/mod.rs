//! User interface modules for wavesplit

pub mod app;
pub mod confirm_modal;
pub mod controls;
pub mod export_modal;
mod handlers;
pub mod message;
pub mod state;

pub use app::WavesplitApp;
pub use message::Message;
