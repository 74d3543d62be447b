//! Application state modules

pub mod document;
pub mod export;

pub use document::Document;
pub use export::{ExportMode, ExportPhase, ExportState};
