//! Wavesplit - waveform split editor GUI
//!
//! ## Usage
//!
//! `wavesplit [AUDIO_FILE]` opens the editor, loading `AUDIO_FILE` if given.

use std::path::PathBuf;

use wavesplit::ui::WavesplitApp;

fn main() -> iced::Result {
    // Set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let initial_file = std::env::args_os().nth(1).map(PathBuf::from);
    match &initial_file {
        Some(path) => log::info!("wavesplit starting with {:?}", path),
        None => log::info!("wavesplit starting"),
    }

    iced::application(
        move || WavesplitApp::new(initial_file.clone()),
        WavesplitApp::update,
        WavesplitApp::view,
    )
    .title(WavesplitApp::title)
    .subscription(WavesplitApp::subscription)
    .window_size(iced::Size::new(1200.0, 760.0))
    .theme(WavesplitApp::theme)
    .run()
}
