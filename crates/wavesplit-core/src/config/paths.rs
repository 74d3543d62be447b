//! Standard locations for config and output files

use std::path::PathBuf;

pub const CONFIG_FILENAME: &str = "wavesplit.yaml";

/// `<config dir>/wavesplit/wavesplit.yaml`
///
/// Falls back to the working directory when the platform reports no
/// config directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wavesplit")
        .join(CONFIG_FILENAME)
}

/// Where exports go when no folder has been chosen yet
///
/// Returns: `~/Music/wavesplit`
pub fn default_output_folder() -> PathBuf {
    dirs::audio_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Music")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wavesplit")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_in_app_folder() {
        let path = default_config_path();
        assert!(path.ends_with("wavesplit/wavesplit.yaml"));
    }

    #[test]
    fn test_output_folder_named_after_app() {
        assert!(default_output_folder().ends_with("wavesplit"));
    }
}
