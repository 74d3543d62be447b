//! Generic YAML configuration I/O

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Load configuration from a YAML file
///
/// A missing file yields the default config. An unreadable or invalid file
/// logs a warning and also yields the default, so a bad config never keeps
/// the editor from starting.
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    log::info!("load_config: Loading from {:?}", path);

    if !path.exists() {
        log::info!("load_config: Config file doesn't exist, using defaults");
        return T::default();
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            log::warn!("load_config: Failed to read config file: {}, using defaults", e);
            return T::default();
        }
    };

    match serde_yaml::from_str::<T>(&contents) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("load_config: Failed to parse config: {}, using defaults", e);
            T::default()
        }
    }
}

/// Save configuration to a YAML file, creating parent directories
pub fn save_config<T>(config: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write config file: {:?}", path))?;

    log::debug!("save_config: Saved {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct SampleConfig {
        threshold: f32,
        prefix: String,
    }

    impl Default for SampleConfig {
        fn default() -> Self {
            Self {
                threshold: -40.0,
                prefix: "split".to_string(),
            }
        }
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config: SampleConfig = load_config(Path::new("/nonexistent/wavesplit.yaml"));
        assert_eq!(config, SampleConfig::default());
    }

    #[test]
    fn test_save_creates_parents_and_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("wavesplit.yaml");
        let config = SampleConfig {
            threshold: -55.5,
            prefix: "take".to_string(),
        };

        save_config(&config, &path).unwrap();
        let loaded: SampleConfig = load_config(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_yaml_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wavesplit.yaml");
        std::fs::write(&path, "threshold: [not, a, number").unwrap();
        let config: SampleConfig = load_config(&path);
        assert_eq!(config, SampleConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wavesplit.yaml");
        std::fs::write(&path, "prefix: chapter\n").unwrap();
        let config: SampleConfig = load_config(&path);
        assert_eq!(config.prefix, "chapter");
        assert_eq!(config.threshold, -40.0);
    }
}
