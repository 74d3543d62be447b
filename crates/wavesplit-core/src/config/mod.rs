//! Configuration file utilities
//!
//! Generic YAML loading/saving plus the standard config location. The
//! application defines its own config struct and uses these to persist it:
//!
//! ```ignore
//! use wavesplit_core::config::{default_config_path, load_config, save_config};
//!
//! let path = default_config_path();
//! let config: MyConfig = load_config(&path);
//! save_config(&config, &path)?;
//! ```

mod io;
mod paths;

pub use io::{load_config, save_config};
pub use paths::{default_config_path, default_output_folder, CONFIG_FILENAME};
