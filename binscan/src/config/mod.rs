//! Configuration file management
//!
//! Settings live in `~/.binscan/config.ini`. The file is optional; every key
//! has a default and library types are built from the parsed sections.

mod file;
mod keys;

pub use file::{
    config_dir, config_file_path, ApiSettings, ConfigError, ConfigFile, CONFIG_DIR_NAME,
    CONFIG_FILE_NAME,
};
pub use keys::ConfigKey;
