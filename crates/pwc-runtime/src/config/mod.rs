//! Configuration management with hierarchical layering.
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌─────────────────────────────────────────┐
//! │  1. Command-line flags (ConfigResolver) │
//! ├─────────────────────────────────────────┤
//! │  2. Environment Variables (PWC_*)       │
//! ├─────────────────────────────────────────┤
//! │  3. Project Config (.pwc/config.toml)   │
//! ├─────────────────────────────────────────┤
//! │  4. Global Config (~/.pwc/config.toml)  │
//! ├─────────────────────────────────────────┤
//! │  5. Default Values (compile-time)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `PWC_DEBUG` | `debug` | bool |
//! | `PWC_BUFFER_SIZE` | `registry.buffer_size` | usize |
//! | `PWC_STORE_DIR` | `store.dir` (selects the file backend) | PathBuf |
//! | `PWC_LOG_LEVEL` | `logging.level` | String |
//!
//! # Example Configuration
//!
//! ```toml
//! debug = false
//!
//! [registry]
//! buffer_size = 10
//!
//! [store]
//! backend = "file"
//! dir = "~/.pwc/store"
//!
//! [limits]
//! max_answer_bytes = 1024
//!
//! [logging]
//! level = "warn"
//! ```

mod error;
mod loader;
mod resolver;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use resolver::{ConfigResolver, NoOpResolver};
pub use types::{
    LimitsConfig, LoggingConfig, PwcConfig, RegistryConfig, StoreConfig, StoreKind,
    DEFAULT_MAX_ANSWER_BYTES,
};

use std::path::PathBuf;

/// Default global config directory.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pwc")
}

/// Default global config file path.
#[must_use]
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".pwc";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";
