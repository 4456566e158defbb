//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use crate::registry::DEFAULT_BUFFER_SIZE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default upper bound on a submitted answer, in bytes.
pub const DEFAULT_MAX_ANSWER_BYTES: usize = 1024;

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers.
///
/// # Example
///
/// ```
/// use pwc_runtime::config::PwcConfig;
///
/// let config = PwcConfig::default();
/// assert!(!config.debug);
/// assert_eq!(config.registry.buffer_size, 10);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PwcConfig {
    /// Enable debug logging.
    pub debug: bool,

    pub registry: RegistryConfig,

    pub store: StoreConfig,

    pub limits: LimitsConfig,

    pub logging: LoggingConfig,
}

impl PwcConfig {
    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only if they
    /// differ from the default.
    pub fn merge(&mut self, other: &Self) {
        if other.debug {
            self.debug = true;
        }
        self.registry.merge(&other.registry);
        self.store.merge(&other.store);
        self.limits.merge(&other.limits);
        self.logging.merge(&other.logging);
    }
}

/// Event registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    /// Events buffered per viewer before further events are dropped.
    pub buffer_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl RegistryConfig {
    fn merge(&mut self, other: &Self) {
        if other.buffer_size != DEFAULT_BUFFER_SIZE {
            self.buffer_size = other.buffer_size;
        }
    }
}

/// Store backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Memory,
    File,
}

/// Store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreKind,

    /// Directory for the file backend. `~` expands to the home directory.
    pub dir: Option<PathBuf>,
}

impl StoreConfig {
    fn merge(&mut self, other: &Self) {
        if other.backend != StoreKind::default() {
            self.backend = other.backend;
        }
        if let Some(dir) = &other.dir {
            self.dir = Some(expand_tilde(dir));
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Longest accepted answer, in bytes.
    pub max_answer_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_answer_bytes: DEFAULT_MAX_ANSWER_BYTES,
        }
    }
}

impl LimitsConfig {
    fn merge(&mut self, other: &Self) {
        if other.max_answer_bytes != DEFAULT_MAX_ANSWER_BYTES {
            self.max_answer_bytes = other.max_answer_bytes;
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when neither flags nor `RUST_LOG` set one.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

impl LoggingConfig {
    fn merge(&mut self, other: &Self) {
        if other.level != Self::default().level {
            self.level.clone_from(&other.level);
        }
    }
}

/// Expands a leading `~` to the home directory.
pub(crate) fn expand_tilde(path: &std::path::Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest)),
        Err(_) => path.to_path_buf(),
    }
}
