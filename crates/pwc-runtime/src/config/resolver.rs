//! Configuration resolver trait for layered overrides.
//!
//! ```text
//! ConfigLoader.load()  →  PwcConfig (base)
//!                              │
//!                              ▼
//!                     ConfigResolver.apply()
//!                              │
//!                              ▼
//!                     PwcConfig (final)
//! ```

use super::PwcConfig;

/// Applies overrides from a source other than files or the environment,
/// typically command-line flags.
pub trait ConfigResolver {
    /// Applies overrides to the given configuration.
    ///
    /// Only options that were explicitly given should be applied.
    fn apply(&self, config: &mut PwcConfig);
}

/// Resolver that makes no changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpResolver;

impl ConfigResolver for NoOpResolver {
    fn apply(&self, _config: &mut PwcConfig) {}
}
