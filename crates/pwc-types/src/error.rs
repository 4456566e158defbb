//! Error code interface shared by every puzzles-with-chat crate.
//!
//! Each crate defines its own `thiserror` enum and implements
//! [`ErrorCode`] on it, so callers (the chat bot, the HTTP layer, the CLI)
//! can branch on a stable machine-readable code instead of message text.
//!
//! # Code Prefixes
//!
//! | Crate | Prefix |
//! |-------|--------|
//! | `pwc-types` | `TYPES_` |
//! | `pwc-engine` | `ENGINE_` |
//! | `pwc-runtime` (store) | `STORE_` |
//! | `pwc-runtime` (service) | `SERVICE_` |
//!
//! # Example
//!
//! ```
//! use pwc_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum LookupError {
//!     Missing(String),
//!     Busy,
//! }
//!
//! impl ErrorCode for LookupError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Missing(_) => "LOOKUP_MISSING",
//!             Self::Busy => "LOOKUP_BUSY",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Busy)
//!     }
//! }
//!
//! let err = LookupError::Busy;
//! assert_eq!(err.code(), "LOOKUP_BUSY");
//! assert!(err.is_recoverable());
//! ```

use thiserror::Error;

/// Machine-readable error code interface.
///
/// # Code Format
///
/// - **UPPER_SNAKE_CASE**: e.g. `"ENGINE_CLUE_NOT_FOUND"`
/// - **Crate-prefixed**: see the module table
/// - **Stable**: chat and HTTP layers match on these strings
///
/// # Recoverability
///
/// An error is recoverable when the same request can succeed later without
/// being changed: a store that was briefly unavailable, or an answer sent
/// while the puzzle was paused. Malformed input never is.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether retrying (possibly after a state change) may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code is non-empty, prefixed and UPPER_SNAKE_CASE.
///
/// # Panics
///
/// Panics with a descriptive message if any check fails.
///
/// # Example
///
/// ```
/// use pwc_types::{assert_error_code, ErrorCode};
///
/// #[derive(Debug)]
/// enum MyError { Timeout }
///
/// impl ErrorCode for MyError {
///     fn code(&self) -> &'static str { "MY_TIMEOUT" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&MyError::Timeout, "MY_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Runs [`assert_error_code`] over every given variant.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('_')
        && !s.ends_with('_')
        && !s.contains("__")
        && s.chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Errors raised while decoding the shared wire types.
///
/// | Error | Code | Recoverable |
/// |-------|------|-------------|
/// | [`UnknownStatus`](Self::UnknownStatus) | `TYPES_UNKNOWN_STATUS` | No |
/// | [`StatusOutOfRange`](Self::StatusOutOfRange) | `TYPES_STATUS_OUT_OF_RANGE` | No |
/// | [`InvalidDuration`](Self::InvalidDuration) | `TYPES_INVALID_DURATION` | No |
/// | [`UnknownPuzzleKind`](Self::UnknownPuzzleKind) | `TYPES_UNKNOWN_PUZZLE_KIND` | No |
/// | [`InvalidChannelName`](Self::InvalidChannelName) | `TYPES_INVALID_CHANNEL_NAME` | No |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("unknown status: {0:?}")]
    UnknownStatus(String),

    #[error("status discriminant out of range: {0}")]
    StatusOutOfRange(u8),

    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),

    #[error("unknown puzzle kind: {0:?}")]
    UnknownPuzzleKind(String),

    #[error("invalid channel name: {0:?}")]
    InvalidChannelName(String),
}

impl ErrorCode for TypeError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownStatus(_) => "TYPES_UNKNOWN_STATUS",
            Self::StatusOutOfRange(_) => "TYPES_STATUS_OUT_OF_RANGE",
            Self::InvalidDuration(_) => "TYPES_INVALID_DURATION",
            Self::UnknownPuzzleKind(_) => "TYPES_UNKNOWN_PUZZLE_KIND",
            Self::InvalidChannelName(_) => "TYPES_INVALID_CHANNEL_NAME",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
