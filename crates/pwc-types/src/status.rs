//! Solve status for a channel's puzzle.
//!
//! # Status Lifecycle
//!
//! ```text
//! Created ──select──► Selected ──toggle──► Solving ⇄ Paused
//!                                            │
//!                                  last answer│
//!                                            ▼
//!                                         Complete
//! ```
//!
//! There is no transition out of `Complete` and none back into `Created`;
//! selecting a new puzzle replaces the whole state.
//!
//! # Wire Encoding
//!
//! Status crosses the store and the viewer stream as a lowercase string.
//! Encoding and decoding both go through [`STATUS_TABLE`], so an unknown
//! string or a non-string value is rejected instead of defaulting.

use crate::error::TypeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Status of a solve.
///
/// | Status | Has Puzzle | Timer Running | Accepts Answers |
/// |--------|------------|---------------|-----------------|
/// | `Created` | No | No | No |
/// | `Selected` | Yes | No | No |
/// | `Solving` | Yes | Yes | Yes |
/// | `Paused` | Yes | No | No |
/// | `Complete` | Yes | No | No |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// No puzzle has been chosen for the channel yet.
    #[default]
    Created,
    /// A puzzle is loaded but the timer has never started.
    Selected,
    /// The timer is running and answers are accepted.
    Solving,
    /// The timer is stopped; answers are rejected until resumed.
    Paused,
    /// Every cell or word is solved.
    Complete,
}

/// Exhaustive encode/decode table, indexed by discriminant.
pub const STATUS_TABLE: [(Status, &str); 5] = [
    (Status::Created, "created"),
    (Status::Selected, "selected"),
    (Status::Solving, "solving"),
    (Status::Paused, "paused"),
    (Status::Complete, "complete"),
];

impl Status {
    /// Returns the wire string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        STATUS_TABLE[self as usize].1
    }

    /// Returns `true` while the timer is running.
    #[must_use]
    pub fn is_solving(self) -> bool {
        matches!(self, Self::Solving)
    }

    /// Returns `true` once every cell or word is solved.
    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Returns `true` for a started but unfinished solve (`Solving` or `Paused`).
    ///
    /// ```
    /// use pwc_types::Status;
    ///
    /// assert!(Status::Paused.is_in_progress());
    /// assert!(!Status::Selected.is_in_progress());
    /// assert!(!Status::Complete.is_in_progress());
    /// ```
    #[must_use]
    pub fn is_in_progress(self) -> bool {
        matches!(self, Self::Solving | Self::Paused)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STATUS_TABLE
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(status, _)| *status)
            .ok_or_else(|| TypeError::UnknownStatus(s.to_string()))
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        status as u8
    }
}

impl TryFrom<u8> for Status {
    type Error = TypeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        STATUS_TABLE
            .get(usize::from(value))
            .map(|(status, _)| *status)
            .ok_or(TypeError::StatusOutOfRange(value))
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
