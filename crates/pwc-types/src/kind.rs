//! Puzzle kinds and channel names, and the store keys derived from them.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of puzzle a channel can solve.
///
/// Each kind keeps its own state and settings per channel, so a channel can
/// have a crossword and a spelling bee in progress at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleKind {
    Crossword,
    Acrostic,
    #[serde(rename = "spellingbee")]
    SpellingBee,
}

impl PuzzleKind {
    /// All kinds, in a stable order.
    pub const ALL: [PuzzleKind; 3] = [Self::Crossword, Self::Acrostic, Self::SpellingBee];

    /// Returns the name used in store keys and topics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crossword => "crossword",
            Self::Acrostic => "acrostic",
            Self::SpellingBee => "spellingbee",
        }
    }

    /// Store key for a channel's solve state: `state:<kind>:<channel>`.
    ///
    /// ```
    /// use pwc_types::{ChannelName, PuzzleKind};
    ///
    /// let channel: ChannelName = "streamer".parse().unwrap();
    /// assert_eq!(PuzzleKind::Crossword.state_key(&channel), "state:crossword:streamer");
    /// ```
    #[must_use]
    pub fn state_key(self, channel: &ChannelName) -> String {
        format!("state:{}:{}", self.as_str(), channel)
    }

    /// Store key for a channel's settings: `settings:<kind>:<channel>`.
    #[must_use]
    pub fn settings_key(self, channel: &ChannelName) -> String {
        format!("settings:{}:{}", self.as_str(), channel)
    }
}

impl fmt::Display for PuzzleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PuzzleKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TypeError::UnknownPuzzleKind(s.to_string()))
    }
}

/// Name of a streaming channel.
///
/// Limited to ASCII letters, digits and underscores, which keeps it safe to
/// embed in `:`-separated store keys and topics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelName(String);

impl ChannelName {
    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ChannelName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let valid = !value.is_empty()
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid {
            Ok(Self(value))
        } else {
            Err(TypeError::InvalidChannelName(value))
        }
    }
}

impl FromStr for ChannelName {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl From<ChannelName> for String {
    fn from(name: ChannelName) -> Self {
        name.0
    }
}

impl AsRef<str> for ChannelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
