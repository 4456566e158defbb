//! Per-channel publish/subscribe addresses.

use pwc_types::{ChannelName, PuzzleKind};
use std::fmt;

/// Address events are published to and subscribed against.
///
/// Formatted as `<channel>:<kind>`, so viewers of a channel's crossword do
/// not receive its spelling-bee events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Topic(String);

impl Topic {
    /// Builds the topic for a channel's puzzle kind.
    #[must_use]
    pub fn new(channel: &ChannelName, kind: PuzzleKind) -> Self {
        Self(format!("{}:{}", channel, kind.as_str()))
    }

    /// Returns the topic string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
