//! Viewer-facing events for puzzles-with-chat.
//!
//! Every change to a channel's solve is announced as an [`Event`] on a
//! [`Topic`]. Viewers receive them in publish order and decide how to
//! render based on the [`EventKind`].
//!
//! # Wire Shape
//!
//! ```text
//! {"kind": "state",     "payload": { ...solve state, solution stripped... }}
//! {"kind": "settings",  "payload": { ...settings... }}
//! {"kind": "complete"}
//! {"kind": "genius"}
//! {"kind": "show_clue", "payload": "12a"}
//! ```
//!
//! # Example
//!
//! ```
//! use pwc_event::{Event, EventKind, Topic};
//! use pwc_types::{ChannelName, PuzzleKind};
//!
//! let channel: ChannelName = "streamer".parse().unwrap();
//! let topic = Topic::new(&channel, PuzzleKind::Crossword);
//! assert_eq!(topic.as_str(), "streamer:crossword");
//!
//! let event = Event::show_clue("12a");
//! assert_eq!(event.kind, EventKind::ShowClue);
//! ```

mod event;
mod topic;

pub use event::{Event, EventKind};
pub use topic::Topic;
