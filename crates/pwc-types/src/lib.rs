//! Core types for puzzles-with-chat.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  pwc-types   : Status, SolveDuration, PuzzleKind, ErrorCode  │ ◄── HERE
//! │  pwc-event   : Event, EventKind, Topic                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  pwc-engine  : answer parser, puzzle models, solve engines   │
//! ├──────────────────────────────────────────────────────────────┤
//! │  pwc-runtime : registry, monitor, store, config, service     │
//! ├──────────────────────────────────────────────────────────────┤
//! │  pwc-cli     : `pwc` binary                                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything in this crate is a small value type with a fixed wire
//! encoding; none of it performs I/O.
//!
//! # Example
//!
//! ```
//! use pwc_types::{ChannelName, PuzzleKind, SolveDuration, Status};
//!
//! let status: Status = serde_json::from_str(r#""paused""#).unwrap();
//! assert!(status.is_in_progress());
//!
//! let elapsed: SolveDuration = "2h12m9s".parse().unwrap();
//! assert_eq!(elapsed.to_string(), "2h12m9s");
//!
//! let channel: ChannelName = "streamer".parse().unwrap();
//! assert_eq!(PuzzleKind::Acrostic.settings_key(&channel), "settings:acrostic:streamer");
//! ```

mod duration;
mod error;
mod kind;
mod status;

pub use duration::SolveDuration;
pub use error::{assert_error_code, assert_error_codes, ErrorCode, TypeError};
pub use kind::{ChannelName, PuzzleKind};
pub use status::{Status, STATUS_TABLE};
