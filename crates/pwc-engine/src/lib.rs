//! Solve-state engines for puzzles-with-chat.
//!
//! This crate is pure: it owns no locks, performs no I/O and never reads
//! the clock. Callers load a state, hand it `now`, and persist whatever
//! comes back.
//!
//! # Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`answer`] | Clue reference and answer token parsing |
//! | [`grid`] | Cell-grid writes, checks and clears |
//! | [`crossword`] | Crossword puzzle, state and settings |
//! | [`acrostic`] | Acrostic puzzle, state and settings |
//! | [`spellingbee`] | Spelling-bee puzzle, state and settings |
//!
//! Every kind's state implements [`Solve`] and every kind's settings
//! implement [`Settings`], so the runtime can drive selection, status
//! toggles and setting side effects generically.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use chrono::Utc;
//! use pwc_engine::crossword::{Puzzle, State};
//! use pwc_engine::Solve;
//!
//! let across = BTreeMap::from([(1, "Greeting".to_string())]);
//! let puzzle = Puzzle::from_grid(&["HI"], across, BTreeMap::new()).unwrap();
//!
//! let mut state = State::select(puzzle);
//! state.toggle_status(Utc::now()).unwrap();
//! let outcome = state.apply_answer("1a", "hi", false, Utc::now()).unwrap();
//! assert!(outcome.completed);
//! ```

pub mod acrostic;
pub mod answer;
mod clock;
pub mod crossword;
mod error;
pub mod grid;
mod settings;
mod solve;
pub mod spellingbee;

pub use answer::{parse_answer_tokens, parse_clue_reference, ClueRef, Direction, Token};
pub use clock::SolveClock;
pub use error::{EngineError, ErrorKind};
pub use settings::{ClueVisibility, FontSize, SettingEffect, Settings};
pub use solve::{AnswerOutcome, EffectOutcome, Solve};
