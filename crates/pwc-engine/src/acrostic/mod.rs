//! Acrostic puzzles.
//!
//! Answers target either a lettered clue (`Q`) or a run of numbered cells
//! (`26`).

mod puzzle;
mod settings;
mod state;

pub use puzzle::{ClueRef, Puzzle};
pub use settings::Settings;
pub use state::State;
