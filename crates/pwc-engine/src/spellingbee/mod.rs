//! Spelling-bee puzzles: a word list, seven letters and a score.

mod puzzle;
mod settings;
mod state;

pub use puzzle::{infer_letters, Puzzle, MIN_WORD_LEN, PANGRAM_BONUS};
pub use settings::Settings;
pub use state::State;
