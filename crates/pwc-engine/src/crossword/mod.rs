//! Crossword puzzles: grid model, solve state and settings.

mod puzzle;
mod settings;
mod state;

pub use puzzle::Puzzle;
pub use settings::Settings;
pub use state::State;
