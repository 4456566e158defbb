//! Puzzle files accepted by `select`.
//!
//! | Kind | Fields |
//! |------|--------|
//! | crossword | `grid` (rows, `#` blocks, `(..)` rebus), `across`, `down`, optional `title`, `author`, `published` |
//! | acrostic | `grid`, `clues`, `clue_numbers`, optional `title`, `author`, `quote` |
//! | spellingbee | `official`, optional `unofficial`, `published`; letters are inferred |

use chrono::NaiveDate;
use pwc_engine::{acrostic, crossword, spellingbee, EngineError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A puzzle that can be built from a JSON file.
pub trait PuzzleFile: Sized {
    /// Builds the puzzle from file contents.
    ///
    /// # Errors
    ///
    /// [`FileError`] for malformed JSON or an invalid puzzle.
    fn from_json(bytes: &[u8]) -> Result<Self, FileError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("malformed puzzle file: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Puzzle(#[from] EngineError),
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, FileError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[derive(Deserialize)]
struct CrosswordFile {
    grid: Vec<String>,
    #[serde(default)]
    across: BTreeMap<u32, String>,
    #[serde(default)]
    down: BTreeMap<u32, String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    published: Option<NaiveDate>,
}

impl PuzzleFile for crossword::Puzzle {
    fn from_json(bytes: &[u8]) -> Result<Self, FileError> {
        let file: CrosswordFile = decode(bytes)?;
        let mut puzzle = Self::from_grid(&file.grid, file.across, file.down)?;
        puzzle.title = file.title;
        puzzle.author = file.author;
        puzzle.published_date = file.published;
        Ok(puzzle)
    }
}

#[derive(Deserialize)]
struct AcrosticFile {
    grid: Vec<String>,
    clues: BTreeMap<String, String>,
    clue_numbers: BTreeMap<String, Vec<u32>>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    quote: String,
}

impl PuzzleFile for acrostic::Puzzle {
    fn from_json(bytes: &[u8]) -> Result<Self, FileError> {
        let file: AcrosticFile = decode(bytes)?;
        let mut puzzle = Self::from_grid(&file.grid, file.clues, file.clue_numbers)?;
        puzzle.title = file.title;
        puzzle.author = file.author;
        puzzle.quote = file.quote;
        Ok(puzzle)
    }
}

#[derive(Deserialize)]
struct SpellingBeeFile {
    official: Vec<String>,
    #[serde(default)]
    unofficial: Vec<String>,
    #[serde(default)]
    published: Option<NaiveDate>,
}

impl PuzzleFile for spellingbee::Puzzle {
    fn from_json(bytes: &[u8]) -> Result<Self, FileError> {
        let file: SpellingBeeFile = decode(bytes)?;
        let mut puzzle = Self::infer(&file.official, &file.unofficial, false)?;
        puzzle.published_date = file.published;
        Ok(puzzle)
    }
}
