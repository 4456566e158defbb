//! Acrostic puzzle model.
//!
//! Non-block cells are numbered `1..=N` in reading order. Each clue is
//! named by a letter and lists the cell numbers its answer occupies, in
//! answer order.

use crate::error::EngineError;
use crate::grid::{self, Cell, Grid};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Puzzle {
    pub rows: usize,
    pub cols: usize,
    pub title: String,
    pub author: String,
    pub quote: String,
    pub cells: Grid,
    pub blocks: Vec<Vec<bool>>,
    pub numbers: Vec<Vec<u32>>,
    pub clues: BTreeMap<String, String>,
    pub clue_numbers: BTreeMap<String, Vec<u32>>,
}

/// Target of an acrostic answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClueRef {
    /// A lettered clue, uppercased.
    Letter(String),
    /// A run of cells starting at this number.
    Cell(u32),
}

impl ClueRef {
    /// Parses `Q`/`q` as a clue letter or `26` as a cell number.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidClue`] for anything else.
    pub fn parse(reference: &str) -> Result<Self, EngineError> {
        let invalid = || EngineError::InvalidClue(reference.to_string());

        if !reference.is_empty() && reference.bytes().all(|b| b.is_ascii_digit()) {
            return reference.parse().map(Self::Cell).map_err(|_| invalid());
        }

        let mut chars = reference.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => {
                Ok(Self::Letter(c.to_ascii_uppercase().to_string()))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ClueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letter(letter) => f.write_str(letter),
            Self::Cell(number) => write!(f, "{number}"),
        }
    }
}

impl Puzzle {
    /// Builds a puzzle from solution rows (`#` for blocks) and lettered
    /// clues.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidPuzzle`] if the rows are ragged or malformed,
    /// a clue has no cell list, or a cell list names an unknown cell or
    /// reuses a cell.
    pub fn from_grid<S: AsRef<str>>(
        rows: &[S],
        clues: BTreeMap<String, String>,
        clue_numbers: BTreeMap<String, Vec<u32>>,
    ) -> Result<Self, EngineError> {
        let cells: Grid = rows
            .iter()
            .map(|row| parse_row(row.as_ref()))
            .collect::<Result<_, _>>()?;

        let cols = cells.first().map_or(0, Vec::len);
        if cols == 0 || cells.iter().any(|row| row.len() != cols) {
            return Err(EngineError::InvalidPuzzle(
                "grid rows must be non-empty and equally wide".into(),
            ));
        }

        let blocks: Vec<Vec<bool>> = cells
            .iter()
            .map(|row| row.iter().map(String::is_empty).collect())
            .collect();

        let mut next = 0;
        let numbers = blocks
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&block| {
                        if block {
                            0
                        } else {
                            next += 1;
                            next
                        }
                    })
                    .collect()
            })
            .collect();

        let clues_given: BTreeSet<&String> = clues.keys().collect();
        let numbered: BTreeSet<&String> = clue_numbers.keys().collect();
        if clues_given != numbered {
            return Err(EngineError::InvalidPuzzle(
                "every clue needs exactly one cell list".into(),
            ));
        }

        let mut used = BTreeSet::new();
        for (letter, nums) in &clue_numbers {
            for &n in nums {
                if n == 0 || n > next || !used.insert(n) {
                    return Err(EngineError::InvalidPuzzle(format!(
                        "clue {letter} has invalid cell number {n}"
                    )));
                }
            }
        }

        Ok(Self {
            rows: cells.len(),
            cols,
            cells,
            blocks,
            numbers,
            clues,
            clue_numbers,
            ..Self::default()
        })
    }

    /// Number of numbered cells.
    #[must_use]
    pub fn cell_count(&self) -> u32 {
        self.numbers
            .iter()
            .flatten()
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Returns the `(x, y)` position of cell `number`, i.e. its column
    /// and row.
    ///
    /// # Errors
    ///
    /// [`EngineError::CellOutOfRange`] unless `1 <= number <= N`.
    pub fn cell_coordinates(&self, number: u32) -> Result<(usize, usize), EngineError> {
        if number == 0 {
            return Err(EngineError::CellOutOfRange(number));
        }
        self.numbers
            .iter()
            .enumerate()
            .find_map(|(y, row)| row.iter().position(|&n| n == number).map(|x| (x, y)))
            .ok_or(EngineError::CellOutOfRange(number))
    }

    /// Resolves a clue reference to grid cells for an answer of `len`
    /// tokens.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ClueNotFound`] for an unknown letter
    /// - [`EngineError::CellOutOfRange`] for a bad starting cell
    /// - [`EngineError::AnswerLength`] if a cell-number answer runs past
    ///   the last cell
    pub fn answer_cells(&self, clue: &ClueRef, len: usize) -> Result<Vec<Cell>, EngineError> {
        let numbers: Vec<u32> = match clue {
            ClueRef::Letter(letter) => self
                .clue_numbers
                .get(letter)
                .cloned()
                .ok_or_else(|| EngineError::ClueNotFound(letter.clone()))?,
            ClueRef::Cell(start) => {
                self.cell_coordinates(*start)?;
                let available = (self.cell_count() - start + 1) as usize;
                if len > available {
                    return Err(EngineError::AnswerLength {
                        clue: clue.to_string(),
                        expected: available,
                        actual: len,
                    });
                }
                (*start..).take(len).collect()
            }
        };

        numbers
            .into_iter()
            .map(|n| self.cell_coordinates(n).map(|(x, y)| (y, x)))
            .collect()
    }

    /// Fails unless `clue` names a clue letter or a cell in this puzzle.
    ///
    /// # Errors
    ///
    /// As [`answer_cells`](Self::answer_cells).
    pub fn check_clue(&self, clue: &ClueRef) -> Result<(), EngineError> {
        match clue {
            ClueRef::Letter(letter) if !self.clue_numbers.contains_key(letter) => {
                Err(EngineError::ClueNotFound(letter.clone()))
            }
            ClueRef::Letter(_) => Ok(()),
            ClueRef::Cell(n) => self.cell_coordinates(*n).map(|_| ()),
        }
    }

    /// Returns a copy with the solution and the quote's attribution removed.
    #[must_use]
    pub fn without_solution(&self) -> Self {
        Self {
            cells: Grid::new(),
            author: String::new(),
            title: String::new(),
            quote: String::new(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn has_solution(&self) -> bool {
        !self.cells.is_empty()
    }

    pub(crate) fn empty_grid(&self) -> Grid {
        grid::empty(self.rows, self.cols)
    }
}

fn parse_row(row: &str) -> Result<Vec<String>, EngineError> {
    row.chars()
        .map(|c| match c {
            '#' => Ok(String::new()),
            c if c.is_alphanumeric() => Ok(c.to_uppercase().collect()),
            other => Err(EngineError::InvalidPuzzle(format!(
                "unexpected {other:?} in row {row:?}"
            ))),
        })
        .collect()
}
