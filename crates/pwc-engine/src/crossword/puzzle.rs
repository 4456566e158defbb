//! Crossword puzzle model.

use crate::answer::Direction;
use crate::error::EngineError;
use crate::grid::{self, Cell, Grid};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// An immutable crossword.
///
/// `cells` holds the solution (`""` for blocks). A viewer copy produced by
/// [`without_solution`](Self::without_solution) has `cells` emptied and
/// keeps everything needed to draw the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Puzzle {
    pub rows: usize,
    pub cols: usize,
    pub title: String,
    pub publisher: String,
    pub published_date: Option<NaiveDate>,
    pub author: String,
    pub cells: Grid,
    pub blocks: Vec<Vec<bool>>,
    pub clue_numbers: Vec<Vec<u32>>,
    pub cell_circles: Vec<Vec<bool>>,
    pub across_clues: BTreeMap<u32, String>,
    pub down_clues: BTreeMap<u32, String>,
}

impl Puzzle {
    /// Builds a puzzle from solution rows and clue texts.
    ///
    /// Rows use `#` for blocks and parentheses for rebus cells, e.g.
    /// `"Q(AND)A#"`. Clue numbers are assigned in standard reading order.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidPuzzle`] if the rows are ragged or malformed,
    /// or the clue numbers do not match the grid's numbering.
    pub fn from_grid<S: AsRef<str>>(
        rows: &[S],
        across_clues: BTreeMap<u32, String>,
        down_clues: BTreeMap<u32, String>,
    ) -> Result<Self, EngineError> {
        let cells = rows
            .iter()
            .map(|row| parse_row(row.as_ref()))
            .collect::<Result<Grid, _>>()?;

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
        let (clue_numbers, across_starts, down_starts) = number_grid(&blocks);

        check_clues("across", &across_starts, &across_clues)?;
        check_clues("down", &down_starts, &down_clues)?;

        Ok(Self {
            rows: cells.len(),
            cols,
            cell_circles: vec![vec![false; cols]; cells.len()],
            cells,
            blocks,
            clue_numbers,
            across_clues,
            down_clues,
            ..Self::default()
        })
    }

    /// Returns the cells of a clue in answer order, or `None` if the puzzle
    /// has no such clue.
    #[must_use]
    pub fn clue_cells(&self, number: u32, direction: Direction) -> Option<Vec<Cell>> {
        let clues = match direction {
            Direction::Across => &self.across_clues,
            Direction::Down => &self.down_clues,
        };
        if number == 0 || !clues.contains_key(&number) {
            return None;
        }

        let (row, col) = self.clue_numbers.iter().enumerate().find_map(|(r, nums)| {
            nums.iter().position(|&n| n == number).map(|c| (r, c))
        })?;

        let (dr, dc) = match direction {
            Direction::Across => (0, 1),
            Direction::Down => (1, 0),
        };
        let mut cells = Vec::new();
        let (mut r, mut c) = (row, col);
        while r < self.rows && c < self.cols && !self.is_block(r, c) {
            cells.push((r, c));
            r += dr;
            c += dc;
        }
        Some(cells)
    }

    /// Returns the solution for a clue with rebus cells in parentheses.
    ///
    /// `None` for an unknown clue or a copy without its solution.
    #[must_use]
    pub fn answer(&self, number: u32, direction: Direction) -> Option<String> {
        self.clue_cells(number, direction)?
            .into_iter()
            .map(|(r, c)| {
                let value = self.cells.get(r)?.get(c)?;
                Some(if value.chars().count() > 1 {
                    format!("({value})")
                } else {
                    value.clone()
                })
            })
            .collect()
    }

    #[must_use]
    pub fn is_block(&self, row: usize, col: usize) -> bool {
        self.blocks
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(true)
    }

    /// Returns a copy with the solution removed.
    #[must_use]
    pub fn without_solution(&self) -> Self {
        Self {
            cells: Grid::new(),
            ..self.clone()
        }
    }

    /// Returns `true` if this copy still carries its solution.
    #[must_use]
    pub fn has_solution(&self) -> bool {
        !self.cells.is_empty()
    }

    pub(crate) fn empty_grid(&self) -> Grid {
        grid::empty(self.rows, self.cols)
    }
}

fn parse_row(row: &str) -> Result<Vec<String>, EngineError> {
    let mut cells = Vec::new();
    let mut chars = row.chars();
    while let Some(c) = chars.next() {
        match c {
            '#' => cells.push(String::new()),
            '(' => {
                let mut rebus = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ')' {
                        closed = true;
                        break;
                    }
                    rebus.push(c);
                }
                if !closed || rebus.is_empty() || rebus.contains(['(', '#']) {
                    return Err(EngineError::InvalidPuzzle(format!("bad rebus in row {row:?}")));
                }
                cells.push(rebus.to_uppercase());
            }
            c if c.is_alphanumeric() => cells.push(c.to_uppercase().collect()),
            other => {
                return Err(EngineError::InvalidPuzzle(format!(
                    "unexpected {other:?} in row {row:?}"
                )));
            }
        }
    }
    Ok(cells)
}

/// Assigns clue numbers. A cell is numbered when it starts an across or
/// down run of at least two cells.
fn number_grid(blocks: &[Vec<bool>]) -> (Vec<Vec<u32>>, BTreeSet<u32>, BTreeSet<u32>) {
    let rows = blocks.len();
    let cols = blocks.first().map_or(0, Vec::len);
    let open = |r: usize, c: usize| r < rows && c < cols && !blocks[r][c];

    let mut numbers = vec![vec![0; cols]; rows];
    let mut across = BTreeSet::new();
    let mut down = BTreeSet::new();
    let mut next = 0;

    for r in 0..rows {
        for c in 0..cols {
            if !open(r, c) {
                continue;
            }
            let starts_across = (c == 0 || !open(r, c - 1)) && open(r, c + 1);
            let starts_down = (r == 0 || !open(r - 1, c)) && open(r + 1, c);
            if !(starts_across || starts_down) {
                continue;
            }
            next += 1;
            numbers[r][c] = next;
            if starts_across {
                across.insert(next);
            }
            if starts_down {
                down.insert(next);
            }
        }
    }
    (numbers, across, down)
}

fn check_clues(
    direction: &str,
    starts: &BTreeSet<u32>,
    clues: &BTreeMap<u32, String>,
) -> Result<(), EngineError> {
    let given: BTreeSet<u32> = clues.keys().copied().collect();
    if &given == starts {
        return Ok(());
    }
    Err(EngineError::InvalidPuzzle(format!(
        "{direction} clues {given:?} do not match grid numbering {starts:?}"
    )))
}
