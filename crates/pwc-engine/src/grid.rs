//! Cell-grid operations shared by the crossword and acrostic engines.
//!
//! A grid is a `rows × cols` matrix of strings where `""` means unfilled.
//! Coordinates are `(row, col)`.

use crate::answer::Token;
use crate::clock::SolveClock;
use chrono::{DateTime, Utc};

pub type Grid = Vec<Vec<String>>;
pub type Cell = (usize, usize);

/// Creates an all-empty grid of the given size.
#[must_use]
pub fn empty(rows: usize, cols: usize) -> Grid {
    vec![vec![String::new(); cols]; rows]
}

fn at(grid: &Grid, (row, col): Cell) -> &str {
    grid.get(row)
        .and_then(|r| r.get(col))
        .map_or("", String::as_str)
}

/// Checks tokens against the solution under correct-only mode.
///
/// Each token must equal the solution at its cell, or be blank while the
/// cell is still empty. Blanking a filled cell is rejected because every
/// filled cell is already correct in this mode.
#[must_use]
pub fn all_correct(current: &Grid, solution: &Grid, cells: &[Cell], tokens: &[Token]) -> bool {
    cells.iter().zip(tokens).all(|(&cell, token)| match token {
        Token::Value(value) => value == at(solution, cell),
        Token::Blank => at(current, cell).is_empty(),
    })
}

/// Writes one token per cell; blank tokens clear their cell.
pub fn write(grid: &mut Grid, cells: &[Cell], tokens: &[Token]) {
    for (&(row, col), token) in cells.iter().zip(tokens) {
        if let Some(slot) = grid.get_mut(row).and_then(|r| r.get_mut(col)) {
            token.as_cell().clone_into(slot);
        }
    }
}

/// Clears every non-empty cell that differs from the solution.
///
/// Returns the number of cells cleared.
fn clear_incorrect(grid: &mut Grid, solution: &Grid) -> usize {
    let mut cleared = 0;
    for (row, cells) in grid.iter_mut().enumerate() {
        for (col, value) in cells.iter_mut().enumerate() {
            if !value.is_empty() && value.as_str() != at(solution, (row, col)) {
                value.clear();
                cleared += 1;
            }
        }
    }
    cleared
}

/// Clears every wrong cell, then completes an in-progress solve whose
/// grid equals the solution.
///
/// Returns the number of cells cleared.
pub fn clear_incorrect_cells(
    grid: &mut Grid,
    solution: &Grid,
    clock: &mut SolveClock,
    now: DateTime<Utc>,
) -> usize {
    let cleared = clear_incorrect(grid, solution);
    if clock.status.is_in_progress() && matches(grid, solution) {
        clock.complete(now);
    }
    cleared
}

/// Returns `true` if none of the cells are empty.
#[must_use]
pub fn is_filled(grid: &Grid, cells: &[Cell]) -> bool {
    cells.iter().all(|&cell| !at(grid, cell).is_empty())
}

/// Returns `true` if the grid equals the solution cell for cell.
#[must_use]
pub fn matches(grid: &Grid, solution: &Grid) -> bool {
    grid == solution
}
