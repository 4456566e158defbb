//! Crossword solve state.

use super::puzzle::Puzzle;
use super::settings::Settings;
use crate::answer::{parse_answer_tokens, parse_clue_reference, Direction};
use crate::clock::SolveClock;
use crate::error::EngineError;
use crate::grid::{self, Grid};
use crate::settings::SettingEffect;
use crate::solve::{AnswerOutcome, EffectOutcome, Solve};
use chrono::{DateTime, Utc};
use pwc_types::PuzzleKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// A channel's progress on a crossword.
///
/// `cells` is exclusively owned by this state; the puzzle is shared and
/// never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct State {
    #[serde(flatten)]
    pub clock: SolveClock,
    pub puzzle: Option<Arc<Puzzle>>,
    pub cells: Grid,
    pub across_clues_filled: BTreeMap<u32, bool>,
    pub down_clues_filled: BTreeMap<u32, bool>,
}

impl State {
    /// Starts an empty solve of `puzzle`.
    #[must_use]
    pub fn new(puzzle: Arc<Puzzle>) -> Self {
        let mut state = Self {
            clock: SolveClock::selected(),
            cells: puzzle.empty_grid(),
            puzzle: Some(puzzle),
            ..Self::default()
        };
        state.refresh_filled();
        state
    }

    fn puzzle(&self) -> Result<Arc<Puzzle>, EngineError> {
        self.puzzle.clone().ok_or(EngineError::NoPuzzleSelected)
    }

    /// Applies an answer to a clue.
    ///
    /// In correct-only mode every token must match the solution (or be a
    /// blank over an empty cell); otherwise nothing is written. After
    /// writing, fill flags are recomputed and the puzzle completes when
    /// every cell matches.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotSolving`] unless the status is `Solving`
    /// - parse errors for the clue or answer
    /// - [`EngineError::ClueNotFound`], [`EngineError::AnswerLength`],
    ///   [`EngineError::IncorrectAnswer`]
    pub fn apply_answer(
        &mut self,
        clue: &str,
        answer: &str,
        correct_only: bool,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, EngineError> {
        self.clock.ensure_solving()?;
        let puzzle = self.puzzle()?;

        let clue = parse_clue_reference(clue)?;
        let tokens = parse_answer_tokens(answer)?;
        let cells = puzzle
            .clue_cells(clue.number, clue.direction)
            .ok_or_else(|| EngineError::ClueNotFound(clue.to_string()))?;

        if tokens.len() != cells.len() {
            return Err(EngineError::AnswerLength {
                clue: clue.to_string(),
                expected: cells.len(),
                actual: tokens.len(),
            });
        }
        if correct_only && !grid::all_correct(&self.cells, &puzzle.cells, &cells, &tokens) {
            return Err(EngineError::IncorrectAnswer(clue.to_string()));
        }

        grid::write(&mut self.cells, &cells, &tokens);
        self.refresh_filled();
        debug!(clue = %clue, "Applied crossword answer");

        let completed = grid::matches(&self.cells, &puzzle.cells);
        if completed {
            self.clock.complete(now);
        }
        Ok(AnswerOutcome {
            completed,
            genius: false,
        })
    }

    /// Clears every filled cell that differs from the solution.
    ///
    /// Returns the number of cells cleared.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoPuzzleSelected`] if the state has no puzzle.
    pub fn clear_incorrect_cells(&mut self, now: DateTime<Utc>) -> Result<usize, EngineError> {
        let puzzle = self.puzzle()?;
        let cleared =
            grid::clear_incorrect_cells(&mut self.cells, &puzzle.cells, &mut self.clock, now);
        self.refresh_filled();
        Ok(cleared)
    }

    /// Recomputes both fill-flag maps from the grid.
    fn refresh_filled(&mut self) {
        let Some(puzzle) = self.puzzle.as_deref() else {
            return;
        };
        let filled = |direction: Direction, numbers: &BTreeMap<u32, String>| {
            numbers
                .keys()
                .map(|&number| {
                    let cells = puzzle.clue_cells(number, direction).unwrap_or_default();
                    (number, grid::is_filled(&self.cells, &cells))
                })
                .collect::<BTreeMap<_, _>>()
        };
        let across = filled(Direction::Across, &puzzle.across_clues);
        let down = filled(Direction::Down, &puzzle.down_clues);
        self.across_clues_filled = across;
        self.down_clues_filled = down;
    }
}

impl Solve for State {
    const KIND: PuzzleKind = PuzzleKind::Crossword;
    type Puzzle = Puzzle;
    type Settings = Settings;

    fn select(puzzle: Puzzle) -> Self {
        Self::new(Arc::new(puzzle))
    }

    fn clock(&self) -> &SolveClock {
        &self.clock
    }

    fn clock_mut(&mut self) -> &mut SolveClock {
        &mut self.clock
    }

    fn has_puzzle(&self) -> bool {
        self.puzzle.is_some()
    }

    fn apply_effect(
        &mut self,
        effect: SettingEffect,
        _settings: &Settings,
        now: DateTime<Utc>,
    ) -> Result<EffectOutcome, EngineError> {
        if effect != SettingEffect::ClearIncorrectCells || !self.clock.status.is_in_progress() {
            return Ok(EffectOutcome::default());
        }
        self.clear_incorrect_cells(now)?;
        Ok(EffectOutcome {
            changed: true,
            completed: self.clock.status.is_complete(),
        })
    }

    fn for_viewers(&self) -> Self {
        Self {
            puzzle: self
                .puzzle
                .as_ref()
                .map(|p| Arc::new(p.without_solution())),
            ..self.clone()
        }
    }

    fn normalize_clue(&self, clue: &str) -> Result<String, EngineError> {
        let puzzle = self.puzzle()?;
        let clue = parse_clue_reference(clue)?;
        if puzzle.clue_cells(clue.number, clue.direction).is_none() {
            return Err(EngineError::ClueNotFound(clue.to_string()));
        }
        Ok(clue.to_string())
    }
}
