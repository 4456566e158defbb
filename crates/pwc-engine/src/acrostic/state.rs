//! Acrostic solve state.

use super::puzzle::{ClueRef, Puzzle};
use super::settings::Settings;
use crate::answer::parse_answer_tokens;
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

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct State {
    #[serde(flatten)]
    pub clock: SolveClock,
    pub puzzle: Option<Arc<Puzzle>>,
    pub cells: Grid,
    pub clues_filled: BTreeMap<String, bool>,
}

impl State {
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

    /// Applies an answer to a lettered clue or to a run of cells starting
    /// at a cell number.
    ///
    /// Follows the same correct-only and completion rules as the
    /// crossword.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotSolving`] unless the status is `Solving`
    /// - parse errors for the clue or answer
    /// - [`EngineError::ClueNotFound`], [`EngineError::CellOutOfRange`],
    ///   [`EngineError::AnswerLength`], [`EngineError::IncorrectAnswer`]
    pub fn apply_answer(
        &mut self,
        clue: &str,
        answer: &str,
        correct_only: bool,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, EngineError> {
        self.clock.ensure_solving()?;
        let puzzle = self.puzzle()?;

        let clue = ClueRef::parse(clue)?;
        let tokens = parse_answer_tokens(answer)?;
        let cells = puzzle.answer_cells(&clue, tokens.len())?;

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
        debug!(clue = %clue, "Applied acrostic answer");

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

    fn refresh_filled(&mut self) {
        let Some(puzzle) = self.puzzle.as_deref() else {
            return;
        };
        self.clues_filled = puzzle
            .clue_numbers
            .iter()
            .map(|(letter, numbers)| {
                let filled = numbers.iter().all(|&n| {
                    puzzle
                        .cell_coordinates(n)
                        .is_ok_and(|(x, y)| grid::is_filled(&self.cells, &[(y, x)]))
                });
                (letter.clone(), filled)
            })
            .collect();
    }
}

impl Solve for State {
    const KIND: PuzzleKind = PuzzleKind::Acrostic;
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
        let clue = ClueRef::parse(clue)?;
        puzzle.check_clue(&clue)?;
        Ok(clue.to_string())
    }
}
