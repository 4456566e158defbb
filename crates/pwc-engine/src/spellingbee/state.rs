//! Spelling-bee solve state.

use super::puzzle::Puzzle;
use super::settings::Settings;
use crate::clock::SolveClock;
use crate::error::EngineError;
use crate::settings::SettingEffect;
use crate::solve::{AnswerOutcome, EffectOutcome, Solve};
use chrono::{DateTime, Utc};
use pwc_types::PuzzleKind;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Fraction of the maximum score that earns "genius", as `NUM / DEN`.
const GENIUS_NUM: u32 = 7;
const GENIUS_DEN: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct State {
    #[serde(flatten)]
    pub clock: SolveClock,
    pub puzzle: Option<Arc<Puzzle>>,
    /// Non-center letters in display order.
    pub letters: Vec<char>,
    /// Found word to its index in the sorted list of accepted answers.
    pub words: BTreeMap<String, usize>,
    pub score: u32,
    /// Genius was reached during this solve. Set once, never cleared.
    pub genius: bool,
}

fn is_genius(score: u32, max: u32) -> bool {
    max > 0 && score * GENIUS_DEN >= max * GENIUS_NUM
}

impl State {
    #[must_use]
    pub fn new(puzzle: Arc<Puzzle>) -> Self {
        Self {
            clock: SolveClock::selected(),
            letters: puzzle.letters.clone(),
            puzzle: Some(puzzle),
            ..Self::default()
        }
    }

    fn puzzle(&self) -> Result<Arc<Puzzle>, EngineError> {
        self.puzzle.clone().ok_or(EngineError::NoPuzzleSelected)
    }

    /// Records a found word.
    ///
    /// Repeating a found word succeeds without changing anything.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotSolving`] unless the status is `Solving`
    /// - [`EngineError::InvalidAnswer`] for an empty answer
    /// - [`EngineError::UnofficialWord`] for an unofficial word while those
    ///   are not allowed
    /// - [`EngineError::UnknownWord`] for anything else not on the lists
    pub fn apply_answer(
        &mut self,
        answer: &str,
        allow_unofficial: bool,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, EngineError> {
        self.clock.ensure_solving()?;
        let puzzle = self.puzzle()?;

        let word = answer.trim().to_uppercase();
        if word.is_empty() {
            return Err(EngineError::invalid_answer(answer, "empty answer"));
        }
        if self.words.contains_key(&word) {
            return Ok(AnswerOutcome::default());
        }
        if !puzzle.is_official(&word) {
            if !puzzle.is_unofficial(&word) {
                return Err(EngineError::UnknownWord(word));
            }
            if !allow_unofficial {
                return Err(EngineError::UnofficialWord(word));
            }
        }

        self.words.insert(word.clone(), 0);
        self.reindex(&puzzle, allow_unofficial);
        debug!(word = %word, score = self.score, "Applied spelling bee answer");

        let completed = self.all_found(&puzzle, allow_unofficial);
        if completed {
            self.clock.complete(now);
        }
        let genius = !self.genius && is_genius(self.score, puzzle.max_score(allow_unofficial));
        self.genius |= genius;
        Ok(AnswerOutcome { completed, genius })
    }

    /// Drops every found word that is not official and re-indexes the rest.
    ///
    /// Returns the number of words removed. Removing the last unofficial
    /// word may leave every official word found, which completes the
    /// puzzle.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoPuzzleSelected`] if the state has no puzzle.
    pub fn clear_unofficial_answers(&mut self, now: DateTime<Utc>) -> Result<usize, EngineError> {
        let puzzle = self.puzzle()?;
        let before = self.words.len();
        self.reindex(&puzzle, false);

        if self.clock.status.is_in_progress() && self.all_found(&puzzle, false) {
            self.clock.complete(now);
        }
        Ok(before - self.words.len())
    }

    /// Shuffles the display order of the non-center letters.
    ///
    /// The new order always differs from the old one when there is more
    /// than one distinct letter.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotSolving`] unless the status is `Solving`.
    pub fn shuffle_letters<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), EngineError> {
        self.clock.ensure_solving()?;
        let before = self.letters.clone();
        self.letters.shuffle(rng);
        if self.letters == before {
            self.letters.rotate_left(1);
        }
        Ok(())
    }

    /// Rebuilds word indexes against the accepted answers, dropping found
    /// words that are no longer accepted, and recomputes the score.
    fn reindex(&mut self, puzzle: &Puzzle, allow_unofficial: bool) {
        let allowed = puzzle.allowed_answers(allow_unofficial);
        self.words = std::mem::take(&mut self.words)
            .into_keys()
            .filter_map(|word| {
                let index = allowed.binary_search(&word.as_str()).ok()?;
                Some((word, index))
            })
            .collect();
        self.score = self.words.keys().map(|w| puzzle.score(w)).sum();
    }

    fn all_found(&self, puzzle: &Puzzle, allow_unofficial: bool) -> bool {
        puzzle
            .allowed_answers(allow_unofficial)
            .into_iter()
            .all(|w| self.words.contains_key(w))
    }
}

impl Solve for State {
    const KIND: PuzzleKind = PuzzleKind::SpellingBee;
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
        settings: &Settings,
        now: DateTime<Utc>,
    ) -> Result<EffectOutcome, EngineError> {
        match effect {
            SettingEffect::ClearUnofficialAnswers if self.clock.status.is_in_progress() => {
                self.clear_unofficial_answers(now)?;
                Ok(EffectOutcome {
                    changed: true,
                    completed: self.clock.status.is_complete(),
                })
            }
            SettingEffect::ReindexAnswers => {
                let Some(puzzle) = self.puzzle.clone() else {
                    return Ok(EffectOutcome::default());
                };
                let before = self.words.clone();
                self.reindex(&puzzle, settings.allow_unofficial_answers);
                Ok(EffectOutcome {
                    changed: self.words != before,
                    completed: false,
                })
            }
            _ => Ok(EffectOutcome::default()),
        }
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
}
