//! Shape shared by every kind's solve state.
//!
//! The runtime drives selection, status toggles, setting side effects and
//! viewer snapshots generically through [`Solve`]. Answer submission differs
//! per kind (a clue plus answer for grids, a bare word for the spelling bee)
//! and stays on the concrete state types.

use crate::clock::SolveClock;
use crate::error::EngineError;
use crate::settings::{SettingEffect, Settings};
use chrono::{DateTime, Utc};
use pwc_types::{PuzzleKind, Status};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Result of an accepted answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// The answer finished the puzzle.
    pub completed: bool,
    /// The answer crossed the spelling-bee genius threshold.
    pub genius: bool,
}

/// Result of applying a [`SettingEffect`] to a state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectOutcome {
    /// The state was modified and must be persisted and republished.
    pub changed: bool,
    /// The modification finished the puzzle.
    pub completed: bool,
}

/// A kind's per-channel solve state.
pub trait Solve:
    Default + Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Kind used for store keys and topics.
    const KIND: PuzzleKind;

    /// Immutable puzzle description.
    type Puzzle: Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Per-channel settings for this kind.
    type Settings: Settings;

    /// Starts a new solve of `puzzle` with status `Selected`.
    fn select(puzzle: Self::Puzzle) -> Self;

    /// Status and timer.
    fn clock(&self) -> &SolveClock;

    /// Mutable status and timer.
    fn clock_mut(&mut self) -> &mut SolveClock;

    /// Returns `true` once a puzzle has been selected.
    fn has_puzzle(&self) -> bool;

    /// Applies a setting side effect, if it applies to this kind and the
    /// solve is in progress.
    ///
    /// # Errors
    ///
    /// Propagates engine errors from the underlying operation.
    fn apply_effect(
        &mut self,
        effect: SettingEffect,
        settings: &Self::Settings,
        now: DateTime<Utc>,
    ) -> Result<EffectOutcome, EngineError>;

    /// Copy of the state safe to send to viewers: the puzzle's solution is
    /// replaced by its solution-free counterpart.
    #[must_use]
    fn for_viewers(&self) -> Self;

    /// Validates a clue reference for a show-clue request and returns its
    /// normalized form.
    ///
    /// # Errors
    ///
    /// [`EngineError::Unsupported`] unless the kind has clues.
    fn normalize_clue(&self, _clue: &str) -> Result<String, EngineError> {
        Err(EngineError::Unsupported("show_clue"))
    }

    /// Current status.
    fn status(&self) -> Status {
        self.clock().status
    }

    /// Starts, pauses or resumes the solve.
    ///
    /// # Errors
    ///
    /// See [`SolveClock::toggle`].
    fn toggle_status(&mut self, now: DateTime<Utc>) -> Result<Status, EngineError> {
        self.clock_mut().toggle(now)
    }
}
