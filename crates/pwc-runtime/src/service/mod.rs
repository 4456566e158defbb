//! Solve service - command handling over the store, engine and registry.
//!
//! Every mutating operation runs the same sequence while holding the
//! channel's lock:
//!
//! ```text
//! load settings/state ──► engine ──► save ──► publish
//!       (store)          (pure)     (store)  (registry)
//! ```
//!
//! A failure at any step returns before the later steps run, so nothing is
//! published for a change that was not saved. Settings and state are saved
//! separately: a setting update whose state side effect fails leaves the
//! new settings in place.
//!
//! # Events per operation
//!
//! | Operation | Events (in order) |
//! |-----------|-------------------|
//! | `select_puzzle` | `state` |
//! | `toggle_status` | `state` |
//! | `update_setting` | `settings`, then `state` and `complete` when the side effect changed or finished the solve |
//! | `answer_*` | `state`, then `complete`, then `genius` when they apply |
//! | `show_clue` | `show_clue` |
//! | `shuffle_letters` | `state` |
//!
//! `state` events always carry [`Solve::for_viewers`] copies.

mod error;

pub use error::ServiceError;

use crate::config::{LimitsConfig, PwcConfig};
use crate::registry::Registry;
use crate::store::KeyValueStore;
use crate::viewer::ViewerStream;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use pwc_engine::{acrostic, crossword, spellingbee, AnswerOutcome, SettingEffect, Settings as _, Solve};
use pwc_event::{Event, Topic};
use pwc_types::{ChannelName, PuzzleKind, Status};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info};

/// Handles solve commands for every channel.
pub struct SolveService<S> {
    store: S,
    registry: Arc<Registry>,
    limits: LimitsConfig,
    /// One lock per state key.
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl<S: KeyValueStore> SolveService<S> {
    #[must_use]
    pub fn new(store: S, registry: Arc<Registry>, limits: LimitsConfig) -> Self {
        Self {
            store,
            registry,
            limits,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a service with its own registry sized from `config`.
    #[must_use]
    pub fn from_config(store: S, config: &PwcConfig) -> Self {
        let registry = Arc::new(Registry::new(config.registry.buffer_size));
        Self::new(store, registry, config.limits.clone())
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replaces the channel's state with a fresh solve of `puzzle`.
    ///
    /// # Errors
    ///
    /// Store and serialization errors.
    pub async fn select_puzzle<P: Solve>(
        &self,
        channel: &ChannelName,
        puzzle: P::Puzzle,
    ) -> Result<(), ServiceError> {
        let _guard = self.lock(P::KIND, channel).await;
        let state = P::select(puzzle);
        self.save(&P::KIND.state_key(channel), &state).await?;
        info!(channel = %channel, kind = %P::KIND, "Puzzle selected");
        self.publish_state(channel, &state)
    }

    /// Reads the channel's settings, defaulting when none are stored.
    ///
    /// # Errors
    ///
    /// Store and serialization errors.
    pub async fn settings<P: Solve>(&self, channel: &ChannelName) -> Result<P::Settings, ServiceError> {
        self.load(&P::KIND.settings_key(channel)).await
    }

    /// Reads the channel's full state, solution included.
    ///
    /// # Errors
    ///
    /// Store and serialization errors.
    pub async fn state<P: Solve>(&self, channel: &ChannelName) -> Result<P, ServiceError> {
        self.load(&P::KIND.state_key(channel)).await
    }

    /// Applies one named setting and any state change it requires.
    ///
    /// # Errors
    ///
    /// Engine errors for an unknown name or bad value; store and
    /// serialization errors from either save.
    pub async fn update_setting<P: Solve>(
        &self,
        channel: &ChannelName,
        name: &str,
        value: &Value,
        now: DateTime<Utc>,
    ) -> Result<SettingEffect, ServiceError> {
        let _guard = self.lock(P::KIND, channel).await;
        let settings_key = P::KIND.settings_key(channel);

        let mut settings: P::Settings = self.load(&settings_key).await?;
        let effect = settings.update(name, value)?;
        self.save(&settings_key, &settings).await?;
        debug!(channel = %channel, kind = %P::KIND, setting = name, "Setting updated");
        self.publish(channel, P::KIND, &Event::settings(&settings)?);

        if effect == SettingEffect::None {
            return Ok(effect);
        }

        let state_key = P::KIND.state_key(channel);
        let mut state: P = self.load(&state_key).await?;
        let outcome = state.apply_effect(effect, &settings, now)?;
        if outcome.changed {
            self.save(&state_key, &state).await?;
            self.publish_state(channel, &state)?;
        }
        if outcome.completed {
            info!(channel = %channel, kind = %P::KIND, "Puzzle complete");
            self.publish(channel, P::KIND, &Event::complete());
        }
        Ok(effect)
    }

    /// Starts, pauses or resumes the channel's solve.
    ///
    /// # Errors
    ///
    /// Policy errors from the engine when no puzzle is selected or the
    /// solve is complete; store and serialization errors.
    pub async fn toggle_status<P: Solve>(
        &self,
        channel: &ChannelName,
        now: DateTime<Utc>,
    ) -> Result<Status, ServiceError> {
        let _guard = self.lock(P::KIND, channel).await;
        let key = P::KIND.state_key(channel);
        let mut state: P = self.load(&key).await?;
        let status = state.toggle_status(now)?;
        self.save(&key, &state).await?;
        info!(channel = %channel, kind = %P::KIND, status = %status, "Status changed");
        self.publish_state(channel, &state)?;
        Ok(status)
    }

    /// Applies a crossword answer such as `("1a", "Q AND A")`.
    ///
    /// # Errors
    ///
    /// [`ServiceError::EmptyAnswer`], [`ServiceError::AnswerTooLong`], engine
    /// errors, store and serialization errors.
    pub async fn answer_crossword(
        &self,
        channel: &ChannelName,
        clue: &str,
        answer: &str,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, ServiceError> {
        self.check_answer(answer)?;
        let kind = PuzzleKind::Crossword;
        let _guard = self.lock(kind, channel).await;
        let settings: crossword::Settings = self.load(&kind.settings_key(channel)).await?;
        let mut state: crossword::State = self.load(&kind.state_key(channel)).await?;
        let outcome = state.apply_answer(clue, answer, settings.only_allow_correct_answers, now)?;
        self.commit(channel, &state, outcome).await?;
        Ok(outcome)
    }

    /// Applies an acrostic answer to a clue letter or a starting cell number.
    ///
    /// # Errors
    ///
    /// Same as [`answer_crossword`](Self::answer_crossword).
    pub async fn answer_acrostic(
        &self,
        channel: &ChannelName,
        clue: &str,
        answer: &str,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, ServiceError> {
        self.check_answer(answer)?;
        let kind = PuzzleKind::Acrostic;
        let _guard = self.lock(kind, channel).await;
        let settings: acrostic::Settings = self.load(&kind.settings_key(channel)).await?;
        let mut state: acrostic::State = self.load(&kind.state_key(channel)).await?;
        let outcome = state.apply_answer(clue, answer, settings.only_allow_correct_answers, now)?;
        self.commit(channel, &state, outcome).await?;
        Ok(outcome)
    }

    /// Records a spelling-bee word.
    ///
    /// # Errors
    ///
    /// Same as [`answer_crossword`](Self::answer_crossword).
    pub async fn answer_spelling_bee(
        &self,
        channel: &ChannelName,
        answer: &str,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, ServiceError> {
        self.check_answer(answer)?;
        let kind = PuzzleKind::SpellingBee;
        let _guard = self.lock(kind, channel).await;
        let settings: spellingbee::Settings = self.load(&kind.settings_key(channel)).await?;
        let mut state: spellingbee::State = self.load(&kind.state_key(channel)).await?;
        let outcome = state.apply_answer(answer, settings.allow_unofficial_answers, now)?;
        self.commit(channel, &state, outcome).await?;
        Ok(outcome)
    }

    /// Asks viewers to highlight a clue. Nothing is written.
    ///
    /// # Returns
    ///
    /// The normalized clue reference sent as the payload.
    ///
    /// # Errors
    ///
    /// Engine errors when the kind has no clues, no puzzle is selected or
    /// the clue does not exist; store and serialization errors.
    pub async fn show_clue<P: Solve>(
        &self,
        channel: &ChannelName,
        clue: &str,
    ) -> Result<String, ServiceError> {
        let state: P = self.load(&P::KIND.state_key(channel)).await?;
        let clue = state.normalize_clue(clue)?;
        self.publish(channel, P::KIND, &Event::show_clue(clue.clone()));
        Ok(clue)
    }

    /// Shuffles the spelling-bee letters shown to viewers.
    ///
    /// # Errors
    ///
    /// [`NotSolving`](pwc_engine::EngineError::NotSolving) unless solving;
    /// store and serialization errors.
    pub async fn shuffle_letters<R: Rng + ?Sized + Send>(
        &self,
        channel: &ChannelName,
        rng: &mut R,
    ) -> Result<(), ServiceError> {
        let kind = PuzzleKind::SpellingBee;
        let _guard = self.lock(kind, channel).await;
        let key = kind.state_key(channel);
        let mut state: spellingbee::State = self.load(&key).await?;
        state.shuffle_letters(rng)?;
        self.save(&key, &state).await?;
        self.publish_state(channel, &state)
    }

    /// Opens a viewer stream seeded with the current settings and, once a
    /// puzzle is selected, the current state.
    ///
    /// # Errors
    ///
    /// Store and serialization errors.
    pub async fn connect<P: Solve>(&self, channel: &ChannelName) -> Result<ViewerStream, ServiceError> {
        // Held so no event can be published between the seed and the subscription.
        let _guard = self.lock(P::KIND, channel).await;
        let settings: P::Settings = self.load(&P::KIND.settings_key(channel)).await?;
        let state: P = self.load(&P::KIND.state_key(channel)).await?;

        let mut seed = vec![Event::settings(&settings)?];
        if state.has_puzzle() {
            seed.push(Event::state(&state.for_viewers())?);
        }
        let stream = ViewerStream::open(
            Arc::clone(&self.registry),
            Topic::new(channel, P::KIND),
            seed,
        );
        debug!(channel = %channel, kind = %P::KIND, subscription = %stream.id(), "Viewer stream opened");
        Ok(stream)
    }

    fn check_answer(&self, answer: &str) -> Result<(), ServiceError> {
        if answer.len() > self.limits.max_answer_bytes {
            return Err(ServiceError::AnswerTooLong {
                len: answer.len(),
                max: self.limits.max_answer_bytes,
            });
        }
        if answer.trim().is_empty() {
            return Err(ServiceError::EmptyAnswer);
        }
        Ok(())
    }

    async fn commit<P: Solve>(
        &self,
        channel: &ChannelName,
        state: &P,
        outcome: AnswerOutcome,
    ) -> Result<(), ServiceError> {
        self.save(&P::KIND.state_key(channel), state).await?;
        self.publish_state(channel, state)?;
        if outcome.completed {
            info!(channel = %channel, kind = %P::KIND, "Puzzle complete");
            self.publish(channel, P::KIND, &Event::complete());
        }
        if outcome.genius {
            info!(channel = %channel, "Genius reached");
            self.publish(channel, P::KIND, &Event::genius());
        }
        Ok(())
    }

    /// Locks the channel's state key. Entries nobody holds or waits on are
    /// dropped first, so the map only grows with concurrently busy keys.
    async fn lock(&self, kind: PuzzleKind, channel: &ChannelName) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut locks = self.locks.lock();
            locks.retain(|_, mutex| Arc::strong_count(mutex) > 1);
            Arc::clone(locks.entry(kind.state_key(channel)).or_default())
        };
        mutex.lock_owned().await
    }

    #[cfg(test)]
    fn lock_count(&self) -> usize {
        self.locks.lock().len()
    }

    async fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, ServiceError> {
        match self.store.get(key).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(T::default()),
        }
    }

    async fn save<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), ServiceError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set(key, bytes).await?;
        Ok(())
    }

    fn publish_state<P: Solve>(&self, channel: &ChannelName, state: &P) -> Result<(), ServiceError> {
        let event = Event::state(&state.for_viewers())?;
        self.publish(channel, P::KIND, &event);
        Ok(())
    }

    fn publish(&self, channel: &ChannelName, kind: PuzzleKind, event: &Event) {
        let topic = Topic::new(channel, kind);
        let delivered = self.registry.publish(&topic, event);
        debug!(topic = %topic, kind = %event.kind, delivered, "Published event");
    }
}

impl<S> std::fmt::Debug for SolveService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolveService")
            .field("registry", &self.registry)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
