//! Channel membership monitor.
//!
//! Each upstream integration periodically reports the full set of channels
//! it wants watched. The monitor keeps the latest set per integration and,
//! on every report, diffs the union before and after:
//!
//! ```text
//! before = ∪ sets          after = ∪ sets (with the new report)
//! added   = after  \ before  → on_add(channel)
//! removed = before \ after   → on_remove(channel)
//! always                     → on_update(report)
//! ```
//!
//! Updates run under one lock, callbacks included, so two reports never
//! interleave. Callbacks must not call back into the monitor; hand work
//! off to a task instead.

use parking_lot::Mutex;
use pwc_types::ChannelName;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, info};

/// Name of an upstream integration, e.g. `"twitch"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntegrationId(String);

impl IntegrationId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IntegrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Channel sets keyed by integration.
pub type ChannelSets = BTreeMap<IntegrationId, BTreeSet<ChannelName>>;

type ChannelCallback = Box<dyn Fn(&ChannelName) + Send + Sync>;
type UpdateCallback = Box<dyn Fn(&ChannelSets) + Send + Sync>;

/// Tracks which channels are being watched across integrations.
#[derive(Default)]
pub struct ChannelMonitor {
    channels: Mutex<ChannelSets>,
    on_add: Option<ChannelCallback>,
    on_remove: Option<ChannelCallback>,
    on_update: Option<UpdateCallback>,
}

impl ChannelMonitor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the callback run for each channel that starts being watched.
    #[must_use]
    pub fn on_add(mut self, f: impl Fn(&ChannelName) + Send + Sync + 'static) -> Self {
        self.on_add = Some(Box::new(f));
        self
    }

    /// Sets the callback run for each channel that stops being watched.
    #[must_use]
    pub fn on_remove(mut self, f: impl Fn(&ChannelName) + Send + Sync + 'static) -> Self {
        self.on_remove = Some(Box::new(f));
        self
    }

    /// Sets the callback run with every report, changed or not.
    #[must_use]
    pub fn on_update(mut self, f: impl Fn(&ChannelSets) + Send + Sync + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    /// Replaces one integration's channel set.
    pub fn update(&self, id: IntegrationId, channels: impl IntoIterator<Item = ChannelName>) {
        let report = BTreeMap::from([(id, channels.into_iter().collect())]);
        self.update_many(report);
    }

    /// Replaces the channel sets of every integration in `report`.
    ///
    /// Integrations not named in the report keep their previous sets.
    pub fn update_many(&self, report: ChannelSets) {
        let mut channels = self.channels.lock();

        let before = union(&channels);
        for (id, set) in &report {
            channels.insert(id.clone(), set.clone());
        }
        let after = union(&channels);

        for channel in after.difference(&before) {
            info!(channel = %channel, "Channel added");
            if let Some(f) = &self.on_add {
                f(channel);
            }
        }
        for channel in before.difference(&after) {
            info!(channel = %channel, "Channel removed");
            if let Some(f) = &self.on_remove {
                f(channel);
            }
        }

        debug!(integrations = report.len(), watched = after.len(), "Channel update applied");
        if let Some(f) = &self.on_update {
            f(&report);
        }
    }

    /// Union of every integration's channels.
    #[must_use]
    pub fn all_channels(&self) -> BTreeSet<ChannelName> {
        union(&self.channels.lock())
    }
}

impl fmt::Debug for ChannelMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelMonitor")
            .field("channels", &*self.channels.lock())
            .finish_non_exhaustive()
    }
}

fn union(sets: &ChannelSets) -> BTreeSet<ChannelName> {
    sets.values().flatten().cloned().collect()
}
