//! Registry - per-topic fan-out of viewer events.
//!
//! The [`Registry`] delivers each published [`Event`] to every stream
//! subscribed to its [`Topic`].
//!
//! ```text
//!                        ┌──────────────┐   try_send   ┌──────────┐
//!  service ── publish ──►│   Registry   │ ───────────► │ viewer 1 │
//!                        │              │ ───────────► │ viewer 2 │
//!                        │ topic → subs │ ───────────► │ viewer N │
//!                        └──────────────┘              └──────────┘
//! ```
//!
//! # Delivery
//!
//! - The lock is held only while reading or changing the subscriber map,
//!   never while handing an event to a subscriber.
//! - Each subscriber owns a bounded buffer. A full buffer drops the event
//!   for that subscriber only; the publisher never waits.
//! - Subscribers whose receiving end has gone away are removed on the next
//!   publish to their topic.
//!
//! The registry is an ordinary value: share it with `Arc`, and create as
//! many as tests need.

use parking_lot::RwLock;
use pwc_event::{Event, Topic};
use std::collections::HashMap;
use std::fmt;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Default per-subscriber buffer, in events.
pub const DEFAULT_BUFFER_SIZE: usize = 10;

/// Opaque handle to one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub:{}", self.0)
    }
}

#[derive(Default)]
struct Subscribers {
    by_topic: HashMap<Topic, HashMap<SubscriptionId, mpsc::Sender<Event>>>,
    topics: HashMap<SubscriptionId, Topic>,
}

impl Subscribers {
    fn remove(&mut self, id: SubscriptionId) -> bool {
        let Some(topic) = self.topics.remove(&id) else {
            return false;
        };
        if let Some(subs) = self.by_topic.get_mut(&topic) {
            subs.remove(&id);
            if subs.is_empty() {
                self.by_topic.remove(&topic);
            }
        }
        true
    }
}

/// In-memory publish/subscribe broker.
pub struct Registry {
    subscribers: RwLock<Subscribers>,
    buffer_size: usize,
}

impl Registry {
    /// Creates a registry whose streams buffer `buffer_size` events.
    ///
    /// A zero size is raised to one.
    #[must_use]
    pub fn new(buffer_size: usize) -> Self {
        Self {
            subscribers: RwLock::new(Subscribers::default()),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Per-subscriber buffer size used by [`channel`](Self::channel).
    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Creates a bounded stream sized for this registry.
    #[must_use]
    pub fn channel(&self) -> (mpsc::Sender<Event>, mpsc::Receiver<Event>) {
        mpsc::channel(self.buffer_size)
    }

    /// Registers `sender` to receive every future event on `topic`.
    pub fn subscribe(&self, topic: Topic, sender: mpsc::Sender<Event>) -> SubscriptionId {
        let id = SubscriptionId::new();
        let mut subs = self.subscribers.write();
        subs.by_topic
            .entry(topic.clone())
            .or_default()
            .insert(id, sender);
        subs.topics.insert(id, topic.clone());
        debug!(topic = %topic, subscription = %id, "Subscribed");
        id
    }

    /// Removes a subscription. Unknown or already removed IDs are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        if self.subscribers.write().remove(id) {
            debug!(subscription = %id, "Unsubscribed");
        }
    }

    /// Delivers `event` to every subscriber of `topic` without blocking.
    ///
    /// # Returns
    ///
    /// Number of subscribers that accepted the event.
    pub fn publish(&self, topic: &Topic, event: &Event) -> usize {
        // Collect senders first so no lock is held while sending.
        let senders: Vec<(SubscriptionId, mpsc::Sender<Event>)> = {
            let subs = self.subscribers.read();
            match subs.by_topic.get(topic) {
                Some(map) => map.iter().map(|(id, tx)| (*id, tx.clone())).collect(),
                None => return 0,
            }
        };

        let mut delivered = 0;
        let mut closed = Vec::new();
        for (id, sender) in senders {
            match sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(topic = %topic, subscription = %id, kind = %event.kind, "Subscriber buffer full, dropping event");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => closed.push(id),
            }
        }

        if !closed.is_empty() {
            let mut subs = self.subscribers.write();
            for id in closed {
                if subs.remove(id) {
                    debug!(topic = %topic, subscription = %id, "Removed closed subscriber");
                }
            }
        }
        delivered
    }

    /// Number of live subscriptions on `topic`.
    #[must_use]
    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.subscribers
            .read()
            .by_topic
            .get(topic)
            .map_or(0, HashMap::len)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subs = self.subscribers.read();
        f.debug_struct("Registry")
            .field("topics", &subs.by_topic.len())
            .field("subscriptions", &subs.topics.len())
            .field("buffer_size", &self.buffer_size)
            .finish()
    }
}
