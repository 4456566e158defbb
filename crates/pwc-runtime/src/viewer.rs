//! Viewer connections.
//!
//! A [`ViewerStream`] is one live subscription. It is created by
//! [`SolveService::connect`](crate::SolveService::connect), already seeded
//! with the channel's current settings and state, and unsubscribes itself
//! when dropped.
//!
//! [`run_viewer`] is the long-lived loop a transport runs per connection:
//!
//! ```text
//! loop {
//!     select! {
//!         shutdown        => return Shutdown
//!         stream.recv()   => sink.send(event)?  (None => return Closed)
//!     }
//! }
//! ```

use crate::registry::{Registry, SubscriptionId};
use pwc_event::{Event, Topic};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Receiving end of one subscription.
pub struct ViewerStream {
    id: SubscriptionId,
    topic: Topic,
    pending: VecDeque<Event>,
    receiver: mpsc::Receiver<Event>,
    registry: Arc<Registry>,
}

impl ViewerStream {
    /// Subscribes a new stream to `topic`. `seed` is returned by
    /// [`recv`](Self::recv) before any published event.
    #[must_use]
    pub fn open(registry: Arc<Registry>, topic: Topic, seed: Vec<Event>) -> Self {
        let (sender, receiver) = registry.channel();
        let id = registry.subscribe(topic.clone(), sender);
        Self {
            id,
            topic,
            pending: seed.into(),
            receiver,
            registry,
        }
    }

    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    #[must_use]
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Waits for the next event. `None` once the registry has dropped the
    /// subscription.
    pub async fn recv(&mut self) -> Option<Event> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        self.receiver.recv().await
    }

    /// Returns the next event if one is ready.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.pending
            .pop_front()
            .or_else(|| self.receiver.try_recv().ok())
    }
}

impl Drop for ViewerStream {
    fn drop(&mut self) {
        self.registry.unsubscribe(self.id);
    }
}

impl std::fmt::Debug for ViewerStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerStream")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

/// Transport that relays events to one viewer.
pub trait EventSink: Send {
    type Error: std::fmt::Display + Send;

    /// Delivers one event. An error ends the viewer loop.
    fn send(&mut self, event: &Event) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Why [`run_viewer`] returned normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerExit {
    /// The shutdown future resolved.
    Shutdown,
    /// The subscription was closed by the registry.
    Closed,
}

/// Relays events from `stream` to `sink` until `shutdown` resolves, the
/// stream closes or the sink fails.
///
/// The stream is consumed and unsubscribed on every one of those paths.
///
/// # Errors
///
/// Returns the sink's error if a send fails.
pub async fn run_viewer<S, F>(
    mut stream: ViewerStream,
    sink: &mut S,
    shutdown: F,
) -> Result<ViewerExit, S::Error>
where
    S: EventSink,
    F: Future<Output = ()> + Send,
{
    tokio::pin!(shutdown);
    let topic = stream.topic().clone();
    debug!(topic = %topic, subscription = %stream.id(), "Viewer connected");

    let exit = loop {
        tokio::select! {
            biased;
            () = &mut shutdown => break Ok(ViewerExit::Shutdown),
            event = stream.recv() => match event {
                Some(event) => {
                    if let Err(e) = sink.send(&event).await {
                        debug!(topic = %topic, error = %e, "Viewer send failed");
                        break Err(e);
                    }
                }
                None => break Ok(ViewerExit::Closed),
            },
        }
    };

    debug!(topic = %topic, subscription = %stream.id(), "Viewer disconnected");
    exit
}
