//! Topic-based event bus implementation.

use tokio::sync::broadcast;

use super::types::{SessionEvent, SnapshotEvent, StatusMessage};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    /// Snapshot replacements
    Snapshot,
    /// Wallet session lifecycle
    Session,
    /// User-visible status lines
    Status,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone)]
pub enum Event {
    Snapshot(SnapshotEvent),
    Session(SessionEvent),
    Status(StatusMessage),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Snapshot(_) => Topic::Snapshot,
            Event::Session(_) => Topic::Session,
            Event::Status(_) => Topic::Status,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; events sent while a topic
/// has no subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    snapshot: broadcast::Sender<Event>,
    session: broadcast::Sender<Event>,
    status: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            snapshot: broadcast::channel(capacity).0,
            session: broadcast::channel(capacity).0,
            status: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Snapshot => &self.snapshot,
            Topic::Session => &self.session,
            Topic::Status => &self.status,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    pub(crate) fn info(&self, text: impl Into<String>) {
        self.publish(Event::Status(StatusMessage::info(text)));
    }

    pub(crate) fn success(&self, text: impl Into<String>) {
        self.publish(Event::Status(StatusMessage::success(text)));
    }

    pub(crate) fn error(&self, text: impl Into<String>) {
        self.publish(Event::Status(StatusMessage::error(text)));
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
