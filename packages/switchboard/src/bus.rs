//! Typed broadcast bus carrying correlation envelopes.

use std::fmt;

use tokio::sync::broadcast;
use uuid::Uuid;

/// Default channel capacity for the bus.
const DEFAULT_CAPACITY: usize = 256;

/// Marker for payloads that can travel on a [`MessageBus`].
///
/// Blanket-implemented; any cloneable, printable, thread-safe type
/// qualifies. Messages are cloned per subscriber, so no state is shared
/// across contexts except the payloads themselves.
pub trait Message: Clone + Send + Sync + fmt::Debug + 'static {}

impl<T: Clone + Send + Sync + fmt::Debug + 'static> Message for T {}

/// Correlation id pairing a request with its responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A message plus the correlation id it travels under.
#[derive(Debug, Clone)]
pub struct Envelope<M> {
    pub cid: CorrelationId,
    pub message: M,
}

/// Broadcast bus for one message enum.
///
/// Cloning the bus shares the underlying channel. Subscribers receive
/// every envelope emitted after they subscribe; there is no replay.
#[derive(Clone)]
pub struct MessageBus<M> {
    sender: broadcast::Sender<Envelope<M>>,
}

impl<M: Message> MessageBus<M> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// The capacity bounds how many envelopes a slow receiver can fall
    /// behind before it starts lagging.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit under a fresh correlation id.
    ///
    /// Returns the number of receivers that saw the envelope.
    pub fn emit(&self, message: M) -> usize {
        self.emit_with_correlation(message, CorrelationId::new())
    }

    /// Emit under a specific correlation id. Responders use this to answer
    /// under the id of the request they are answering.
    pub fn emit_with_correlation(&self, message: M, cid: CorrelationId) -> usize {
        self.sender.send(Envelope { cid, message }).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Envelope<M>> {
        self.sender.subscribe()
    }

    /// Number of live subscriptions. Zero means an emitted request could
    /// never be answered.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<M: Message> Default for MessageBus<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for MessageBus<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBus")
            .field("subscriber_count", &self.sender.receiver_count())
            .finish()
    }
}
