//! Request/response over the bus.
//!
//! [`request`] emits a message and suspends until some envelope with the
//! same correlation id matches the caller's extractor, or until the wait
//! runs out. This is honest message-passing, not RPC: nothing guarantees
//! a response exists, which is why the timeout and the absent-receiver
//! check are part of the contract.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::timeout;

use crate::bus::{CorrelationId, Message, MessageBus};

/// Default wait for a correlated response.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum RequestError {
    /// Nothing is subscribed to the bus, so the request could never be
    /// answered. Best-effort: a receiver appearing mid-flight is fine,
    /// one disappearing is caught by the timeout instead.
    #[error("no receiving end on the bus")]
    NoReceivers,
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("bus closed while awaiting a response")]
    Closed,
}

/// Emit `message` and await a correlated response with the default wait.
///
/// `extract` inspects each correlated message and returns `Some` when it
/// finds the response. It must return `None` for the request itself,
/// which also arrives on the subscription.
pub async fn request<M, R>(
    bus: &MessageBus<M>,
    message: M,
    extract: impl Fn(&M) -> Option<R>,
) -> Result<R, RequestError>
where
    M: Message,
{
    request_timeout(bus, message, DEFAULT_REQUEST_TIMEOUT, extract).await
}

/// [`request`] with a custom wait.
pub async fn request_timeout<M, R>(
    bus: &MessageBus<M>,
    message: M,
    wait: Duration,
    extract: impl Fn(&M) -> Option<R>,
) -> Result<R, RequestError>
where
    M: Message,
{
    if bus.subscriber_count() == 0 {
        return Err(RequestError::NoReceivers);
    }

    let cid = CorrelationId::new();

    // Subscribe before emitting so the response cannot slip past.
    let mut receiver = bus.subscribe();
    bus.emit_with_correlation(message, cid);

    let waited = timeout(wait, async {
        loop {
            match receiver.recv().await {
                Ok(envelope) => {
                    if envelope.cid != cid {
                        continue;
                    }
                    if let Some(found) = extract(&envelope.message) {
                        return Ok(found);
                    }
                }
                Err(RecvError::Closed) => return Err(RequestError::Closed),
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "request receiver lagged, responses may be missed");
                    continue;
                }
            }
        }
    })
    .await;

    match waited {
        Ok(result) => result,
        Err(_) => Err(RequestError::Timeout(wait)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Msg {
        Ask(i32),
        Answer(i32),
    }

    /// Responder loop doubling every `Ask` under its correlation id.
    fn spawn_doubler(bus: &MessageBus<Msg>) {
        let bus = bus.clone();
        let mut receiver = bus.subscribe();
        tokio::spawn(async move {
            while let Ok(envelope) = receiver.recv().await {
                if let Msg::Ask(n) = envelope.message {
                    bus.emit_with_correlation(Msg::Answer(n * 2), envelope.cid);
                }
            }
        });
    }

    #[tokio::test]
    async fn request_receives_the_correlated_answer() {
        let bus = MessageBus::new();
        spawn_doubler(&bus);

        let answer = request(&bus, Msg::Ask(21), |m| match m {
            Msg::Answer(n) => Some(*n),
            _ => None,
        })
        .await
        .unwrap();

        assert_eq!(answer, 42);
    }

    #[tokio::test]
    async fn request_ignores_uncorrelated_answers() {
        let bus = MessageBus::new();

        // Responder that first shouts an unrelated answer, then the real one.
        {
            let bus = bus.clone();
            let mut receiver = bus.subscribe();
            tokio::spawn(async move {
                while let Ok(envelope) = receiver.recv().await {
                    if let Msg::Ask(n) = envelope.message {
                        bus.emit(Msg::Answer(999));
                        bus.emit_with_correlation(Msg::Answer(n * 2), envelope.cid);
                    }
                }
            });
        }

        let answer = request(&bus, Msg::Ask(5), |m| match m {
            Msg::Answer(n) => Some(*n),
            _ => None,
        })
        .await
        .unwrap();

        assert_eq!(answer, 10);
    }

    #[tokio::test]
    async fn request_times_out_when_nobody_answers() {
        let bus = MessageBus::new();
        // A subscriber exists but never responds.
        let _silent = bus.subscribe();

        let result: Result<i32, _> =
            request_timeout(&bus, Msg::Ask(1), Duration::from_millis(50), |m| match m {
                Msg::Answer(n) => Some(*n),
                _ => None,
            })
            .await;

        assert!(matches!(result, Err(RequestError::Timeout(_))));
    }

    #[tokio::test]
    async fn request_detects_an_empty_bus() {
        let bus = MessageBus::new();

        let result: Result<i32, _> = request(&bus, Msg::Ask(1), |_| None).await;

        assert!(matches!(result, Err(RequestError::NoReceivers)));
    }
}
