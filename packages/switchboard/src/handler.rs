//! Named responder loops, one per context.

use async_trait::async_trait;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::bus::{Message, MessageBus};

/// A context that answers some of the requests on the bus.
///
/// `handle` returns `None` for messages this context does not own,
/// including its own responses, which arrive back on its subscription.
#[async_trait]
pub trait Handler<M: Message>: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Answer a request, or `None` to stay silent. Failures must come
    /// back as response messages, never as panics.
    async fn handle(&self, message: &M) -> Option<Vec<M>>;
}

/// Spawn a task serving `handler` for the life of the process.
///
/// The subscription is taken before the task is spawned, so a request
/// emitted right after `serve` returns is already observable. Responses
/// go out under the correlation id of the request they answer.
pub fn serve<M, H>(bus: &MessageBus<M>, handler: H) -> JoinHandle<()>
where
    M: Message,
    H: Handler<M>,
{
    let bus = bus.clone();
    let mut receiver = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(envelope) => {
                    if let Some(responses) = handler.handle(&envelope.message).await {
                        tracing::debug!(
                            handler = handler.name(),
                            cid = %envelope.cid,
                            responses = responses.len(),
                            "Handled request"
                        );
                        for response in responses {
                            bus.emit_with_correlation(response, envelope.cid);
                        }
                    }
                }
                Err(RecvError::Closed) => break,
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!(
                        handler = handler.name(),
                        lagged = n,
                        "handler lagged, requests may be missed"
                    );
                }
            }
        }
        tracing::debug!(handler = handler.name(), "handler stopped");
    })
}
