//! # Switchboard
//!
//! A typed in-process message bus with request/response correlation,
//! plus a pure `Machine` trait for the state machines that sit on top.
//!
//! ## Architecture
//!
//! ```text
//! Front-end (session loop)
//!     │
//!     ▼ request()                 serve() loops, one per context
//! MessageBus<M> ────────────────► Handler A (answers its requests)
//!     ▲                           Handler B
//!     │ responses, same cid           │
//!     └───────────────────────────────┘
//! ```
//!
//! One message enum travels the bus; every subscriber sees every envelope.
//! A handler answers the request variants it owns and ignores the rest;
//! responses are emitted under the request's correlation id, so a caller
//! suspended in [`request`] picks up exactly its own answers.
//!
//! ## Guarantees
//!
//! - **At-most-once delivery**: slow receivers may miss envelopes
//! - **In-memory only**: nothing is persisted
//! - **Failures are messages**: handlers report errors as response
//!   variants; nothing crosses the bus as a panic or error type

pub mod bus;
pub mod handler;
pub mod machine;
pub mod request;

pub use bus::{CorrelationId, Envelope, Message, MessageBus};
pub use handler::{serve, Handler};
pub use machine::Machine;
pub use request::{request, request_timeout, RequestError, DEFAULT_REQUEST_TIMEOUT};
