//! Authenticated real-time rate feed client.
//!
//! This library establishes a streaming session against a portal that requires
//! a multi-step session negotiation (HTTP redirect chain → credential exchange
//! → one-time code request → push-channel registration → authenticated
//! WebSocket upgrade), then keeps the feed alive with periodic beacon frames
//! while forwarding inbound messages to a consumer.
//!
//! # Architecture
//!
//! Two tightly coupled pieces:
//!
//! - **Handshake pipeline**: a strictly ordered sequence of dependent network
//!   exchanges, each producing a token consumed by the next, terminating in an
//!   open, authenticated streaming connection ([`HandshakeClient`]).
//! - **Task lifecycle runner**: the scheduling shell that runs the pipeline
//!   and the streaming loop as concurrent units and guarantees an orderly,
//!   complete shutdown ([`TaskRunner`], [`SessionOrchestrator`]).
//!
//! Data flow: credentials → handshake → orchestrator → {keep-alive, reader} →
//! message sink. Control flow: runner → orchestrator → units; termination
//! propagates top-down via a [`CancellationToken`](tokio_util::sync::CancellationToken).
//!
//! # Quick Start
//!
//! ```no_run
//! use rate_feed::{Credentials, FeedConfig, SessionOrchestrator, StdoutSink, TaskRunner};
//!
//! #[tokio::main]
//! async fn main() -> rate_feed::Result<()> {
//!     let credentials = Credentials::new("user@example.com", "secret");
//!     let orchestrator = SessionOrchestrator::new(FeedConfig::default(), credentials);
//!
//!     let runner = TaskRunner::new();
//!     let token = runner.token();
//!     runner.run(orchestrator.run(StdoutSink, token)).await
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Credentials and feed configuration |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`handshake`] | The eight-step session negotiation |
//! | [`orchestrator`] | Session sequencing and unit teardown |
//! | [`protocol`] | Wire message types (frames, handshake bodies) |
//! | [`runner`] | Process lifecycle shell and signal handling |
//! | [`session`] | Session context and auth-key derivation |
//! | [`stream`] | Connection split, keep-alive unit, stream reader |

// ============================================================================
// Modules
// ============================================================================

/// Credentials and feed configuration.
pub mod config;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// The eight-step session negotiation.
pub mod handshake;

/// Session sequencing: handshake, then concurrent keep-alive and reader.
pub mod orchestrator;

/// Wire message types.
pub mod protocol;

/// Process lifecycle shell.
pub mod runner;

/// Session context accumulated during the handshake.
pub mod session;

/// Streaming layer: connection, keep-alive, reader.
pub mod stream;

// ============================================================================
// Re-exports
// ============================================================================

// Configuration
pub use config::{Credentials, FeedConfig};

// Errors
pub use error::{Error, Result};

// Handshake
pub use handshake::HandshakeClient;

// Orchestration and lifecycle
pub use orchestrator::SessionOrchestrator;
pub use runner::{RunnerState, TaskRunner};

// Session
pub use session::{SessionContext, derive_auth_key};

// Streaming
pub use stream::{Connection, KeepAlive, MessageSink, StdoutSink, StreamReader};
