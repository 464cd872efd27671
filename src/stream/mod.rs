//! Streaming layer: the open push-channel connection and its two units.
//!
//! The connection is split by direction: exactly one unit writes (the
//! keep-alive unit) and exactly one unit reads (the stream reader), so no
//! mutual exclusion is needed over the socket.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | WebSocket upgrade and directional split |
//! | `keepalive` | Announce/beacon unit |
//! | `reader` | Inbound frame consumption and sink forwarding |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket upgrade and directional split.
pub mod connection;

/// Keep-alive unit.
pub mod keepalive;

/// Stream reader and message sink.
pub mod reader;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, FrameSink, FrameSource};
pub use keepalive::KeepAlive;
pub use reader::{MessageSink, StdoutSink, StreamReader};
