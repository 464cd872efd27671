//! Inbound stream consumption.
//!
//! The reader forwards each textual payload to a [`MessageSink`] unchanged;
//! payload structure is the sink's business. Remote close is normal
//! end-of-stream, and cancellation is the designed shutdown path; neither is
//! reported as an error.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::Result;

use super::connection::FrameSource;

// ============================================================================
// MessageSink
// ============================================================================

/// Consumer of inbound text payloads.
///
/// Implementations decide what a payload means; the reader imposes no schema.
#[async_trait]
pub trait MessageSink: Send {
    /// Delivers one raw text payload.
    async fn deliver(&mut self, payload: &str);
}

// ============================================================================
// StdoutSink
// ============================================================================

/// Sink that prints each payload to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

#[async_trait]
impl MessageSink for StdoutSink {
    async fn deliver(&mut self, payload: &str) {
        println!("{payload}");
    }
}

// ============================================================================
// StreamReader
// ============================================================================

/// Unit that drains the read half of the connection into a sink.
pub struct StreamReader<S> {
    source: FrameSource,
    sink: S,
    token: CancellationToken,
}

impl<S: MessageSink> StreamReader<S> {
    /// Creates the unit over the read half of the connection.
    #[must_use]
    pub fn new(source: FrameSource, sink: S, token: CancellationToken) -> Self {
        Self {
            source,
            sink,
            token,
        }
    }

    /// Consumes frames until the remote closes, a fault occurs, or cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WebSocket`](crate::Error::WebSocket) on a transport
    /// fault mid-stream; end-of-stream and cancellation are `Ok(())`.
    pub async fn run(mut self) -> Result<()> {
        loop {
            tokio::select! {
                _ = self.token.cancelled() => {
                    debug!("Stream reader cancelled");
                    return Ok(());
                }
                next = self.source.next_text() => {
                    match next? {
                        Some(payload) => self.sink.deliver(&payload).await,
                        None => {
                            debug!("Stream ended");
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
