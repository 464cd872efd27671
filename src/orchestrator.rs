//! Session orchestration.
//!
//! Sequences handshake → connection split → concurrent {keep-alive, reader},
//! owns the connection's lifetime, and converts any stage failure into a
//! reported error. Exactly one streaming connection is opened and, eventually,
//! closed per invocation.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::{Credentials, FeedConfig};
use crate::error::{Error, Result};
use crate::handshake::HandshakeClient;
use crate::stream::{KeepAlive, MessageSink, StreamReader};

// ============================================================================
// SessionOrchestrator
// ============================================================================

/// Drives one feed session from credentials to orderly teardown.
pub struct SessionOrchestrator {
    config: Arc<FeedConfig>,
    credentials: Credentials,
}

impl SessionOrchestrator {
    /// Creates an orchestrator for the given configuration and credentials.
    #[must_use]
    pub fn new(config: FeedConfig, credentials: Credentials) -> Self {
        Self {
            config: Arc::new(config),
            credentials,
        }
    }

    /// Runs the session until the stream ends, a unit fails, or `token` is
    /// cancelled.
    ///
    /// The keep-alive unit is started before the reader, so the announce frame
    /// precedes any read. Whichever unit finishes first, the sibling is
    /// cancelled and joined before this method returns, so both units have
    /// observably stopped by then. Remote close and cancellation are `Ok`.
    ///
    /// # Errors
    ///
    /// Returns the handshake failure, or the first unit failure (reader
    /// errors take precedence over keep-alive errors).
    pub async fn run<S>(&self, sink: S, token: CancellationToken) -> Result<()>
    where
        S: MessageSink + 'static,
    {
        let client = HandshakeClient::new(Arc::clone(&self.config), self.credentials.clone())?;

        let (context, connection) = tokio::select! {
            _ = token.cancelled() => {
                debug!("Cancelled during handshake");
                return Ok(());
            }
            outcome = client.run() => outcome?,
        };
        info!(portal_id = %context.portal_id, "Session established, streaming");

        let (frame_sink, frame_source) = connection.into_split();

        // One child token for both units: cancelling it cascades to the
        // sibling regardless of which unit ends first.
        let units = token.child_token();

        let keepalive = KeepAlive::new(
            frame_sink,
            &context,
            self.config.keepalive_interval,
            units.clone(),
        );
        let reader = StreamReader::new(frame_source, sink, units.clone());

        let mut keepalive_handle = tokio::spawn(keepalive.run());
        let mut reader_handle = tokio::spawn(reader.run());

        let (keepalive_result, reader_result) = tokio::select! {
            keepalive_end = &mut keepalive_handle => {
                debug!("Keep-alive ended first, cancelling reader");
                units.cancel();
                (keepalive_end, (&mut reader_handle).await)
            }
            reader_end = &mut reader_handle => {
                debug!("Reader ended first, cancelling keep-alive");
                units.cancel();
                ((&mut keepalive_handle).await, reader_end)
            }
        };

        info!("Session closed");
        flatten(reader_result).and(flatten(keepalive_result))
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Collapses a join outcome into the unit's own result.
fn flatten(joined: std::result::Result<Result<()>, JoinError>) -> Result<()> {
    match joined {
        Ok(result) => result,
        Err(e) => Err(Error::task_failed(e.to_string())),
    }
}
