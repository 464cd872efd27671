//! Keep-alive unit for the push channel.
//!
//! Two states: announcing (one `ARQ` frame, sent immediately) and beaconing
//! (`BCN` every interval, indefinitely). The unit never terminates on its own;
//! it stops via cancellation or a send failure.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::Result;
use crate::protocol::{FrameKind, KeepAliveFrame};
use crate::session::SessionContext;

use super::connection::FrameSink;

// ============================================================================
// KeepAlive
// ============================================================================

/// Long-lived unit that keeps the push session from being reclaimed.
///
/// Cancellation is observed between sends; an in-flight send is always driven
/// to completion or a clean abort before the unit exits. A cancelled unit
/// returns `Ok(())`; only a broken outbound channel is an error, and it is
/// surfaced fail-fast rather than retried.
pub struct KeepAlive {
    sink: FrameSink,
    auth_key: String,
    session_id: String,
    interval: Duration,
    token: CancellationToken,
}

impl KeepAlive {
    /// Creates the unit over the write half of the connection.
    #[must_use]
    pub fn new(
        sink: FrameSink,
        context: &SessionContext,
        interval: Duration,
        token: CancellationToken,
    ) -> Self {
        Self {
            sink,
            auth_key: context.auth_key.clone(),
            session_id: context.push_session_id.clone(),
            interval,
            token,
        }
    }

    /// Runs the unit until cancelled or a send fails.
    ///
    /// # Errors
    ///
    /// Returns the first send failure; cancellation is `Ok(())`.
    pub async fn run(mut self) -> Result<()> {
        self.send(FrameKind::Announce).await?;
        debug!(session_id = %self.session_id, "Session announced, beaconing");

        loop {
            // Biased: a pending cancellation always wins over a due beacon.
            tokio::select! {
                biased;
                _ = self.token.cancelled() => {
                    debug!("Keep-alive cancelled");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.interval) => {
                    self.send(FrameKind::Beacon).await?;
                }
            }
        }
    }

    async fn send(&mut self, kind: FrameKind) -> Result<()> {
        let frame = KeepAliveFrame::new(kind, self.auth_key.clone(), self.session_id.clone());
        self.sink.send(&frame).await?;
        trace!(?kind, "Keep-alive frame sent");
        Ok(())
    }
}
