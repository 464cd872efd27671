//! The open streaming connection and its directional halves.
//!
//! [`Connection::open`] performs the authenticated WebSocket upgrade (the last
//! handshake step). The orchestrator owns the connection for its lifetime and
//! splits it into a write half for the keep-alive unit and a read half for the
//! stream reader.

// ============================================================================
// Imports
// ============================================================================

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::protocol::KeepAliveFrame;

// ============================================================================
// Types
// ============================================================================

/// The underlying WebSocket stream type.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ============================================================================
// Connection
// ============================================================================

/// An open, authenticated push-channel connection.
///
/// Exactly one connection is opened per orchestrator invocation; it is closed
/// when either half is dropped after the units unwind, when the remote closes
/// it, or when an unrecoverable error occurs in either unit.
pub struct Connection {
    stream: WsStream,
}

impl Connection {
    /// Upgrades to the streaming endpoint, presenting the authorization key.
    ///
    /// # Errors
    ///
    /// - [`Error::Protocol`] if the URL or auth key cannot form a request
    /// - [`Error::WebSocket`] if the upgrade fails
    pub async fn open(ws_url: &str, auth_key: &str) -> Result<Self> {
        let mut request = ws_url
            .into_client_request()
            .map_err(|e| Error::protocol(format!("invalid WebSocket URL: {e}")))?;

        let value = HeaderValue::from_str(auth_key)
            .map_err(|e| Error::protocol(format!("invalid authorization key: {e}")))?;
        request.headers_mut().insert("Authorization", value);

        let (stream, response) = connect_async(request).await?;
        info!(url = %ws_url, status = %response.status(), "Streaming connection established");

        Ok(Self { stream })
    }

    /// Splits the connection by direction.
    ///
    /// The sink half is written to by exactly one unit and the source half is
    /// read from by exactly one unit, so no locking is needed.
    #[must_use]
    pub fn into_split(self) -> (FrameSink, FrameSource) {
        let (sink, stream) = self.stream.split();
        (FrameSink { inner: sink }, FrameSource { inner: stream })
    }
}

// ============================================================================
// FrameSink
// ============================================================================

/// Write half of the connection; sends keep-alive frames.
pub struct FrameSink {
    inner: SplitSink<WsStream, Message>,
}

impl FrameSink {
    /// Serializes and sends one keep-alive frame.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if serialization fails
    /// - [`Error::WebSocket`] if the send fails
    pub async fn send(&mut self, frame: &KeepAliveFrame) -> Result<()> {
        let json = serde_json::to_string(frame)?;
        self.inner.send(Message::Text(json.into())).await?;
        Ok(())
    }
}

// ============================================================================
// FrameSource
// ============================================================================

/// Read half of the connection; yields inbound text payloads.
pub struct FrameSource {
    inner: SplitStream<WsStream>,
}

impl FrameSource {
    /// Waits for the next textual payload.
    ///
    /// Frames other than text (binary, ping, pong) are skipped. Returns
    /// `Ok(None)` when the remote closes the connection or the stream ends;
    /// that is normal end-of-stream, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WebSocket`] on a transport fault mid-stream.
    pub async fn next_text(&mut self) -> Result<Option<String>> {
        while let Some(message) = self.inner.next().await {
            match message? {
                Message::Text(text) => return Ok(Some(text.to_string())),
                Message::Close(frame) => {
                    debug!(?frame, "Remote closed connection");
                    return Ok(None);
                }
                // Ignore Binary, Ping, Pong
                _ => {}
            }
        }
        Ok(None)
    }
}
