//! Error types for the rate feed client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use rate_feed::{Result, Error};
//!
//! async fn example(client: &HandshakeClient) -> Result<()> {
//!     let (context, connection) = client.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Transport | [`Error::Transport`], [`Error::WebSocket`] |
//! | Protocol | [`Error::MissingField`], [`Error::Protocol`] |
//! | Auth | [`Error::Auth`] |
//! | Lifecycle | [`Error::TaskFailed`] |
//! | External | [`Error::Json`] |
//!
//! Cancellation is deliberately absent from this taxonomy: shutdown is signalled
//! through a [`CancellationToken`](tokio_util::sync::CancellationToken) and a
//! cancelled unit returns `Ok`, never an error.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// HTTP transport fault (connectivity, timeout, reset).
    ///
    /// Wraps the underlying cause; the handshake never retries on its own,
    /// the caller decides whether to restart the whole sequence.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// WebSocket error on the streaming connection.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// A required token was absent from a handshake response.
    ///
    /// Indicates the remote contract changed or the request was rejected.
    #[error("Missing `{field}` in {step} response")]
    MissingField {
        /// Handshake step that produced the response.
        step: &'static str,
        /// Field that was expected.
        field: &'static str,
    },

    /// Protocol violation or malformed response.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    // ========================================================================
    // Auth Errors
    // ========================================================================
    /// Explicit credential rejection by the remote service.
    #[error("Authentication rejected: {message}")]
    Auth {
        /// Description of the rejection.
        message: String,
    },

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// A spawned unit of work failed to unwind cleanly (join error or panic).
    #[error("Task failed: {message}")]
    TaskFailed {
        /// Description of the failure.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a missing-field error for a handshake step.
    #[inline]
    pub const fn missing_field(step: &'static str, field: &'static str) -> Self {
        Self::MissingField { step, field }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[inline]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Creates a task failure error.
    #[inline]
    pub fn task_failed(message: impl Into<String>) -> Self {
        Self::TaskFailed {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a transport-level fault.
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::WebSocket(_))
    }

    /// Returns `true` if this is an authentication error.
    #[inline]
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Returns `true` if this indicates the remote response contract changed.
    #[inline]
    #[must_use]
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::MissingField { .. } | Self::Protocol { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
