//! Keep-alive frames sent over the push channel.
//!
//! Two wire shapes share the same three fields; only `kind` differs:
//!
//! ```json
//! {"authKey": "…", "kind": "ARQ", "sessionId": "…"}
//! {"authKey": "…", "kind": "BCN", "sessionId": "…"}
//! ```
//!
//! `ARQ` announces the session once right after connecting; `BCN` beacons keep
//! it from being reclaimed by the server.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// FrameKind
// ============================================================================

/// Keep-alive frame discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameKind {
    /// Session announce, sent exactly once immediately after connecting.
    #[serde(rename = "ARQ")]
    Announce,
    /// Periodic beacon, sent on a fixed interval thereafter.
    #[serde(rename = "BCN")]
    Beacon,
}

// ============================================================================
// KeepAliveFrame
// ============================================================================

/// A keep-alive frame scoped to a push session.
///
/// Field order matches the wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeepAliveFrame {
    /// Push-channel authorization key.
    #[serde(rename = "authKey")]
    pub auth_key: String,
    /// Frame discriminator.
    pub kind: FrameKind,
    /// Push session id the frame keeps alive.
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

impl KeepAliveFrame {
    /// Creates a frame for the given session.
    #[inline]
    #[must_use]
    pub fn new(kind: FrameKind, auth_key: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            auth_key: auth_key.into(),
            kind,
            session_id: session_id.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_announce_wire_shape() {
        let frame = KeepAliveFrame::new(FrameKind::Announce, "abc123", "sess1");
        let json = serde_json::to_string(&frame).expect("serialize");

        assert_eq!(
            json,
            r#"{"authKey":"abc123","kind":"ARQ","sessionId":"sess1"}"#
        );
    }

    #[test]
    fn test_beacon_wire_shape() {
        let frame = KeepAliveFrame::new(FrameKind::Beacon, "abc123", "sess1");
        let json = serde_json::to_string(&frame).expect("serialize");

        assert_eq!(
            json,
            r#"{"authKey":"abc123","kind":"BCN","sessionId":"sess1"}"#
        );
    }

    #[test]
    fn test_frame_deserialize() {
        let json = r#"{"authKey":"k","kind":"BCN","sessionId":"s"}"#;
        let frame: KeepAliveFrame = serde_json::from_str(json).expect("parse");

        assert_eq!(frame.kind, FrameKind::Beacon);
        assert_eq!(frame.auth_key, "k");
        assert_eq!(frame.session_id, "s");
    }
}
