//! Session context accumulated during the handshake.
//!
//! Every token the handshake extracts ends up in a [`SessionContext`]. The
//! fields are populated in a fixed order, each depending only on tokens already
//! extracted, and the context is immutable once the WebSocket upgrade succeeds.

// ============================================================================
// Imports
// ============================================================================

use md5::{Digest, Md5};

// ============================================================================
// SessionContext
// ============================================================================

/// Tokens extracted during the handshake, required by every later step.
///
/// Produced by the handshake client, consumed read-only by the keep-alive unit
/// and the stream reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Unauthenticated browsing session id, from the entry redirect query.
    pub http_session_id: String,
    /// Login attempt token, from the credential exchange.
    pub request_key: String,
    /// Authenticated user/customer identifier, from the initial load.
    pub portal_id: String,
    /// Push session id assigned at channel registration; scopes every
    /// subsequent push-channel call and the keep-alive frames.
    pub push_session_id: String,
    /// Opaque seed returned by registration.
    pub auth_seed: String,
    /// Keyed digest authorizing every subsequent push-channel call,
    /// presented as an authorization header.
    pub auth_key: String,
}

// ============================================================================
// Auth Key Derivation
// ============================================================================

/// Derives the push-channel authorization key.
///
/// Pure function of its four inputs: the MD5 digest of the colon-joined
/// concatenation `{company_id}:{api_key}:{auth_seed}:{session_id}`, rendered
/// as lowercase hex. The remote service fixes the digest algorithm.
#[must_use]
pub fn derive_auth_key(
    company_id: &str,
    api_key: &str,
    auth_seed: &str,
    session_id: &str,
) -> String {
    let material = format!("{company_id}:{api_key}:{auth_seed}:{session_id}");
    hex::encode(Md5::digest(material.as_bytes()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_auth_key_known_vector() {
        let key = derive_auth_key("201", "CVN0024", "seed1", "sess1");
        assert_eq!(key, "dace352af8fe16475e6519980fd44363");
    }

    #[test]
    fn test_auth_key_is_lowercase_hex() {
        let key = derive_auth_key("201", "CVN0024", "seed1", "sess1");
        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_auth_key_sensitive_to_each_input() {
        let base = derive_auth_key("201", "CVN0024", "seed1", "sess1");

        assert_ne!(base, derive_auth_key("202", "CVN0024", "seed1", "sess1"));
        assert_ne!(base, derive_auth_key("201", "CVN0025", "seed1", "sess1"));
        assert_ne!(base, derive_auth_key("201", "CVN0024", "seed2", "sess1"));
        assert_ne!(base, derive_auth_key("201", "CVN0024", "seed1", "sess2"));
    }

    proptest! {
        #[test]
        fn test_auth_key_deterministic(
            company in "[0-9]{1,6}",
            api_key in "[A-Z0-9]{1,10}",
            seed in "[a-zA-Z0-9]{1,16}",
            session in "[a-zA-Z0-9-]{1,24}",
        ) {
            let first = derive_auth_key(&company, &api_key, &seed, &session);
            let second = derive_auth_key(&company, &api_key, &seed, &session);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.len(), 32);
        }
    }
}
