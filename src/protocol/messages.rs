//! Handshake request and response bodies.
//!
//! Requests borrow their fields from the session being built; responses own
//! theirs. Tokens the protocol requires are modelled as `Option` so the
//! handshake can classify a missing field instead of failing deserialization.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// Credential Exchange (step 2)
// ============================================================================

/// Password authentication request.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    /// Account identity (mail address).
    pub mail: &'a str,
    /// Account secret.
    pub password: &'a str,
    /// Browsing session id from the entry redirect.
    pub sessionid: &'a str,
    /// Whether a one-time password seed is already held ("0" = no).
    pub have_otp_seed: &'a str,
}

/// Password authentication response.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    /// Token to present on the next call of the same login attempt.
    pub request_key: Option<String>,
}

// ============================================================================
// Initial Load (step 4)
// ============================================================================

/// Aggregated initial-load response; only the portal id matters here.
#[derive(Debug, Deserialize)]
pub struct InitialLoadResponse {
    /// Authenticated user/customer identifier.
    #[serde(rename = "portalId")]
    pub portal_id: Option<String>,
}

// ============================================================================
// Push-Channel Registration (step 5)
// ============================================================================

/// Push-channel registration request declaring the fixed channel identifiers.
#[derive(Debug, Serialize)]
pub struct ChannelRegistration<'a> {
    /// Push channel number.
    pub channel: &'a str,
    /// Company identifier.
    #[serde(rename = "companyId")]
    pub company_id: &'a str,
    /// Application version.
    #[serde(rename = "appliVer")]
    pub appli_ver: &'a str,
    /// API key.
    #[serde(rename = "apiKey")]
    pub api_key: &'a str,
}

/// Push-channel registration response.
#[derive(Debug, Deserialize)]
pub struct ChannelGrant {
    /// Opaque seed combined into the auth key.
    #[serde(rename = "authSeed")]
    pub auth_seed: Option<String>,
    /// Assigned push session id.
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

// ============================================================================
// Push Session Auth (step 6)
// ============================================================================

/// Push session authentication request.
#[derive(Debug, Serialize)]
pub struct PushLoginRequest<'a> {
    /// Portal (user) id from the initial load.
    #[serde(rename = "userId")]
    pub user_id: &'a str,
    /// Push session id from registration.
    #[serde(rename = "sessionId")]
    pub session_id: &'a str,
}

// ============================================================================
// Filter Declaration (step 7)
// ============================================================================

/// Filter declaration scoping which messages the stream delivers.
#[derive(Debug, Serialize)]
pub struct FilterDeclaration<'a> {
    /// Push session id from registration.
    #[serde(rename = "sessionId")]
    pub session_id: &'a str,
    /// Subject codes to subscribe to.
    #[serde(rename = "symbolCodes")]
    pub symbol_codes: &'a [String],
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_wire_shape() {
        let request = LoginRequest {
            mail: "user@example.com",
            password: "pw",
            sessionid: "sess-http-1",
            have_otp_seed: "0",
        };
        let json = serde_json::to_value(&request).expect("serialize");

        assert_eq!(json["mail"], "user@example.com");
        assert_eq!(json["sessionid"], "sess-http-1");
        assert_eq!(json["have_otp_seed"], "0");
    }

    #[test]
    fn test_channel_registration_wire_shape() {
        let request = ChannelRegistration {
            channel: "24",
            company_id: "201",
            appli_ver: "0040010002",
            api_key: "CVN0024",
        };
        let json = serde_json::to_string(&request).expect("serialize");

        assert_eq!(
            json,
            r#"{"channel":"24","companyId":"201","appliVer":"0040010002","apiKey":"CVN0024"}"#
        );
    }

    #[test]
    fn test_filter_declaration_wire_shape() {
        let codes = vec!["2001".to_string(), "2008".to_string()];
        let request = FilterDeclaration {
            session_id: "sess1",
            symbol_codes: &codes,
        };
        let json = serde_json::to_string(&request).expect("serialize");

        assert_eq!(
            json,
            r#"{"sessionId":"sess1","symbolCodes":["2001","2008"]}"#
        );
    }

    #[test]
    fn test_channel_grant_missing_fields_parse() {
        let grant: ChannelGrant = serde_json::from_str("{}").expect("parse");
        assert!(grant.auth_seed.is_none());
        assert!(grant.session_id.is_none());
    }

    #[test]
    fn test_login_response_parse() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"request_key":"rk-1"}"#).expect("parse");
        assert_eq!(response.request_key.as_deref(), Some("rk-1"));
    }
}
