//! Credentials and feed configuration.
//!
//! Configuration is constructed once at startup and passed by reference into the
//! orchestrator; nothing in the pipeline reads ambient/global state.
//!
//! [`FeedConfig`] carries the portal endpoints and the fixed channel identifiers
//! declared during push registration. The defaults reproduce the reference
//! portal; tests point the URLs at a mock server.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

// ============================================================================
// Constants
// ============================================================================

/// Default keep-alive beacon interval.
pub const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(10);

/// Browser user agent presented on every handshake request.
///
/// The portal serves the login flow to browsers only, so the client identifies
/// as one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/73.0.3683.103 Safari/537.36";

// ============================================================================
// Credentials
// ============================================================================

/// Account identity and secret for the credential exchange.
///
/// The secret is never logged and only transmitted inside the two
/// credential-bearing handshake requests.
#[derive(Clone)]
pub struct Credentials {
    identity: Box<str>,
    secret: Box<str>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Creates a new [`Credentials`] instance.
    #[must_use]
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into().into_boxed_str(),
            secret: secret.into().into_boxed_str(),
        }
    }

    /// Returns the account identity (login mail address).
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Returns the account secret.
    #[must_use]
    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }
}

// ============================================================================
// FeedConfig
// ============================================================================

/// Configuration for the handshake pipeline and the streaming session.
///
/// Plain-field configuration struct; construct with [`Default`] and override
/// what differs.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Entry URL; fetching it yields the redirect carrying the HTTP session id.
    pub entry_url: String,
    /// Password authentication endpoint (step 2).
    pub login_url: String,
    /// One-time code request endpoint (step 3).
    pub request_code_url: String,
    /// Aggregated initial-load endpoint (step 4).
    pub initial_load_url: String,
    /// Push-channel registration endpoint (step 5).
    pub connect_url: String,
    /// Push session authentication endpoint (step 6).
    pub push_login_url: String,
    /// Filter declaration endpoint (step 7).
    pub filter_url: String,
    /// Streaming WebSocket endpoint (step 8).
    pub ws_url: String,
    /// Push channel number declared at registration.
    pub channel: String,
    /// Company identifier; first input of the auth key digest.
    pub company_id: String,
    /// Application version declared at registration.
    pub appli_ver: String,
    /// API key; second input of the auth key digest.
    pub api_key: String,
    /// Subject codes scoping which messages the stream delivers.
    pub symbol_codes: Vec<String>,
    /// Interval between beacon frames.
    pub keepalive_interval: Duration,
    /// User agent presented on handshake requests.
    pub user_agent: String,
    /// Optional HTTP proxy URL applied to every handshake request.
    pub proxy: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            entry_url: "https://cx.decurret.com/decurret-frontap/".to_string(),
            login_url: "https://login.decurret.com/v1/idp/pw_auth".to_string(),
            request_code_url: "https://login.decurret.com/v1/idp/request_code".to_string(),
            initial_load_url: "https://cx.decurret.com/decurret-frontap/initialload".to_string(),
            connect_url: "https://push.decurret.com/push-server-ws/control/connect".to_string(),
            push_login_url: "https://push.decurret.com/push-server-ws/control/login".to_string(),
            filter_url: "https://push.decurret.com/push-server-ws/control/filtering".to_string(),
            ws_url: "wss://push.decurret.com/push-server-ws/wsock".to_string(),
            channel: "24".to_string(),
            company_id: "201".to_string(),
            appli_ver: "0040010002".to_string(),
            api_key: "CVN0024".to_string(),
            symbol_codes: ["2001", "2008", "2003", "2002", "2004"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            keepalive_interval: DEFAULT_KEEPALIVE_INTERVAL,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
