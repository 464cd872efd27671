//! The session-negotiation handshake.
//!
//! A strict finite sequence of eight dependent exchanges, each producing a
//! token consumed by the next, terminating in an open, authenticated streaming
//! connection. There is no branching and no retry within a run; a caller that
//! wants retries re-invokes the whole sequence.
//!
//! # Step Order
//!
//! 1. Entry fetch: follow redirects, extract `sessionid` from the final URL
//! 2. Credential exchange: extract `request_key`
//! 3. One-time code request (best-effort, see [`HandshakeClient::request_code`])
//! 4. Initial load: extract `portalId`
//! 5. Push-channel registration: extract `authSeed` + `sessionId`, derive the
//!    auth key
//! 6. Push session login (authorized)
//! 7. Filter declaration (authorized)
//! 8. WebSocket upgrade (authorized)
//!
//! The HTTP cookie store carries the login session across steps, mirroring the
//! browser flow the portal expects.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use reqwest::{Client, Proxy, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{Credentials, FeedConfig};
use crate::error::{Error, Result};
use crate::protocol::{
    ChannelGrant, ChannelRegistration, FilterDeclaration, InitialLoadResponse, LoginRequest,
    LoginResponse, PushLoginRequest,
};
use crate::session::{SessionContext, derive_auth_key};
use crate::stream::Connection;

// ============================================================================
// Constants
// ============================================================================

/// Aggregated initial-load request body.
///
/// The code list is what the portal front end requests on login; the response
/// is only mined for `portalId`.
const INITIAL_LOAD_PAYLOAD: &str = concat!(
    r#"{"get_customer_list_in":{},"get_customer_control_in":{},"#,
    r#""get_code_list_in":{"code_info_list":[{"codeKbn":"0002"},{"codeKbn":"0003"},"#,
    r#"{"codeKbn":"0009"},{"codeKbn":"0010"},{"codeKbn":"0022"},{"codeKbn":"0023"},"#,
    r#"{"codeKbn":"0039"},{"codeKbn":"0040"},{"codeKbn":"0047"},{"codeKbn":"0055"},"#,
    r#"{"codeKbn":"0107"},{"codeKbn":"0108"},{"codeKbn":"0109"}]},"#,
    r#""get_customer_change_in":{"applStatus":"0,1,2"},"get_informations_in":{}}"#
);

// ============================================================================
// HandshakeClient
// ============================================================================

/// Executes the ordered handshake sequence.
///
/// Given credentials, produces a fully populated [`SessionContext`] and an open
/// [`Connection`], or fails with a classified error. Any stage failure aborts
/// the whole pipeline; no partial session is usable.
pub struct HandshakeClient {
    http: Client,
    config: Arc<FeedConfig>,
    credentials: Credentials,
}

impl HandshakeClient {
    /// Creates a client with a cookie-carrying HTTP session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the HTTP client cannot be built
    /// (invalid proxy URL, TLS backend failure).
    pub fn new(config: Arc<FeedConfig>, credentials: Credentials) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .user_agent(&config.user_agent);

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(Proxy::all(proxy)?);
        }

        Ok(Self {
            http: builder.build()?,
            config,
            credentials,
        })
    }

    /// Runs the full eight-step sequence.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] on any connectivity fault
    /// - [`Error::Auth`] if the credential exchange is rejected
    /// - [`Error::MissingField`] if a required token is absent
    /// - [`Error::WebSocket`] if the final upgrade fails
    pub async fn run(&self) -> Result<(SessionContext, Connection)> {
        let http_session_id = self.fetch_entry_session().await?;
        let request_key = self.exchange_credentials(&http_session_id).await?;
        self.request_code(&http_session_id, &request_key).await?;
        let portal_id = self.initial_load().await?;
        let (auth_seed, push_session_id) = self.register_channel().await?;

        let auth_key = derive_auth_key(
            &self.config.company_id,
            &self.config.api_key,
            &auth_seed,
            &push_session_id,
        );

        self.login_push_session(&auth_key, &portal_id, &push_session_id)
            .await?;
        self.declare_filters(&auth_key, &push_session_id).await?;

        let connection = Connection::open(&self.config.ws_url, &auth_key).await?;

        let context = SessionContext {
            http_session_id,
            request_key,
            portal_id,
            push_session_id,
            auth_seed,
            auth_key,
        };
        debug!(portal_id = %context.portal_id, "Handshake complete");

        Ok((context, connection))
    }

    /// Step 1: fetch the entry URL and mine the redirect chain's final query
    /// string for the browsing session id.
    async fn fetch_entry_session(&self) -> Result<String> {
        let response = self.http.get(&self.config.entry_url).send().await?;

        let session_id = response
            .url()
            .query_pairs()
            .find_map(|(key, value)| (key == "sessionid").then(|| value.into_owned()))
            .ok_or(Error::missing_field("entry", "sessionid"))?;

        debug!(step = 1, session_id = %session_id, "Entry session established");
        Ok(session_id)
    }

    /// Step 2: submit credentials within the browsing session.
    async fn exchange_credentials(&self, session_id: &str) -> Result<String> {
        let response = self
            .http
            .post(&self.config.login_url)
            .json(&LoginRequest {
                mail: self.credentials.identity(),
                password: self.credentials.secret(),
                sessionid: session_id,
                have_otp_seed: "0",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::auth(format!("credential exchange returned {status}")));
        }

        let body: LoginResponse = parse_json(response, "credential exchange").await?;
        let request_key = body
            .request_key
            .ok_or_else(|| Error::auth("no request_key in credential exchange response"))?;

        debug!(step = 2, "Credentials accepted");
        Ok(request_key)
    }

    /// Step 3: request the one-time code that confirms the login attempt.
    ///
    /// Best-effort by design: the reference flow proceeds whether or not the
    /// provider acknowledges this call, so a non-success response is surfaced
    /// in the logs but does not gate progress. The body carries no documented
    /// success field and is not parsed.
    async fn request_code(&self, session_id: &str, request_key: &str) -> Result<()> {
        let response = self
            .http
            .post(&self.config.request_code_url)
            .form(&[("sessionid", session_id), ("request_key", request_key)])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(step = 3, %status, "One-time code requested");
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(step = 3, %status, %body, "One-time code request not acknowledged, continuing");
        }
        Ok(())
    }

    /// Step 4: request the aggregated initial load and extract the portal id.
    async fn initial_load(&self) -> Result<String> {
        let response = self
            .http
            .post(&self.config.initial_load_url)
            .header("Content-Type", "application/json;charset=UTF-8")
            .body(INITIAL_LOAD_PAYLOAD)
            .send()
            .await?;

        let body: InitialLoadResponse = parse_json(response, "initial load").await?;
        let portal_id = body
            .portal_id
            .ok_or(Error::missing_field("initial load", "portalId"))?;

        debug!(step = 4, portal_id = %portal_id, "Initial load complete");
        Ok(portal_id)
    }

    /// Step 5: register on the push channel and collect the auth seed and
    /// push session id.
    async fn register_channel(&self) -> Result<(String, String)> {
        let response = self
            .http
            .post(&self.config.connect_url)
            .json(&ChannelRegistration {
                channel: &self.config.channel,
                company_id: &self.config.company_id,
                appli_ver: &self.config.appli_ver,
                api_key: &self.config.api_key,
            })
            .send()
            .await?;

        let grant: ChannelGrant = parse_json(response, "channel registration").await?;
        let auth_seed = grant
            .auth_seed
            .ok_or(Error::missing_field("channel registration", "authSeed"))?;
        let session_id = grant
            .session_id
            .ok_or(Error::missing_field("channel registration", "sessionId"))?;

        debug!(step = 5, push_session_id = %session_id, "Push channel registered");
        Ok((auth_seed, session_id))
    }

    /// Step 6: authenticate the push session.
    async fn login_push_session(
        &self,
        auth_key: &str,
        portal_id: &str,
        session_id: &str,
    ) -> Result<()> {
        let response = self
            .http
            .post(&self.config.push_login_url)
            .header("Authorization", auth_key)
            .json(&PushLoginRequest {
                user_id: portal_id,
                session_id,
            })
            .send()
            .await?;

        debug!(step = 6, status = %response.status(), "Push session authenticated");
        Ok(())
    }

    /// Step 7: declare the filter set scoping the stream.
    async fn declare_filters(&self, auth_key: &str, session_id: &str) -> Result<()> {
        let response = self
            .http
            .post(&self.config.filter_url)
            .header("Authorization", auth_key)
            .json(&FilterDeclaration {
                session_id,
                symbol_codes: &self.config.symbol_codes,
            })
            .send()
            .await?;

        debug!(step = 7, status = %response.status(), "Filters declared");
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Deserializes a handshake response body.
///
/// A body that fails to decode is a contract violation by the remote, so it
/// surfaces as [`Error::Protocol`] rather than a transport fault; errors on
/// the wire before the body arrives stay [`Error::Transport`].
async fn parse_json<T: DeserializeOwned>(response: Response, step: &'static str) -> Result<T> {
    response.json().await.map_err(|e| {
        if e.is_decode() {
            Error::protocol(format!("malformed {step} response: {e}"))
        } else {
            Error::Transport(e)
        }
    })
}

// ============================================================================
// Tests
// ============================================================================
