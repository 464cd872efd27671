//! Mock portal shared by the integration tests.
//!
//! Serves the whole negotiation surface (entry redirect, credential exchange,
//! one-time code, initial load, push-channel control endpoints and the
//! streaming WebSocket) while recording request order, presented
//! authorization keys, and inbound keep-alive frames.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use parking_lot::Mutex;
use serde_json::json;

use rate_feed::FeedConfig;

/// Values every scripted handshake hands out.
pub const HTTP_SESSION_ID: &str = "sess-http-1";
pub const REQUEST_KEY: &str = "rk-1";
pub const PORTAL_ID: &str = "portal-7";
pub const AUTH_SEED: &str = "seed1";
pub const PUSH_SESSION_ID: &str = "sess1";

/// Shared recording state for one mock portal instance.
#[derive(Clone, Default)]
pub struct PortalState {
    /// Paths hit, in arrival order (both legs of the entry redirect appear).
    pub requests: Arc<Mutex<Vec<String>>>,
    /// Authorization header values presented on push-channel calls.
    pub auth_keys: Arc<Mutex<Vec<String>>>,
    /// Text frames received over the WebSocket.
    pub ws_inbound: Arc<Mutex<Vec<String>>>,
    /// Receive instant of each inbound frame, parallel to `ws_inbound`.
    pub ws_inbound_at: Arc<Mutex<Vec<Instant>>>,
    /// Text payloads pushed to the client right after the WS accept.
    pub ws_outbound: Arc<Mutex<Vec<String>>>,
    /// Close the WebSocket after pushing the scripted payloads.
    pub ws_close_after_send: Arc<AtomicBool>,
    /// Omit `request_key` from the credential exchange response.
    pub omit_request_key: Arc<AtomicBool>,
    /// Answer the credential exchange with a non-JSON body.
    pub malformed_login_body: Arc<AtomicBool>,
}

impl PortalState {
    fn record(&self, path: &str) {
        self.requests.lock().push(path.to_string());
    }

    fn record_auth(&self, headers: &HeaderMap) {
        if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
            self.auth_keys.lock().push(value.to_string());
        }
    }

    pub fn request_paths(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn inbound_frames(&self) -> Vec<String> {
        self.ws_inbound.lock().clone()
    }

    pub fn inbound_times(&self) -> Vec<Instant> {
        self.ws_inbound_at.lock().clone()
    }
}

/// Binds the mock portal on a random port and serves it in the background.
pub async fn spawn_portal(state: PortalState) -> SocketAddr {
    let router = Router::new()
        .route("/front", get(front))
        .route("/portal", get(portal))
        .route("/pw_auth", post(pw_auth))
        .route("/request_code", post(request_code))
        .route("/initialload", post(initial_load))
        .route("/connect", post(connect))
        .route("/login", post(push_login))
        .route("/filtering", post(filtering))
        .route("/wsock", get(wsock))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock portal");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve mock portal");
    });

    addr
}

/// Feed configuration pointing every endpoint at the mock portal.
pub fn portal_config(addr: SocketAddr) -> FeedConfig {
    let base = format!("http://{addr}");
    FeedConfig {
        entry_url: format!("{base}/front"),
        login_url: format!("{base}/pw_auth"),
        request_code_url: format!("{base}/request_code"),
        initial_load_url: format!("{base}/initialload"),
        connect_url: format!("{base}/connect"),
        push_login_url: format!("{base}/login"),
        filter_url: format!("{base}/filtering"),
        ws_url: format!("ws://{addr}/wsock"),
        keepalive_interval: Duration::from_millis(100),
        ..FeedConfig::default()
    }
}

async fn front(State(state): State<PortalState>) -> Redirect {
    state.record("/front");
    Redirect::temporary(&format!("/portal?sessionid={HTTP_SESSION_ID}"))
}

async fn portal(State(state): State<PortalState>) -> &'static str {
    state.record("/portal");
    "portal"
}

async fn pw_auth(State(state): State<PortalState>) -> Response {
    state.record("/pw_auth");
    if state.malformed_login_body.load(Ordering::Relaxed) {
        "<!doctype html><title>maintenance</title>".into_response()
    } else if state.omit_request_key.load(Ordering::Relaxed) {
        Json(json!({})).into_response()
    } else {
        Json(json!({ "request_key": REQUEST_KEY })).into_response()
    }
}

async fn request_code(State(state): State<PortalState>) -> &'static str {
    state.record("/request_code");
    "OK"
}

async fn initial_load(State(state): State<PortalState>) -> Json<serde_json::Value> {
    state.record("/initialload");
    Json(json!({ "portalId": PORTAL_ID }))
}

async fn connect(State(state): State<PortalState>) -> Json<serde_json::Value> {
    state.record("/connect");
    Json(json!({ "authSeed": AUTH_SEED, "sessionId": PUSH_SESSION_ID }))
}

async fn push_login(State(state): State<PortalState>, headers: HeaderMap) -> &'static str {
    state.record("/login");
    state.record_auth(&headers);
    "OK"
}

async fn filtering(State(state): State<PortalState>, headers: HeaderMap) -> &'static str {
    state.record("/filtering");
    state.record_auth(&headers);
    "OK"
}

async fn wsock(
    State(state): State<PortalState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    state.record("/wsock");
    state.record_auth(&headers);
    ws.on_upgrade(move |socket| handle_socket(socket, state))
        .into_response()
}

async fn handle_socket(mut socket: WebSocket, state: PortalState) {
    let outbound = state.ws_outbound.lock().clone();
    for payload in outbound {
        if socket.send(Message::Text(payload.into())).await.is_err() {
            return;
        }
    }

    if state.ws_close_after_send.load(Ordering::Relaxed) {
        let _ = socket.send(Message::Close(None)).await;
        return;
    }

    while let Some(Ok(message)) = socket.recv().await {
        if let Message::Text(text) = message {
            state.ws_inbound.lock().push(text.to_string());
            state.ws_inbound_at.lock().push(Instant::now());
        }
    }
}
