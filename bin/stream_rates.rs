//! Streams rate messages to stdout until Ctrl-C.
//!
//! Credentials come from the environment:
//!
//! ```text
//! RATE_FEED_EMAIL=user@example.com \
//! RATE_FEED_PASSWORD=secret \
//! cargo run --bin stream-rates
//! ```
//!
//! `RATE_FEED_PROXY` optionally routes the handshake through an HTTP proxy.

use std::env;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rate_feed::{Credentials, FeedConfig, SessionOrchestrator, StdoutSink, TaskRunner};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rate_feed=info")),
        )
        .with_target(false)
        .init();

    let Ok(identity) = env::var("RATE_FEED_EMAIL") else {
        error!("RATE_FEED_EMAIL is not set");
        return ExitCode::FAILURE;
    };
    let Ok(secret) = env::var("RATE_FEED_PASSWORD") else {
        error!("RATE_FEED_PASSWORD is not set");
        return ExitCode::FAILURE;
    };

    let config = FeedConfig {
        proxy: env::var("RATE_FEED_PROXY").ok(),
        ..FeedConfig::default()
    };

    let orchestrator = SessionOrchestrator::new(config, Credentials::new(identity, secret));

    let runner = TaskRunner::new();
    let token = runner.token();

    match runner.run(orchestrator.run(StdoutSink, token)).await {
        Ok(()) => {
            info!("Feed stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Feed failed");
            ExitCode::FAILURE
        }
    }
}
