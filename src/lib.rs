//! Documentation of an anonymous message board backend.
//!
//! Visitors submit short anonymous messages ("quotes") addressed to an
//! optional recipient, and browse everything submitted so far with substring
//! search and page navigation.
//!
//!
//!
//! # General Infrastructure
//! - Single stateless server process in front of Redis
//! - All cross-request state lives in Redis or in the shared [`state::AppState`]
//! - CAPTCHA verdicts come from an external verification service over HTTP
//! - The frontend talks JSON: `POST /quotes`, `GET /quotes`, `POST /suggest`
//!
//!
//!
//! # Submission Admission
//!
//! **Goal**: keep the board writable by anonymous strangers without letting
//! bots or a single person flood it.
//!
//! - Reject empty messages before anything else runs
//! - Verify the client CAPTCHA token against the external service, failing
//!   closed when the service is unreachable or inconclusive
//! - Enforce a per-IP daily quota, tracked in Redis and reset at local
//!   midnight
//! - Only then insert the message and drop the memoized listing
//!
//! Rejections come back as `{ "success": false, "error": "..." }` with a
//! message specific enough for the frontend to react (re-issue the CAPTCHA
//! challenge, show the quota notice, or show a storage apology).
//!
//!
//!
//! # Redis Layout
//!
//! - `quotes:<id>`: one JSON document per message
//! - `quotes:by_created`: sorted set of ids scored by creation time millis
//! - `quotes:next_id`: id sequence
//! - `rateLimits:<ip>`: JSON daily counter per source IP
//!
//! Reads walk the sorted set newest first. Listing failures degrade to an
//! empty result set so browsing stays up even when Redis is down; writes
//! never degrade.
//!
//!
//!
//! # Setup
//!
//! Required environment: `REDIS_URL`, plus `/run/secrets/CAPTCHA_SECRET`.
//! Optional: `RUST_PORT`, `CAPTCHA_URL`, `SUGGEST_URL`, `SUGGEST_MODEL`,
//! `/run/secrets/SUGGEST_API_KEY`.
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod captcha;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod query;
pub mod quotes;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod suggest;
pub mod utils;

use routes::{quotes_handler, submit_handler, suggest_handler};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await.expect("Startup misconfigured!");

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/quotes", get(quotes_handler).post(submit_handler))
        .route("/suggest", post(suggest_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
