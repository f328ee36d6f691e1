//! HTTP ingress: Slack webhook endpoint and health check.
//!
//! `POST /webhook` verifies the Slack signature, normalizes the delivery,
//! drops duplicates, and acknowledges immediately while the intake handler
//! runs in a tracked background task. Slack expects an answer within three
//! seconds, and an empty `200` to a modal submission closes the modal.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::config::GlobalConfig;
use crate::intake::{router as intake_router, IntakeFlow};
use crate::slack::events::{parse_request, SlackInbound};
use crate::slack::verify::verify_request;
use crate::state::{first_delivery, SharedStateStore};
use crate::{AppError, Result};

/// Shared state of the HTTP server.
pub struct AppState {
    /// Startup configuration.
    pub config: Arc<GlobalConfig>,
    /// Framework state store.
    pub store: SharedStateStore,
    /// Intake flow bound to the chat platform.
    pub flow: Arc<IntakeFlow>,
    /// In-flight event handlers.
    pub tasks: TaskTracker,
}

impl AppState {
    /// Assemble the server state.
    #[must_use]
    pub fn new(config: Arc<GlobalConfig>, store: SharedStateStore, flow: Arc<IntakeFlow>) -> Self {
        Self {
            config,
            store,
            flow,
            tasks: TaskTracker::new(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    /// Always `ok` while the process serves requests.
    pub status: String,
    /// Current time, RFC 3339.
    pub timestamp: String,
    /// Configured state backend (`memory` or `redis`).
    #[serde(rename = "stateAdapter")]
    pub state_adapter: String,
}

/// Build the HTTP router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", post(webhook))
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".into(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        state_adapter: state.config.state.backend.as_str().into(),
    })
}

async fn webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let now = chrono::Utc::now().timestamp();
    if let Err(err) = verify_request(&state.config.slack.signing_secret, &headers, &body, now) {
        warn!(%err, "rejected webhook request");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let inbound = match parse_request(content_type, &body) {
        Ok(inbound) => inbound,
        Err(err) => {
            warn!(%err, "unparsable webhook body");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    match inbound {
        SlackInbound::UrlVerification(challenge) => {
            info!("answering url verification challenge");
            Json(serde_json::json!({ "challenge": challenge })).into_response()
        }
        SlackInbound::Ignored(reason) => {
            debug!(reason, "webhook delivery ignored");
            StatusCode::OK.into_response()
        }
        SlackInbound::Event { dedup_key, event } => {
            let ttl = Duration::from_secs(state.config.state.dedup_ttl_seconds);
            if !first_delivery(state.store.as_ref(), &dedup_key, ttl).await {
                info!(dedup_key, "duplicate delivery ignored");
                return StatusCode::OK.into_response();
            }

            let kind = event.kind();
            let flow = Arc::clone(&state.flow);
            state.tasks.spawn(async move {
                if let Err(err) = intake_router::dispatch(&flow, event).await {
                    error!(%err, kind, "event handler failed");
                }
            });
            StatusCode::OK.into_response()
        }
    }
}

/// Serve the router on `bind_address:http_port` until `ct` is cancelled,
/// then wait for in-flight handlers.
///
/// # Errors
///
/// Returns `AppError::Io` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, ct: CancellationToken) -> Result<()> {
    let bind = (state.config.bind_address.as_str(), state.config.http_port);
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|err| AppError::Io(format!("failed to bind {}:{}: {err}", bind.0, bind.1)))?;
    let addr = listener
        .local_addr()
        .map_err(|err| AppError::Io(format!("failed to read local address: {err}")))?;

    info!(%addr, "server listening");
    info!("webhook endpoint: http://{addr}/webhook");
    info!("health check: http://{addr}/health");

    axum::serve(listener, router(Arc::clone(&state)))
        .with_graceful_shutdown(async move { ct.cancelled().await })
        .await
        .map_err(|err| AppError::Io(format!("server failed: {err}")))?;

    state.tasks.close();
    state.tasks.wait().await;
    info!("in-flight handlers drained");
    Ok(())
}
