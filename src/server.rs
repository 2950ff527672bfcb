use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::email::EmailSender;
use crate::llm::CompletionProvider;
use crate::webhook::{self, PipelineError};

pub const HEALTH_TEXT: &str = "✅ Webhook live. POST ➜ /webhook";

/// Read-only per-process state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: Arc<dyn CompletionProvider>,
    pub mailer: Arc<dyn EmailSender>,
}

#[derive(Debug, Serialize)]
struct SentResponse {
    status: &'static str,
    recipients: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            PipelineError::MissingField => (StatusCode::BAD_REQUEST, "Missing body or email"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Server error"),
        };

        if status == StatusCode::BAD_REQUEST {
            warn!(kind = self.kind(), "Rejected webhook: {}", self);
        } else {
            let kind = self.kind();
            error!(kind, "Webhook failed: {:?}", anyhow::Error::new(self));
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/webhook", post(webhook))
        .with_state(state)
}

async fn health() -> &'static str {
    HEALTH_TEXT
}

/// Takes the raw body so malformed JSON reaches the pipeline instead of being rejected here.
async fn webhook(State(state): State<AppState>, body: Bytes) -> Response {
    match webhook::process(&state.config, state.llm.as_ref(), state.mailer.as_ref(), &body).await
    {
        Ok(delivery) => (
            StatusCode::OK,
            Json(SentResponse {
                status: "sent",
                recipients: delivery.recipients,
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn serve(state: AppState) -> Result<()> {
    let addr = state.config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Webhook server listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("Server error")?;

    Ok(())
}
