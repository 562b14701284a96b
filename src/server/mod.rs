//! HTTP surface for embedding the roster in other pages.
//!
//! `GET /roster` returns the rendered fragment, `GET /healthz` answers `ok`.
//! Upstream failures are reported as gateway errors so a fronting proxy can
//! tell them apart from bugs in this service.

use crate::api::FetchError;
use crate::core::pipeline::RequestContext;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::error::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct AppState {
    pub context: RequestContext,
}

impl AppState {
    pub fn new(context: RequestContext) -> Self {
        Self { context }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/roster", get(roster_handler))
        .route("/healthz", get(healthz_handler))
        .with_state(state)
}

/// Gateway status for an upstream failure.
pub fn status_for(err: &FetchError) -> StatusCode {
    match err {
        FetchError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        FetchError::HttpStatus(_) | FetchError::ParseError(_) | FetchError::Request(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

async fn roster_handler(State(state): State<AppState>) -> Response {
    match state.context.render_roster().await {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            let status = status_for(&err);
            warn!(error = %err, status = status.as_u16(), "roster request failed");
            (status, err.to_string()).into_response()
        }
    }
}

async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Bind `bind_addr` and serve until Ctrl+C.
pub async fn serve(context: RequestContext, bind_addr: &str) -> Result<(), Box<dyn Error>> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|err| format!("Failed to bind {bind_addr}: {err}"))?;
    info!(addr = %listener.local_addr()?, "bnet-roster listening");

    let app = build_router(AppState::new(context));
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}
