//! HTTP routes. `/status/latest` answers with a one-element array so the
//! agent can stand in for the status backend.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::warn;

use crate::collect::collect_snapshot;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/status/latest", get(latest_handler))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

async fn latest_handler(State(state): State<AppState>) -> Response {
    match collect_snapshot(&state).await {
        Ok(snap) => Json(vec![snap]).into_response(),
        Err(e) => {
            warn!("snapshot collection failed: {e:#}");
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
        }
    }
}
