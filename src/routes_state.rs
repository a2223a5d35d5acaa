// --------------------------------------------------
// The store boundary over HTTP.
//
// Responsibilities:
// - Accept one tagged action and apply it
// - Hand observers a read-only state snapshot
// --------------------------------------------------

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use tracing::debug;

use crate::models::Action;
use crate::store::AppState;

// -----------------------------
// GET /api/state
// Returns the full state snapshot
// -----------------------------
pub async fn get_state(State(app): State<Arc<AppState>>) -> impl IntoResponse {
    Json(app.store.snapshot())
}

// -----------------------------
// POST /api/dispatch
// Applies one tagged action and returns the resulting snapshot.
// Bodies that do not parse as an action are ignored, not rejected:
// bad actions leave the state unchanged.
// -----------------------------
pub async fn dispatch_action(
    State(app): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    match serde_json::from_value::<Action>(body) {
        Ok(action) => app.dispatch(&action),
        Err(e) => debug!(error = %e, "ignoring malformed action"),
    }
    Json(app.store.snapshot())
}
