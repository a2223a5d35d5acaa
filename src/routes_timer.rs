// --------------------------------------------------
// Handles API endpoints for timer control and settings.
//
// Responsibilities:
// - Read the countdown state
// - Start / pause / reset the countdown
// - Switch between work and break modes
// - Read the fixed duration settings
// --------------------------------------------------

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;

use crate::models::{Action, Mode};
use crate::store::AppState;

// -----------------------------
// GET /api/timer
// Returns the countdown state
// -----------------------------
pub async fn get_timer(State(app): State<Arc<AppState>>) -> impl IntoResponse {
    Json(app.store.snapshot().timer)
}

// -----------------------------
// POST /api/timer/start
// Marks the countdown as running
// -----------------------------
pub async fn start_timer(State(app): State<Arc<AppState>>) -> impl IntoResponse {
    app.dispatch(&Action::StartTimer);
    Json(app.store.snapshot().timer)
}

// -----------------------------
// POST /api/timer/pause
// Stops the countdown, keeping the remaining time
// -----------------------------
pub async fn pause_timer(State(app): State<Arc<AppState>>) -> impl IntoResponse {
    app.dispatch(&Action::PauseTimer);
    Json(app.store.snapshot().timer)
}

// -----------------------------
// POST /api/timer/reset
// Stops the countdown and rewinds it to the current mode's duration
// -----------------------------
pub async fn reset_timer(State(app): State<Arc<AppState>>) -> impl IntoResponse {
    app.dispatch(&Action::ResetTimer);
    Json(app.store.snapshot().timer)
}

#[derive(Debug, Deserialize)]
pub struct ChangeModeInput {
    pub mode: Mode,
}

// -----------------------------
// PUT /api/timer/mode
// Switches mode; always lands stopped at the mode's full duration
// -----------------------------
pub async fn change_mode(
    State(app): State<Arc<AppState>>,
    Json(input): Json<ChangeModeInput>,
) -> impl IntoResponse {
    app.dispatch(&Action::ChangeMode(input.mode));
    Json(app.store.snapshot().timer)
}

// -----------------------------
// GET /api/settings
// Returns the fixed mode durations and the long-break interval
// -----------------------------
pub async fn get_settings(State(app): State<Arc<AppState>>) -> impl IntoResponse {
    Json(app.store.snapshot().settings)
}
