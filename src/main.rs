// Define data modules
mod models; // Data structures (state aggregate, Task, Action, etc.)
mod logic;  // Pure state transitions and derived statistics
mod store;  // In-memory state store behind the dispatch entry point
mod ticker; // Interval task driving the countdown
mod routes_state;   // HTTP handlers for action dispatch & state snapshot
mod routes_timer;   // HTTP handlers for timer control & settings
mod routes_tasks;   // HTTP handlers for the task list
mod routes_stats;   // HTTP handlers for derived statistics

// Import axum routing utilities and Router
use axum::{
    routing::{get, post, put}, // HTTP method helpers
    Router, // Main router type
};
use std::net::SocketAddr;
use tower_http::services::ServeDir; // Used to serve static files (HTML/CSS/JS)
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::Settings;
use crate::store::AppState;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = AppState::new(Settings::default());

    let api = Router::new()
        // store boundary
        .route("/state", get(routes_state::get_state))
        .route("/dispatch", post(routes_state::dispatch_action))
        // timer
        .route("/timer", get(routes_timer::get_timer))
        .route("/timer/start", post(routes_timer::start_timer))
        .route("/timer/pause", post(routes_timer::pause_timer))
        .route("/timer/reset", post(routes_timer::reset_timer))
        .route("/timer/mode", put(routes_timer::change_mode))
        // tasks
        .route("/tasks", get(routes_tasks::get_tasks).post(routes_tasks::create_task))
        .route("/tasks/:id", put(routes_tasks::update_task).delete(routes_tasks::delete_task))
        .route("/tasks/:id/complete", post(routes_tasks::complete_task))
        .route("/tasks/:id/tags", put(routes_tasks::update_tags))
        .route("/tasks/:id/priority", put(routes_tasks::update_priority))
        .route("/tasks/:id/notes", put(routes_tasks::update_notes))
        .route("/tasks/:id/due-date", put(routes_tasks::set_due_date))
        .route("/tasks/:id/subtasks", post(routes_tasks::add_subtask))
        .route(
            "/tasks/:id/subtasks/:subtask_id/toggle",
            post(routes_tasks::toggle_subtask),
        )
        // active task
        .route("/active-task", put(routes_tasks::set_active_task))
        // settings
        .route("/settings", get(routes_timer::get_settings))
        // stats
        .route("/stats/daily", get(routes_stats::get_daily_progress))
        .route("/stats/tasks", get(routes_stats::get_task_analytics));

    let app = Router::new()
        .nest("/api", api)
        .nest_service("/", ServeDir::new("static"))
        .with_state(state);

    let addr: SocketAddr = "127.0.0.1:3000".parse().expect("valid bind address");

    info!("Server running at http://{addr}");
    info!("Static files: http://{addr}/");
    info!("API base:     http://{addr}/api");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind failed");

    axum::serve(listener, app).await.expect("server error");
}
