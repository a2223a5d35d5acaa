use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use crate::logic;
use crate::store::AppState;

#[derive(Debug, Serialize)]
pub struct DailyProgressResponse {
    pub daily_pomodoros: u32,
    pub completed_tasks: u32,
    pub focus_minutes: u64,
}

// -----------------------------
// GET /api/stats/daily
// Today's running counters plus the focus time derived from them
// -----------------------------
pub async fn get_daily_progress(State(app): State<Arc<AppState>>) -> impl IntoResponse {
    let snap = app.store.snapshot();

    Json(DailyProgressResponse {
        daily_pomodoros: snap.statistics.daily_pomodoros,
        completed_tasks: snap.statistics.completed_tasks,
        focus_minutes: logic::focus_minutes(&snap.statistics, &snap.settings),
    })
}

#[derive(Debug, Serialize)]
pub struct TaskAnalyticsResponse {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub total_pomodoros: u32,
    pub completed_pomodoros: u32,
    pub categories: BTreeMap<String, usize>,
    pub priorities: PriorityBreakdownResponse,
    pub productivity_score: u32,
    pub estimated_total_min: i64,
    pub completed_min: i64,
}

#[derive(Debug, Serialize)]
pub struct PriorityBreakdownResponse {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

// -----------------------------
// GET /api/stats/tasks
// Aggregated view over the task pool, computed on demand
// -----------------------------
pub async fn get_task_analytics(State(app): State<Arc<AppState>>) -> impl IntoResponse {
    let snap = app.store.snapshot();
    let stats = logic::task_analytics(&snap.tasks);

    Json(TaskAnalyticsResponse {
        total_tasks: stats.total_tasks,
        completed_tasks: stats.completed_tasks,
        total_pomodoros: stats.total_pomodoros,
        completed_pomodoros: stats.completed_pomodoros,
        categories: stats.categories,
        priorities: PriorityBreakdownResponse {
            low: stats.priorities.low,
            medium: stats.priorities.medium,
            high: stats.priorities.high,
        },
        productivity_score: stats.productivity_score,
        estimated_total_min: stats.estimated_total_min,
        completed_min: stats.completed_min,
    })
}
