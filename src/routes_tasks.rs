// --------------------------------------------------
// Handles API endpoints related to the task list.
//
// Responsibilities:
// - Create / read / update / delete tasks
// - Mark tasks completed
// - Tag / priority / notes / due-date updates
// - Subtask add & toggle
// - Set or clear the active (focused) task
// --------------------------------------------------

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Action, Priority, Subtask, Task};
use crate::store::AppState;

fn now_fixed_offset() -> DateTime<FixedOffset> {
    let local = chrono::Local::now();
    let offset_seconds = local.offset().local_minus_utc();
    let fixed = FixedOffset::east_opt(offset_seconds).unwrap();
    local.with_timezone(&fixed)
}

// Fetch one task back out of the store after a dispatch.
fn task_reply(app: &AppState, id: &str) -> axum::response::Response {
    match app.store.snapshot().tasks.into_iter().find(|t| t.id == id) {
        Some(t) => Json(t).into_response(),
        None => (StatusCode::NOT_FOUND, "task not found").into_response(),
    }
}

#[derive(Debug, Serialize)]
pub struct TasksResponse {
    pub count: usize,
    pub tasks: Vec<Task>,
}

// -----------------------------
// GET /api/tasks
// Returns the whole task pool
// -----------------------------
pub async fn get_tasks(State(app): State<Arc<AppState>>) -> impl IntoResponse {
    let tasks = app.store.snapshot().tasks;
    Json(TasksResponse {
        count: tasks.len(),
        tasks,
    })
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
    pub pomodoros: Option<u32>, // target count, default 1
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub priority: Option<Priority>,
    pub due_at: Option<String>, // RFC3339
    pub duration_min: Option<i64>,
}

// -----------------------------
// POST /api/tasks
// Creates a new task with the fixed creation defaults
// -----------------------------
pub async fn create_task(
    State(app): State<Arc<AppState>>,
    Json(input): Json<CreateTaskInput>,
) -> impl IntoResponse {
    if input.title.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "title required").into_response();
    }

    let pomodoros = input.pomodoros.unwrap_or(1);
    if pomodoros < 1 {
        return (StatusCode::BAD_REQUEST, "pomodoros must be at least 1").into_response();
    }

    let due_at = match &input.due_at {
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => Some(dt),
            Err(_) => return (StatusCode::BAD_REQUEST, "invalid due_at").into_response(),
        },
        None => None,
    };

    let task = Task {
        id: Uuid::new_v4().to_string(),
        title: input.title.trim().to_string(),
        completed: false,
        pomodoros,
        completed_pomodoros: 0,
        category: input.category,
        tags: input.tags.unwrap_or_default(),
        priority: input.priority.unwrap_or(Priority::Medium),
        notes: String::new(),
        subtasks: Vec::new(),
        due_at,
        created_at: now_fixed_offset(),
        duration_min: input.duration_min.unwrap_or(25),
    };

    app.dispatch(&Action::AddTask(task.clone()));
    Json(task).into_response()
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskInput {
    pub title: String,
    pub completed: bool,
    pub pomodoros: u32,
    pub completed_pomodoros: u32,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub priority: Priority,
    pub notes: String,
    pub due_at: Option<String>, // RFC3339
    pub duration_min: i64,
}

// -----------------------------
// PUT /api/tasks/:id
// Replaces an existing task record by ID.
// Identity fields (id, created_at) and subtasks are kept;
// subtasks have their own endpoints below.
// -----------------------------
pub async fn update_task(
    State(app): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTaskInput>,
) -> impl IntoResponse {
    if input.title.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "title required").into_response();
    }
    if input.pomodoros < 1 {
        return (StatusCode::BAD_REQUEST, "pomodoros must be at least 1").into_response();
    }

    let due_at = match &input.due_at {
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => Some(dt),
            Err(_) => return (StatusCode::BAD_REQUEST, "invalid due_at").into_response(),
        },
        None => None,
    };

    let snap = app.store.snapshot();
    let Some(existing) = snap.tasks.iter().find(|t| t.id == id) else {
        return (StatusCode::NOT_FOUND, "task not found").into_response();
    };

    let replacement = Task {
        id: existing.id.clone(),
        title: input.title,
        completed: input.completed,
        pomodoros: input.pomodoros,
        completed_pomodoros: input.completed_pomodoros,
        category: input.category,
        tags: input.tags.unwrap_or_default(),
        priority: input.priority,
        notes: input.notes,
        subtasks: existing.subtasks.clone(),
        due_at,
        created_at: existing.created_at,
        duration_min: input.duration_min,
    };

    app.dispatch(&Action::UpdateTask(replacement.clone()));
    Json(replacement).into_response()
}

// -----------------------------
// DELETE /api/tasks/:id
// Removes a task permanently
// -----------------------------
pub async fn delete_task(
    State(app): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let snap = app.store.snapshot();
    if !snap.tasks.iter().any(|t| t.id == id) {
        return (StatusCode::NOT_FOUND, "task not found").into_response();
    }

    app.dispatch(&Action::DeleteTask(id));
    Json(serde_json::json!({ "ok": true })).into_response()
}

// -----------------------------
// POST /api/tasks/:id/complete
// Marks a task completed and bumps the completed-tasks counter.
// The counter moves on every call, repeats included; the existence
// check here is the only guard.
// -----------------------------
pub async fn complete_task(
    State(app): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let snap = app.store.snapshot();
    if !snap.tasks.iter().any(|t| t.id == id) {
        return (StatusCode::NOT_FOUND, "task not found").into_response();
    }

    app.dispatch(&Action::CompleteTask(id.clone()));
    task_reply(&app, &id)
}

#[derive(Debug, Deserialize)]
pub struct TagsInput {
    pub tags: Vec<String>,
}

// -----------------------------
// PUT /api/tasks/:id/tags
// Replaces the tag set on one task
// -----------------------------
pub async fn update_tags(
    State(app): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<TagsInput>,
) -> impl IntoResponse {
    app.dispatch(&Action::UpdateTags {
        task_id: id.clone(),
        tags: input.tags,
    });
    task_reply(&app, &id)
}

#[derive(Debug, Deserialize)]
pub struct PriorityInput {
    pub priority: Priority,
}

// -----------------------------
// PUT /api/tasks/:id/priority
// -----------------------------
pub async fn update_priority(
    State(app): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<PriorityInput>,
) -> impl IntoResponse {
    app.dispatch(&Action::UpdatePriority {
        task_id: id.clone(),
        priority: input.priority,
    });
    task_reply(&app, &id)
}

#[derive(Debug, Deserialize)]
pub struct NotesInput {
    pub notes: String,
}

// -----------------------------
// PUT /api/tasks/:id/notes
// -----------------------------
pub async fn update_notes(
    State(app): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<NotesInput>,
) -> impl IntoResponse {
    app.dispatch(&Action::UpdateNotes {
        task_id: id.clone(),
        notes: input.notes,
    });
    task_reply(&app, &id)
}

#[derive(Debug, Deserialize)]
pub struct DueDateInput {
    pub due_at: String, // RFC3339
}

// -----------------------------
// PUT /api/tasks/:id/due-date
// -----------------------------
pub async fn set_due_date(
    State(app): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<DueDateInput>,
) -> impl IntoResponse {
    let due_at = match DateTime::parse_from_rfc3339(&input.due_at) {
        Ok(dt) => dt,
        Err(_) => return (StatusCode::BAD_REQUEST, "invalid due_at").into_response(),
    };

    app.dispatch(&Action::SetDueDate {
        task_id: id.clone(),
        due_at,
    });
    task_reply(&app, &id)
}

#[derive(Debug, Deserialize)]
pub struct AddSubtaskInput {
    pub title: String,
}

// -----------------------------
// POST /api/tasks/:id/subtasks
// Appends a subtask to one task
// -----------------------------
pub async fn add_subtask(
    State(app): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<AddSubtaskInput>,
) -> impl IntoResponse {
    if input.title.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "title required").into_response();
    }

    let subtask = Subtask {
        id: Uuid::new_v4().to_string(),
        title: input.title.trim().to_string(),
        completed: false,
    };

    app.dispatch(&Action::AddSubtask {
        task_id: id.clone(),
        subtask,
    });
    task_reply(&app, &id)
}

// -----------------------------
// POST /api/tasks/:id/subtasks/:subtask_id/toggle
// Flips one subtask's completion flag
// -----------------------------
pub async fn toggle_subtask(
    State(app): State<Arc<AppState>>,
    Path((id, subtask_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let snap = app.store.snapshot();
    let Some(task) = snap.tasks.iter().find(|t| t.id == id) else {
        return (StatusCode::NOT_FOUND, "task not found").into_response();
    };
    let Some(subtask) = task.subtasks.iter().find(|s| s.id == subtask_id) else {
        return (StatusCode::NOT_FOUND, "subtask not found").into_response();
    };

    app.dispatch(&Action::UpdateSubtask {
        task_id: id.clone(),
        subtask_id,
        completed: !subtask.completed,
    });
    task_reply(&app, &id)
}

#[derive(Debug, Deserialize)]
pub struct ActiveTaskInput {
    pub task_id: Option<String>, // null clears the focus
}

// -----------------------------
// PUT /api/active-task
// Sets or clears the focused task. Changing focus also rewinds the
// timer to a fresh, stopped work session, so the whole snapshot is
// returned rather than just the task.
// -----------------------------
pub async fn set_active_task(
    State(app): State<Arc<AppState>>,
    Json(input): Json<ActiveTaskInput>,
) -> impl IntoResponse {
    if let Some(id) = &input.task_id {
        let snap = app.store.snapshot();
        if !snap.tasks.iter().any(|t| t.id == *id) {
            return (StatusCode::NOT_FOUND, "task not found").into_response();
        }
    }

    app.dispatch(&Action::SetActiveTask(input.task_id));
    Json(app.store.snapshot()).into_response()
}
