use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Work,
    ShortBreak,
    LongBreak,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub pomodoros: u32,           // target count
    pub completed_pomodoros: u32, // intended to stay <= pomodoros; not enforced
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub priority: Priority,
    pub notes: String,
    pub subtasks: Vec<Subtask>,
    pub due_at: Option<DateTime<FixedOffset>>,
    pub created_at: DateTime<FixedOffset>,
    pub duration_min: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerState {
    pub is_running: bool,
    pub time_left: u64, // seconds
    pub current_mode: Mode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub work_duration: u64,        // seconds
    pub short_break_duration: u64, // seconds
    pub long_break_duration: u64,  // seconds
    pub long_break_interval: u32,  // work sessions per long break
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_duration: 25 * 60,
            short_break_duration: 5 * 60,
            long_break_duration: 15 * 60,
            long_break_interval: 4,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Statistics {
    pub daily_pomodoros: u32,
    pub completed_tasks: u32,
}

// The whole application state. The store owns the only live copy;
// everything handed out is a snapshot clone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PomodoroState {
    pub timer: TimerState,
    pub tasks: Vec<Task>,
    pub active_task_id: Option<String>,
    pub settings: Settings,
    pub statistics: Statistics,
}

// Every state transition is one of these tagged actions, dispatched either
// by a route handler or by the ticker. A tag we do not recognize lands in
// Unknown, which the reducer treats as a no-op.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    StartTimer,
    PauseTimer,
    ResetTimer,
    SetTimeLeft(u64),
    ChangeMode(Mode),
    AddTask(Task),
    UpdateTask(Task),
    DeleteTask(String),
    CompleteTask(String),
    SetActiveTask(Option<String>),
    IncrementTaskPomodoro(String),
    IncrementDailyPomodoros,
    UpdateTags { task_id: String, tags: Vec<String> },
    UpdatePriority { task_id: String, priority: Priority },
    UpdateNotes { task_id: String, notes: String },
    SetDueDate { task_id: String, due_at: DateTime<FixedOffset> },
    AddSubtask { task_id: String, subtask: Subtask },
    UpdateSubtask { task_id: String, subtask_id: String, completed: bool },
    #[serde(other)]
    Unknown,
}

impl Action {
    // Tag name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::StartTimer => "START_TIMER",
            Action::PauseTimer => "PAUSE_TIMER",
            Action::ResetTimer => "RESET_TIMER",
            Action::SetTimeLeft(_) => "SET_TIME_LEFT",
            Action::ChangeMode(_) => "CHANGE_MODE",
            Action::AddTask(_) => "ADD_TASK",
            Action::UpdateTask(_) => "UPDATE_TASK",
            Action::DeleteTask(_) => "DELETE_TASK",
            Action::CompleteTask(_) => "COMPLETE_TASK",
            Action::SetActiveTask(_) => "SET_ACTIVE_TASK",
            Action::IncrementTaskPomodoro(_) => "INCREMENT_TASK_POMODORO",
            Action::IncrementDailyPomodoros => "INCREMENT_DAILY_POMODOROS",
            Action::UpdateTags { .. } => "UPDATE_TAGS",
            Action::UpdatePriority { .. } => "UPDATE_PRIORITY",
            Action::UpdateNotes { .. } => "UPDATE_NOTES",
            Action::SetDueDate { .. } => "SET_DUE_DATE",
            Action::AddSubtask { .. } => "ADD_SUBTASK",
            Action::UpdateSubtask { .. } => "UPDATE_SUBTASK",
            Action::Unknown => "UNKNOWN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tagged_actions_parse() {
        let a: Action =
            serde_json::from_value(json!({ "type": "SET_TIME_LEFT", "payload": 300 })).unwrap();
        assert!(matches!(a, Action::SetTimeLeft(300)));

        let a: Action = serde_json::from_value(json!({ "type": "START_TIMER" })).unwrap();
        assert!(matches!(a, Action::StartTimer));

        let a: Action = serde_json::from_value(json!({
            "type": "UPDATE_NOTES",
            "payload": { "task_id": "t1", "notes": "tomorrow" }
        }))
        .unwrap();
        assert!(matches!(a, Action::UpdateNotes { .. }));

        let a: Action =
            serde_json::from_value(json!({ "type": "SET_ACTIVE_TASK", "payload": null })).unwrap();
        assert!(matches!(a, Action::SetActiveTask(None)));

        let a: Action =
            serde_json::from_value(json!({ "type": "CHANGE_MODE", "payload": "long_break" }))
                .unwrap();
        assert!(matches!(a, Action::ChangeMode(Mode::LongBreak)));
    }

    #[test]
    fn unrecognized_tag_becomes_unknown() {
        let a: Action =
            serde_json::from_value(json!({ "type": "ADD_SUBTITLE", "payload": { "x": 1 } }))
                .unwrap();
        assert!(matches!(a, Action::Unknown));
    }

    #[test]
    fn modes_and_priorities_use_snake_case() {
        assert_eq!(
            serde_json::to_value(Mode::ShortBreak).unwrap(),
            json!("short_break")
        );
        assert_eq!(serde_json::to_value(Priority::High).unwrap(), json!("high"));
    }

    #[test]
    fn default_settings_match_the_classic_cycle() {
        let s = Settings::default();
        assert_eq!(s.work_duration, 1500);
        assert_eq!(s.short_break_duration, 300);
        assert_eq!(s.long_break_duration, 900);
        assert_eq!(s.long_break_interval, 4);
    }
}
