/*
State transition and derived-statistics logic.
Module was independently written from HTTP / Axum for testing
*/

use std::collections::BTreeMap;

use crate::models::{
    Action, Mode, PomodoroState, Priority, Settings, Statistics, Task, TimerState,
};

// Fresh state: work mode, full work duration, nothing running, no tasks.
pub fn initial_state(settings: Settings) -> PomodoroState {
    PomodoroState {
        timer: TimerState {
            is_running: false,
            time_left: settings.work_duration,
            current_mode: Mode::Work,
        },
        tasks: Vec::new(),
        active_task_id: None,
        statistics: Statistics::default(),
        settings,
    }
}

// Countdown target for a mode.
pub fn mode_duration(settings: &Settings, mode: Mode) -> u64 {
    match mode {
        Mode::Work => settings.work_duration,
        Mode::ShortBreak => settings.short_break_duration,
        Mode::LongBreak => settings.long_break_duration,
    }
}

// Break selection after a finished work session.
//
// Rules:
// - completed_sessions is the running total INCLUDING the session that
//   just finished
// - an exact multiple of the interval means a long break (ties go long)
// - everything else, including an interval of 0, means a short break
pub fn next_break_mode(completed_sessions: u32, long_break_interval: u32) -> Mode {
    if long_break_interval != 0 && completed_sessions % long_break_interval == 0 {
        Mode::LongBreak
    } else {
        Mode::ShortBreak
    }
}

// Compute the next state for one action.
//
// Pure function: no side effects, no I/O. The caller keeps the old value;
// a new one is returned. Actions that name a task id nobody has simply
// match nothing. Unknown actions return the state unchanged.
pub fn reduce(state: &PomodoroState, action: &Action) -> PomodoroState {
    let mut next = state.clone();

    match action {
        Action::StartTimer => next.timer.is_running = true,
        Action::PauseTimer => next.timer.is_running = false,
        Action::ResetTimer => {
            next.timer.is_running = false;
            next.timer.time_left = mode_duration(&next.settings, next.timer.current_mode);
        }
        Action::SetTimeLeft(secs) => next.timer.time_left = *secs,
        Action::ChangeMode(mode) => {
            next.timer.current_mode = *mode;
            next.timer.time_left = mode_duration(&next.settings, *mode);
            next.timer.is_running = false;
        }
        Action::AddTask(task) => next.tasks.push(task.clone()),
        Action::UpdateTask(task) => {
            if let Some(t) = next.tasks.iter_mut().find(|t| t.id == task.id) {
                *t = task.clone();
            }
        }
        Action::DeleteTask(id) => {
            // active_task_id is intentionally left alone, even when it
            // points at the task being removed
            next.tasks.retain(|t| t.id != *id);
        }
        Action::CompleteTask(id) => {
            if let Some(t) = next.tasks.iter_mut().find(|t| t.id == *id) {
                t.completed = true;
            }
            // counts every dispatch, repeats included (not idempotent)
            next.statistics.completed_tasks += 1;
        }
        Action::SetActiveTask(id) => {
            next.active_task_id = id.clone();
            // switching focus also rewinds the timer to a fresh work session
            next.timer.is_running = false;
            next.timer.current_mode = Mode::Work;
            next.timer.time_left = next.settings.work_duration;
        }
        Action::IncrementTaskPomodoro(id) => {
            if let Some(t) = next.tasks.iter_mut().find(|t| t.id == *id) {
                t.completed_pomodoros += 1;
            }
        }
        Action::IncrementDailyPomodoros => next.statistics.daily_pomodoros += 1,
        Action::UpdateTags { task_id, tags } => {
            if let Some(t) = next.tasks.iter_mut().find(|t| t.id == *task_id) {
                t.tags = tags.clone();
            }
        }
        Action::UpdatePriority { task_id, priority } => {
            if let Some(t) = next.tasks.iter_mut().find(|t| t.id == *task_id) {
                t.priority = *priority;
            }
        }
        Action::UpdateNotes { task_id, notes } => {
            if let Some(t) = next.tasks.iter_mut().find(|t| t.id == *task_id) {
                t.notes = notes.clone();
            }
        }
        Action::SetDueDate { task_id, due_at } => {
            if let Some(t) = next.tasks.iter_mut().find(|t| t.id == *task_id) {
                t.due_at = Some(*due_at);
            }
        }
        Action::AddSubtask { task_id, subtask } => {
            if let Some(t) = next.tasks.iter_mut().find(|t| t.id == *task_id) {
                t.subtasks.push(subtask.clone());
            }
        }
        Action::UpdateSubtask {
            task_id,
            subtask_id,
            completed,
        } => {
            if let Some(t) = next.tasks.iter_mut().find(|t| t.id == *task_id) {
                if let Some(s) = t.subtasks.iter_mut().find(|s| s.id == *subtask_id) {
                    s.completed = *completed;
                }
            }
        }
        Action::Unknown => {}
    }

    next
}

// Aggregated view over the task list, computed on demand
//     not stored in state, not exposed through the reducer
#[derive(Debug, Clone)]
pub struct TaskAnalytics {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub total_pomodoros: u32,
    pub completed_pomodoros: u32,
    pub categories: BTreeMap<String, usize>,
    pub priorities: PriorityBreakdown,
    pub productivity_score: u32, // percent of tasks completed, 0..=100
    pub estimated_total_min: i64,
    pub completed_min: i64,
}

#[derive(Debug, Clone, Default)]
pub struct PriorityBreakdown {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

pub fn task_analytics(tasks: &[Task]) -> TaskAnalytics {
    let total_tasks = tasks.len();
    let completed_tasks = tasks.iter().filter(|t| t.completed).count();
    let total_pomodoros = tasks.iter().map(|t| t.pomodoros).sum();
    let completed_pomodoros = tasks.iter().map(|t| t.completed_pomodoros).sum();

    let mut categories: BTreeMap<String, usize> = BTreeMap::new();
    for t in tasks {
        if let Some(c) = &t.category {
            *categories.entry(c.clone()).or_insert(0) += 1;
        }
    }

    let mut priorities = PriorityBreakdown::default();
    for t in tasks {
        match t.priority {
            Priority::Low => priorities.low += 1,
            Priority::Medium => priorities.medium += 1,
            Priority::High => priorities.high += 1,
        }
    }

    let productivity_score = if total_tasks > 0 {
        ((completed_tasks as f64 / total_tasks as f64) * 100.0).round() as u32
    } else {
        0
    };

    let estimated_total_min = tasks.iter().map(|t| t.duration_min).sum();
    let completed_min = tasks
        .iter()
        .filter(|t| t.completed)
        .map(|t| t.duration_min)
        .sum();

    TaskAnalytics {
        total_tasks,
        completed_tasks,
        total_pomodoros,
        completed_pomodoros,
        categories,
        priorities,
        productivity_score,
        estimated_total_min,
        completed_min,
    }
}

// Minutes of focus accumulated today, derived from the daily counter.
pub fn focus_minutes(statistics: &Statistics, settings: &Settings) -> u64 {
    statistics.daily_pomodoros as u64 * settings.work_duration / 60
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subtask;
    use chrono::DateTime;

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            completed: false,
            pomodoros: 1,
            completed_pomodoros: 0,
            category: None,
            tags: Vec::new(),
            priority: Priority::Medium,
            notes: String::new(),
            subtasks: Vec::new(),
            due_at: None,
            created_at: DateTime::parse_from_rfc3339("2026-01-15T09:00:00+00:00").unwrap(),
            duration_min: 25,
        }
    }

    fn state_with_tasks(ids: &[&str]) -> PomodoroState {
        let mut s = initial_state(Settings::default());
        for id in ids {
            s = reduce(&s, &Action::AddTask(task(id)));
        }
        s
    }

    #[test]
    fn unknown_action_is_identity() {
        let mut s = state_with_tasks(&["a", "b"]);
        s = reduce(&s, &Action::StartTimer);
        let next = reduce(&s, &Action::Unknown);
        assert_eq!(next, s);
    }

    #[test]
    fn add_then_complete() {
        let s = state_with_tasks(&["a"]);
        let next = reduce(&s, &Action::CompleteTask("a".to_string()));
        assert!(next.tasks[0].completed);
        assert_eq!(next.statistics.completed_tasks, 1);
    }

    #[test]
    fn complete_is_not_idempotent() {
        let s = state_with_tasks(&["a"]);
        let once = reduce(&s, &Action::CompleteTask("a".to_string()));
        let twice = reduce(&once, &Action::CompleteTask("a".to_string()));
        assert!(twice.tasks[0].completed);
        // the counter moves on every dispatch, matching the observed design
        assert_eq!(twice.statistics.completed_tasks, 2);
    }

    #[test]
    fn complete_missing_id_still_counts() {
        let s = state_with_tasks(&["a"]);
        let next = reduce(&s, &Action::CompleteTask("ghost".to_string()));
        assert!(!next.tasks[0].completed);
        assert_eq!(next.statistics.completed_tasks, 1);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let s = state_with_tasks(&["a", "b", "c"]);
        let next = reduce(&s, &Action::DeleteTask("b".to_string()));
        assert_eq!(next.tasks.len(), 2);
        assert!(next.tasks.iter().all(|t| t.id != "b"));
    }

    #[test]
    fn delete_leaves_active_pointer_dangling() {
        let s = state_with_tasks(&["a"]);
        let s = reduce(&s, &Action::SetActiveTask(Some("a".to_string())));
        let next = reduce(&s, &Action::DeleteTask("a".to_string()));
        assert!(next.tasks.is_empty());
        assert_eq!(next.active_task_id.as_deref(), Some("a"));
    }

    #[test]
    fn update_replaces_whole_record() {
        let s = state_with_tasks(&["a"]);
        let mut replacement = task("a");
        replacement.title = "renamed".to_string();
        replacement.pomodoros = 4;
        let next = reduce(&s, &Action::UpdateTask(replacement.clone()));
        assert_eq!(next.tasks[0], replacement);
    }

    #[test]
    fn update_missing_id_is_noop() {
        let s = state_with_tasks(&["a"]);
        let next = reduce(&s, &Action::UpdateTask(task("ghost")));
        assert_eq!(next, s);
    }

    #[test]
    fn change_mode_always_stops_and_resets() {
        let mut s = state_with_tasks(&[]);
        s = reduce(&s, &Action::StartTimer);
        s = reduce(&s, &Action::SetTimeLeft(7));
        let next = reduce(&s, &Action::ChangeMode(Mode::ShortBreak));
        assert!(!next.timer.is_running);
        assert_eq!(next.timer.current_mode, Mode::ShortBreak);
        assert_eq!(next.timer.time_left, next.settings.short_break_duration);
    }

    #[test]
    fn reset_uses_current_mode_duration() {
        let mut s = state_with_tasks(&[]);
        s = reduce(&s, &Action::ChangeMode(Mode::LongBreak));
        s = reduce(&s, &Action::StartTimer);
        s = reduce(&s, &Action::SetTimeLeft(12));
        let next = reduce(&s, &Action::ResetTimer);
        assert!(!next.timer.is_running);
        assert_eq!(next.timer.current_mode, Mode::LongBreak);
        assert_eq!(next.timer.time_left, next.settings.long_break_duration);
    }

    #[test]
    fn set_active_task_rewinds_timer() {
        let mut s = state_with_tasks(&["a"]);
        s = reduce(&s, &Action::ChangeMode(Mode::ShortBreak));
        s = reduce(&s, &Action::StartTimer);
        let next = reduce(&s, &Action::SetActiveTask(Some("a".to_string())));
        assert_eq!(next.active_task_id.as_deref(), Some("a"));
        assert!(!next.timer.is_running);
        assert_eq!(next.timer.current_mode, Mode::Work);
        assert_eq!(next.timer.time_left, next.settings.work_duration);

        let cleared = reduce(&next, &Action::SetActiveTask(None));
        assert_eq!(cleared.active_task_id, None);
    }

    #[test]
    fn field_updates_hit_only_the_matching_task() {
        let s = state_with_tasks(&["a", "b"]);
        let s = reduce(
            &s,
            &Action::UpdateTags {
                task_id: "a".to_string(),
                tags: vec!["deep".to_string(), "focus".to_string()],
            },
        );
        let s = reduce(
            &s,
            &Action::UpdatePriority {
                task_id: "a".to_string(),
                priority: Priority::High,
            },
        );
        let s = reduce(
            &s,
            &Action::UpdateNotes {
                task_id: "a".to_string(),
                notes: "first thing tomorrow".to_string(),
            },
        );
        let due = DateTime::parse_from_rfc3339("2026-02-01T17:00:00+00:00").unwrap();
        let s = reduce(
            &s,
            &Action::SetDueDate {
                task_id: "a".to_string(),
                due_at: due,
            },
        );

        let a = &s.tasks[0];
        assert_eq!(a.tags, vec!["deep", "focus"]);
        assert_eq!(a.priority, Priority::High);
        assert_eq!(a.notes, "first thing tomorrow");
        assert_eq!(a.due_at, Some(due));

        let b = &s.tasks[1];
        assert!(b.tags.is_empty());
        assert_eq!(b.priority, Priority::Medium);
        assert!(b.notes.is_empty());
        assert_eq!(b.due_at, None);
    }

    #[test]
    fn subtask_add_and_toggle() {
        let s = state_with_tasks(&["a"]);
        let sub = Subtask {
            id: "s1".to_string(),
            title: "outline".to_string(),
            completed: false,
        };
        let s = reduce(
            &s,
            &Action::AddSubtask {
                task_id: "a".to_string(),
                subtask: sub,
            },
        );
        assert_eq!(s.tasks[0].subtasks.len(), 1);

        let s = reduce(
            &s,
            &Action::UpdateSubtask {
                task_id: "a".to_string(),
                subtask_id: "s1".to_string(),
                completed: true,
            },
        );
        assert!(s.tasks[0].subtasks[0].completed);

        let unchanged = reduce(
            &s,
            &Action::UpdateSubtask {
                task_id: "a".to_string(),
                subtask_id: "ghost".to_string(),
                completed: false,
            },
        );
        assert_eq!(unchanged, s);
    }

    #[test]
    fn increment_task_pomodoro_targets_one_task() {
        let s = state_with_tasks(&["a", "b"]);
        let next = reduce(&s, &Action::IncrementTaskPomodoro("b".to_string()));
        assert_eq!(next.tasks[0].completed_pomodoros, 0);
        assert_eq!(next.tasks[1].completed_pomodoros, 1);
    }

    #[test]
    fn long_break_every_fourth_session() {
        for n in 1..=12 {
            let expected = if n % 4 == 0 {
                Mode::LongBreak
            } else {
                Mode::ShortBreak
            };
            assert_eq!(next_break_mode(n, 4), expected, "session {n}");
        }
    }

    #[test]
    fn zero_interval_never_yields_long_break() {
        assert_eq!(next_break_mode(3, 0), Mode::ShortBreak);
    }

    #[test]
    fn analytics_aggregates() {
        let mut a = task("a");
        a.completed = true;
        a.category = Some("writing".to_string());
        a.priority = Priority::High;
        a.pomodoros = 3;
        a.completed_pomodoros = 2;
        a.duration_min = 50;

        let mut b = task("b");
        b.category = Some("writing".to_string());
        b.priority = Priority::Low;

        let c = task("c");

        let stats = task_analytics(&[a, b, c]);
        assert_eq!(stats.total_tasks, 3);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.total_pomodoros, 5);
        assert_eq!(stats.completed_pomodoros, 2);
        assert_eq!(stats.categories.get("writing"), Some(&2));
        assert_eq!(stats.priorities.high, 1);
        assert_eq!(stats.priorities.medium, 1);
        assert_eq!(stats.priorities.low, 1);
        assert_eq!(stats.productivity_score, 33);
        assert_eq!(stats.estimated_total_min, 100);
        assert_eq!(stats.completed_min, 50);
    }

    #[test]
    fn analytics_empty_list() {
        let stats = task_analytics(&[]);
        assert_eq!(stats.total_tasks, 0);
        assert_eq!(stats.productivity_score, 0);
        assert_eq!(stats.estimated_total_min, 0);
    }

    #[test]
    fn focus_minutes_follow_daily_counter() {
        let settings = Settings::default();
        let stats = Statistics {
            daily_pomodoros: 3,
            completed_tasks: 0,
        };
        assert_eq!(focus_minutes(&stats, &settings), 75);
    }
}
