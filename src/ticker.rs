/*
Tick driver for the countdown.
One Tokio interval task decrements the timer once per second while it is
running. The task is armed and disarmed explicitly after each dispatch;
there is never more than one.
*/

use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use crate::logic;
use crate::models::{Action, Mode};
use crate::store::Store;

pub struct Ticker {
    store: Store,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Ticker {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            handle: Mutex::new(None),
        }
    }

    // Re-evaluate after a state change: arm while (running && time_left > 0),
    // disarm otherwise. A dispatch that leaves the counter at zero while the
    // timer is still marked running finishes the session right here, since no
    // interval task is around to do it.
    pub fn rearm(&self) {
        let snap = self.store.snapshot();
        if snap.timer.is_running && snap.timer.time_left == 0 {
            finish_session(&self.store);
        }

        let snap = self.store.snapshot();
        let should_run = snap.timer.is_running && snap.timer.time_left > 0;

        let mut handle = self.handle.lock().expect("ticker mutex poisoned");
        if handle.as_ref().is_some_and(|h| h.is_finished()) {
            *handle = None;
        }

        match (should_run, handle.is_some()) {
            (true, false) => {
                *handle = Some(tokio::spawn(run(self.store.clone())));
            }
            (false, true) => {
                if let Some(h) = handle.take() {
                    h.abort();
                }
            }
            _ => {}
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.handle
            .lock()
            .expect("ticker mutex poisoned")
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

// The armed countdown loop. Each tick stands for exactly one second of the
// counter; no drift correction.
async fn run(store: Store) {
    let mut ticks = interval(Duration::from_secs(1));
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick of a Tokio interval completes immediately
    ticks.tick().await;

    loop {
        ticks.tick().await;
        if !advance_one_second(&store) {
            break;
        }
    }
}

// One tick: decrement while running, finish the session on reaching zero.
// Returns false once the loop should stop.
pub(crate) fn advance_one_second(store: &Store) -> bool {
    let snap = store.snapshot();
    if !snap.timer.is_running || snap.timer.time_left == 0 {
        return false;
    }

    let left = snap.timer.time_left - 1;
    store.dispatch(&Action::SetTimeLeft(left));
    if left > 0 {
        return true;
    }

    finish_session(store);
    false
}

// Zero reached while running: stop, credit the finished work session, and
// line up the next mode. Breaks always hand control back to work.
fn finish_session(store: &Store) {
    let snap = store.snapshot();
    store.dispatch(&Action::PauseTimer);

    match snap.timer.current_mode {
        Mode::Work => {
            store.dispatch(&Action::IncrementDailyPomodoros);
            if let Some(id) = snap.active_task_id.clone() {
                store.dispatch(&Action::IncrementTaskPomodoro(id));
            }
            let done = store.snapshot().statistics.daily_pomodoros;
            let next = logic::next_break_mode(done, snap.settings.long_break_interval);
            info!(sessions_today = done, next_mode = ?next, "work session finished");
            store.dispatch(&Action::ChangeMode(next));
        }
        Mode::ShortBreak | Mode::LongBreak => {
            info!("break finished");
            store.dispatch(&Action::ChangeMode(Mode::Work));
        }
    }
}
