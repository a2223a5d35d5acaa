/*
In-memory state store.
The aggregate state lives behind one mutex. Every mutation funnels through
dispatch, which swaps in the value produced by logic::reduce; nothing ever
mutates the held state in place, so snapshots never see a half-applied
transition.
*/

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::logic;
use crate::models::{Action, PomodoroState, Settings};
use crate::ticker::Ticker;

#[derive(Clone)]
pub struct Store {
    state: Arc<Mutex<PomodoroState>>,
}

impl Store {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: Arc::new(Mutex::new(logic::initial_state(settings))),
        }
    }

    // Apply one action. Holding the lock across reduce serializes every
    // dispatch path.
    pub fn dispatch(&self, action: &Action) {
        let mut state = self.state.lock().expect("state mutex poisoned");
        debug!(action = action.kind(), "dispatch");
        *state = logic::reduce(&state, action);
    }

    // Read-only copy of the current state.
    pub fn snapshot(&self) -> PomodoroState {
        self.state.lock().expect("state mutex poisoned").clone()
    }
}

// Shared by every route handler. dispatch() is the single entry point for
// transitions requested over HTTP: it applies the action, then lets the
// ticker re-evaluate whether the countdown task should be armed.
pub struct AppState {
    pub store: Store,
    pub ticker: Ticker,
}

impl AppState {
    pub fn new(settings: Settings) -> Arc<Self> {
        let store = Store::new(settings);
        let ticker = Ticker::new(store.clone());
        Arc::new(Self { store, ticker })
    }

    pub fn dispatch(&self, action: &Action) {
        self.store.dispatch(action);
        self.ticker.rearm();
    }
}
