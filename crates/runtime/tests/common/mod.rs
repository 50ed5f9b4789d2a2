//! Fixtures shared by the runtime integration tests.
#![allow(dead_code)]

use std::thread;
use std::time::{Duration, Instant};

use runtime::{Behavior, ContextState, RunnerSetup};
use scripting::{Script, SharedState, action};

pub const WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default)]
pub struct Counter {
    pub value: u64,
    pub carried: u64,
    pub by_first: u64,
    pub by_second: u64,
}

impl ContextState for Counter {
    fn construct_state(&mut self, previous: Option<&Self>) {
        self.carried = previous.map_or(0, |p| p.value);
    }

    fn name(&self) -> &str {
        "counter"
    }
}

/// Behavior with one script that bumps `value` on every pass.
pub fn incrementer(name: impl Into<String>) -> impl Behavior<Counter> + 'static {
    let name = name.into();
    move |setup: &mut RunnerSetup<Counter>| {
        setup
            .name(name.clone())
            .priority(1)
            .add_script(Script::always(vec![action(|c: &mut Counter| c.value += 1)]));
    }
}

/// Polls `condition` against the state until it holds or [`WAIT`] expires.
pub fn wait_until(state: &SharedState<Counter>, condition: impl Fn(&Counter) -> bool) {
    let deadline = Instant::now() + WAIT;
    while !state.read(&condition).unwrap() {
        assert!(Instant::now() < deadline, "condition not reached in time");
        thread::sleep(Duration::from_millis(1));
    }
}
