//! The loop a runner's worker thread executes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use scripting::{Script, SharedState};
use tracing::{debug, error, trace};

use super::RunnerMetrics;
use crate::api::{Result, RuntimeError};
use crate::events::{EventBus, LifecycleEvent};

/// Everything a worker thread needs, moved into the thread on spawn.
pub(crate) struct ScriptWorker<S> {
    pub name: String,
    pub scripts: Arc<Mutex<Vec<Script<S>>>>,
    pub state: SharedState<S>,
    pub running: Arc<AtomicBool>,
    pub metrics: Arc<RunnerMetrics>,
    pub events: EventBus,
    pub tick_interval: Option<Duration>,
    pub priority: i32,
}

/// Clears the running flag when the worker exits, including by panic.
struct RunningFlag<'a>(&'a AtomicBool);

impl Drop for RunningFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S> ScriptWorker<S> {
    /// Runs passes until the running flag is cleared.
    ///
    /// The flag is checked once per pass, so a stop request takes effect at
    /// the next pass boundary and never interrupts a script mid-effect.
    pub fn run(self) -> Result<()> {
        let _flag = RunningFlag(&self.running);
        debug!(runner = %self.name, priority = self.priority, "worker started");
        scripting::apply_thread_priority(self.priority);

        let result = self.drive();
        if let Err(e) = &result {
            error!(runner = %self.name, error = %e, "worker stopped with an error");
            self.events.publish(LifecycleEvent::RunnerFailed {
                runner: self.name.clone(),
                reason: e.to_string(),
            });
        }
        result
    }

    fn drive(&self) -> Result<()> {
        let mut scripts = self
            .scripts
            .lock()
            .map_err(|_| RuntimeError::WorkerPanicked {
                runner: self.name.clone(),
            })?;

        while self.running.load(Ordering::Acquire) {
            let started = Instant::now();
            for script in scripts.iter_mut() {
                self.state.apply(script)?;
            }
            let elapsed = started.elapsed();
            self.metrics.record_pass(elapsed, scripts.len());
            trace!(runner = %self.name, ?elapsed, "pass complete");

            match self.tick_interval {
                Some(interval) => thread::sleep(interval),
                None => thread::yield_now(),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use scripting::action;

    use super::*;

    fn worker(scripts: Vec<Script<u32>>, state: SharedState<u32>) -> ScriptWorker<u32> {
        ScriptWorker {
            name: "test-worker".to_string(),
            scripts: Arc::new(Mutex::new(scripts)),
            state,
            running: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(RunnerMetrics::new()),
            events: EventBus::new(),
            tick_interval: None,
            priority: 0,
        }
    }

    #[test]
    fn exits_when_scripts_clear_the_flag() {
        let state = SharedState::new(0_u32);
        let w = worker(Vec::new(), state.clone());
        let running = Arc::clone(&w.running);
        let metrics = Arc::clone(&w.metrics);

        // The script itself requests the stop after three passes.
        let stopper = Arc::clone(&running);
        let scripts = vec![Script::always(vec![action(move |n: &mut u32| {
            *n += 1;
            if *n == 3 {
                stopper.store(false, Ordering::Release);
            }
        })])];
        *w.scripts.lock().unwrap() = scripts;

        w.run().unwrap();
        assert_eq!(state.snapshot().unwrap(), 3);
        assert_eq!(metrics.passes(), 3);
        assert!(!running.load(Ordering::Acquire));
    }

    #[test]
    fn poisoned_state_ends_the_worker() {
        let state = SharedState::new(0_u32);
        let poisoner = state.clone();
        let _ = thread::spawn(move || {
            let _ = poisoner.with(|n| {
                if *n == 0 {
                    panic!("poison");
                }
            });
        })
        .join();

        let w = worker(vec![Script::always(Vec::new())], state);
        let running = Arc::clone(&w.running);
        let mut events = w.events.subscribe();

        assert!(matches!(w.run(), Err(RuntimeError::State(_))));
        assert!(!running.load(Ordering::Acquire));
        assert!(events.try_recv().unwrap().is_failure());
    }
}
