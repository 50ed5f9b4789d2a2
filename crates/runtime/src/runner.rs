//! Named behaviors that run their scripts on a dedicated OS thread.
//!
//! A [`ContextScript`] wraps one [`Behavior`]. The behavior declares its
//! scripts once; afterwards the runner applies them, in order, over and over
//! on its own worker thread until it is stopped:
//!
//! ```text
//! Created --construct_scripts--> Constructed --start--> Running
//!                                                        |   ^
//!                                                   stop |   | resume
//!                                                        v   |
//!                                                       Stopped
//! ```
//!
//! Every script application takes the shared state lock, so one script is
//! atomic with respect to other runners while a pass as a whole is not.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use scripting::{Script, SharedState, StateError};
use tracing::{debug, info, warn};

use crate::api::{Result, RuntimeError};
use crate::config::RunnerConfig;
use crate::events::{EventBus, LifecycleEvent};
use crate::workers::{RunnerMetrics, ScriptWorker};

/// Name given to runners whose behavior does not pick one.
pub const DEFAULT_RUNNER_NAME: &str = "context-script";

/// How often [`ContextScript::stop_timeout`] checks whether the worker exited.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Declares the scripts a runner executes.
///
/// Implemented by application behaviors. Closures taking a
/// `&mut RunnerSetup<S>` implement it too.
pub trait Behavior<S>: Send {
    /// Populates the runner's scripts, thread name and priority.
    ///
    /// Invoked exactly once, before the first start.
    fn construct_scripts(&mut self, setup: &mut RunnerSetup<S>);
}

impl<S, F> Behavior<S> for F
where
    F: FnMut(&mut RunnerSetup<S>) + Send,
{
    fn construct_scripts(&mut self, setup: &mut RunnerSetup<S>) {
        self(setup)
    }
}

/// Collects what a [`Behavior`] declares.
pub struct RunnerSetup<S> {
    name: String,
    priority: i32,
    scripts: Vec<Script<S>>,
    state: SharedState<S>,
}

impl<S> RunnerSetup<S> {
    fn new(state: SharedState<S>) -> Self {
        Self {
            name: DEFAULT_RUNNER_NAME.to_string(),
            priority: 0,
            scripts: Vec::new(),
            state,
        }
    }

    /// Sets the worker thread name.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Sets the scheduling priority of the worker thread.
    ///
    /// The worker applies it to itself when it starts; see
    /// [`scripting::apply_thread_priority`]. A priority the OS rejects is
    /// logged and the worker runs at the default.
    pub fn priority(&mut self, priority: i32) -> &mut Self {
        self.priority = priority;
        self
    }

    /// Appends a script. Scripts run in the order they are added.
    pub fn add_script(&mut self, script: Script<S>) -> &mut Self {
        self.scripts.push(script);
        self
    }

    /// Handle to the shared state, for scripts that spawn their own threads.
    pub fn state(&self) -> SharedState<S> {
        self.state.clone()
    }
}

/// Lifecycle phase of a runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum RunnerPhase {
    /// Scripts not declared yet.
    Created,
    /// Scripts declared, never started.
    Constructed,
    /// A worker thread exists.
    Running,
    /// The worker has been joined.
    Stopped,
}

/// A behavior bound to the shared state and driven by its own worker thread.
pub struct ContextScript<S> {
    behavior: Box<dyn Behavior<S>>,
    state: SharedState<S>,
    config: RunnerConfig,
    events: EventBus,

    name: String,
    priority: i32,
    scripts: Arc<Mutex<Vec<Script<S>>>>,

    phase: RunnerPhase,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<Result<()>>>,
    metrics: Arc<RunnerMetrics>,
}

impl<S: Send + 'static> ContextScript<S> {
    pub fn new(
        behavior: impl Behavior<S> + 'static,
        state: SharedState<S>,
        config: RunnerConfig,
        events: EventBus,
    ) -> Self {
        Self::from_boxed(Box::new(behavior), state, config, events)
    }

    pub(crate) fn from_boxed(
        behavior: Box<dyn Behavior<S>>,
        state: SharedState<S>,
        config: RunnerConfig,
        events: EventBus,
    ) -> Self {
        Self {
            behavior,
            state,
            config,
            events,
            name: DEFAULT_RUNNER_NAME.to_string(),
            priority: 0,
            scripts: Arc::new(Mutex::new(Vec::new())),
            phase: RunnerPhase::Created,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            metrics: Arc::new(RunnerMetrics::new()),
        }
    }

    /// Runs the behavior's declaration hook.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::AlreadyConstructed`] on any call after the first.
    pub fn construct_scripts(&mut self) -> Result<()> {
        if self.phase != RunnerPhase::Created {
            return Err(RuntimeError::AlreadyConstructed {
                runner: self.name.clone(),
            });
        }

        let mut setup = RunnerSetup::new(self.state.clone());
        self.behavior.construct_scripts(&mut setup);

        let RunnerSetup {
            name,
            priority,
            scripts,
            ..
        } = setup;
        debug!(runner = %name, priority, scripts = scripts.len(), "scripts constructed");

        self.name = name;
        self.priority = priority;
        self.scripts = Arc::new(Mutex::new(scripts));
        self.phase = RunnerPhase::Constructed;
        Ok(())
    }

    /// Spawns the worker thread.
    ///
    /// Legal after [`construct_scripts`](Self::construct_scripts), or after a
    /// completed stop.
    pub fn start(&mut self) -> Result<()> {
        match self.phase {
            RunnerPhase::Created => Err(RuntimeError::NotConstructed {
                runner: self.name.clone(),
            }),
            RunnerPhase::Running => Err(RuntimeError::AlreadyRunning {
                runner: self.name.clone(),
            }),
            RunnerPhase::Constructed | RunnerPhase::Stopped => self.spawn_worker(),
        }
    }

    /// Starts a stopped runner again on a fresh thread.
    ///
    /// A runner whose previous worker panicked cannot be resumed: the call
    /// fails with [`RuntimeError::WorkerPanicked`] and nothing is spawned.
    pub fn resume(&mut self) -> Result<()> {
        match self.phase {
            RunnerPhase::Stopped => self.spawn_worker(),
            RunnerPhase::Running => Err(RuntimeError::AlreadyRunning {
                runner: self.name.clone(),
            }),
            RunnerPhase::Created => Err(RuntimeError::NotConstructed {
                runner: self.name.clone(),
            }),
            RunnerPhase::Constructed => Err(RuntimeError::NotRunning {
                runner: self.name.clone(),
            }),
        }
    }

    /// Requests the worker to stop and joins it.
    ///
    /// Blocks until the current pass completes.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::NotRunning`] if there is no worker
    /// - [`RuntimeError::WorkerPanicked`] if a script panicked
    /// - [`RuntimeError::State`] if the worker found the state lock poisoned
    pub fn stop(&mut self) -> Result<()> {
        let handle = self.take_worker()?;
        self.running.store(false, Ordering::Release);
        self.finish(handle)
    }

    /// Like [`stop`](Self::stop), but waits at most `timeout` for the worker.
    ///
    /// On timeout the worker keeps its handle and the runner stays
    /// [`RunnerPhase::Running`]; a later `stop` or `stop_timeout` picks it up
    /// again. A pass is never cut short.
    pub fn stop_timeout(&mut self, timeout: Duration) -> Result<()> {
        let handle = self.take_worker()?;
        self.running.store(false, Ordering::Release);

        let deadline = Instant::now() + timeout;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                warn!(runner = %self.name, ?timeout, "worker did not stop in time");
                self.worker = Some(handle);
                return Err(RuntimeError::StopTimeout {
                    runner: self.name.clone(),
                    timeout,
                });
            }
            thread::sleep(STOP_POLL_INTERVAL);
        }

        self.finish(handle)
    }

    /// Whether the worker is looping. May be stale by the time it returns.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> RunnerPhase {
        self.phase
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn metrics(&self) -> Arc<RunnerMetrics> {
        Arc::clone(&self.metrics)
    }

    fn spawn_worker(&mut self) -> Result<()> {
        // A script that panicked mid-pass leaves both locks poisoned.
        if self.scripts.is_poisoned() {
            return Err(RuntimeError::WorkerPanicked {
                runner: self.name.clone(),
            });
        }
        if self.state.is_poisoned() {
            return Err(StateError::LockPoisoned.into());
        }

        let worker = ScriptWorker {
            name: self.name.clone(),
            scripts: Arc::clone(&self.scripts),
            state: self.state.clone(),
            running: Arc::clone(&self.running),
            metrics: Arc::clone(&self.metrics),
            events: self.events.clone(),
            tick_interval: self.config.tick_interval,
            priority: self.priority,
        };

        // Set before spawning so a fast worker cannot observe a stale false.
        self.running.store(true, Ordering::Release);
        let spawned = thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || worker.run());

        let handle = match spawned {
            Ok(handle) => handle,
            Err(source) => {
                self.running.store(false, Ordering::Release);
                return Err(RuntimeError::Spawn {
                    runner: self.name.clone(),
                    source,
                });
            }
        };

        self.worker = Some(handle);
        self.phase = RunnerPhase::Running;
        info!(runner = %self.name, priority = self.priority, "runner started");
        self.events.publish(LifecycleEvent::RunnerStarted {
            runner: self.name.clone(),
            priority: self.priority,
        });
        Ok(())
    }

    fn take_worker(&mut self) -> Result<JoinHandle<Result<()>>> {
        self.worker.take().ok_or_else(|| RuntimeError::NotRunning {
            runner: self.name.clone(),
        })
    }

    fn finish(&mut self, handle: JoinHandle<Result<()>>) -> Result<()> {
        self.phase = RunnerPhase::Stopped;

        match handle.join() {
            Ok(Ok(())) => {
                let passes = self.metrics.passes();
                info!(runner = %self.name, passes, "runner stopped");
                self.events.publish(LifecycleEvent::RunnerStopped {
                    runner: self.name.clone(),
                    passes,
                });
                Ok(())
            }
            // The worker already logged and published its failure.
            Ok(Err(e)) => Err(e),
            Err(_) => {
                warn!(runner = %self.name, "worker panicked");
                self.events.publish(LifecycleEvent::RunnerFailed {
                    runner: self.name.clone(),
                    reason: "worker panicked".to_string(),
                });
                Err(RuntimeError::WorkerPanicked {
                    runner: self.name.clone(),
                })
            }
        }
    }
}

impl<S> Drop for ContextScript<S> {
    fn drop(&mut self) {
        // Detach: an abandoned worker exits at its next pass boundary.
        self.running.store(false, Ordering::Release);
    }
}
