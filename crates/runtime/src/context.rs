//! Scene-scoped owner of one shared state and its runners.
//!
//! A [`Scene`] describes what a context holds: the initial state and the
//! behaviors that act on it. [`Context`] turns that description into running
//! threads and tears them down again. When the host moves to the next scene,
//! the new context reads the closed context's state while constructing its
//! own, which is how values such as a score survive the switch.

use scripting::SharedState;
use tracing::{debug, info, warn};

use crate::api::{Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{EventBus, LifecycleEvent};
use crate::runner::{Behavior, ContextScript, RunnerPhase};

/// Contract for the application's state type.
pub trait ContextState: Send + 'static {
    /// Prepares the state when its context starts.
    ///
    /// `previous` is the state of the context this one takes over from, if
    /// any.
    fn construct_state(&mut self, previous: Option<&Self>);

    /// Name used in logs and lifecycle events.
    fn name(&self) -> &str;
}

/// Describes the content of a context.
pub trait Scene<S: ContextState>: Send {
    /// Provides the initial state and registers the runner behaviors.
    ///
    /// Invoked once, by [`ContextBuilder::build`].
    fn construct_context(&mut self, setup: &mut ContextSetup<S>);

    /// Per-frame hook driven by the host's main loop.
    fn update_context(&mut self, _state: &SharedState<S>) {}
}

/// Collects what a [`Scene`] declares.
pub struct ContextSetup<S> {
    state: Option<S>,
    behaviors: Vec<Box<dyn Behavior<S>>>,
}

impl<S> ContextSetup<S> {
    /// Sets the state the context will own.
    pub fn state(&mut self, state: S) -> &mut Self {
        self.state = Some(state);
        self
    }

    /// Registers a runner. Runners start in registration order.
    pub fn runner(&mut self, behavior: impl Behavior<S> + 'static) -> &mut Self {
        self.behaviors.push(Box::new(behavior));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContextPhase {
    Built,
    Running,
    /// A close left runners whose workers did not stop in time.
    Closing,
    Closed,
}

/// Builder for [`Context`].
pub struct ContextBuilder<S: ContextState> {
    scene: Box<dyn Scene<S>>,
    config: RuntimeConfig,
    events: Option<EventBus>,
}

impl<S: ContextState> ContextBuilder<S> {
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Publishes lifecycle events on `events` instead of a private bus.
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Runs the scene's construction hook and binds every runner to the
    /// resulting state. Nothing is started yet.
    pub fn build(self) -> Result<Context<S>> {
        let Self {
            mut scene,
            config,
            events,
        } = self;
        let events = events.unwrap_or_else(|| EventBus::with_capacity(config.event_buffer_size));

        let mut setup = ContextSetup {
            state: None,
            behaviors: Vec::new(),
        };
        scene.construct_context(&mut setup);

        let state = setup.state.ok_or(RuntimeError::MissingState)?;
        let name = state.name().to_string();
        let state = SharedState::new(state);

        let runners = setup
            .behaviors
            .into_iter()
            .map(|behavior| {
                ContextScript::from_boxed(
                    behavior,
                    state.clone(),
                    config.runner.clone(),
                    events.clone(),
                )
            })
            .collect::<Vec<_>>();

        debug!(context = %name, runners = runners.len(), "context built");

        Ok(Context {
            name,
            scene,
            state,
            runners,
            config,
            events,
            phase: ContextPhase::Built,
        })
    }
}

/// Owns the state and the runners of one scene.
pub struct Context<S: ContextState> {
    name: String,
    scene: Box<dyn Scene<S>>,
    state: SharedState<S>,
    runners: Vec<ContextScript<S>>,
    config: RuntimeConfig,
    events: EventBus,
    phase: ContextPhase,
}

impl<S: ContextState> Context<S> {
    pub fn builder(scene: impl Scene<S> + 'static) -> ContextBuilder<S> {
        ContextBuilder {
            scene: Box::new(scene),
            config: RuntimeConfig::default(),
            events: None,
        }
    }

    /// Prepares the state, declares every runner's scripts and starts them.
    ///
    /// If a runner fails to start, the runners already started are stopped
    /// again, in reverse order, before the error is returned.
    pub fn start_context(&mut self, previous: Option<&S>) -> Result<()> {
        if self.phase != ContextPhase::Built {
            return Err(RuntimeError::ContextAlreadyStarted {
                context: self.name.clone(),
            });
        }

        self.state.with(|state| state.construct_state(previous))?;
        for runner in &mut self.runners {
            runner.construct_scripts()?;
        }

        for index in 0..self.runners.len() {
            if let Err(e) = self.runners[index].start() {
                warn!(
                    context = %self.name,
                    runner = %self.runners[index].name(),
                    error = %e,
                    "runner failed to start, rolling back"
                );
                for started in self.runners[..index].iter_mut().rev() {
                    if let Err(stop_err) = started.stop() {
                        warn!(runner = %started.name(), error = %stop_err, "rollback stop failed");
                    }
                }
                return Err(e);
            }
        }

        self.phase = ContextPhase::Running;
        info!(context = %self.name, runners = self.runners.len(), "context started");
        self.events.publish(LifecycleEvent::ContextStarted {
            context: self.name.clone(),
            runners: self.runners.len(),
        });
        Ok(())
    }

    /// Starts this context from the state of a closed context.
    ///
    /// A previous context that is running, or whose close left a worker
    /// behind, is rejected with [`RuntimeError::ContextStillRunning`]: that
    /// worker could still mutate the state after it has been handed over.
    pub fn hand_off_from(&mut self, previous: &Context<S>) -> Result<()> {
        if previous.is_running() || previous.has_outstanding_runners() {
            return Err(RuntimeError::ContextStillRunning {
                context: previous.name.clone(),
            });
        }

        debug!(from = %previous.name, to = %self.name, "handing off state");
        previous
            .state
            .read(|prev| self.start_context(Some(prev)))?
    }

    /// Runs the scene's per-frame hook.
    pub fn update_context(&mut self) -> Result<()> {
        if self.phase != ContextPhase::Running {
            return Err(RuntimeError::ContextNotStarted {
                context: self.name.clone(),
            });
        }
        self.scene.update_context(&self.state);
        Ok(())
    }

    /// Stops every running runner.
    ///
    /// Every runner is attempted even if an earlier one fails. Each stop is
    /// bounded by the configured stop timeout, if any. The context is closed
    /// once no runner has a worker left; until then a later call retries the
    /// runners that timed out. Closing an already closed context does nothing.
    pub fn close_context(&mut self) -> Result<()> {
        if self.phase == ContextPhase::Closed {
            return Ok(());
        }

        let timeout = self.config.runner.stop_timeout;
        let mut failed = Vec::new();
        for runner in &mut self.runners {
            if runner.phase() != RunnerPhase::Running {
                continue;
            }

            let stopped = match timeout {
                Some(timeout) => runner.stop_timeout(timeout),
                None => runner.stop(),
            };
            if let Err(e) = stopped {
                warn!(
                    context = %self.name,
                    runner = %runner.name(),
                    error = %e,
                    detached = e.worker_outstanding(),
                    "runner did not stop cleanly"
                );
                failed.push(runner.name().to_string());
            }
        }

        if self.has_outstanding_runners() {
            self.phase = ContextPhase::Closing;
            warn!(context = %self.name, "context close incomplete, workers still out");
        } else {
            self.phase = ContextPhase::Closed;
            info!(context = %self.name, failed = failed.len(), "context closed");
            self.events.publish(LifecycleEvent::ContextClosed {
                context: self.name.clone(),
                failed: failed.clone(),
            });
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(RuntimeError::ContextCloseFailed { runners: failed })
        }
    }

    /// Live state, for rendering and inspection.
    pub fn state(&self) -> &SharedState<S> {
        &self.state
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn runners(&self) -> &[ContextScript<S>] {
        &self.runners
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Returns `true` between a successful start and the next close attempt.
    pub fn is_running(&self) -> bool {
        self.phase == ContextPhase::Running
    }

    /// Returns `true` if a runner still has a worker thread, typically one
    /// whose bounded stop timed out.
    pub fn has_outstanding_runners(&self) -> bool {
        self.runners
            .iter()
            .any(|runner| runner.phase() == RunnerPhase::Running)
    }
}
