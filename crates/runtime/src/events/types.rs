//! Lifecycle events published by contexts and runners.

use serde::{Deserialize, Serialize};

/// A lifecycle transition of a context or one of its runners.
///
/// Serialized with an internal `kind` tag so hosts can log one JSON object
/// per event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// Every runner of the context is running.
    ContextStarted { context: String, runners: usize },
    /// The context stopped its runners. `failed` lists runners that did not
    /// stop cleanly.
    ContextClosed { context: String, failed: Vec<String> },
    /// A runner's worker thread was spawned.
    RunnerStarted { runner: String, priority: i32 },
    /// A runner's worker thread exited cleanly.
    RunnerStopped { runner: String, passes: u64 },
    /// A runner's worker thread ended with an error or a panic.
    RunnerFailed { runner: String, reason: String },
}

impl LifecycleEvent {
    /// Name of the context or runner the event is about.
    pub fn subject(&self) -> &str {
        match self {
            LifecycleEvent::ContextStarted { context, .. }
            | LifecycleEvent::ContextClosed { context, .. } => context,
            LifecycleEvent::RunnerStarted { runner, .. }
            | LifecycleEvent::RunnerStopped { runner, .. }
            | LifecycleEvent::RunnerFailed { runner, .. } => runner,
        }
    }

    /// Returns `true` for events that report a failure.
    pub fn is_failure(&self) -> bool {
        match self {
            LifecycleEvent::RunnerFailed { .. } => true,
            LifecycleEvent::ContextClosed { failed, .. } => !failed.is_empty(),
            _ => false,
        }
    }
}
