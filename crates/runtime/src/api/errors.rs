//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from runner lifecycle transitions, worker threads, and the
//! shared state lock so hosts can bubble them up with consistent context.
use std::io;
use std::time::Duration;

use scripting::StateError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runner `{runner}` must construct its scripts before starting")]
    NotConstructed { runner: String },

    #[error("runner `{runner}` has already constructed its scripts")]
    AlreadyConstructed { runner: String },

    #[error("runner `{runner}` is already running")]
    AlreadyRunning { runner: String },

    #[error("runner `{runner}` is not running")]
    NotRunning { runner: String },

    #[error("failed to spawn worker thread for runner `{runner}`")]
    Spawn {
        runner: String,
        #[source]
        source: io::Error,
    },

    #[error("worker thread of runner `{runner}` panicked")]
    WorkerPanicked { runner: String },

    #[error("runner `{runner}` did not stop within {timeout:?}")]
    StopTimeout { runner: String, timeout: Duration },

    #[error("scene did not provide a state while constructing its context")]
    MissingState,

    #[error("context `{context}` has not been started")]
    ContextNotStarted { context: String },

    #[error("context `{context}` has already been started")]
    ContextAlreadyStarted { context: String },

    #[error("context `{context}` is still running and cannot hand off its state")]
    ContextStillRunning { context: String },

    #[error("failed to stop runners {runners:?} while closing the context")]
    ContextCloseFailed { runners: Vec<String> },

    #[error(transparent)]
    State(#[from] StateError),
}

impl RuntimeError {
    /// Returns `true` if the error leaves a worker thread alive.
    pub fn worker_outstanding(&self) -> bool {
        matches!(self, RuntimeError::StopTimeout { .. })
    }
}
