//! Threaded execution of behavior scripts.
//!
//! This crate runs the scripts built with the `scripting` crate. Each named
//! behavior gets its own worker thread looping over its scripts against one
//! shared state; a [`Context`] owns that state together with all of its
//! runners for the lifetime of one scene.
//!
//! Modules are organized by responsibility:
//! - [`runner`] hosts [`ContextScript`], the per-behavior thread driver
//! - [`context`] owns the state and runners of a scene and hands state over
//! - [`api`] exposes the error and render types hosts interact with
//! - [`events`] publishes lifecycle transitions on a broadcast bus
//! - [`config`] loads pacing and shutdown settings from the environment
//! - `workers` keeps the worker loop internal to the crate
pub mod api;
pub mod config;
pub mod context;
pub mod events;
pub mod runner;

mod workers;

pub use api::{Renderer, Result, RuntimeError, Screen};
pub use config::{RunnerConfig, RuntimeConfig};
pub use context::{Context, ContextBuilder, ContextSetup, ContextState, Scene};
pub use events::{EventBus, LifecycleEvent};
pub use runner::{Behavior, ContextScript, RunnerPhase, RunnerSetup};
pub use workers::{RunnerMetrics, RunnerMetricsSnapshot};
