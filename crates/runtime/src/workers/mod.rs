//! Worker threads owned by runners.
//!
//! Internal to the crate: hosts interact with runners through
//! [`ContextScript`](crate::ContextScript) and only observe workers through
//! [`RunnerMetrics`].

mod metrics;
mod script_worker;

pub use metrics::{RunnerMetrics, RunnerMetricsSnapshot};
pub(crate) use script_worker::ScriptWorker;
