//! Runtime configuration structures and loaders.

use std::env;
use std::time::Duration;

/// Default capacity of the lifecycle event bus.
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Pacing and shutdown settings applied to every runner of a context.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Sleep between two passes over a runner's scripts. `None` loops
    /// back-to-back.
    pub tick_interval: Option<Duration>,
    /// Upper bound on how long closing a context waits for each runner.
    /// `None` waits for the current pass to finish, however long it takes.
    pub stop_timeout: Option<Duration>,
}

/// Runtime configuration shared by a context and its runners.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub runner: RunnerConfig,
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            runner: RunnerConfig::default(),
            event_buffer_size: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SCRIPT_TICK_INTERVAL_US` - Pause between runner passes in microseconds (default: none)
    /// - `SCRIPT_STOP_TIMEOUT_MS` - Bound on each runner stop in milliseconds (default: unbounded)
    /// - `SCRIPT_EVENT_BUFFER` - Lifecycle event bus capacity (default: 64)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).and_then(|raw| raw.trim().parse::<u64>().ok());
        let mut config = Self::default();

        if let Some(micros) = read("SCRIPT_TICK_INTERVAL_US") {
            config.runner.tick_interval = (micros > 0).then(|| Duration::from_micros(micros));
        }
        if let Some(millis) = read("SCRIPT_STOP_TIMEOUT_MS") {
            config.runner.stop_timeout = Some(Duration::from_millis(millis));
        }
        if let Some(capacity) = read("SCRIPT_EVENT_BUFFER") {
            config.event_buffer_size = usize::try_from(capacity).unwrap_or(usize::MAX).max(1);
        }

        config
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.runner.tick_interval = Some(tick_interval);
        self
    }

    pub fn with_stop_timeout(mut self, stop_timeout: Duration) -> Self {
        self.runner.stop_timeout = Some(stop_timeout);
        self
    }
}
