//! Host application configuration.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use runtime::Screen;

/// Settings of the host window and its frame loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Pause between two frames of the main loop.
    pub frame_interval: Duration,
    /// Total run time. `None` runs until interrupted.
    pub run_for: Option<Duration>,
    pub session_id: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub screen: Screen,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            run_for: None,
            session_id: None,
            log_dir: None,
            screen: Screen::new(800, 480),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SCRIPTURE_FRAME_MS` - Frame interval in milliseconds (default: 16)
    /// - `SCRIPTURE_RUN_SECS` - Stop after this many seconds (default: run until Ctrl-C)
    /// - `SCRIPTURE_SESSION_ID` - Session name for the log directory (default: timestamp)
    /// - `SCRIPTURE_LOG_DIR` - Log root directory (default: platform cache dir)
    /// - `SCRIPTURE_SCREEN_WIDTH` / `SCRIPTURE_SCREEN_HEIGHT` - Surface size (default: 800x480)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(millis) = read::<u64>(&lookup, "SCRIPTURE_FRAME_MS") {
            config.frame_interval = Duration::from_millis(millis.max(1));
        }
        if let Some(secs) = read::<u64>(&lookup, "SCRIPTURE_RUN_SECS") {
            config.run_for = Some(Duration::from_secs(secs));
        }
        if let Some(session_id) = lookup("SCRIPTURE_SESSION_ID").filter(|s| !s.trim().is_empty()) {
            config.session_id = Some(session_id);
        }
        if let Some(dir) = lookup("SCRIPTURE_LOG_DIR").filter(|s| !s.trim().is_empty()) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(width) = read::<u32>(&lookup, "SCRIPTURE_SCREEN_WIDTH") {
            config.screen.width = width.max(1);
        }
        if let Some(height) = read::<u32>(&lookup, "SCRIPTURE_SCREEN_HEIGHT") {
            config.screen.height = height.max(1);
        }

        config
    }
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}
