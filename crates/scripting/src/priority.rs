//! Scheduling priorities for script threads.
//!
//! Priorities are small positive integers, higher meaning more urgent. They
//! map onto the cross-platform scale of the `thread-priority` crate; zero and
//! negative values leave the thread at the OS default.

use thread_priority::{ThreadPriority, ThreadPriorityValue, set_current_thread_priority};
use tracing::debug;

/// Top of the cross-platform priority scale.
const MAX_LEVEL: i32 = 99;

/// Maps a priority onto the cross-platform scale, `None` for the OS default.
pub fn priority_level(priority: i32) -> Option<u8> {
    (priority > 0).then(|| priority.min(MAX_LEVEL) as u8)
}

/// Applies `priority` to the calling thread.
///
/// Returns `true` if the OS accepted it. A rejected priority, for instance
/// one an unprivileged process may not raise to, is logged and the thread
/// keeps running at its current priority.
pub fn apply_thread_priority(priority: i32) -> bool {
    let Some(level) = priority_level(priority) else {
        return false;
    };
    let value = match ThreadPriorityValue::try_from(level) {
        Ok(value) => value,
        Err(e) => {
            debug!(priority, error = ?e, "priority outside the supported scale");
            return false;
        }
    };

    match set_current_thread_priority(ThreadPriority::Crossplatform(value)) {
        Ok(()) => {
            debug!(priority, "thread priority applied");
            true
        }
        Err(e) => {
            debug!(priority, error = ?e, "thread priority not applied");
            false
        }
    }
}
