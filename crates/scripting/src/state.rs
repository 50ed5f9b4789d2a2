//! Synchronized handle to the one mutable state scripts act on.
//!
//! Every runner thread, and every thread spawned by
//! [`thread_script`](crate::thread_script), reaches the state through a clone
//! of the same [`SharedState`]. Access is serialized by a single lock, so a
//! script application observes and mutates the state atomically with respect
//! to other threads.

use std::fmt;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::Script;

/// Errors raised while accessing a [`SharedState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("shared state lock was poisoned by a panicking script")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, StateError>;

/// Cloneable, thread-safe handle to a state value.
pub struct SharedState<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> SharedState<S> {
    /// Wraps a state value.
    pub fn new(state: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Runs `f` with exclusive access to the state.
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> Result<R> {
        let mut guard = self.inner.lock().map_err(|_| StateError::LockPoisoned)?;
        Ok(f(&mut *guard))
    }

    /// Runs `f` with read access to the state.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> Result<R> {
        let guard = self.inner.lock().map_err(|_| StateError::LockPoisoned)?;
        Ok(f(&*guard))
    }

    /// Applies a script to the state under the lock.
    pub fn apply(&self, script: &mut Script<S>) -> Result<()> {
        self.with(|state| script.apply(state))
    }

    /// Returns `true` if a thread panicked while holding the lock.
    pub fn is_poisoned(&self) -> bool {
        self.inner.is_poisoned()
    }

    /// Returns `true` if both handles point at the same state.
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<S: Clone> SharedState<S> {
    /// Copies the current state out of the lock.
    pub fn snapshot(&self) -> Result<S> {
        self.read(S::clone)
    }
}

impl<S> Clone for SharedState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> fmt::Debug for SharedState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedState")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[derive(Clone, Default)]
    struct Tally {
        count: u64,
    }

    #[test]
    fn clones_share_one_value() {
        let state = SharedState::new(Tally::default());
        let other = state.clone();

        other.with(|t| t.count = 3).unwrap();
        assert_eq!(state.read(|t| t.count).unwrap(), 3);
        assert!(state.same_as(&other));
    }

    #[test]
    fn concurrent_writers_lose_nothing() {
        let state = SharedState::new(Tally::default());
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let state = state.clone();
                thread::spawn(move || {
                    for _ in 0..1_000 {
                        state.with(|t| t.count += 1).unwrap();
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(state.snapshot().unwrap().count, 4_000);
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let state = SharedState::new(Tally::default());
        let poisoner = state.clone();
        let _ = thread::spawn(move || {
            let _ = poisoner.with(|t| {
                if t.count == 0 {
                    panic!("script blew up");
                }
            });
        })
        .join();

        assert_eq!(state.read(|t| t.count), Err(StateError::LockPoisoned));
    }
}
