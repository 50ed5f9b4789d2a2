//! Control-flow scripts: branching, looping, iteration and spawning.
//!
//! Each constructor returns an ordinary [`Script`], so control flow nests
//! inside sequences and other control flow through [`Script::into_action`].

use std::sync::{Arc, Mutex};
use std::thread;

use tracing::{debug, error};

use crate::{Action, Script, SharedState, apply_thread_priority};

/// Applies `on_true` when `p` holds and `on_false` otherwise.
///
/// Exactly one branch runs per application. A [`Script`] branch is passed
/// through [`Script::into_action`].
pub fn else_script<S: 'static>(
    p: impl FnMut(&S) -> bool + Send + 'static,
    on_true: impl FnMut(&mut S) + Send + 'static,
    on_false: impl FnMut(&mut S) + Send + 'static,
) -> Script<S> {
    Script::branch(Box::new(p), Box::new(on_true), Box::new(on_false))
}

/// Applies `body` for as long as `p` holds.
///
/// `p` is re-evaluated before every iteration. A predicate that never turns
/// false makes the application never return.
pub fn while_script<S: 'static>(
    p: impl FnMut(&S) -> bool + Send + 'static,
    body: impl FnMut(&mut S) + Send + 'static,
) -> Script<S> {
    Script::looping(Box::new(p), Box::new(body))
}

/// Applies `f(i)` for every `i` in `0..range`, ascending.
///
/// `f` builds the action for each index afresh on every application.
pub fn for_range<S: 'static>(
    range: usize,
    mut f: impl FnMut(usize) -> Action<S> + Send + 'static,
) -> Script<S> {
    Script::effect(Box::new(move |state: &mut S| {
        for i in 0..range {
            let mut step = f(i);
            step(state);
        }
    }))
}

/// Applies `f(item)` for every element of `items`, in iteration order.
pub fn for_each<S, T>(
    items: impl IntoIterator<Item = T>,
    mut f: impl FnMut(&T) -> Action<S> + Send + 'static,
) -> Script<S>
where
    S: 'static,
    T: Send + 'static,
{
    let items: Vec<T> = items.into_iter().collect();
    Script::effect(Box::new(move |state: &mut S| {
        for item in &items {
            let mut step = f(item);
            step(state);
        }
    }))
}

/// Spawns a named thread that applies `script` once to the shared state.
///
/// Every application of the returned script starts a new thread; nothing
/// joins it. The state passed to the application itself is not touched, the
/// spawned thread takes the lock on `state` on its own. `priority` is applied
/// to the spawned thread through [`apply_thread_priority`]; a priority the OS
/// rejects leaves the thread at its default.
///
/// Spawn failures are logged and swallowed.
pub fn thread_script<S>(
    name: impl Into<String>,
    priority: i32,
    state: SharedState<S>,
    script: Script<S>,
) -> Script<S>
where
    S: Send + 'static,
{
    let name = name.into();
    let script = Arc::new(Mutex::new(script));

    Script::effect(Box::new(move |_: &mut S| {
        let state = state.clone();
        let script = Arc::clone(&script);
        let thread_name = name.clone();

        let spawned = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                debug!(thread = %thread_name, priority, "script thread started");
                apply_thread_priority(priority);
                let Ok(mut script) = script.lock() else {
                    error!(thread = %thread_name, "script thread found its script poisoned");
                    return;
                };
                if let Err(e) = state.apply(&mut script) {
                    error!(thread = %thread_name, error = %e, "script thread failed");
                }
            });

        if let Err(e) = spawned {
            error!(thread = %name, error = %e, "failed to spawn script thread");
        }
    }))
}
