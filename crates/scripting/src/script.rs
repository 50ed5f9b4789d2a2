//! The guarded script evaluator.
//!
//! A [`Script`] pairs an optional guard with a body. Applying it evaluates the
//! guard exactly once and, depending on the body, runs a sequence of actions,
//! picks a branch, or loops. Because [`Script::into_action`] turns a script
//! into an ordinary [`Action`], scripts nest to any depth:
//!
//! ```rust,ignore
//! Script::new(is_night, vec![
//!     action(dim_lights),
//!     Script::new(player_outside, vec![action(spawn_wolves)]).into_action(),
//! ]);
//! ```

use crate::{Action, Predicate};

/// What a script does once its guard has been consulted.
enum Body<S> {
    /// Runs every action in order when the guard holds.
    Sequence(Vec<Action<S>>),
    /// Runs exactly one of the two actions per application.
    Branch {
        on_true: Action<S>,
        on_false: Action<S>,
    },
    /// Re-runs the action for as long as the guard holds.
    Loop(Action<S>),
    /// A self-contained effect, run when the guard holds.
    Effect(Action<S>),
}

/// A guarded composite action.
///
/// # Semantics
///
/// - The guard is evaluated once per application (per iteration for loops)
/// - Actions run strictly left to right against the same state
/// - There is no rollback: a panic half-way leaves earlier mutations in place
pub struct Script<S> {
    guard: Option<Predicate<S>>,
    body: Body<S>,
}

impl<S> Script<S> {
    /// Creates a script that runs `actions` whenever `guard` holds.
    pub fn new(guard: impl FnMut(&S) -> bool + Send + 'static, actions: Vec<Action<S>>) -> Self {
        Self {
            guard: Some(Box::new(guard)),
            body: Body::Sequence(actions),
        }
    }

    /// Creates a script without a guard: its actions run on every application.
    pub fn always(actions: Vec<Action<S>>) -> Self {
        Self {
            guard: None,
            body: Body::Sequence(actions),
        }
    }

    pub(crate) fn branch(guard: Predicate<S>, on_true: Action<S>, on_false: Action<S>) -> Self {
        Self {
            guard: Some(guard),
            body: Body::Branch { on_true, on_false },
        }
    }

    pub(crate) fn looping(guard: Predicate<S>, action: Action<S>) -> Self {
        Self {
            guard: Some(guard),
            body: Body::Loop(action),
        }
    }

    pub(crate) fn effect(action: Action<S>) -> Self {
        Self {
            guard: None,
            body: Body::Effect(action),
        }
    }

    /// Number of actions directly owned by this script.
    pub fn len(&self) -> usize {
        match &self.body {
            Body::Sequence(actions) => actions.len(),
            Body::Branch { .. } => 2,
            Body::Loop(_) | Body::Effect(_) => 1,
        }
    }

    /// Returns `true` if the script owns no actions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Applies the script to `state`.
    pub fn apply(&mut self, state: &mut S) {
        let Self { guard, body } = self;

        match body {
            Body::Sequence(actions) => {
                if passes(guard, state) {
                    for action in actions.iter_mut() {
                        action(state);
                    }
                }
            }
            Body::Branch { on_true, on_false } => {
                if passes(guard, state) {
                    on_true(state);
                } else {
                    on_false(state);
                }
            }
            Body::Loop(action) => {
                while passes(guard, state) {
                    action(state);
                }
            }
            Body::Effect(action) => {
                if passes(guard, state) {
                    action(state);
                }
            }
        }
    }

    /// Turns the script into an action so it can sit inside another script.
    pub fn into_action(mut self) -> Action<S>
    where
        S: 'static,
    {
        Box::new(move |state: &mut S| self.apply(state))
    }
}

/// An absent guard always passes.
fn passes<S>(guard: &mut Option<Predicate<S>>, state: &S) -> bool {
    guard.as_mut().is_none_or(|p| p(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action;

    #[derive(Default)]
    struct Journal {
        entries: Vec<&'static str>,
        enabled: bool,
    }

    fn write(entry: &'static str) -> Action<Journal> {
        action(move |j: &mut Journal| j.entries.push(entry))
    }

    fn enabled(j: &Journal) -> bool {
        j.enabled
    }

    #[test]
    fn false_guard_performs_no_mutation() {
        let mut script = Script::new(enabled, vec![write("a1"), write("a2")]);
        let mut journal = Journal::default();

        script.apply(&mut journal);
        assert!(journal.entries.is_empty());
    }

    #[test]
    fn true_guard_runs_actions_in_order() {
        let mut script = Script::new(enabled, vec![write("a1"), write("a2")]);
        let mut journal = Journal {
            enabled: true,
            ..Journal::default()
        };

        script.apply(&mut journal);
        assert_eq!(journal.entries, ["a1", "a2"]);
    }

    #[test]
    fn guard_is_evaluated_once_per_application() {
        // The first action flips the guard; the second must still run.
        let mut script = Script::new(
            enabled,
            vec![action(|j: &mut Journal| j.enabled = false), write("after")],
        );
        let mut journal = Journal {
            enabled: true,
            ..Journal::default()
        };

        script.apply(&mut journal);
        assert_eq!(journal.entries, ["after"]);
        assert!(!journal.enabled);
    }

    #[test]
    fn unguarded_script_always_runs() {
        let mut script = Script::always(vec![write("tick")]);
        let mut journal = Journal::default();

        script.apply(&mut journal);
        script.apply(&mut journal);
        assert_eq!(journal.entries, ["tick", "tick"]);
    }

    #[test]
    fn scripts_nest() {
        let inner = Script::new(|j: &Journal| j.entries.len() == 1, vec![write("inner")]);
        let mut outer = Script::always(vec![write("outer"), inner.into_action(), write("tail")]);
        let mut journal = Journal::default();

        outer.apply(&mut journal);
        assert_eq!(journal.entries, ["outer", "inner", "tail"]);
    }

    #[test]
    fn empty_script_is_a_no_op() {
        let mut script: Script<Journal> = Script::always(Vec::new());
        let mut journal = Journal::default();

        script.apply(&mut journal);
        assert!(script.is_empty());
        assert!(journal.entries.is_empty());
    }
}
