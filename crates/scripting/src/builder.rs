//! Shorthand constructors for building scripts.
//!
//! The boxed aliases need an explicit `Box::new` and, more often than not, a
//! type annotation to coerce a closure into a trait object. These helpers do
//! both, so script trees read as a list of steps:
//!
//! ```rust,ignore
//! Script::new(always(), vec![
//!     action(|w: &mut World| w.frame += 1),
//!     script(predicate(|w: &World| w.frame % 60 == 0), vec![action(blink)]),
//! ]);
//! ```

use crate::{Action, Predicate, Script};

/// Boxes a closure as an [`Action`].
///
/// Shorthand for `Box::new(f) as Action<S>`.
#[inline]
pub fn action<S>(f: impl FnMut(&mut S) + Send + 'static) -> Action<S> {
    Box::new(f)
}

/// Boxes a closure as a [`Predicate`].
///
/// Shorthand for `Box::new(p) as Predicate<S>`.
#[inline]
pub fn predicate<S>(p: impl FnMut(&S) -> bool + Send + 'static) -> Predicate<S> {
    Box::new(p)
}

/// Predicate that always holds.
#[inline]
pub fn always<S>() -> Predicate<S> {
    Box::new(|_: &S| true)
}

/// Predicate that never holds.
#[inline]
pub fn never<S>() -> Predicate<S> {
    Box::new(|_: &S| false)
}

/// Action with no effect.
#[inline]
pub fn nothing<S>() -> Action<S> {
    Box::new(|_: &mut S| {})
}

/// Creates a guarded script and turns it into an action for nesting.
///
/// Shorthand for `Script::new(guard, actions).into_action()`.
#[inline]
pub fn script<S: 'static>(
    guard: impl FnMut(&S) -> bool + Send + 'static,
    actions: Vec<Action<S>>,
) -> Action<S> {
    Script::new(guard, actions).into_action()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Lamp {
        lit: bool,
        toggles: u32,
    }

    #[test]
    fn basic_values() {
        let lamp = Lamp::default();
        assert!(always()(&lamp));
        assert!(!never()(&lamp));

        let mut lamp = Lamp::default();
        nothing()(&mut lamp);
        assert!(!lamp.lit);
        assert_eq!(lamp.toggles, 0);
    }

    #[test]
    fn nested_script_action() {
        let toggle = action(|l: &mut Lamp| {
            l.lit = !l.lit;
            l.toggles += 1;
        });
        let mut outer = Script::always(vec![
            toggle,
            script(|l: &Lamp| l.lit, vec![action(|l: &mut Lamp| l.toggles += 10)]),
        ]);

        let mut lamp = Lamp::default();
        outer.apply(&mut lamp);
        assert!(lamp.lit);
        assert_eq!(lamp.toggles, 11);

        outer.apply(&mut lamp);
        assert!(!lamp.lit);
        assert_eq!(lamp.toggles, 12);
    }

    #[test]
    fn guard_built_from_predicate() {
        let mut lit = predicate(|l: &Lamp| l.lit);
        assert!(lit(&Lamp {
            lit: true,
            toggles: 0
        }));
    }
}
