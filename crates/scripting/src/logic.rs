//! Logical predicate combinators.
//!
//! [`not`], [`and`], [`or`], [`all`] and [`any`] are pure: their result depends
//! only on the state they are applied to. [`once`] and [`forever`] are latches
//! whose answer also depends on what they answered before.

use crate::Predicate;

/// Negates a predicate.
pub fn not<S>(mut p: impl FnMut(&S) -> bool + Send) -> impl FnMut(&S) -> bool + Send {
    move |state: &S| !p(state)
}

/// Short-circuiting conjunction of two predicates.
///
/// `p2` is not evaluated when `p1` is false.
pub fn and<S>(
    mut p1: impl FnMut(&S) -> bool + Send,
    mut p2: impl FnMut(&S) -> bool + Send,
) -> impl FnMut(&S) -> bool + Send {
    move |state: &S| p1(state) && p2(state)
}

/// Short-circuiting disjunction of two predicates.
///
/// `p2` is not evaluated when `p1` is true.
pub fn or<S>(
    mut p1: impl FnMut(&S) -> bool + Send,
    mut p2: impl FnMut(&S) -> bool + Send,
) -> impl FnMut(&S) -> bool + Send {
    move |state: &S| p1(state) || p2(state)
}

/// Conjunction over any number of predicates.
///
/// Predicates are evaluated in order until one is false.
///
/// # Panics
///
/// Panics if `predicates` is empty.
pub fn all<S>(mut predicates: Vec<Predicate<S>>) -> impl FnMut(&S) -> bool + Send {
    assert!(
        !predicates.is_empty(),
        "all() must have at least one predicate"
    );
    move |state: &S| predicates.iter_mut().all(|p| p(state))
}

/// Disjunction over any number of predicates.
///
/// Predicates are evaluated in order until one is true.
///
/// # Panics
///
/// Panics if `predicates` is empty.
pub fn any<S>(mut predicates: Vec<Predicate<S>>) -> impl FnMut(&S) -> bool + Send {
    assert!(
        !predicates.is_empty(),
        "any() must have at least one predicate"
    );
    move |state: &S| predicates.iter_mut().any(|p| p(state))
}

/// Memory of a latch predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Latch {
    /// Waiting for the inner predicate to become true.
    #[default]
    Armed,
    /// The inner predicate has been seen true.
    Fired,
}

impl Latch {
    /// Returns `true` if the latch has fired.
    #[inline]
    pub fn is_fired(self) -> bool {
        matches!(self, Latch::Fired)
    }
}

/// Rising-edge detector.
///
/// Returns true on the evaluation where `p` turns true while the latch is
/// armed. Every other evaluation returns false and re-arms the latch; while
/// fired, `p` itself is skipped. Inner values `[F, F, T, T, F, T]` therefore
/// yield `[F, F, T, F, F, T]`.
///
/// The returned closure owns its latch. It is not `Clone`, so one instance
/// can only ever sit in one script tree.
pub fn once<S>(mut p: impl FnMut(&S) -> bool + Send) -> impl FnMut(&S) -> bool + Send {
    let mut latch = Latch::Armed;
    move |state: &S| {
        if latch == Latch::Armed && p(state) {
            latch = Latch::Fired;
            return true;
        }
        latch = Latch::Armed;
        false
    }
}

/// Sticky predicate: true forever after `p` has been true once.
///
/// Inner values `[F, F, T, F, F]` yield `[F, F, T, T, T]`. After firing, `p`
/// is no longer evaluated.
pub fn forever<S>(mut p: impl FnMut(&S) -> bool + Send) -> impl FnMut(&S) -> bool + Send {
    let mut latch = Latch::Armed;
    move |state: &S| {
        if latch.is_fired() || p(state) {
            latch = Latch::Fired;
            return true;
        }
        false
    }
}
