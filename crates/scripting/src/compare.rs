//! Ordering functions and comparison predicates.
//!
//! A comparison predicate resolves two operands against the current state and
//! feeds them to a binary ordering function:
//!
//! ```rust,ignore
//! // Fire once the player crosses the right edge of the screen
//! compare_with(SCREEN_WIDTH, |w: &World| w.player.x, less());
//! ```
//!
//! Operands are resolved on every evaluation, never at construction time.

/// One side of a comparison.
pub enum Operand<S, T> {
    /// A literal captured at construction.
    Value(T),
    /// A query re-run against the state on every evaluation.
    Query(Box<dyn FnMut(&S) -> T + Send>),
}

impl<S, T> Operand<S, T> {
    /// Wraps a literal value.
    pub fn value(value: T) -> Self {
        Operand::Value(value)
    }

    /// Wraps a state query.
    pub fn query(f: impl FnMut(&S) -> T + Send + 'static) -> Self {
        Operand::Query(Box::new(f))
    }
}

/// Builds a predicate that evaluates `ordering(lhs, rhs)` on resolved operands.
///
/// When both operands are queries, `lhs` is resolved before `rhs`.
pub fn compare<S, T>(
    mut lhs: Operand<S, T>,
    mut rhs: Operand<S, T>,
    ordering: impl Fn(&T, &T) -> bool + Send,
) -> impl FnMut(&S) -> bool + Send
where
    T: Send,
{
    move |state: &S| match (&mut lhs, &mut rhs) {
        (Operand::Value(a), Operand::Value(b)) => ordering(&*a, &*b),
        (Operand::Value(a), Operand::Query(fb)) => ordering(&*a, &fb(state)),
        (Operand::Query(fa), Operand::Value(b)) => ordering(&fa(state), &*b),
        (Operand::Query(fa), Operand::Query(fb)) => {
            let a = fa(state);
            let b = fb(state);
            ordering(&a, &b)
        }
    }
}

/// Compares two literals.
pub fn compare_values<S, T>(
    a: T,
    b: T,
    ordering: impl Fn(&T, &T) -> bool + Send,
) -> impl FnMut(&S) -> bool + Send
where
    T: Send,
{
    compare(Operand::value(a), Operand::value(b), ordering)
}

/// Compares a literal (left) with the result of a state query (right).
pub fn compare_with<S, T>(
    a: T,
    fb: impl FnMut(&S) -> T + Send + 'static,
    ordering: impl Fn(&T, &T) -> bool + Send,
) -> impl FnMut(&S) -> bool + Send
where
    T: Send,
{
    compare(Operand::value(a), Operand::query(fb), ordering)
}

/// Compares the results of two state queries.
pub fn compare_by<S, T>(
    fa: impl FnMut(&S) -> T + Send + 'static,
    fb: impl FnMut(&S) -> T + Send + 'static,
    ordering: impl Fn(&T, &T) -> bool + Send,
) -> impl FnMut(&S) -> bool + Send
where
    T: Send,
{
    compare(Operand::query(fa), Operand::query(fb), ordering)
}

/// `a < b`
pub fn less<T: Ord>() -> fn(&T, &T) -> bool {
    |a, b| a.cmp(b).is_lt()
}

/// `a <= b`
pub fn less_or_equal<T: Ord>() -> fn(&T, &T) -> bool {
    |a, b| a.cmp(b).is_le()
}

/// `a == b`
pub fn equal<T: Ord>() -> fn(&T, &T) -> bool {
    |a, b| a.cmp(b).is_eq()
}

/// `a != b`
pub fn not_equal<T: Ord>() -> fn(&T, &T) -> bool {
    |a, b| a.cmp(b).is_ne()
}

/// `a > b`
pub fn greater<T: Ord>() -> fn(&T, &T) -> bool {
    |a, b| a.cmp(b).is_gt()
}

/// `a >= b`
pub fn greater_or_equal<T: Ord>() -> fn(&T, &T) -> bool {
    |a, b| a.cmp(b).is_ge()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Predicate;

    struct Board {
        left: i32,
        right: i32,
    }

    #[test]
    fn orderings_are_trichotomous() {
        for a in -3..=3 {
            for b in -3..=3 {
                let holds = [less()(&a, &b), equal()(&a, &b), greater()(&a, &b)];
                assert_eq!(holds.iter().filter(|&&h| h).count(), 1, "a={a} b={b}");

                assert_eq!(less_or_equal()(&a, &b), a <= b);
                assert_eq!(greater_or_equal()(&a, &b), a >= b);
                assert_eq!(not_equal()(&a, &b), a != b);
            }
        }
    }

    #[test]
    fn compare_values_ignores_state() {
        let mut p: Predicate<Board> = Box::new(compare_values(1, 2, less()));
        assert!(p(&Board { left: 9, right: 0 }));
    }

    #[test]
    fn compare_with_puts_literal_on_the_left() {
        let mut p = compare_with(5, |b: &Board| b.right, less());
        assert!(p(&Board { left: 0, right: 6 }));
        assert!(!p(&Board { left: 0, right: 5 }));
    }

    #[test]
    fn compare_by_resolves_on_each_call() {
        let mut p = compare_by(|b: &Board| b.left, |b: &Board| b.right, greater());
        assert!(p(&Board { left: 3, right: 1 }));
        assert!(!p(&Board { left: 1, right: 3 }));
    }

    #[test]
    fn compare_query_against_literal() {
        let mut p = compare(
            Operand::query(|b: &Board| b.left + b.right),
            Operand::value(10),
            equal(),
        );
        assert!(p(&Board { left: 4, right: 6 }));
        assert!(!p(&Board { left: 4, right: 7 }));
    }
}
