//! Single-argument transforms and the generic combinators over them.
//!
//! Every building block of a script is a closure taking one argument.
//! [`Predicate`] and [`Action`] are the two state-facing specializations;
//! [`Function`] is the general boxed form used where heterogeneous
//! transforms have to live in one collection.

/// A boxed transform from `A` to `T`.
pub type Function<A, T> = Box<dyn FnMut(A) -> T + Send>;

/// A boxed query over the state that answers yes or no.
///
/// Predicates must not change the state. The latch combinators
/// ([`once`](crate::once), [`forever`](crate::forever)) keep private memory
/// but still leave the state untouched.
pub type Predicate<S> = Box<dyn FnMut(&S) -> bool + Send>;

/// A boxed effect on the state.
pub type Action<S> = Box<dyn FnMut(&mut S) + Send>;

/// Chains two transforms: the result maps `a` to `f2(f1(a))`.
pub fn compose<A, B, T>(
    mut f2: impl FnMut(B) -> T + Send,
    mut f1: impl FnMut(A) -> B + Send,
) -> impl FnMut(A) -> T + Send {
    move |arg: A| f2(f1(arg))
}

/// Builds a transform that ignores its argument and always yields `value`.
pub fn constant<A, T>(value: T) -> impl FnMut(A) -> T + Send
where
    T: Clone + Send,
{
    move |_: A| value.clone()
}

/// Swaps the argument order of a binary function.
///
/// `flip(f)(b, a) == f(a, b)`.
pub fn flip<A, B, T>(mut f: impl FnMut(A, B) -> T + Send) -> impl FnMut(B, A) -> T + Send {
    move |b: B, a: A| f(a, b)
}

/// Identity over transforms: the returned function hands back the function
/// it is given, so `applicate()(f)(a) == f(a)`.
pub fn applicate<A, T>() -> impl FnMut(Function<A, T>) -> Function<A, T> + Send {
    |f: Function<A, T>| f
}

/// Folds the results of several transforms with a binary operator.
///
/// The result maps `a` to `operator(...operator(operator(f1(a), f2(a)), f3(a))..., fn(a))`.
/// Transforms are evaluated left to right, each exactly once per call.
///
/// # Panics
///
/// Panics if fewer than two transforms are given. Folding a single value is
/// meaningless and indicates a construction error.
pub fn on<A, B>(
    mut operator: impl FnMut(B, B) -> B + Send,
    mut fs: Vec<Function<A, B>>,
) -> impl FnMut(A) -> B + Send
where
    A: Clone,
{
    assert!(fs.len() >= 2, "on() needs at least two functions to fold");

    move |arg: A| {
        let (seed, rest) = fs.split_at_mut(2);
        let first = (seed[0])(arg.clone());
        let second = (seed[1])(arg.clone());
        let mut acc = operator(first, second);
        for f in rest {
            acc = operator(acc, f(arg.clone()));
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_applies_inner_first() {
        let mut f = compose(|x: i32| x * 10, |x: i32| x + 1);
        assert_eq!(f(2), 30);

        let inner = |x: i32| x + 1;
        let outer = |x: i32| x * 10;
        for a in -5..5 {
            let expected = outer(inner(a));
            assert_eq!(f(a), expected);
        }
    }

    #[test]
    fn constant_ignores_argument() {
        let mut f = constant::<&str, _>(7_u8);
        assert_eq!(f("anything"), 7);
        assert_eq!(f(""), 7);
    }

    #[test]
    fn flip_swaps_arguments() {
        let mut minus = flip(|a: i32, b: i32| a - b);
        assert_eq!(minus(1, 10), 9);
    }

    #[test]
    fn applicate_returns_the_same_function() {
        let mut identity = applicate::<i32, i32>();
        let mut f = identity(Box::new(|x: i32| x * x));
        assert_eq!(f(4), 16);
    }

    #[test]
    fn on_folds_left_to_right() {
        let parts: Vec<Function<i32, String>> = vec![
            Box::new(|x: i32| format!("a{x}")),
            Box::new(|x: i32| format!("b{x}")),
            Box::new(|x: i32| format!("c{x}")),
        ];
        let mut joined = on(|acc: String, next: String| format!("{acc}-{next}"), parts);
        assert_eq!(joined(1), "a1-b1-c1");
    }

    #[test]
    fn on_sums_two_functions() {
        let parts: Vec<Function<i64, i64>> = vec![Box::new(|x: i64| x), Box::new(|x: i64| x * 2)];
        let mut sum = on(|a: i64, b: i64| a + b, parts);
        assert_eq!(sum(5), 15);
    }

    #[test]
    #[should_panic(expected = "at least two functions")]
    fn on_rejects_single_function() {
        let parts: Vec<Function<i32, i32>> = vec![Box::new(|x: i32| x)];
        let _ = on(|a: i32, b: i32| a + b, parts);
    }
}
