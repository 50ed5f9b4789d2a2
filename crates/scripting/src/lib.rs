//! Combinator library for guarded behavior scripts.
//!
//! Scripts are built from plain closures over a state value:
//!
//! - **Predicates** read the state and answer yes or no
//! - **Actions** mutate the state and return nothing
//! - **Scripts** evaluate a guard once and, if it holds, apply their actions
//!   in order. A script is itself an action, so scripts nest freely.
//!
//! # Architecture
//!
//! - [`function`]: the transform aliases and generic function combinators
//! - [`logic`]: negation, conjunction, disjunction and the latch predicates
//! - [`compare`]: ordering functions and comparison predicates
//! - [`script`]: the [`Script`] evaluator
//! - [`control`]: branching, looping, iteration and spawning scripts
//! - [`state`]: [`SharedState`], the synchronized handle runners share
//! - [`priority`]: thread scheduling priorities
//! - [`builder`]: shorthand constructors

pub mod builder;
pub mod compare;
pub mod control;
pub mod function;
pub mod logic;
pub mod priority;
pub mod script;
pub mod state;

// Re-export core types for ergonomic API
pub use builder::{action, always, never, nothing, predicate, script};
pub use compare::{
    Operand, compare, compare_by, compare_values, compare_with, equal, greater, greater_or_equal,
    less, less_or_equal, not_equal,
};
pub use control::{else_script, for_each, for_range, thread_script, while_script};
pub use function::{Action, Function, Predicate, applicate, compose, constant, flip, on};
pub use logic::{Latch, all, and, any, forever, not, once, or};
pub use priority::{apply_thread_priority, priority_level};
pub use script::Script;
pub use state::{SharedState, StateError};
