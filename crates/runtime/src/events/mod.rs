//! Lifecycle event bus.
//!
//! Contexts and runners publish a [`LifecycleEvent`] on every start, stop and
//! failure. Hosts subscribe to log or react to them.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::LifecycleEvent;
