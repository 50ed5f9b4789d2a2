//! Public runtime API surface.
//!
//! This module gathers the types exposed to hosts of the runtime crate so the
//! runner and context modules can stay focused on orchestration.

pub mod errors;
pub mod render;

pub use errors::{Result, RuntimeError};
pub use render::{Renderer, Screen};
