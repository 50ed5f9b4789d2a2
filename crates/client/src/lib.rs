//! Demo host application for the scripting runtime.
//!
//! # Architecture
//!
//! ```text
//! Host (frame loop, scene switching)
//!   ├─→ Context<World> (current scene: shared state + runner threads)
//!   │     ├─→ MenuScene  → menu-clock
//!   │     └─→ LevelScene → level-physics, level-director (+ bonus-award threads)
//!   ├─→ LogRenderer (draws each frame to the log)
//!   └─→ EventBus (lifecycle events, logged as JSON lines by the binary)
//! ```
//!
//! The binary is the composition root: it loads configuration, installs
//! logging, runs the [`Host`] on a blocking thread and turns Ctrl-C into a
//! shutdown request.

pub mod config;
pub mod host;
pub mod logging;
pub mod renderer;
pub mod scenes;
pub mod world;

pub use config::ClientConfig;
pub use host::{Host, HostSummary};
pub use renderer::LogRenderer;
pub use world::{SceneId, Sprite, Text, World};
