//! Demo scenes.
//!
//! - [`MenuScene`]: a blinking title that hands over to the level after a while
//! - [`LevelScene`]: bouncing sprites, spawn waves, scoring and a one-off bonus

mod level;
mod menu;

pub use level::{BONUS_AWARD, BONUS_SCORE, LEVEL_FRAMES, LevelScene};
pub use menu::{MENU_FRAMES, MenuScene};

use runtime::{Context, EventBus, RuntimeConfig, Screen};
use scripting::SharedState;

use crate::world::{SceneId, World};

/// Builds the (not yet started) context of `scene`.
pub fn build_context(
    scene: SceneId,
    screen: Screen,
    config: &RuntimeConfig,
    events: &EventBus,
) -> runtime::Result<Context<World>> {
    let builder = match scene {
        SceneId::Menu => Context::builder(MenuScene::new(screen)),
        SceneId::Level => Context::builder(LevelScene::new(screen)),
    };

    builder.config(config.clone()).events(events.clone()).build()
}

/// Advances the frame counter; scripts key their per-frame work off it.
fn advance_frame(state: &SharedState<World>) {
    if let Err(e) = state.with(|world| world.frame += 1) {
        tracing::warn!(error = %e, "failed to advance frame");
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::thread;
    use std::time::{Duration, Instant};

    use scripting::SharedState;

    use crate::world::World;

    /// Polls `condition` until it holds, failing the test after five seconds.
    pub fn wait_until(state: &SharedState<World>, condition: impl Fn(&World) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !state.read(&condition).unwrap() {
            assert!(Instant::now() < deadline, "condition not reached in time");
            thread::sleep(Duration::from_millis(1));
        }
    }
}
