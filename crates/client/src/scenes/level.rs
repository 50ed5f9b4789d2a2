//! The playable level.
//!
//! Two runners share the world: `level-physics` moves the sprites once per
//! frame, `level-director` spawns waves, keeps the score, hands out a bonus
//! and eventually sends the player back to the menu.

use runtime::{ContextSetup, RunnerSetup, Scene, Screen};
use scripting::{
    Script, SharedState, action, and, compare_by, compare_with, else_script, for_each, forever,
    less, less_or_equal, not, once, thread_script, while_script,
};
use tracing::{debug, info};

use super::advance_frame;
use crate::world::{SPRITE_SLOTS, SceneId, Sprite, Text, World};

/// Frames before the level hands back to the menu.
pub const LEVEL_FRAMES: u64 = 900;

/// Score that unlocks the bonus.
pub const BONUS_SCORE: u64 = 500;

/// Points the bonus is worth.
pub const BONUS_AWARD: u64 = 250;

const WAVE_FRAMES: u64 = 120;
const WAVE_SIZE: u32 = 2;

pub struct LevelScene {
    screen: Screen,
}

impl LevelScene {
    pub fn new(screen: Screen) -> Self {
        Self { screen }
    }
}

impl Scene<World> for LevelScene {
    fn construct_context(&mut self, setup: &mut ContextSetup<World>) {
        let mut world = World::new("level", self.screen);
        let center = world.center();

        world.sprites = (0..SPRITE_SLOTS).map(Sprite::inactive).collect();
        world.sprites[0] = Sprite::new("player", center, (3, 2));
        world.texts.push(Text::new("score 0", (8, 8), 16));
        world.pending_spawns = WAVE_SIZE;
        world.next_wave_frame = WAVE_FRAMES;

        setup.state(world).runner(physics).runner(director);
    }

    fn update_context(&mut self, state: &SharedState<World>) {
        advance_frame(state);

        let refreshed = state.with(|w| {
            let label = format!("score {}", w.score);
            if let Some(text) = w.texts.first_mut() {
                text.content = label;
            }
        });
        if let Err(e) = refreshed {
            tracing::warn!(error = %e, "failed to refresh score label");
        }
    }
}

/// Moves every active sprite one step per frame, bouncing off the edges.
fn physics(setup: &mut RunnerSetup<World>) {
    let step_all = for_each(0..SPRITE_SLOTS, |&slot: &usize| {
        else_script(
            move |w: &World| w.sprites.get(slot).is_some_and(|s| s.will_leave(&w.screen)),
            move |w: &mut World| {
                let screen = w.screen;
                if let Some(sprite) = w.sprites.get_mut(slot) {
                    sprite.bounce(&screen);
                }
            },
            move |w: &mut World| {
                if let Some(sprite) = w.sprites.get_mut(slot) {
                    sprite.advance();
                }
            },
        )
        .into_action()
    });

    setup.name("level-physics").priority(2).add_script(Script::new(
        compare_by(|w: &World| w.physics_frame, |w: &World| w.frame, less()),
        vec![
            step_all.into_action(),
            action(|w: &mut World| w.physics_frame = w.frame),
        ],
    ));
}

/// Spawning, scoring, the bonus and the way out.
fn director(setup: &mut RunnerSetup<World>) {
    let bonus = thread_script(
        "bonus-award",
        0,
        setup.state(),
        Script::always(vec![action(award_bonus)]),
    );

    setup
        .name("level-director")
        .priority(1)
        .add_script(Script::new(
            once(|w: &World| w.frame >= w.next_wave_frame),
            vec![action(|w: &mut World| {
                w.pending_spawns += WAVE_SIZE;
                w.next_wave_frame = w.frame + WAVE_FRAMES;
            })],
        ))
        .add_script(while_script(
            |w: &World| w.pending_spawns > 0,
            spawn_one,
        ))
        .add_script(Script::new(
            compare_by(|w: &World| w.scored_frame, |w: &World| w.frame, less()),
            vec![action(|w: &mut World| {
                w.score += w.active_sprites() as u64;
                w.scored_frame = w.frame;
            })],
        ))
        .add_script(Script::new(
            and(
                not(|w: &World| w.bonus_claimed),
                once(compare_with(BONUS_SCORE, |w: &World| w.score, less_or_equal())),
            ),
            vec![action(|w: &mut World| w.bonus_claimed = true), bonus.into_action()],
        ))
        .add_script(Script::new(
            forever(compare_with(LEVEL_FRAMES, |w: &World| w.frame, less_or_equal())),
            vec![action(|w: &mut World| w.request_scene(SceneId::Menu))],
        ));
}

/// Activates a free sprite slot for one pending spawn. Requests that find
/// every slot taken are dropped.
fn spawn_one(w: &mut World) {
    w.pending_spawns = w.pending_spawns.saturating_sub(1);

    let n = w.spawned as i32;
    let origin = w.center();
    let Some(slot) = w.sprites.iter().position(|s| !s.active) else {
        debug!("no free sprite slot, spawn dropped");
        return;
    };

    let velocity = (1 + n % 4, -(2 + n % 3));
    w.sprites[slot] = Sprite::new(format!("drone-{}", w.spawned), origin, velocity);
    w.spawned += 1;
}

fn award_bonus(w: &mut World) {
    w.score += BONUS_AWARD;
    w.bonus_awards += 1;
    w.texts.push(Text::new("BONUS!", w.center(), 32));
    info!(score = w.score, "bonus awarded");
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use runtime::Context;

    use super::*;
    use crate::scenes::test_support::wait_until;

    fn started() -> Context<World> {
        let mut context = Context::builder(LevelScene::new(Screen::new(200, 100)))
            .build()
            .unwrap();
        context.start_context(None).unwrap();
        context
    }

    #[test]
    fn director_drains_pending_spawns() {
        let mut context = started();

        wait_until(context.state(), |w| w.pending_spawns == 0);
        assert_eq!(
            context.state().read(World::active_sprites).unwrap(),
            1 + WAVE_SIZE as usize
        );

        context.close_context().unwrap();
    }

    #[test]
    fn physics_moves_sprites_once_per_frame() {
        let mut context = started();
        wait_until(context.state(), |w| w.pending_spawns == 0);

        let before = context.state().read(|w| (w.sprites[0].x, w.sprites[0].y)).unwrap();
        context.update_context().unwrap();
        wait_until(context.state(), |w| w.physics_frame == 1);

        let after = context.state().read(|w| (w.sprites[0].x, w.sprites[0].y)).unwrap();
        assert_eq!(after, (before.0 + 3, before.1 + 2));

        context.close_context().unwrap();
    }

    #[test]
    fn bonus_is_awarded_exactly_once() {
        let mut context = started();
        context.state().with(|w| w.score = BONUS_SCORE).unwrap();

        wait_until(context.state(), |w| w.bonus_awards == 1);
        thread::sleep(Duration::from_millis(50));

        let world = context.state().snapshot().unwrap();
        assert_eq!(world.bonus_awards, 1);
        assert!(world.bonus_claimed);
        assert!(world.score >= BONUS_SCORE + BONUS_AWARD);

        context.close_context().unwrap();
    }

    #[test]
    fn level_ends_after_its_frames() {
        let mut context = started();
        context.state().with(|w| w.frame = LEVEL_FRAMES - 1).unwrap();
        context.update_context().unwrap();

        wait_until(context.state(), |w| w.next_scene == Some(SceneId::Menu));
        context.close_context().unwrap();
    }

    #[test]
    fn spawn_requests_beyond_capacity_are_dropped() {
        let mut world = World::new("level", Screen::new(100, 100));
        world.sprites = (0..2).map(Sprite::inactive).collect();
        world.pending_spawns = 3;

        spawn_one(&mut world);
        spawn_one(&mut world);
        spawn_one(&mut world);

        assert_eq!(world.pending_spawns, 0);
        assert_eq!(world.active_sprites(), 2);
        assert_eq!(world.spawned, 2);
    }
}
