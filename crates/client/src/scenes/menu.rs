//! Title screen.

use runtime::{ContextSetup, RunnerSetup, Scene, Screen};
use scripting::{Script, SharedState, action, compare_with, forever, less_or_equal, once};

use super::advance_frame;
use crate::world::{SceneId, Text, World};

/// Frames the menu stays up before switching to the level.
pub const MENU_FRAMES: u64 = 180;

/// Frames between two title blinks.
const BLINK_FRAMES: u64 = 30;

pub struct MenuScene {
    screen: Screen,
}

impl MenuScene {
    pub fn new(screen: Screen) -> Self {
        Self { screen }
    }
}

impl Scene<World> for MenuScene {
    fn construct_context(&mut self, setup: &mut ContextSetup<World>) {
        let mut world = World::new("menu", self.screen);
        let (cx, cy) = world.center();
        world.texts.push(Text::new("SCRIPTURE", (cx, cy - 40), 48));
        world.texts.push(Text::new("starting soon", (cx, cy + 40), 16));
        world.next_blink_frame = BLINK_FRAMES;

        setup.state(world).runner(clock);
    }

    fn update_context(&mut self, state: &SharedState<World>) {
        advance_frame(state);
    }
}

fn clock(setup: &mut RunnerSetup<World>) {
    setup
        .name("menu-clock")
        .priority(1)
        .add_script(Script::always(vec![action(|w: &mut World| w.ticks += 1)]))
        .add_script(Script::new(
            once(|w: &World| w.frame >= w.next_blink_frame),
            vec![action(|w: &mut World| {
                if let Some(title) = w.texts.first_mut() {
                    title.visible = !title.visible;
                }
                w.next_blink_frame = w.frame + BLINK_FRAMES;
            })],
        ))
        .add_script(Script::new(
            forever(compare_with(MENU_FRAMES, |w: &World| w.frame, less_or_equal())),
            vec![action(|w: &mut World| w.request_scene(SceneId::Level))],
        ));
}

#[cfg(test)]
mod tests {
    use runtime::{Context, ContextState};

    use super::*;
    use crate::scenes::test_support::wait_until;

    #[test]
    fn menu_blinks_then_requests_the_level() {
        let mut context = Context::builder(MenuScene::new(Screen::new(200, 100)))
            .build()
            .unwrap();
        context.start_context(None).unwrap();
        assert_eq!(context.state().read(|w| w.name().to_string()).unwrap(), "menu");

        for _ in 0..BLINK_FRAMES {
            context.update_context().unwrap();
        }
        wait_until(context.state(), |w| !w.texts[0].visible);
        assert_eq!(context.state().read(|w| w.next_scene).unwrap(), None);

        for _ in BLINK_FRAMES..MENU_FRAMES {
            context.update_context().unwrap();
        }
        wait_until(context.state(), |w| w.next_scene == Some(SceneId::Level));
        assert!(context.state().read(|w| w.ticks).unwrap() > 0);

        context.close_context().unwrap();
    }
}
