//! The simulation state every scene's runners act on.

use runtime::{ContextState, Screen};
use serde::Serialize;

/// Fixed number of sprite slots in a level. Spawning activates a free slot.
pub const SPRITE_SLOTS: usize = 8;

/// Scenes the host can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SceneId {
    Menu,
    Level,
}

/// A moving image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sprite {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub vx: i32,
    pub vy: i32,
    pub active: bool,
}

impl Sprite {
    pub fn new(name: impl Into<String>, (x, y): (i32, i32), (vx, vy): (i32, i32)) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            vx,
            vy,
            active: true,
        }
    }

    /// An unused slot.
    pub fn inactive(slot: usize) -> Self {
        Self {
            active: false,
            ..Self::new(format!("slot-{slot}"), (0, 0), (0, 0))
        }
    }

    pub fn next_position(&self) -> (i32, i32) {
        (self.x.saturating_add(self.vx), self.y.saturating_add(self.vy))
    }

    /// Returns `true` if the next step would carry an active sprite off `screen`.
    pub fn will_leave(&self, screen: &Screen) -> bool {
        let (x, y) = self.next_position();
        self.active && !screen.contains(x, y)
    }

    pub fn advance(&mut self) {
        if self.active {
            (self.x, self.y) = self.next_position();
        }
    }

    /// Reverses the velocity on every axis the next step would cross, then
    /// steps, staying inside `screen`.
    pub fn bounce(&mut self, screen: &Screen) {
        let (x, y) = self.next_position();
        let right = screen.x.saturating_add_unsigned(screen.width).saturating_sub(1);
        let bottom = screen.y.saturating_add_unsigned(screen.height).saturating_sub(1);

        if x < screen.x || x > right {
            self.vx = -self.vx;
        }
        if y < screen.y || y > bottom {
            self.vy = -self.vy;
        }
        self.advance();
        self.x = self.x.clamp(screen.x, right.max(screen.x));
        self.y = self.y.clamp(screen.y, bottom.max(screen.y));
    }
}

/// A line of text on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Text {
    pub content: String,
    pub x: i32,
    pub y: i32,
    pub size: u8,
    pub visible: bool,
}

impl Text {
    pub fn new(content: impl Into<String>, (x, y): (i32, i32), size: u8) -> Self {
        Self {
            content: content.into(),
            x,
            y,
            size,
            visible: true,
        }
    }
}

/// State of the current scene.
#[derive(Debug, Clone, Serialize)]
pub struct World {
    pub name: String,
    /// Frames drawn since the scene started.
    pub frame: u64,
    /// Passes of the scene's clock runner.
    pub ticks: u64,
    pub screen: Screen,
    pub sprites: Vec<Sprite>,
    pub texts: Vec<Text>,
    pub score: u64,
    pub pending_spawns: u32,
    pub spawned: u32,
    pub bonus_claimed: bool,
    pub bonus_awards: u32,
    pub next_scene: Option<SceneId>,

    // Frame bookkeeping for per-frame scripts
    pub next_blink_frame: u64,
    pub next_wave_frame: u64,
    pub physics_frame: u64,
    pub scored_frame: u64,
}

impl World {
    pub fn new(name: impl Into<String>, screen: Screen) -> Self {
        Self {
            name: name.into(),
            frame: 0,
            ticks: 0,
            screen,
            sprites: Vec::new(),
            texts: Vec::new(),
            score: 0,
            pending_spawns: 0,
            spawned: 0,
            bonus_claimed: false,
            bonus_awards: 0,
            next_scene: None,
            next_blink_frame: 0,
            next_wave_frame: 0,
            physics_frame: 0,
            scored_frame: 0,
        }
    }

    pub fn center(&self) -> (i32, i32) {
        let half = |offset: i32, len: u32| offset.saturating_add_unsigned(len / 2);
        (half(self.screen.x, self.screen.width), half(self.screen.y, self.screen.height))
    }

    pub fn active_sprites(&self) -> usize {
        self.sprites.iter().filter(|s| s.active).count()
    }

    /// Asks the host to switch scenes. The first request wins.
    pub fn request_scene(&mut self, scene: SceneId) {
        self.next_scene.get_or_insert(scene);
    }
}

impl ContextState for World {
    fn construct_state(&mut self, previous: Option<&Self>) {
        if let Some(previous) = previous {
            self.score = previous.score;
            self.screen = previous.screen;
        }
        self.frame = 0;
        self.next_scene = None;
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_and_screen_survive_handoff() {
        let mut previous = World::new("menu", Screen::new(320, 200));
        previous.score = 42;
        previous.frame = 99;
        previous.next_scene = Some(SceneId::Level);

        let mut next = World::new("level", Screen::new(800, 480));
        next.construct_state(Some(&previous));

        assert_eq!(next.score, 42);
        assert_eq!(next.screen, Screen::new(320, 200));
        assert_eq!(next.frame, 0);
        assert_eq!(next.next_scene, None);
        assert_eq!(next.name(), "level");
    }

    #[test]
    fn first_scene_request_wins() {
        let mut world = World::new("menu", Screen::new(10, 10));
        world.request_scene(SceneId::Level);
        world.request_scene(SceneId::Menu);
        assert_eq!(world.next_scene, Some(SceneId::Level));
    }

    #[test]
    fn sprite_bounces_off_edges() {
        let screen = Screen::new(10, 10);
        let mut sprite = Sprite::new("ball", (8, 5), (3, -1));

        assert!(sprite.will_leave(&screen));
        sprite.bounce(&screen);
        assert_eq!((sprite.vx, sprite.vy), (-3, -1));
        assert_eq!((sprite.x, sprite.y), (5, 4));
        assert!(!sprite.will_leave(&screen));
    }

    #[test]
    fn inactive_sprites_stay_put() {
        let screen = Screen::new(10, 10);
        let mut sprite = Sprite::inactive(3);
        sprite.vx = 50;

        assert!(!sprite.will_leave(&screen));
        sprite.advance();
        assert_eq!((sprite.x, sprite.y), (0, 0));
    }
}
