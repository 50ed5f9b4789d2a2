//! Renderer that draws to the log.

use runtime::{Renderer, Screen};
use tracing::{debug, info, trace};

use crate::world::World;

/// Writes a one-line description of the world instead of pixels.
///
/// Every frame is traced; every `summary_every`-th frame is also logged at
/// `info` so a default log level shows the demo progressing.
#[derive(Debug)]
pub struct LogRenderer {
    summary_every: u64,
    frames_drawn: u64,
    surface: Option<(u32, u32)>,
}

impl LogRenderer {
    pub fn new(summary_every: u64) -> Self {
        Self {
            summary_every: summary_every.max(1),
            frames_drawn: 0,
            surface: None,
        }
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn surface(&self) -> Option<(u32, u32)> {
        self.surface
    }
}

impl Renderer<World> for LogRenderer {
    fn surface_created(&mut self) {
        debug!("render surface created");
    }

    fn surface_changed(&mut self, width: u32, height: u32) {
        self.surface = Some((width, height));
        info!(width, height, "render surface resized");
    }

    fn draw_frame(&mut self, world: &World, screen: &Screen) {
        self.frames_drawn += 1;

        let sprites = world
            .sprites
            .iter()
            .filter(|s| s.active && screen.contains(s.x, s.y))
            .count();
        let texts: Vec<&str> = world
            .texts
            .iter()
            .filter(|t| t.visible)
            .map(|t| t.content.as_str())
            .collect();

        trace!(scene = %world.name, frame = world.frame, sprites, ?texts, "frame");
        if self.frames_drawn % self.summary_every == 0 {
            info!(
                scene = %world.name,
                frame = world.frame,
                score = world.score,
                sprites,
                ?texts,
                "frame summary"
            );
        }
    }
}
