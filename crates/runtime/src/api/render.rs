//! Render capability the host implements.
//!
//! The runtime never draws. A host hands the live state of a context to its
//! [`Renderer`] once per frame, together with the [`Screen`] region to fill.

use serde::{Deserialize, Serialize};

/// Rectangular region of the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Screen {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Screen {
    /// Region anchored at the origin.
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Same origin, new size.
    pub const fn resized(self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    /// Returns `true` if the point lies inside the region.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (i64::from(x), i64::from(y));
        let (left, top) = (i64::from(self.x), i64::from(self.y));
        x >= left
            && y >= top
            && x < left + i64::from(self.width)
            && y < top + i64::from(self.height)
    }
}

/// Host-side drawing hooks.
///
/// Mirrors the lifecycle of a render surface: created once, resized any
/// number of times, then asked for one frame at a time.
pub trait Renderer<S> {
    /// Called once when the surface becomes available.
    fn surface_created(&mut self) {}

    /// Called whenever the surface changes size.
    fn surface_changed(&mut self, width: u32, height: u32);

    /// Draws one frame of `state` into `screen`.
    fn draw_frame(&mut self, state: &S, screen: &Screen);
}
