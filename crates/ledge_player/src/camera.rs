//! Camera follow

use ledge_math::Rect;

/// Top-left camera position in world pixels that follows `player`
///
/// Horizontally the player sits a quarter of the viewport from the left
/// edge, vertically it is centered. Both axes are clamped so the view never
/// leaves the map; a map smaller than the viewport pins the camera at 0.
pub fn camera_offset(player: (i32, i32), viewport: (i32, i32), map: (i32, i32)) -> (i32, i32) {
    let (px, py) = player;
    let (vw, vh) = viewport;
    let (mw, mh) = map;

    let x = (px - vw / 4).clamp(0, (mw - vw).max(0));
    let y = (py - vh / 2).clamp(0, (mh - vh).max(0));
    (x, y)
}

/// Viewport tracking the player across the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Camera {
    /// Visible region in world pixels
    pub view: Rect,
}

impl Camera {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            view: Rect::new(0, 0, width, height),
        }
    }

    pub fn follow(&mut self, player: (i32, i32), map: (i32, i32)) {
        let (x, y) = camera_offset(player, (self.view.w, self.view.h), map);
        self.view.x = x;
        self.view.y = y;
    }

    /// Screen position of a world point
    pub fn to_screen(&self, x: i32, y: i32) -> (i32, i32) {
        (x - self.view.x, y - self.view.y)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}
