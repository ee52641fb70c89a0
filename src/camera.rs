use glam::Vec2;

// ── Rect ────────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in screen/world space (y grows downward).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

// ── Camera ──────────────────────────────────────────────────────────────────

/// Zoom floor — keeps the viewport finite however far the user zooms out.
const MIN_ZOOM: f32 = 0.05;

/// 2D camera: a world-space center position with smooth zoom.
///
/// `zoom_by`/`unzoom_by` move a target value; `tick` lerps the live zoom
/// toward it (converges at ~8× per second) so wheel steps feel continuous.
pub struct Camera {
    /// World-space pixel position the camera is centered on.
    pub position: Vec2,
    /// Current zoom level (1.0 = 1:1, >1 zooms in, <1 zooms out).
    pub zoom: f32,
    target_zoom: f32,
}

impl Camera {
    pub fn new(center_x: f32, center_y: f32) -> Self {
        Self {
            position: Vec2::new(center_x, center_y),
            zoom: 1.0,
            target_zoom: 1.0,
        }
    }

    /// Shift the camera center by a world-space delta.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.position += Vec2::new(dx, dy);
    }

    /// Multiply the zoom target (wheel up / zoom in).
    pub fn zoom_by(&mut self, factor: f32) {
        self.target_zoom = (self.target_zoom * factor).max(MIN_ZOOM);
    }

    /// Divide the zoom target (wheel down / zoom out).
    pub fn unzoom_by(&mut self, factor: f32) {
        self.target_zoom = (self.target_zoom / factor).max(MIN_ZOOM);
    }

    pub fn target_zoom(&self) -> f32 {
        self.target_zoom
    }

    /// Advance the smooth-zoom interpolation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let speed = 8.0_f32;
        self.zoom += (self.target_zoom - self.zoom) * (speed * dt).min(1.0);
    }

    /// The world-space rectangle visible through a screen of the given pixel
    /// size — this is what the row-batch culling tests against.
    pub fn viewport(&self, screen_w: f32, screen_h: f32) -> Rect {
        let z = self.zoom.max(MIN_ZOOM);
        let w = screen_w / z;
        let h = screen_h / z;
        Rect::new(self.position.x - w / 2.0, self.position.y - h / 2.0, w, h)
    }

    /// Convert a window-space point to world space (pointer picking).
    pub fn screen_to_world(&self, screen: Vec2, screen_w: f32, screen_h: f32) -> Vec2 {
        let z = self.zoom.max(MIN_ZOOM);
        Vec2::new(
            self.position.x + (screen.x - screen_w / 2.0) / z,
            self.position.y + (screen.y - screen_h / 2.0) / z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_centered_on_position() {
        let cam = Camera::new(100.0, 50.0);
        let view = cam.viewport(800.0, 600.0);
        assert_eq!(view, Rect::new(-300.0, -250.0, 800.0, 600.0));
        assert_eq!(view.center(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn viewport_shrinks_when_zoomed_in() {
        let mut cam = Camera::new(0.0, 0.0);
        cam.zoom = 2.0;
        let view = cam.viewport(800.0, 600.0);
        assert_eq!(view.w, 400.0);
        assert_eq!(view.h, 300.0);
    }

    #[test]
    fn zoom_target_clamps_at_floor() {
        let mut cam = Camera::new(0.0, 0.0);
        for _ in 0..100 {
            cam.unzoom_by(2.0);
        }
        assert!(cam.target_zoom() >= MIN_ZOOM);
    }

    #[test]
    fn tick_converges_on_target_zoom() {
        let mut cam = Camera::new(0.0, 0.0);
        cam.zoom_by(2.0);
        for _ in 0..120 {
            cam.tick(1.0 / 60.0);
        }
        assert!((cam.zoom - 2.0).abs() < 0.01);
    }

    #[test]
    fn screen_to_world_round_trips_the_center() {
        let cam = Camera::new(48.0, 24.0);
        let world = cam.screen_to_world(Vec2::new(400.0, 300.0), 800.0, 600.0);
        assert_eq!(world, Vec2::new(48.0, 24.0));
    }
}
