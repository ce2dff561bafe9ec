//! Presentation camera
//!
//! Input intents move the rest position and rest zoom; `update` eases the
//! live values toward them once per frame. The camera never touches the
//! simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// World units panned per frame at zoom 1
pub const CAMERA_SPEED: f32 = 10.0;
pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 1.0;

const PAN_EASE: f32 = 0.1;
const ZOOM_EASE: f32 = 0.1;
const ZOOM_SPEED: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec2,
    pub rest_position: Vec2,
    pub zoom: f32,
    pub rest_zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 0.5)
    }
}

impl Camera {
    pub fn new(position: Vec2, zoom: f32) -> Self {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        Self {
            position,
            rest_position: position,
            zoom,
            rest_zoom: zoom,
        }
    }

    /// Move the rest position; `direction` components are usually -1, 0 or 1.
    /// Zoomed-out cameras pan further per frame.
    pub fn pan(&mut self, direction: Vec2) {
        self.rest_position += direction * (CAMERA_SPEED / self.zoom);
    }

    /// Positive steps zoom in, negative steps zoom out
    pub fn zoom_by(&mut self, steps: f32) {
        self.rest_zoom += steps * ZOOM_SPEED * self.zoom;
    }

    /// Ease toward the rest values
    pub fn update(&mut self) {
        self.position += (self.rest_position - self.position) * PAN_EASE;
        self.rest_zoom = self.rest_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom += (self.rest_zoom - self.zoom) * ZOOM_EASE;
    }

    /// World point to pixel coordinates for a viewport of `viewport` pixels
    pub fn world_to_screen(&self, point: Vec2, viewport: Vec2) -> Vec2 {
        (point - self.position) * self.zoom + viewport * 0.5
    }

    /// Pixel coordinates back to a world point
    pub fn screen_to_world(&self, pixel: Vec2, viewport: Vec2) -> Vec2 {
        (pixel - viewport * 0.5) / self.zoom + self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eases_toward_rest_position() {
        let mut camera = Camera::new(Vec2::ZERO, 0.5);
        camera.rest_position = Vec2::new(100.0, -50.0);
        camera.update();
        assert!((camera.position - Vec2::new(10.0, -5.0)).length() < 1e-4);

        for _ in 0..200 {
            camera.update();
        }
        assert!((camera.position - camera.rest_position).length() < 1e-2);
    }

    #[test]
    fn test_pan_scales_with_zoom() {
        let mut camera = Camera::new(Vec2::ZERO, 0.5);
        camera.pan(Vec2::X);
        assert_eq!(camera.rest_position, Vec2::new(20.0, 0.0));
        assert_eq!(camera.position, Vec2::ZERO);
    }

    #[test]
    fn test_rest_zoom_clamped() {
        let mut camera = Camera::new(Vec2::ZERO, 1.0);
        for _ in 0..100 {
            camera.zoom_by(1.0);
        }
        camera.update();
        assert_eq!(camera.rest_zoom, MAX_ZOOM);
        assert!(camera.zoom <= MAX_ZOOM);

        camera.zoom_by(-1000.0);
        camera.update();
        assert_eq!(camera.rest_zoom, MIN_ZOOM);
    }

    #[test]
    fn test_screen_mapping_inverts() {
        let camera = Camera::new(Vec2::new(300.0, 40.0), 0.25);
        let viewport = Vec2::new(1280.0, 720.0);
        assert_eq!(camera.world_to_screen(camera.position, viewport), viewport * 0.5);

        let world = Vec2::new(-1234.0, 567.0);
        let back = camera.screen_to_world(camera.world_to_screen(world, viewport), viewport);
        assert!((back - world).length() < 1e-2);
    }
}
