//! Screen ↔ world transform
//!
//! The camera keeps the player centred in the viewport. Screen coordinates
//! are CSS pixels relative to the canvas' top-left corner.

use glam::Vec2;

use crate::sim::Projection;

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// World position shown at the screen's top-left corner
    pub origin: Vec2,
    pub zoom: f32,
    /// Viewport size in CSS pixels
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::ZERO,
            zoom: 1.0,
            viewport: Vec2::new(width, height),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    /// Put `target` in the middle of the viewport
    pub fn center_on(&mut self, target: Vec2) {
        self.origin = target - self.viewport / (2.0 * self.zoom);
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.origin) * self.zoom
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen / self.zoom + self.origin
    }
}

impl Projection for Camera {
    fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        Camera::screen_to_world(self, screen)
    }
}
