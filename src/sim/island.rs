//! Circular island geometry

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{circles_overlap, point_in_circle};

/// An immutable island (center + radius)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Island {
    pub center: Vec2,
    pub radius: f32,
}

impl Island {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            center: Vec2::new(x, y),
            radius,
        }
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        point_in_circle(p, self.center, self.radius)
    }

    pub fn overlaps(&self, other: &Island) -> bool {
        circles_overlap(self.center, self.radius, other.center, other.radius)
    }

    /// Gap between the two rims (negative when overlapping)
    pub fn clearance(&self, other: &Island) -> f32 {
        self.center.distance(other.center) - self.radius - other.radius
    }
}
