/// Camera and perspective projection onto a character grid
use serde::Deserialize;

use crate::geometry::Vertex3D;

/// A projected vertex: integer cell coordinates plus the depth used for shading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
    pub depth: f32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32, depth: f32) -> Self {
        Self { x, y, depth }
    }
}

/// Fixed camera looking down +Z at the model, plus the viewport it projects onto
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Camera {
    /// Viewport width in character cells
    pub width: u16,
    /// Viewport height in character cells
    pub height: u16,
    pub fov_degrees: f32,
    /// Distance added to every vertex's `z` before dividing
    pub camera_distance: f32,
    /// World-to-screen scale factor
    pub size: f32,
    /// Smallest depth used as a divisor; points at or behind the camera clamp here
    pub min_depth: f32,
}

impl Camera {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            fov_degrees: 90.0,
            camera_distance: 3.0,
            size: 20.0,
            min_depth: 0.1,
        }
    }

    pub fn aspect(&self) -> f32 {
        f32::from(self.width) / f32::from(self.height.max(1))
    }

    fn fov_scale(&self) -> f32 {
        1.0 / (self.fov_degrees.to_radians() * 0.5).tan()
    }

    /// Project a 3D point to screen space.
    ///
    /// The result is not clipped; callers drop cells outside the viewport.
    pub fn project(&self, vertex: &Vertex3D) -> ScreenPoint {
        let depth = vertex.z + self.camera_distance;
        let scale = self.fov_scale() / depth.max(self.min_depth) * self.size;

        let half_w = f32::from(self.width / 2);
        let half_h = f32::from(self.height / 2);
        let screen_x = half_w + vertex.x * scale * self.aspect();
        // Screen rows grow downward
        let screen_y = half_h - vertex.y * scale;

        ScreenPoint::new(screen_x.round() as i32, screen_y.round() as i32, depth)
    }

    pub fn project_all(&self, vertices: &[Vertex3D]) -> Vec<ScreenPoint> {
        vertices.iter().map(|v| self.project(v)).collect()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(80, 40)
    }
}
