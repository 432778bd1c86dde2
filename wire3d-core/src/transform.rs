/// Per-frame rotation of model vertices
use nalgebra::{Rotation3, Vector3};
use std::f32::consts::TAU;

use crate::geometry::Vertex3D;

/// Rotation state around the X and Y axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Advance by delta amounts (in radians).
    ///
    /// Angles are kept in `[0, 2π)` so long runs do not lose precision.
    pub fn advance(&mut self, dx: f32, dy: f32) {
        self.x = (self.x + dx).rem_euclid(TAU);
        self.y = (self.y + dy).rem_euclid(TAU);
    }

    /// Rotation matrix applying X first, then Y
    pub fn matrix(&self) -> Rotation3<f32> {
        rotation_matrix(self.x, self.y)
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

fn rotation_matrix(angle_x: f32, angle_y: f32) -> Rotation3<f32> {
    let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), angle_x);
    let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), angle_y);
    ry * rx
}

/// Rotate a single vertex about X by `angle_x`, then about Y by `angle_y`
pub fn rotate(vertex: &Vertex3D, angle_x: f32, angle_y: f32) -> Vertex3D {
    rotation_matrix(angle_x, angle_y) * vertex
}

/// Rotate every vertex, returning a fresh list. The input is left untouched.
pub fn rotate_all(vertices: &[Vertex3D], rotation: &RotationState) -> Vec<Vertex3D> {
    let matrix = rotation.matrix();
    vertices.iter().map(|v| matrix * v).collect()
}
