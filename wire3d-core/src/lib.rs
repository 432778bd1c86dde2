/// wire3d Core Library - Shared geometry, model loading and projection logic
///
/// This library provides the stateless core of the wireframe renderer:
/// OBJ parsing, per-frame rotation and perspective projection.

pub mod geometry;
pub mod obj;
pub mod projection;
pub mod transform;

// Re-export commonly used types
pub use geometry::{Edge, GeometryModel, Vertex3D};
pub use obj::{LoadError, Loader};
pub use projection::{Camera, ScreenPoint};
pub use transform::{rotate, rotate_all, RotationState};
