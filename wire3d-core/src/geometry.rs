/// Geometry primitives for wireframe rendering
use nalgebra::Point3;

/// A vertex in model space
pub type Vertex3D = Point3<f32>;

/// A line segment between two vertices, stored as indices into the vertex list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    /// Whether both endpoints address a vertex and the edge is not a loop
    pub fn is_valid_for(&self, vertex_count: usize) -> bool {
        self.a != self.b && self.a < vertex_count && self.b < vertex_count
    }
}

impl From<(usize, usize)> for Edge {
    fn from((a, b): (usize, usize)) -> Self {
        Self::new(a, b)
    }
}

/// An immutable wireframe: vertices plus the edges connecting them.
///
/// Every edge is guaranteed to reference two distinct, existing vertices,
/// so the render pipeline can index without checks.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryModel {
    vertices: Vec<Vertex3D>,
    edges: Vec<Edge>,
}

impl GeometryModel {
    /// Build a model, discarding any edge that does not satisfy
    /// [`Edge::is_valid_for`].
    pub fn new(vertices: Vec<Vertex3D>, edges: Vec<Edge>) -> Self {
        let count = vertices.len();
        let edges = edges.into_iter().filter(|e| e.is_valid_for(count)).collect();
        Self { vertices, edges }
    }

    /// Unit cube with corners at `±1`, 8 vertices and 12 edges
    pub fn cube() -> Self {
        const VERTICES: [[f32; 3]; 8] = [
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [1.0, 1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
        ];
        const EDGES: [(usize, usize); 12] = [
            // back face
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            // front face
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
            // connecting edges
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ];

        Self {
            vertices: VERTICES
                .iter()
                .map(|&[x, y, z]| Vertex3D::new(x, y, z))
                .collect(),
            edges: EDGES.iter().copied().map(Edge::from).collect(),
        }
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl Default for GeometryModel {
    fn default() -> Self {
        Self::cube()
    }
}
