/// Wavefront OBJ loader producing wireframe geometry
///
/// Only `v`, `f` and `l` directives are read. Edges from explicit `l` polylines
/// take precedence; when none survive, edges are the deduplicated boundaries of
/// all faces. The result is centered on the origin and scaled to a fixed size.
use nom::{
    bytes::complete::{take_till, take_till1},
    character::complete::{char, i64 as signed_index, space0, space1},
    combinator::{eof, opt},
    multi::many1,
    number::complete::float,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::geometry::{Edge, GeometryModel, Vertex3D};

/// Largest axis extent of a loaded model after normalization
pub const DEFAULT_TARGET_SIZE: f32 = 4.0;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read model file {}: {source}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no vertices found in model file {}", path.display())]
    Empty { path: PathBuf },
}

/// A single parsed line of an OBJ file
#[derive(Debug, Clone, PartialEq)]
enum Directive {
    Vertex(Vertex3D),
    Face(Vec<i64>),
    Line(Vec<i64>),
    Ignored,
}

/// Raw contents of a file before edge derivation and normalization
#[derive(Debug, Default)]
struct ObjData {
    vertices: Vec<Vertex3D>,
    faces: Vec<Vec<i64>>,
    lines: Vec<Vec<i64>>,
}

/// Reads OBJ text into a [`GeometryModel`] scaled to `target_size`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Loader {
    pub target_size: f32,
}

impl Loader {
    pub fn new(target_size: f32) -> Self {
        Self { target_size }
    }

    /// Load and normalize a model from disk
    pub fn load(&self, path: impl AsRef<Path>) -> Result<GeometryModel, LoadError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| LoadError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);

        self.parse_str(&text).ok_or_else(|| LoadError::Empty {
            path: path.to_path_buf(),
        })
    }

    /// Parse OBJ text. Returns `None` when no vertex was found.
    pub fn parse_str(&self, text: &str) -> Option<GeometryModel> {
        let data = read_directives(text);
        if data.vertices.is_empty() {
            return None;
        }

        let edges = derive_edges(&data);
        let vertices = normalize(&data.vertices, self.target_size);
        Some(GeometryModel::new(vertices, edges))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_SIZE)
    }
}

/// Load a model with the default target size
pub fn load(path: impl AsRef<Path>) -> Result<GeometryModel, LoadError> {
    Loader::default().load(path)
}

fn read_directives(text: &str) -> ObjData {
    let mut data = ObjData::default();

    for (number, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let directive = match parse_directive(line) {
            Ok((_, directive)) => directive,
            Err(_) => {
                warn!(line = number + 1, content = line, "skipping malformed OBJ line");
                continue;
            }
        };

        // Relative indices count back from the vertices read so far
        let count = data.vertices.len();
        match directive {
            Directive::Vertex(v) if v.coords.iter().all(|c| c.is_finite()) => {
                data.vertices.push(v)
            }
            Directive::Vertex(_) => {
                warn!(line = number + 1, "skipping vertex with non-finite coordinate")
            }
            Directive::Face(indices) if indices.len() >= 3 => {
                data.faces.push(resolve_all(&indices, count))
            }
            Directive::Face(_) => debug!(line = number + 1, "ignoring face with fewer than 3 vertices"),
            Directive::Line(indices) => data.lines.push(resolve_all(&indices, count)),
            Directive::Ignored => {}
        }
    }

    data
}

/// Map a 1-based or negative OBJ index to a 0-based position
fn resolve(index: i64, vertex_count: usize) -> i64 {
    if index > 0 {
        index - 1
    } else {
        vertex_count as i64 + index
    }
}

fn resolve_all(indices: &[i64], vertex_count: usize) -> Vec<i64> {
    indices.iter().map(|&i| resolve(i, vertex_count)).collect()
}

fn derive_edges(data: &ObjData) -> Vec<Edge> {
    let vertex_count = data.vertices.len();
    let from_lines = valid_edges(
        data.lines
            .iter()
            .flat_map(|polyline| polyline.windows(2).map(|w| (w[0], w[1]))),
        vertex_count,
    );
    if !from_lines.is_empty() {
        return from_lines;
    }
    if !data.lines.is_empty() {
        debug!("no usable `l` edges; using face boundaries");
    }

    let mut unique = BTreeSet::new();
    for face in &data.faces {
        for (i, &a) in face.iter().enumerate() {
            let b = face[(i + 1) % face.len()];
            unique.insert((a.min(b), a.max(b)));
        }
    }
    valid_edges(unique, vertex_count)
}

/// Keep candidate pairs that address two distinct existing vertices
fn valid_edges(candidates: impl IntoIterator<Item = (i64, i64)>, vertex_count: usize) -> Vec<Edge> {
    let mut total = 0;
    let edges: Vec<Edge> = candidates
        .into_iter()
        .inspect(|_| total += 1)
        .filter_map(|(a, b)| Some(Edge::new(usize::try_from(a).ok()?, usize::try_from(b).ok()?)))
        .filter(|e| e.is_valid_for(vertex_count))
        .collect();

    if edges.len() < total {
        warn!(
            dropped = total - edges.len(),
            "dropped edges referencing missing vertices or looping on one vertex"
        );
    }
    edges
}

/// Center the bounding box on the origin and scale its largest extent to `target_size`
fn normalize(vertices: &[Vertex3D], target_size: f32) -> Vec<Vertex3D> {
    let Some(first) = vertices.first() else {
        return Vec::new();
    };

    let (min, max) = vertices
        .iter()
        .fold((*first, *first), |(min, max), v| (min.inf(v), max.sup(v)));
    let center = nalgebra::center(&min, &max);
    let largest = (max - min).max();
    let scale = if largest > 0.0 { target_size / largest } else { 1.0 };

    vertices
        .iter()
        .map(|v| Vertex3D::from((v - center) * scale))
        .collect()
}

fn parse_directive(line: &str) -> IResult<&str, Directive> {
    let (rest, keyword) = take_till1(|c: char| c.is_whitespace())(line)?;
    match keyword {
        "v" => {
            let (rest, (x, y, z)) = parse_vector3(rest)?;
            Ok((rest, Directive::Vertex(Vertex3D::new(x, y, z))))
        }
        "f" => {
            let (rest, indices) = parse_indices(rest)?;
            Ok((rest, Directive::Face(indices)))
        }
        "l" => {
            let (rest, indices) = parse_indices(rest)?;
            Ok((rest, Directive::Line(indices)))
        }
        _ => Ok(("", Directive::Ignored)),
    }
}

/// Three coordinates; anything after them (such as `w`) is ignored
fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    tuple((
        preceded(space1, float),
        preceded(space1, float),
        preceded(space1, float),
    ))(input)
}

fn parse_indices(input: &str) -> IResult<&str, Vec<i64>> {
    terminated(many1(preceded(space1, parse_index)), pair(space0, eof))(input)
}

/// A vertex index, dropping any `/texture/normal` suffix
fn parse_index(input: &str) -> IResult<&str, i64> {
    terminated(
        signed_index,
        opt(preceded(char('/'), take_till(|c: char| c.is_whitespace()))),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(text: &str) -> GeometryModel {
        Loader::default().parse_str(text).unwrap()
    }

    fn edge_pairs(model: &GeometryModel) -> Vec<(usize, usize)> {
        model.edges().iter().map(|e| (e.a, e.b)).collect()
    }

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\n";

    #[test]
    fn test_triangle_face_yields_three_edges() {
        for face in ["f 1 2 3", "f 3 2 1", "f 2 3 1"] {
            let model = parse(&format!("{TRIANGLE}{face}\n"));
            assert_eq!(edge_pairs(&model), vec![(0, 1), (0, 2), (1, 2)], "{face}");
        }
    }

    #[test]
    fn test_shared_face_edges_collapse() {
        let model = parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 3 4\n");
        assert_eq!(
            edge_pairs(&model),
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (2, 3)]
        );
    }

    #[test]
    fn test_quad_face_is_cyclic() {
        let model = parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n");
        assert_eq!(edge_pairs(&model), vec![(0, 1), (0, 3), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_line_directives_take_precedence() {
        let model = parse(&format!("{TRIANGLE}f 1 2 3\nl 3 1\n"));
        assert_eq!(edge_pairs(&model), vec![(2, 0)]);
    }

    #[test]
    fn test_polyline_is_open() {
        let model = parse("v 0 0 0\nv 1 0 0\nv 2 0 0\nv 3 0 0\nl 1 2 3 4\nl 4\n");
        assert_eq!(edge_pairs(&model), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_negative_indices_use_running_count() {
        let model = parse("v 0 0 0\nv 1 0 0\nl -1 -2\nv 2 0 0\nv 3 0 0\n");
        assert_eq!(model.vertex_count(), 4);
        assert_eq!(edge_pairs(&model), vec![(1, 0)]);
    }

    #[test]
    fn test_negative_face_indices() {
        let model = parse(&format!("{TRIANGLE}f -3 -2 -1\n"));
        assert_eq!(edge_pairs(&model), vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_texture_and_normal_suffixes_ignored() {
        let model = parse(&format!("{TRIANGLE}f 1/1/1 2//2 3/3\n"));
        assert_eq!(model.edge_count(), 3);
    }

    #[test]
    fn test_comments_and_unknown_tags_ignored() {
        let text = "# a triangle\n\no tri\nvn 0 0 1\nvt 0 0\n  # indented comment\r\nv 0 0 0\r\nv 1 0 0\nv 0 1 0\nusemtl none\nf 1 2 3\n";
        let model = parse(text);
        assert_eq!(model.vertex_count(), 3);
        assert_eq!(model.edge_count(), 3);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let model = parse("v 0 0 0\nv 1 x 0\nv 1 0 0\nv 0 1 0\nv 1 1\nf 1 2 three\nf 1 2 3\n");
        assert_eq!(model.vertex_count(), 3);
        assert_eq!(model.edge_count(), 3);
    }

    #[test]
    fn test_extra_vertex_component_ignored() {
        let model = parse("v 0 0 0 1.0\nv 2 0 0 1.0\nl 1 2\n");
        assert_eq!(model.vertex_count(), 2);
        assert_eq!(model.edge_count(), 1);
    }

    #[test]
    fn test_invalid_indices_are_dropped() {
        let model = parse(&format!("{TRIANGLE}l 1 9\nl 0 1\nl 2 2\nl 2 3\n"));
        assert_eq!(edge_pairs(&model), vec![(1, 2)]);
    }

    #[test]
    fn test_short_faces_ignored() {
        let model = parse(&format!("{TRIANGLE}f 1 2\n"));
        assert_eq!(model.vertex_count(), 3);
        assert_eq!(model.edge_count(), 0);
    }

    #[test]
    fn test_vertices_only_is_edgeless() {
        let model = parse(TRIANGLE);
        assert_eq!(model.vertex_count(), 3);
        assert!(model.edges().is_empty());
    }

    #[test]
    fn test_no_vertices_is_none() {
        assert!(Loader::default().parse_str("# nothing\nf 1 2 3\n").is_none());
        assert!(Loader::default().parse_str("").is_none());
    }

    #[test]
    fn test_normalization_centers_and_scales() {
        let model = parse("v -5 -1 0\nv 5 1 2\nv 0 0 1\n");
        let vs = model.vertices();
        let (min_x, max_x) = (vs[0].x, vs[1].x);
        assert!((max_x - min_x - DEFAULT_TARGET_SIZE).abs() < 1e-5);
        assert!((min_x + max_x).abs() < 1e-5);
        assert!((vs[0].y + 0.4).abs() < 1e-5);
        assert!((vs[1].z - 0.4).abs() < 1e-5);
        assert!(vs[2].coords.norm() < 1e-5);
    }

    #[test]
    fn test_normalization_uses_target_size() {
        let model = Loader::new(10.0).parse_str("v 0 0 0\nv 0 2 0\n").unwrap();
        assert!((model.vertices()[0].y + 5.0).abs() < 1e-5);
        assert!((model.vertices()[1].y - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_extent_is_only_centered() {
        let model = parse("v 3 4 5\nv 3 4 5\n");
        for v in model.vertices() {
            assert!(v.coords.norm() < 1e-6);
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{TRIANGLE}f 1 2 3").unwrap();

        let model = load(file.path()).unwrap();
        assert_eq!(model.vertex_count(), 3);
        assert_eq!(model.edge_count(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("missing.obj")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn test_load_file_without_vertices() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# empty\nf 1 2 3").unwrap();

        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Empty { .. }));
        assert!(err.to_string().contains("no vertices"));
    }

    #[test]
    fn test_unusable_lines_fall_back_to_faces() {
        let model = parse(&format!("{TRIANGLE}l 4\nl 1 9\nf 1 2 3\n"));
        assert_eq!(model.edge_count(), 3);
    }

    #[test]
    fn test_load_file_with_invalid_utf8() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"# caf\xff\nv 0 0 0\nv 1 0 0\nl 1 2\n").unwrap();

        let model = load(file.path()).unwrap();
        assert_eq!(model.vertex_count(), 2);
        assert_eq!(model.edges(), &[Edge::new(0, 1)]);
    }
}
