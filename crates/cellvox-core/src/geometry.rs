//! Geometry templates shared by cells of the same kind.
//!
//! A template is expressed in local coordinates: the built-in cube spans the unit
//! cube `[0, 1]^3`, external assets use whatever coordinates they were authored in
//! and are normalized when they are placed in the world.

use crate::types::{Direction, Position};
use serde::{Deserialize, Serialize};

pub type Vertex = [f32; 3];
pub type Triangle = [u32; 3];
pub type Rgba = [u8; 4];

/// Lowering applied to floor-normalized assets, as a fraction of their lowest point.
pub const FLOOR_LIFT_FACTOR: f32 = 0.99;

/// One face of the unit cube, in template order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CubeFace {
    Bottom,
    Top,
    Left,
    Right,
    Front,
    Back,
}

impl CubeFace {
    pub const COUNT: usize = 6;

    pub fn all() -> [CubeFace; 6] {
        [
            CubeFace::Bottom,
            CubeFace::Top,
            CubeFace::Left,
            CubeFace::Right,
            CubeFace::Front,
            CubeFace::Back,
        ]
    }

    /// Position of the face in the template. Triangles `2i` and `2i + 1` belong to face `i`.
    pub fn index(&self) -> usize {
        match self {
            CubeFace::Bottom => 0,
            CubeFace::Top => 1,
            CubeFace::Left => 2,
            CubeFace::Right => 3,
            CubeFace::Front => 4,
            CubeFace::Back => 5,
        }
    }

    /// Direction of the voxel on the other side of this face
    pub fn normal(&self) -> Direction {
        match self {
            CubeFace::Bottom => Direction::Down,
            CubeFace::Top => Direction::Up,
            CubeFace::Left => Direction::West,
            CubeFace::Right => Direction::East,
            CubeFace::Front => Direction::South,
            CubeFace::Back => Direction::North,
        }
    }

    pub fn triangle_range(&self) -> std::ops::Range<usize> {
        let first = self.index() * 2;
        first..first + 2
    }
}

/// Where a template came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateSource {
    BuiltinCube,
    External,
}

/// Vertex positions, triangle indices and optional per-vertex colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryTemplate {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
    pub vertex_colors: Option<Vec<Rgba>>,
    pub source: TemplateSource,
}

impl GeometryTemplate {
    pub fn external(
        vertices: Vec<Vertex>,
        triangles: Vec<Triangle>,
        vertex_colors: Option<Vec<Rgba>>,
    ) -> Self {
        Self {
            vertices,
            triangles,
            vertex_colors,
            source: TemplateSource::External,
        }
    }

    /// The 8-vertex, 12-triangle unit cube. Triangles come in face pairs ordered as
    /// [`CubeFace::all`].
    pub fn unit_cube() -> Self {
        let xs = [0, 1, 0, 1, 0, 1, 0, 1];
        let ys = [0, 0, 1, 1, 0, 0, 1, 1];
        let zs = [0, 0, 0, 0, 1, 1, 1, 1];
        let vertices = (0..8)
            .map(|i| [xs[i] as f32, ys[i] as f32, zs[i] as f32])
            .collect();

        let triangles = vec![
            // bottom
            [0, 1, 3],
            [3, 2, 0],
            // top
            [4, 5, 7],
            [7, 6, 4],
            // left
            [0, 2, 6],
            [6, 4, 0],
            // right
            [1, 3, 7],
            [7, 5, 1],
            // front
            [0, 4, 5],
            [5, 1, 0],
            // back
            [2, 6, 7],
            [7, 3, 2],
        ];

        Self {
            vertices,
            triangles,
            vertex_colors: None,
            source: TemplateSource::BuiltinCube,
        }
    }

    pub fn is_external(&self) -> bool {
        self.source == TemplateSource::External
    }

    /// Vertices translated so the template's local origin sits at `position`
    pub fn translated(&self, position: Position) -> Vec<Vertex> {
        translate(&self.vertices, position)
    }

    /// Rescale the vertices into the unit cube and drop them onto its floor.
    ///
    /// The bounding box is centered and scaled so the largest extent is 1, shifted
    /// into `[0, 1]`, then lowered by [`FLOOR_LIFT_FACTOR`] of its lowest z.
    pub fn normalized_to_floor(&self) -> Vec<Vertex> {
        if self.vertices.is_empty() {
            return Vec::new();
        }

        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for vertex in &self.vertices {
            for axis in 0..3 {
                min[axis] = min[axis].min(vertex[axis]);
                max[axis] = max[axis].max(vertex[axis]);
            }
        }

        let center = [
            (min[0] + max[0]) / 2.0,
            (min[1] + max[1]) / 2.0,
            (min[2] + max[2]) / 2.0,
        ];
        let extent = (0..3).map(|axis| max[axis] - min[axis]).fold(0.0, f32::max);
        let scale = if extent > 0.0 { extent } else { 1.0 };

        let mut normalized: Vec<Vertex> = self
            .vertices
            .iter()
            .map(|v| {
                [
                    (v[0] - center[0]) / scale + 0.5,
                    (v[1] - center[1]) / scale + 0.5,
                    (v[2] - center[2]) / scale + 0.5,
                ]
            })
            .collect();

        let min_z = normalized.iter().map(|v| v[2]).fold(f32::INFINITY, f32::min);
        for vertex in &mut normalized {
            vertex[2] -= min_z * FLOOR_LIFT_FACTOR;
        }

        normalized
    }
}

pub fn translate(vertices: &[Vertex], position: Position) -> Vec<Vertex> {
    let offset = [position.x as f32, position.y as f32, position.z as f32];
    vertices
        .iter()
        .map(|v| [v[0] + offset[0], v[1] + offset[1], v[2] + offset[2]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_cube_shape() {
        let cube = GeometryTemplate::unit_cube();
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.triangles.len(), 12);
        assert_eq!(cube.source, TemplateSource::BuiltinCube);
    }

    #[test]
    fn test_cube_faces_lie_on_their_planes() {
        let cube = GeometryTemplate::unit_cube();

        for face in CubeFace::all() {
            let (dx, dy, dz) = face.normal().to_delta();
            let (axis, value) = match (dx, dy, dz) {
                (-1, 0, 0) => (0, 0.0),
                (1, 0, 0) => (0, 1.0),
                (0, -1, 0) => (1, 0.0),
                (0, 1, 0) => (1, 1.0),
                (0, 0, -1) => (2, 0.0),
                _ => (2, 1.0),
            };

            for triangle in &cube.triangles[face.triangle_range()] {
                for &index in triangle {
                    assert_eq!(cube.vertices[index as usize][axis], value, "{:?}", face);
                }
            }
        }
    }

    #[test]
    fn test_translated() {
        let cube = GeometryTemplate::unit_cube();
        let moved = cube.translated(Position::new(2, 3, 4));
        assert_eq!(moved[0], [2.0, 3.0, 4.0]);
        assert_eq!(moved[7], [3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_normalized_to_floor() {
        let template = GeometryTemplate::external(
            vec![[-2.0, -1.0, 10.0], [2.0, 1.0, 10.0], [0.0, 0.0, 12.0]],
            vec![[0, 1, 2]],
            None,
        );

        let normalized = template.normalized_to_floor();

        // Largest extent (x, 4 units) maps to [0, 1]
        assert!((normalized[0][0] - 0.0).abs() < 1e-6);
        assert!((normalized[1][0] - 1.0).abs() < 1e-6);

        // Lowest point ends up just above the floor
        let min_z = normalized.iter().map(|v| v[2]).fold(f32::INFINITY, f32::min);
        assert!(min_z >= 0.0);
        assert!(min_z < 0.01);
    }

    #[test]
    fn test_normalize_degenerate_template() {
        let template = GeometryTemplate::external(vec![[3.0, 3.0, 3.0]], vec![], None);
        let normalized = template.normalized_to_floor();
        assert_eq!(normalized.len(), 1);
        assert!(normalized[0].iter().all(|c| c.is_finite()));
    }
}
