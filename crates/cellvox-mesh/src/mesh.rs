//! Mesh output types.

use cellvox_core::{EntityKind, Position, Rgba, Triangle, Vertex};
use serde::{Deserialize, Serialize};

/// One terrain voxel that contributed triangles to the terrain mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshInstance {
    pub index: usize,
    pub position: Position,
    /// First triangle of this voxel in [`TerrainMesh::triangles`]
    pub first_triangle: usize,
    pub triangle_count: usize,
}

impl MeshInstance {
    /// Hover label shown by renderers
    pub fn label(&self) -> String {
        format!("Cube Index: {}", self.index)
    }

    pub fn triangle_range(&self) -> std::ops::Range<usize> {
        self.first_triangle..self.first_triangle + self.triangle_count
    }
}

/// Culled and deduplicated mesh of every terrain voxel.
///
/// `intensity` runs parallel to `triangles`: one palette index per triangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerrainMesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
    pub intensity: Vec<u8>,
    pub instances: Vec<MeshInstance>,
}

impl TerrainMesh {
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Instance owning the given triangle
    pub fn instance_for_triangle(&self, triangle: usize) -> Option<&MeshInstance> {
        self.instances
            .iter()
            .find(|instance| instance.triangle_range().contains(&triangle))
    }
}

/// Stand-alone mesh of a free entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeMesh {
    pub kind: EntityKind,
    pub position: Position,
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
    pub vertex_colors: Option<Vec<Rgba>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshStats {
    pub voxels_scanned: usize,
    pub instances: usize,
    pub hidden_voxels: usize,
    pub vertices_before_dedup: usize,
    pub vertices_after_dedup: usize,
    pub triangles: usize,
    pub free_meshes: usize,
}

impl MeshStats {
    /// Fraction of vertices removed by deduplication
    pub fn dedup_ratio(&self) -> f64 {
        if self.vertices_before_dedup == 0 {
            return 0.0;
        }
        1.0 - self.vertices_after_dedup as f64 / self.vertices_before_dedup as f64
    }
}

/// Everything a renderer needs to draw one generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub index: usize,
    pub generation: u64,
    pub terrain: TerrainMesh,
    pub entities: Vec<FreeMesh>,
    pub stats: MeshStats,
}

impl Frame {
    pub fn name(&self) -> String {
        format!("frame_{}", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_label_and_range() {
        let instance = MeshInstance {
            index: 3,
            position: Position::new(1, 2, 0),
            first_triangle: 10,
            triangle_count: 8,
        };

        assert_eq!(instance.label(), "Cube Index: 3");
        assert!(instance.triangle_range().contains(&17));
        assert!(!instance.triangle_range().contains(&18));
    }

    #[test]
    fn test_instance_lookup() {
        let mesh = TerrainMesh {
            instances: vec![
                MeshInstance {
                    index: 0,
                    position: Position::new(0, 0, 0),
                    first_triangle: 0,
                    triangle_count: 10,
                },
                MeshInstance {
                    index: 1,
                    position: Position::new(1, 0, 0),
                    first_triangle: 10,
                    triangle_count: 6,
                },
            ],
            ..Default::default()
        };

        assert_eq!(mesh.instance_for_triangle(12).map(|i| i.index), Some(1));
        assert!(mesh.instance_for_triangle(16).is_none());
    }

    #[test]
    fn test_dedup_ratio() {
        let stats = MeshStats {
            vertices_before_dedup: 16,
            vertices_after_dedup: 12,
            ..Default::default()
        };
        assert!((stats.dedup_ratio() - 0.25).abs() < 1e-9);
        assert_eq!(MeshStats::default().dedup_ratio(), 0.0);
    }
}
