//! Terrain and free-entity mesh construction.

use crate::mesh::{Frame, FreeMesh, MeshInstance, MeshStats, TerrainMesh};
use crate::visibility::exposed_faces;
use cellvox_core::geometry::translate;
use cellvox_core::{CubeFace, Error, GeometryTemplate, Position, Result, Triangle, Vertex};
use cellvox_world::{Cell, Snapshot, World};
use std::collections::HashMap;
use tracing::debug;

const VERTICES_PER_VOXEL: usize = 8;
const TRIANGLES_PER_VOXEL: usize = 12;

/// Builds one frame at a time. Working buffers are kept between frames.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
    intensity: Vec<u8>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mesh the world's committed generation as frame `index`
    pub fn build_frame(&mut self, world: &World, index: usize) -> Result<Frame> {
        let snapshot = world.snapshot();
        let (terrain, mut stats) = self.build_terrain(&snapshot)?;
        let entities = build_free_meshes(&snapshot);
        stats.free_meshes = entities.len();

        debug!(
            event = "frame_built",
            frame = index,
            generation = world.generation(),
            instances = stats.instances,
            vertices = stats.vertices_after_dedup,
            triangles = stats.triangles,
            free_meshes = stats.free_meshes,
            "Frame built"
        );

        Ok(Frame {
            index,
            generation: world.generation(),
            terrain,
            entities,
            stats,
        })
    }

    /// Culled, deduplicated mesh of every terrain voxel
    pub fn build_terrain(&mut self, snapshot: &Snapshot<'_>) -> Result<(TerrainMesh, MeshStats)> {
        let slots = snapshot.dimensions().volume();
        self.vertices.clear();
        self.triangles.clear();
        self.intensity.clear();
        self.vertices.reserve(slots * VERTICES_PER_VOXEL);
        self.triangles.reserve(slots * TRIANGLES_PER_VOXEL);
        self.intensity.reserve(slots * TRIANGLES_PER_VOXEL);

        let mut stats = MeshStats::default();
        let mut instances = Vec::new();

        for (pos, _, cell) in snapshot.occupied() {
            if !cell.kind.is_terrain() {
                continue;
            }
            stats.voxels_scanned += 1;

            let exposed = exposed_faces(pos, snapshot);
            if !exposed.iter().any(|&visible| visible) {
                stats.hidden_voxels += 1;
                continue;
            }

            let first_triangle = self.triangles.len();
            let added = self.append_voxel(cell, pos, &exposed)?;
            if added == 0 {
                continue;
            }

            instances.push(MeshInstance {
                index: instances.len(),
                position: pos,
                first_triangle,
                triangle_count: added,
            });
        }

        stats.instances = instances.len();
        stats.vertices_before_dedup = self.vertices.len();

        let (vertices, triangles) = dedup_vertices(&self.vertices, &self.triangles);
        stats.vertices_after_dedup = vertices.len();
        stats.triangles = triangles.len();

        let mesh = TerrainMesh {
            vertices,
            triangles,
            intensity: self.intensity.clone(),
            instances,
        };
        Ok((mesh, stats))
    }

    /// Append the visible faces of one voxel and return the number of triangles added
    fn append_voxel(
        &mut self,
        cell: &Cell,
        pos: Position,
        exposed: &[bool; CubeFace::COUNT],
    ) -> Result<usize> {
        let template = cell.geometry.as_ref();
        let mut kept: Vec<(Triangle, u8)> = Vec::with_capacity(TRIANGLES_PER_VOXEL);

        for face in CubeFace::all() {
            if !exposed[face.index()] {
                continue;
            }
            let value = cell.face_intensity.map_or(0, |faces| faces[face.index()]);
            if let Some(pair) = template.triangles.get(face.triangle_range()) {
                kept.extend(pair.iter().map(|&triangle| (triangle, value)));
            }
        }

        if kept.is_empty() {
            return Ok(0);
        }

        let (local_vertices, local_triangles) = filter_and_remap(template, &kept)?;

        let offset = self.vertices.len() as u32;
        self.vertices.extend(translate(&local_vertices, pos));
        for (triangle, (_, value)) in local_triangles.iter().zip(&kept) {
            self.triangles
                .push([triangle[0] + offset, triangle[1] + offset, triangle[2] + offset]);
            self.intensity.push(*value);
        }

        Ok(kept.len())
    }
}

/// Keep only the template vertices referenced by `kept`, in ascending template order,
/// and re-index the triangles against them.
fn filter_and_remap(
    template: &GeometryTemplate,
    kept: &[(Triangle, u8)],
) -> Result<(Vec<Vertex>, Vec<Triangle>)> {
    let mut used: Vec<u32> = kept.iter().flat_map(|(triangle, _)| *triangle).collect();
    used.sort_unstable();
    used.dedup();

    let vertices = used
        .iter()
        .map(|&index| {
            template.vertices.get(index as usize).copied().ok_or_else(|| {
                Error::InvalidState(format!(
                    "triangle index {} outside a {}-vertex template",
                    index,
                    template.vertices.len()
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // `used` is sorted and contains every index, so the search always hits
    let remap = |index: u32| used.binary_search(&index).unwrap_or_default() as u32;
    let triangles = kept
        .iter()
        .map(|(triangle, _)| [remap(triangle[0]), remap(triangle[1]), remap(triangle[2])])
        .collect();

    Ok((vertices, triangles))
}

fn vertex_key(vertex: &Vertex) -> [u32; 3] {
    // Adding 0.0 folds -0.0 into 0.0
    [
        (vertex[0] + 0.0).to_bits(),
        (vertex[1] + 0.0).to_bits(),
        (vertex[2] + 0.0).to_bits(),
    ]
}

/// Merge identical vertex positions, keeping first-occurrence order, and point every
/// triangle at the merged set
pub fn dedup_vertices(vertices: &[Vertex], triangles: &[Triangle]) -> (Vec<Vertex>, Vec<Triangle>) {
    let mut unique: Vec<Vertex> = Vec::with_capacity(vertices.len());
    let mut seen: HashMap<[u32; 3], u32> = HashMap::with_capacity(vertices.len());

    let remap: Vec<u32> = vertices
        .iter()
        .map(|vertex| {
            *seen.entry(vertex_key(vertex)).or_insert_with(|| {
                unique.push(*vertex);
                (unique.len() - 1) as u32
            })
        })
        .collect();

    let triangles = triangles
        .iter()
        .map(|t| {
            [
                remap[t[0] as usize],
                remap[t[1] as usize],
                remap[t[2] as usize],
            ]
        })
        .collect();

    (unique, triangles)
}

/// One mesh per free entity. External assets are dropped onto the voxel floor first.
pub fn build_free_meshes(snapshot: &Snapshot<'_>) -> Vec<FreeMesh> {
    snapshot
        .occupied()
        .filter(|(_, _, cell)| !cell.kind.is_terrain())
        .map(|(pos, _, cell)| free_mesh(cell, pos))
        .collect()
}

pub fn free_mesh(cell: &Cell, pos: Position) -> FreeMesh {
    let template = cell.geometry.as_ref();
    let vertices = if template.is_external() {
        translate(&template.normalized_to_floor(), pos)
    } else {
        template.translated(pos)
    };

    FreeMesh {
        kind: cell.kind,
        position: pos,
        vertices,
        triangles: template.triangles.clone(),
        vertex_colors: template.vertex_colors.clone(),
    }
}
