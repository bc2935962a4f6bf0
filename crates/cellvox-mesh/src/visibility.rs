//! Face culling between neighboring terrain voxels.

use cellvox_core::{CubeFace, Position};
use cellvox_world::Snapshot;

/// Whether the voxel at `pos` hides a neighbor's face
pub fn is_occluding(pos: Position, snapshot: &Snapshot<'_>) -> bool {
    snapshot
        .occupant(pos)
        .map_or(false, |cell| cell.kind.is_terrain())
}

/// Visible faces of the voxel at `pos`, indexed like [`CubeFace::all`].
///
/// The bottom face is never drawn. Any other face shows unless the neighbor across it
/// is a terrain voxel; out-of-bounds neighbors count as empty.
pub fn exposed_faces(pos: Position, snapshot: &Snapshot<'_>) -> [bool; CubeFace::COUNT] {
    let mut exposed = [false; CubeFace::COUNT];
    for face in CubeFace::all() {
        if face == CubeFace::Bottom {
            continue;
        }
        exposed[face.index()] = !is_occluding(pos.step(face.normal()), snapshot);
    }
    exposed
}

pub fn exposed_count(exposed: &[bool; CubeFace::COUNT]) -> usize {
    exposed.iter().filter(|&&visible| visible).count()
}
