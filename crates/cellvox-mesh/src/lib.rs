//! Mesh construction for rendering the voxel world.
//!
//! Terrain voxels are merged into one culled, deduplicated triangle mesh per frame.
//! Free entities get one mesh each.

pub mod builder;
pub mod mesh;
pub mod palette;
pub mod recorder;
pub mod visibility;

pub use builder::{dedup_vertices, MeshBuilder};
pub use mesh::{Frame, FreeMesh, MeshInstance, MeshStats, TerrainMesh};
pub use recorder::{FrameRecorder, FrameSink};
