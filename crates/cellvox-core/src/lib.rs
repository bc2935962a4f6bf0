//! Core types and utilities for the cellvox voxel automaton.

pub mod assets;
pub mod config;
pub mod error;
pub mod geometry;
pub mod stats;
pub mod types;

pub use assets::{AssetProvider, ModelLibrary};
pub use config::*;
pub use error::{Error, Result};
pub use geometry::{CubeFace, GeometryTemplate, Rgba, TemplateSource, Triangle, Vertex};
pub use stats::*;
pub use types::*;
