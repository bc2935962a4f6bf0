//! World simulation engine.
//!
//! This crate implements the bounded 3D voxel grid, the per-kind update rules and the
//! double-buffered generation advance.

pub mod behavior;
pub mod cell;
pub mod grid;
pub mod scenario;
pub mod world;

pub use behavior::{Action, Behavior, Snapshot};
pub use cell::{Cell, CellArena, CellId};
pub use grid::Grid;
pub use scenario::Scenario;
pub use world::{emit_population_metrics, PlacementMap, World};
