//! Core type definitions for the voxel world.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of occupant a voxel can hold.
///
/// The numeric codes are stable and are what placement maps refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EntityKind {
    Terrain = 1,
    MagicTerrain = 2,
    ConwayCube = 3,
    Tree = 4,
    ColorfulTerrain = 5,
    Rabbit = 10,
}

impl EntityKind {
    pub fn all() -> [EntityKind; 6] {
        [
            EntityKind::Terrain,
            EntityKind::MagicTerrain,
            EntityKind::ConwayCube,
            EntityKind::Tree,
            EntityKind::ColorfulTerrain,
            EntityKind::Rabbit,
        ]
    }

    /// Terrain kinds sit at a fixed voxel and take part in face culling.
    /// Everything else is rendered as its own mesh.
    pub fn is_terrain(&self) -> bool {
        match self {
            EntityKind::Terrain
            | EntityKind::MagicTerrain
            | EntityKind::ConwayCube
            | EntityKind::ColorfulTerrain => true,
            EntityKind::Tree | EntityKind::Rabbit => false,
        }
    }

    /// Kinds that cannot be drawn with the built-in cube.
    pub fn requires_asset(&self) -> bool {
        matches!(self, EntityKind::Rabbit)
    }

    /// Per-face intensity indices (bottom, top, left, right, front, back) for
    /// terrain kinds. `state` only matters for Conway cubes (1 = alive).
    pub fn face_intensity(&self, state: i32) -> Option<[u8; 6]> {
        match self {
            EntityKind::Terrain => Some([0, 7, 7, 7, 8, 8]),
            EntityKind::MagicTerrain | EntityKind::ColorfulTerrain => Some([0, 1, 2, 3, 4, 5]),
            EntityKind::ConwayCube if state == 1 => Some([18; 6]),
            EntityKind::ConwayCube => Some([0; 6]),
            EntityKind::Tree | EntityKind::Rabbit => None,
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            1 => Ok(EntityKind::Terrain),
            2 => Ok(EntityKind::MagicTerrain),
            3 => Ok(EntityKind::ConwayCube),
            4 => Ok(EntityKind::Tree),
            5 => Ok(EntityKind::ColorfulTerrain),
            10 => Ok(EntityKind::Rabbit),
            other => Err(Error::UnknownEntityKind(other)),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Terrain => "terrain",
            EntityKind::MagicTerrain => "magic_terrain",
            EntityKind::ConwayCube => "conway_cube",
            EntityKind::Tree => "tree",
            EntityKind::ColorfulTerrain => "colorful_terrain",
            EntityKind::Rabbit => "rabbit",
        };
        f.write_str(name)
    }
}

/// 3D integer position in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn add(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy, dz) = direction.to_delta();
        self.add(dx, dy, dz)
    }

    /// Manhattan distance to another position
    pub fn manhattan_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Axis-aligned direction between face-adjacent voxels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    West,
    East,
    South,
    North,
    Down,
    Up,
}

impl Direction {
    pub fn to_delta(&self) -> (i32, i32, i32) {
        match self {
            Direction::West => (-1, 0, 0),
            Direction::East => (1, 0, 0),
            Direction::South => (0, -1, 0),
            Direction::North => (0, 1, 0),
            Direction::Down => (0, 0, -1),
            Direction::Up => (0, 0, 1),
        }
    }

    pub fn all() -> [Direction; 6] {
        [
            Direction::West,
            Direction::East,
            Direction::South,
            Direction::North,
            Direction::Down,
            Direction::Up,
        ]
    }
}

/// Extent of the grid along each axis: length (x), width (y), height (z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: i32,
    pub width: i32,
    pub height: i32,
}

impl Dimensions {
    pub fn new(length: i32, width: i32, height: i32) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0..self.length).contains(&pos.x)
            && (0..self.width).contains(&pos.y)
            && (0..self.height).contains(&pos.z)
    }

    /// Same check as [`contains`](Self::contains), but as an error
    pub fn check(&self, pos: Position) -> Result<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                position: pos,
                dimensions: *self,
            })
        }
    }

    pub fn volume(&self) -> usize {
        self.length.max(0) as usize * self.width.max(0) as usize * self.height.max(0) as usize
    }

    pub fn top(&self) -> i32 {
        self.height - 1
    }

    /// Slot index of an in-bounds position, x-major then y then z
    pub fn index_of(&self, pos: Position) -> usize {
        let width = self.width as usize;
        let height = self.height as usize;
        (pos.x as usize * width + pos.y as usize) * height + pos.z as usize
    }

    /// Inverse of [`index_of`](Self::index_of)
    pub fn position_at(&self, index: usize) -> Position {
        let width = self.width as usize;
        let height = self.height as usize;
        let z = index % height;
        let y = (index / height) % width;
        let x = index / (height * width);
        Position::new(x as i32, y as i32, z as i32)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.length, self.width, self.height)
    }
}
