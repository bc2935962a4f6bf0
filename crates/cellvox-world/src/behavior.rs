//! Per-kind update rules.
//!
//! Every rule reads the previous generation through a [`Snapshot`] and answers with an
//! [`Action`]; the world applies actions to the generation being built. Rules never
//! write to the snapshot, so a rule's outcome does not depend on which cells were
//! processed before it.

use crate::cell::{Cell, CellArena, CellId};
use crate::grid::Grid;
use cellvox_core::{Dimensions, Direction, EntityKind, Position};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Read-only view of the previous generation
#[derive(Clone, Copy)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    pub cells: &'a CellArena,
}

impl<'a> Snapshot<'a> {
    pub fn new(grid: &'a Grid, cells: &'a CellArena) -> Self {
        Self { grid, cells }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.grid.dimensions()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.grid.contains(pos)
    }

    /// Occupant at `pos`; out-of-bounds positions read as empty
    pub fn occupant(&self, pos: Position) -> Option<&'a Cell> {
        self.grid.occupant(pos).and_then(|id| self.cells.get(id))
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.grid.is_empty_at(pos)
    }

    pub fn occupied(&self) -> impl Iterator<Item = (Position, CellId, &'a Cell)> + 'a {
        let grid: &'a Grid = self.grid;
        let cells: &'a CellArena = self.cells;
        grid.occupied()
            .filter_map(move |(pos, id)| cells.get(id).map(|cell| (pos, id, cell)))
    }
}

/// Write a rule asks the world to perform on the next generation
#[derive(Debug, Clone)]
pub enum Action {
    None,
    /// Write a fresh cell at its stored position
    Place(Cell),
    /// Clear a slot
    Vacate(Position),
    /// Move the invoking cell
    Relocate { from: Position, to: Position },
}

impl Action {
    /// Every position the action writes to
    pub fn targets(&self) -> Vec<Position> {
        match self {
            Action::None => Vec::new(),
            Action::Place(cell) => vec![cell.position],
            Action::Vacate(pos) => vec![*pos],
            Action::Relocate { from, to } => vec![*from, *to],
        }
    }
}

/// Vertical-diffusion choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffusionMove {
    Vacate,
    Rise,
    Stay,
}

impl DiffusionMove {
    pub fn random(rng: &mut ChaCha8Rng) -> Self {
        match rng.gen_range(0..3) {
            0 => DiffusionMove::Vacate,
            1 => DiffusionMove::Rise,
            _ => DiffusionMove::Stay,
        }
    }
}

/// Update rule, selected by entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Static,
    LifeRule,
    VerticalDiffusion,
    RandomWalk,
}

impl Behavior {
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Terrain | EntityKind::ColorfulTerrain | EntityKind::Tree => {
                Behavior::Static
            }
            EntityKind::ConwayCube => Behavior::LifeRule,
            EntityKind::MagicTerrain => Behavior::VerticalDiffusion,
            EntityKind::Rabbit => Behavior::RandomWalk,
        }
    }

    pub fn step(&self, cell: &Cell, snapshot: &Snapshot<'_>, rng: &mut ChaCha8Rng) -> Action {
        match self {
            Behavior::Static => Action::None,
            Behavior::LifeRule => life_rule(cell, snapshot),
            Behavior::VerticalDiffusion => diffuse(cell, snapshot, DiffusionMove::random(rng)),
            Behavior::RandomWalk => random_walk(cell, snapshot, rng),
        }
    }
}

const HORIZONTAL_NEIGHBORS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Live occupants among the 8 same-layer neighbors
pub fn live_neighbors(pos: Position, snapshot: &Snapshot<'_>) -> usize {
    HORIZONTAL_NEIGHBORS
        .iter()
        .filter(|(dx, dy)| {
            snapshot
                .occupant(pos.add(*dx, *dy, 0))
                .map_or(false, Cell::is_alive)
        })
        .count()
}

/// Game-of-life transition on one layer.
///
/// Only state changes are written; survivors and dead cells that stay dead carry over
/// through the generation copy.
pub fn life_rule(cell: &Cell, snapshot: &Snapshot<'_>) -> Action {
    let neighbors = live_neighbors(cell.position, snapshot);

    if cell.is_alive() {
        if !(2..=3).contains(&neighbors) {
            return Action::Place(cell.with_state(0));
        }
    } else if neighbors == 3 {
        return Action::Place(cell.with_state(1));
    }

    Action::None
}

/// Vertical diffusion of magic terrain.
///
/// A rise places a copy one layer up and leaves the original slot as it was, so the
/// cell shows up on both layers in the next generation.
pub fn diffuse(cell: &Cell, snapshot: &Snapshot<'_>, mv: DiffusionMove) -> Action {
    let pos = cell.position;
    let top = snapshot.dimensions().top();
    let above = pos.step(Direction::Up);

    match mv {
        DiffusionMove::Vacate => {
            if pos.z > 0 && (pos.z == top || snapshot.is_empty_at(above)) {
                Action::Vacate(pos)
            } else {
                Action::None
            }
        }
        DiffusionMove::Rise => {
            if pos.z < top && snapshot.is_empty_at(above) {
                Action::Place(cell.with_position(above))
            } else {
                Action::None
            }
        }
        DiffusionMove::Stay => Action::None,
    }
}

/// Empty, in-bounds face neighbors a walker could step into
pub fn open_moves(pos: Position, snapshot: &Snapshot<'_>) -> Vec<Position> {
    Direction::all()
        .into_iter()
        .map(|direction| pos.step(direction))
        .filter(|next| snapshot.contains(*next) && snapshot.is_empty_at(*next))
        .collect()
}

pub fn random_walk(cell: &Cell, snapshot: &Snapshot<'_>, rng: &mut ChaCha8Rng) -> Action {
    let moves = open_moves(cell.position, snapshot);
    match moves.choose(rng) {
        Some(&to) => Action::Relocate {
            from: cell.position,
            to,
        },
        None => Action::None,
    }
}
