//! Cell state and the arena that owns every cell.

use cellvox_core::{EntityKind, GeometryTemplate, Position};
use std::sync::Arc;

/// Stable handle to a cell in a [`CellArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(pub u32);

impl CellId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A voxel occupant
#[derive(Debug, Clone)]
pub struct Cell {
    pub kind: EntityKind,
    pub state: i32,
    /// Slot that owns this cell. Refreshed by the world on every move.
    pub position: Position,
    pub geometry: Arc<GeometryTemplate>,
    /// Intensity per cube face, terrain kinds only
    pub face_intensity: Option<[u8; 6]>,
}

impl Cell {
    pub fn new(kind: EntityKind, position: Position, geometry: Arc<GeometryTemplate>) -> Self {
        Self {
            kind,
            state: 0,
            position,
            geometry,
            face_intensity: kind.face_intensity(0),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state == 1
    }

    pub fn set_state(&mut self, state: i32) {
        self.state = state;
        self.face_intensity = self.kind.face_intensity(state);
    }

    pub fn set_alive(&mut self) {
        self.set_state(1);
    }

    pub fn set_dead(&mut self) {
        self.set_state(0);
    }

    /// Copy of this cell with a different state, sharing the geometry
    pub fn with_state(&self, state: i32) -> Self {
        let mut copy = self.clone();
        copy.set_state(state);
        copy
    }

    /// Copy of this cell at a different position, sharing the geometry
    pub fn with_position(&self, position: Position) -> Self {
        let mut copy = self.clone();
        copy.position = position;
        copy
    }

    pub fn move_to(&mut self, position: Position) {
        self.position = position;
    }
}

/// Slot storage for cells, addressed by [`CellId`].
///
/// Freed slots are recycled, so a handle stays valid until the cell it names is removed.
#[derive(Debug, Default)]
pub struct CellArena {
    slots: Vec<Option<Cell>>,
    free_list: Vec<usize>,
}

impl CellArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
        }
    }

    pub fn insert(&mut self, cell: Cell) -> CellId {
        match self.free_list.pop() {
            Some(index) => {
                self.slots[index] = Some(cell);
                CellId(index as u32)
            }
            None => {
                self.slots.push(Some(cell));
                CellId((self.slots.len() - 1) as u32)
            }
        }
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.slots.get(id.index()).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.slots.get_mut(id.index()).and_then(|slot| slot.as_mut())
    }

    pub fn remove(&mut self, id: CellId) -> Option<Cell> {
        let cell = self.slots.get_mut(id.index())?.take()?;
        self.free_list.push(id.index());
        Some(cell)
    }

    /// Remove every cell whose handle is not in `live`. Returns how many were freed.
    pub fn sweep(&mut self, live: impl IntoIterator<Item = CellId>) -> usize {
        let mut marked = vec![false; self.slots.len()];
        for id in live {
            if let Some(mark) = marked.get_mut(id.index()) {
                *mark = true;
            }
        }

        let mut freed = 0;
        for (index, keep) in marked.into_iter().enumerate() {
            if !keep && self.slots[index].take().is_some() {
                self.free_list.push(index);
                freed += 1;
            }
        }
        freed
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|cell| (CellId(i as u32), cell)))
    }
}
