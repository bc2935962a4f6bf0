//! Bounded 3D grid of cell handles.

use crate::cell::CellId;
use cellvox_core::{Dimensions, Position, Result};

/// A bounded 3D grid where each slot is empty or holds one [`CellId`].
///
/// Slots are stored x-major, then y, then z. Cloning a grid copies handles only, which
/// is what the generation advance relies on for its shallow copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    dimensions: Dimensions,
    slots: Vec<Option<CellId>>,
}

impl Grid {
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            slots: vec![None; dimensions.volume()],
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.dimensions.contains(pos)
    }

    /// Occupant at `pos`, or `OutOfBounds`
    pub fn get(&self, pos: Position) -> Result<Option<CellId>> {
        self.dimensions.check(pos)?;
        Ok(self.slots[self.pos_to_index(pos)])
    }

    /// Place, overwrite or clear the slot at `pos`
    pub fn set(&mut self, pos: Position, occupant: Option<CellId>) -> Result<()> {
        self.dimensions.check(pos)?;
        let index = self.pos_to_index(pos);
        self.slots[index] = occupant;
        Ok(())
    }

    /// Occupant at `pos`; positions outside the grid read as empty
    pub fn occupant(&self, pos: Position) -> Option<CellId> {
        if self.contains(pos) {
            self.slots[self.pos_to_index(pos)]
        } else {
            None
        }
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.occupant(pos).is_none()
    }

    pub fn clear(&mut self, pos: Position) -> Result<Option<CellId>> {
        self.dimensions.check(pos)?;
        let index = self.pos_to_index(pos);
        Ok(self.slots[index].take())
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        self.dimensions.index_of(pos)
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        self.dimensions.position_at(index)
    }

    /// Occupied slots with their handles, in slot order
    pub fn occupied(&self) -> impl Iterator<Item = (Position, CellId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(move |(i, slot)| slot.map(|id| (self.index_to_pos(i), id)))
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }

    /// Iterator over all positions
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.slots.len()).map(move |i| self.index_to_pos(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellvox_core::Error;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(Dimensions::new(4, 3, 2));
        assert_eq!(grid.slots.len(), 24);
        assert!(grid.is_empty());
        assert_eq!(grid.positions().count(), 24);
    }

    #[test]
    fn test_index_roundtrip() {
        let grid = Grid::new(Dimensions::new(4, 3, 2));
        for (i, pos) in grid.positions().enumerate() {
            assert_eq!(grid.pos_to_index(pos), i);
        }
        assert_eq!(grid.index_to_pos(0), Position::new(0, 0, 0));
        assert_eq!(grid.index_to_pos(1), Position::new(0, 0, 1));
        assert_eq!(grid.index_to_pos(2), Position::new(0, 1, 0));
        assert_eq!(grid.index_to_pos(23), Position::new(3, 2, 1));
    }

    #[test]
    fn test_set_get_clear() {
        let mut grid = Grid::new(Dimensions::new(2, 2, 2));
        let pos = Position::new(1, 0, 1);

        grid.set(pos, Some(CellId(7))).unwrap();
        assert_eq!(grid.get(pos).unwrap(), Some(CellId(7)));
        assert_eq!(grid.occupied_count(), 1);

        assert_eq!(grid.clear(pos).unwrap(), Some(CellId(7)));
        assert!(grid.is_empty_at(pos));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid = Grid::new(Dimensions::new(2, 2, 2));

        assert!(matches!(
            grid.get(Position::new(2, 0, 0)),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(matches!(
            grid.set(Position::new(0, 0, -1), Some(CellId(0))),
            Err(Error::OutOfBounds { .. })
        ));
        assert_eq!(grid.occupant(Position::new(-1, 0, 0)), None);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_occupied_in_slot_order() {
        let mut grid = Grid::new(Dimensions::new(3, 3, 3));
        grid.set(Position::new(2, 0, 0), Some(CellId(0))).unwrap();
        grid.set(Position::new(0, 1, 2), Some(CellId(1))).unwrap();
        grid.set(Position::new(0, 1, 0), Some(CellId(2))).unwrap();

        let occupied: Vec<_> = grid.occupied().collect();
        assert_eq!(
            occupied,
            vec![
                (Position::new(0, 1, 0), CellId(2)),
                (Position::new(0, 1, 2), CellId(1)),
                (Position::new(2, 0, 0), CellId(0)),
            ]
        );
    }

    #[test]
    fn test_clone_is_shallow() {
        let mut grid = Grid::new(Dimensions::new(2, 2, 2));
        grid.set(Position::new(0, 0, 0), Some(CellId(3))).unwrap();

        let mut copy = grid.clone();
        assert_eq!(copy, grid);

        copy.clear(Position::new(0, 0, 0)).unwrap();
        assert_eq!(grid.get(Position::new(0, 0, 0)).unwrap(), Some(CellId(3)));
    }
}
