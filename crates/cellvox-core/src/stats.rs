//! Population and activity statistics gathered while the world evolves.

use crate::types::EntityKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of one committed generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number after the advance
    pub generation: u64,
    /// Occupied slots in the committed grid
    pub occupied: usize,
    /// Occupants with state 1
    pub live_cells: usize,
    /// Occupants per kind
    pub per_kind: BTreeMap<EntityKind, usize>,
    /// Fresh cells written by behaviors
    pub placements: usize,
    /// Slots cleared by behaviors
    pub vacates: usize,
    /// Cells moved by behaviors
    pub relocations: usize,
}

impl GenerationStats {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            ..Default::default()
        }
    }

    pub fn record_occupant(&mut self, kind: EntityKind, state: i32) {
        self.occupied += 1;
        if state == 1 {
            self.live_cells += 1;
        }
        *self.per_kind.entry(kind).or_insert(0) += 1;
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.per_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Number of actions that changed the grid
    pub fn activity(&self) -> usize {
        self.placements + self.vacates + self.relocations
    }
}

/// Aggregate over a whole run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub generations: u64,
    pub avg_occupied: f64,
    pub peak_occupied: usize,
    pub avg_live_cells: f64,
    pub total_placements: u64,
    pub total_vacates: u64,
    pub total_relocations: u64,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one generation into the summary
    pub fn update(&mut self, stats: &GenerationStats) {
        let n = self.generations as f64;
        let new_n = n + 1.0;

        // Incremental mean
        self.avg_occupied = (self.avg_occupied * n + stats.occupied as f64) / new_n;
        self.avg_live_cells = (self.avg_live_cells * n + stats.live_cells as f64) / new_n;

        self.peak_occupied = self.peak_occupied.max(stats.occupied);
        self.total_placements += stats.placements as u64;
        self.total_vacates += stats.vacates as u64;
        self.total_relocations += stats.relocations as u64;

        self.generations += 1;
    }
}
