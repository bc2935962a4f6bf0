//! The voxel world and its generation-advance protocol.

use crate::behavior::{Action, Behavior, Snapshot};
use crate::cell::{Cell, CellArena, CellId};
use crate::grid::Grid;
use cellvox_core::{
    AssetProvider, Dimensions, EntityKind, Error, GenerationStats, ModelLibrary, Position,
    Result, RunSummary, WorldConfig,
};
use rand_chacha::ChaCha8Rng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, trace, warn};

/// Placement request: column (x, y) to entity kind code
pub type PlacementMap = BTreeMap<(i32, i32), u8>;

pub struct World {
    grid: Grid,
    cells: CellArena,
    assets: Box<dyn AssetProvider>,
    rng: ChaCha8Rng,
    generation: u64,
}

impl World {
    /// World with the built-in model library
    pub fn new(config: &WorldConfig, seed: u64) -> Result<Self> {
        Self::with_assets(config, seed, Box::new(ModelLibrary::new()))
    }

    pub fn with_assets(
        config: &WorldConfig,
        seed: u64,
        assets: Box<dyn AssetProvider>,
    ) -> Result<Self> {
        config.validate()?;
        let dimensions = config.dimensions();

        debug!(%dimensions, seed, "Creating world");

        Ok(Self {
            grid: Grid::new(dimensions),
            cells: CellArena::new(),
            assets,
            rng: ChaCha8Rng::seed_from_u64(seed),
            generation: 0,
        })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.grid.dimensions()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cells(&self) -> &CellArena {
        &self.cells
    }

    /// Read-only view of the committed generation
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::new(&self.grid, &self.cells)
    }

    pub fn get_cell(&self, x: i32, y: i32, z: i32) -> Result<Option<&Cell>> {
        let id = self.grid.get(Position::new(x, y, z))?;
        Ok(id.and_then(|id| self.cells.get(id)))
    }

    pub fn get_cell_mut(&mut self, x: i32, y: i32, z: i32) -> Result<Option<&mut Cell>> {
        let id = self.grid.get(Position::new(x, y, z))?;
        Ok(match id {
            Some(id) => self.cells.get_mut(id),
            None => None,
        })
    }

    /// Place, overwrite or clear a slot. A placed cell takes the slot's coordinates.
    pub fn set_cell(&mut self, x: i32, y: i32, z: i32, cell: Option<Cell>) -> Result<()> {
        let pos = Position::new(x, y, z);
        let previous = self.grid.get(pos)?;

        let occupant = cell.map(|mut cell| {
            cell.move_to(pos);
            self.cells.insert(cell)
        });
        self.grid.set(pos, occupant)?;

        // A handle lives in at most one committed slot
        if let Some(previous) = previous {
            self.cells.remove(previous);
        }
        Ok(())
    }

    /// Build a cell of `kind` at `position` with the kind's geometry
    pub fn create_entity(&self, kind: EntityKind, position: Position) -> Result<Cell> {
        let geometry = self.assets.template(kind)?;
        Ok(Cell::new(kind, position, geometry))
    }

    pub fn set_entity(&mut self, kind: EntityKind, x: i32, y: i32, z: i32) -> Result<()> {
        let pos = Position::new(x, y, z);
        self.dimensions().check(pos)?;
        let cell = self.create_entity(kind, pos)?;
        self.set_cell(x, y, z, Some(cell))
    }

    /// Stack cells of `kind` on every column of the height map, from z = 0 up to the
    /// column's height. The map is rows of x, each row indexed by y.
    #[instrument(skip(self, height_map))]
    pub fn set_terrain_with_height_map(
        &mut self,
        kind: EntityKind,
        height_map: &[Vec<i32>],
    ) -> Result<()> {
        let dims = self.dimensions();

        // Validate everything before the first write
        for (x, row) in height_map.iter().enumerate() {
            for (y, &height) in row.iter().enumerate() {
                if height <= 0 {
                    continue;
                }
                let top = Position::new(x as i32, y as i32, height - 1);
                dims.check(top)?;
            }
        }
        let geometry = self.assets.template(kind)?;

        let mut placed = 0usize;
        for (x, row) in height_map.iter().enumerate() {
            for (y, &height) in row.iter().enumerate() {
                for z in 0..height.max(0) {
                    let pos = Position::new(x as i32, y as i32, z);
                    let cell = Cell::new(kind, pos, geometry.clone());
                    self.set_cell(pos.x, pos.y, pos.z, Some(cell))?;
                    placed += 1;
                }
            }
        }

        debug!(placed, "Terrain placed from height map");
        Ok(())
    }

    /// Lowest empty z of a column, or the top layer when the column is full
    pub fn find_lowest_z(&self, x: i32, y: i32) -> Result<i32> {
        let dims = self.dimensions();
        dims.check(Position::new(x, y, 0))?;

        Ok((0..dims.height)
            .find(|&z| self.grid.is_empty_at(Position::new(x, y, z)))
            .unwrap_or(dims.top()))
    }

    /// Drop an entity into column (x, y) and return where it landed
    pub fn place_entity(&mut self, kind: EntityKind, x: i32, y: i32) -> Result<Position> {
        let z = self.find_lowest_z(x, y)?;
        self.set_entity(kind, x, y, z)?;
        Ok(Position::new(x, y, z))
    }

    /// Place entities from a placement map.
    ///
    /// Columns outside the footprint and unknown kind codes are skipped. A missing
    /// asset fails the whole call before anything is placed.
    pub fn place_entities(&mut self, placements: &PlacementMap) -> Result<usize> {
        let dims = self.dimensions();
        let mut resolved = Vec::with_capacity(placements.len());

        for (&(x, y), &code) in placements {
            if !dims.contains(Position::new(x, y, 0)) {
                trace!(x, y, "Skipping placement outside the world");
                continue;
            }
            let kind = match EntityKind::from_code(code) {
                Ok(kind) => kind,
                Err(err) => {
                    warn!(x, y, code, "Skipping placement: {}", err);
                    continue;
                }
            };
            self.assets.template(kind)?;
            resolved.push((kind, x, y));
        }

        for &(kind, x, y) in &resolved {
            self.place_entity(kind, x, y)?;
        }

        Ok(resolved.len())
    }

    /// Advance the world by one generation.
    ///
    /// Rules read the committed grid and their actions are applied to a shallow copy of
    /// it, in slot order. The copy only replaces the committed grid once every action
    /// has been validated and applied.
    pub fn advance_generation(&mut self) -> Result<GenerationStats> {
        let actions: Vec<(CellId, Action)> = {
            let snapshot = Snapshot::new(&self.grid, &self.cells);
            let mut actions = Vec::new();
            for (_, id, cell) in snapshot.occupied() {
                let action = Behavior::for_kind(cell.kind).step(cell, &snapshot, &mut self.rng);
                if !matches!(action, Action::None) {
                    actions.push((id, action));
                }
            }
            actions
        };

        let dims = self.dimensions();
        for (_, action) in &actions {
            for target in action.targets() {
                dims.check(target)?;
            }
        }

        let mut next = self.grid.clone();
        let mut stats = GenerationStats::new(self.generation + 1);

        for (id, action) in actions {
            match action {
                Action::None => {}
                Action::Place(cell) => {
                    let pos = cell.position;
                    let new_id = self.cells.insert(cell);
                    next.set(pos, Some(new_id))?;
                    stats.placements += 1;
                }
                Action::Vacate(pos) => {
                    next.clear(pos)?;
                    stats.vacates += 1;
                }
                Action::Relocate { from, to } => {
                    next.clear(from)?;
                    next.set(to, Some(id))?;
                    if let Some(cell) = self.cells.get_mut(id) {
                        cell.move_to(to);
                    }
                    stats.relocations += 1;
                }
            }
        }

        self.grid = next;
        self.cells.sweep(self.grid.occupied().map(|(_, id)| id));
        self.generation += 1;

        for (_, _, cell) in self.snapshot().occupied() {
            stats.record_occupant(cell.kind, cell.state);
        }

        debug_assert!(self.check_invariants().is_ok());
        trace!(
            event = "generation_advanced",
            generation = self.generation,
            occupied = stats.occupied,
            placements = stats.placements,
            vacates = stats.vacates,
            relocations = stats.relocations,
            "Generation advanced"
        );

        Ok(stats)
    }

    /// Advance `generations` times, logging population metrics every `metrics_interval`
    #[instrument(skip(self))]
    pub fn run(&mut self, generations: u64, metrics_interval: u64) -> Result<RunSummary> {
        info!("Advancing {} generations", generations);

        let mut summary = RunSummary::new();
        for _ in 0..generations {
            let stats = self.advance_generation()?;
            if metrics_interval > 0 && stats.generation % metrics_interval == 0 {
                emit_population_metrics(&stats);
            }
            summary.update(&stats);
        }
        Ok(summary)
    }

    /// Every occupied slot holds a live cell that stores that slot's coordinates
    pub fn check_invariants(&self) -> Result<()> {
        for (pos, id) in self.grid.occupied() {
            let cell = self.cells.get(id).ok_or_else(|| {
                Error::InvalidState(format!("slot {} refers to a freed cell", pos))
            })?;
            if cell.position != pos {
                return Err(Error::InvalidState(format!(
                    "cell in slot {} believes it is at {}",
                    pos, cell.position
                )));
            }
        }
        Ok(())
    }
}

pub fn emit_population_metrics(stats: &GenerationStats) {
    info!(
        event = "population_metrics",
        generation = stats.generation,
        occupied = stats.occupied,
        live_cells = stats.live_cells,
        activity = stats.activity(),
        "Population metrics snapshot"
    );

    for (kind, count) in &stats.per_kind {
        debug!(
            gauge_name = "population_by_kind",
            kind = %kind,
            gauge_value = count,
            generation = stats.generation,
            "Population gauge"
        );
    }
}
