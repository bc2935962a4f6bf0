//! Built-in world setups.

use crate::world::World;
use cellvox_core::{EntityKind, Result, ScenarioKind, SimulationConfig, WorldConfig};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// Live 3x3 blocks seeded on the game-of-life layer
const LIFE_SEEDS: [(i32, i32); 18] = [
    (4, 4),
    (4, 5),
    (4, 6),
    (5, 4),
    (5, 5),
    (5, 6),
    (6, 4),
    (6, 5),
    (6, 6),
    (7, 7),
    (7, 8),
    (7, 9),
    (8, 7),
    (8, 8),
    (8, 9),
    (9, 7),
    (9, 8),
    (9, 9),
];

pub struct Scenario {
    kind: ScenarioKind,
    config: SimulationConfig,
}

impl Scenario {
    pub fn new(kind: ScenarioKind, config: SimulationConfig) -> Self {
        Self { kind, config }
    }

    /// Scenario with its designed world size and default run parameters
    pub fn with_defaults(kind: ScenarioKind) -> Self {
        Self::new(kind, kind.default_simulation())
    }

    pub fn kind(&self) -> ScenarioKind {
        self.kind
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Build the initial world
    pub fn build(&self) -> Result<World> {
        let world_config = &self.config.world;
        let mut world = World::new(world_config, self.config.seed)?;

        match self.kind {
            ScenarioKind::GameOfLife => {
                let height_map = flat_height_map(world_config);
                world.set_terrain_with_height_map(EntityKind::ConwayCube, &height_map)?;

                for &(x, y) in LIFE_SEEDS.iter() {
                    // Seeds outside a smaller world are dropped
                    if x < world_config.length && y < world_config.width {
                        if let Some(cell) = world.get_cell_mut(x, y, 0)? {
                            cell.set_alive();
                        }
                    }
                }
            }
            ScenarioKind::MagicTerrain => {
                let height_map = random_height_map(world_config, self.config.seed);
                world.set_terrain_with_height_map(EntityKind::MagicTerrain, &height_map)?;
            }
            ScenarioKind::ColorfulTerrain => {
                let height_map = random_height_map(world_config, self.config.seed);
                world.set_terrain_with_height_map(EntityKind::ColorfulTerrain, &height_map)?;
            }
        }

        info!(
            scenario = %self.kind,
            dimensions = %world.dimensions(),
            cells = world.cells().len(),
            "World initialized"
        );
        Ok(world)
    }
}

/// Height 1 everywhere
pub fn flat_height_map(config: &WorldConfig) -> Vec<Vec<i32>> {
    vec![vec![1; config.width as usize]; config.length as usize]
}

/// Heights drawn uniformly from 1..=height
pub fn random_height_map(config: &WorldConfig, seed: u64) -> Vec<Vec<i32>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..config.length)
        .map(|_| {
            (0..config.width)
                .map(|_| rng.gen_range(1..=config.height))
                .collect()
        })
        .collect()
}
