//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::Dimensions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// World configuration parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Extent along x
    pub length: i32,
    /// Extent along y
    pub width: i32,
    /// Extent along z (number of layers)
    pub height: i32,
}

impl WorldConfig {
    pub fn new(length: i32, width: i32, height: i32) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.length, self.width, self.height)
    }

    pub fn validate(&self) -> Result<()> {
        if self.length <= 0 || self.width <= 0 || self.height <= 0 {
            return Err(Error::Config(format!(
                "world dimensions must be positive, got {}",
                self.dimensions()
            )));
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            length: 14,
            width: 14,
            height: 4,
        }
    }
}

/// Simulation run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Number of generations to advance
    pub num_generations: u64,
    /// Emit population metrics every this many generations (0 disables them)
    pub metrics_interval: u64,
    /// World configuration
    pub world: WorldConfig,
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.world.validate()?;
        Ok(config)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_generations: 100,
            metrics_interval: 10,
            world: WorldConfig::default(),
        }
    }
}

/// Built-in world setups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    /// Conway cubes on a flat layer, seeded with two live 3x3 blocks
    GameOfLife,
    /// Random columns of vertically diffusing terrain
    MagicTerrain,
    /// Large static colorful terrain, for meshing throughput
    ColorfulTerrain,
}

impl ScenarioKind {
    pub fn all() -> [ScenarioKind; 3] {
        [
            ScenarioKind::GameOfLife,
            ScenarioKind::MagicTerrain,
            ScenarioKind::ColorfulTerrain,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::GameOfLife => "game-of-life",
            ScenarioKind::MagicTerrain => "magic-terrain",
            ScenarioKind::ColorfulTerrain => "colorful-terrain",
        }
    }

    /// World size the scenario is designed around
    pub fn default_world(&self) -> WorldConfig {
        match self {
            ScenarioKind::GameOfLife | ScenarioKind::MagicTerrain => WorldConfig::new(14, 14, 4),
            ScenarioKind::ColorfulTerrain => WorldConfig::new(800, 800, 3),
        }
    }

    /// Generations a run advances unless told otherwise. Colorful terrain never
    /// changes, so it is meshed once.
    pub fn default_generations(&self) -> u64 {
        match self {
            ScenarioKind::GameOfLife | ScenarioKind::MagicTerrain => 100,
            ScenarioKind::ColorfulTerrain => 0,
        }
    }

    /// Default run parameters for this scenario
    pub fn default_simulation(&self) -> SimulationConfig {
        SimulationConfig {
            num_generations: self.default_generations(),
            world: self.default_world(),
            ..SimulationConfig::default()
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ScenarioKind::all()
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::Config(format!("unknown scenario: {}", s)))
    }
}

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Scenario to build
    pub scenario: ScenarioKind,
    /// Build a mesh frame after every generation
    pub record_frames: bool,
    /// Where to write recorded frames as JSON
    pub output_path: Option<String>,
    /// Simulation parameters
    pub simulation: SimulationConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            scenario: ScenarioKind::GameOfLife,
            record_frames: true,
            output_path: None,
            simulation: SimulationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let world_config = WorldConfig::default();
        assert_eq!(world_config.length, 14);
        assert_eq!(world_config.width, 14);
        assert_eq!(world_config.height, 4);

        let sim_config = SimulationConfig::default();
        assert_eq!(sim_config.num_generations, 100);
        assert_eq!(sim_config.seed, 42);

        let runner_config = RunnerConfig::default();
        assert_eq!(runner_config.scenario, ScenarioKind::GameOfLife);
        assert!(runner_config.output_path.is_none());
    }

    #[test]
    fn test_scenario_default_simulation() {
        let colorful = ScenarioKind::ColorfulTerrain.default_simulation();
        assert_eq!(colorful.num_generations, 0);
        assert_eq!(colorful.world, WorldConfig::new(800, 800, 3));
        assert_eq!(colorful.seed, 42);

        let magic = ScenarioKind::MagicTerrain.default_simulation();
        assert_eq!(magic.num_generations, 100);
        assert_eq!(magic.world, WorldConfig::new(14, 14, 4));
    }

    #[test]
    fn test_world_validation() {
        assert!(WorldConfig::new(1, 1, 1).validate().is_ok());
        assert!(matches!(
            WorldConfig::new(0, 4, 4).validate(),
            Err(Error::Config(_))
        ));
        assert!(WorldConfig::new(4, 4, -1).validate().is_err());
    }

    #[test]
    fn test_simulation_config_from_json() {
        let json = r#"{
            "seed": 7,
            "num_generations": 5,
            "metrics_interval": 0,
            "world": { "length": 3, "width": 4, "height": 5 }
        }"#;

        let config = SimulationConfig::from_json_str(json).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.world.dimensions(), Dimensions::new(3, 4, 5));

        let bad = json.replace("\"height\": 5", "\"height\": 0");
        assert!(SimulationConfig::from_json_str(&bad).is_err());
        assert!(SimulationConfig::from_json_str("{").is_err());
    }

    #[test]
    fn test_scenario_names() {
        for kind in ScenarioKind::all() {
            assert_eq!(kind.name().parse::<ScenarioKind>().unwrap(), kind);
        }
        assert!("tetris".parse::<ScenarioKind>().is_err());

        let json = serde_json::to_string(&ScenarioKind::MagicTerrain).unwrap();
        assert_eq!(json, "\"magic-terrain\"");
    }
}
