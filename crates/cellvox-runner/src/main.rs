//! Scenario runner: advances a voxel world and records one mesh frame per generation.

mod telemetry;

use anyhow::{Context, Result};
use cellvox_core::{RunSummary, RunnerConfig, ScenarioKind, SimulationConfig, WorldConfig};
use cellvox_mesh::{FrameRecorder, FrameSink, MeshBuilder};
use cellvox_world::{emit_population_metrics, Scenario, World};
use clap::Parser;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "cellvox",
    version,
    about = "Run a voxel cellular automaton and export its mesh frames"
)]
struct Cli {
    /// Scenario to build (game-of-life, magic-terrain, colorful-terrain).
    #[arg(long, default_value = "game-of-life")]
    scenario: ScenarioKind,

    /// Simulation parameters as JSON. Flags below override the file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of generations to advance.
    #[arg(long)]
    generations: Option<u64>,

    #[arg(long, env = "CELLVOX_SEED")]
    seed: Option<u64>,

    #[arg(long)]
    length: Option<i32>,

    #[arg(long)]
    width: Option<i32>,

    #[arg(long)]
    height: Option<i32>,

    /// Log population metrics every N generations (0 disables them).
    #[arg(long)]
    metrics_interval: Option<u64>,

    /// Write recorded frames to this file as JSON.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip meshing and only advance the simulation.
    #[arg(long)]
    no_frames: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn runner_config(&self) -> Result<RunnerConfig> {
        let mut simulation = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                SimulationConfig::from_json_str(&json)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => self.scenario.default_simulation(),
        };

        if let Some(generations) = self.generations {
            simulation.num_generations = generations;
        }
        if let Some(seed) = self.seed {
            simulation.seed = seed;
        }
        if let Some(interval) = self.metrics_interval {
            simulation.metrics_interval = interval;
        }
        let world = simulation.world;
        simulation.world = WorldConfig::new(
            self.length.unwrap_or(world.length),
            self.width.unwrap_or(world.width),
            self.height.unwrap_or(world.height),
        );
        simulation.world.validate()?;

        Ok(RunnerConfig {
            scenario: self.scenario,
            record_frames: !self.no_frames,
            output_path: self
                .output
                .as_ref()
                .map(|path| path.display().to_string()),
            simulation,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_telemetry(cli.log_json)?;

    let config = cli.runner_config()?;
    info!(
        scenario = %config.scenario,
        generations = config.simulation.num_generations,
        seed = config.simulation.seed,
        dimensions = %config.simulation.world.dimensions(),
        "Starting cellvox runner"
    );

    let summary = run(&config)?;

    info!(
        generations = summary.generations,
        avg_occupied = summary.avg_occupied,
        peak_occupied = summary.peak_occupied,
        avg_live_cells = summary.avg_live_cells,
        placements = summary.total_placements,
        vacates = summary.total_vacates,
        relocations = summary.total_relocations,
        "Run complete"
    );

    Ok(())
}

fn run(config: &RunnerConfig) -> Result<RunSummary> {
    let scenario = Scenario::new(config.scenario, config.simulation.clone());
    let mut world = scenario
        .build()
        .with_context(|| format!("failed to build {} world", config.scenario))?;

    if !config.record_frames {
        let start = Instant::now();
        let summary = world.run(
            config.simulation.num_generations,
            config.simulation.metrics_interval,
        )?;
        info!(processing_ms = millis(start.elapsed()), "Processing time");
        return Ok(summary);
    }

    let (summary, recorder) = run_recorded(&mut world, &config.simulation)?;

    if let Some(path) = &config.output_path {
        recorder
            .save(path)
            .with_context(|| format!("failed to export frames to {}", path))?;
    }

    Ok(summary)
}

/// Advance the world, meshing the initial state and every generation after it
fn run_recorded(
    world: &mut World,
    simulation: &SimulationConfig,
) -> Result<(RunSummary, FrameRecorder)> {
    let mut builder = MeshBuilder::new();
    let mut recorder = FrameRecorder::new();
    let mut summary = RunSummary::new();
    let mut processing = Duration::ZERO;
    let mut meshing = Duration::ZERO;

    let start = Instant::now();
    let frame = builder.build_frame(world, recorder.next_index())?;
    meshing += start.elapsed();
    recorder.consume(frame)?;

    for _ in 0..simulation.num_generations {
        let start = Instant::now();
        let stats = world
            .advance_generation()
            .with_context(|| format!("generation {} failed", world.generation() + 1))?;
        processing += start.elapsed();

        if simulation.metrics_interval > 0 && stats.generation % simulation.metrics_interval == 0 {
            emit_population_metrics(&stats);
        }
        summary.update(&stats);

        let start = Instant::now();
        let frame = builder.build_frame(world, recorder.next_index())?;
        meshing += start.elapsed();

        debug!(
            generation = stats.generation,
            vertices = frame.stats.vertices_after_dedup,
            dedup_ratio = frame.stats.dedup_ratio(),
            "Frame meshed"
        );
        recorder.consume(frame)?;
    }

    info!(
        processing_ms = millis(processing),
        meshing_ms = millis(meshing),
        frames = recorder.len(),
        "Processing and meshing time"
    );

    Ok((summary, recorder))
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "cellvox",
            "--scenario",
            "magic-terrain",
            "--generations",
            "5",
            "--seed",
            "7",
            "--height",
            "6",
            "--no-frames",
        ]);
        let config = cli.runner_config().unwrap();

        assert_eq!(config.scenario, ScenarioKind::MagicTerrain);
        assert_eq!(config.simulation.num_generations, 5);
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.simulation.world, WorldConfig::new(14, 14, 6));
        assert!(!config.record_frames);
        assert!(config.output_path.is_none());
    }

    #[test]
    fn test_colorful_terrain_meshes_once() {
        let cli = Cli::parse_from(["cellvox", "--scenario", "colorful-terrain"]);
        let config = cli.runner_config().unwrap();
        assert_eq!(config.simulation.num_generations, 0);
        assert_eq!(config.simulation.world, WorldConfig::new(800, 800, 3));

        // A small world keeps the default of a single frame
        let cli = Cli::parse_from([
            "cellvox",
            "--scenario",
            "colorful-terrain",
            "--length",
            "8",
            "--width",
            "8",
        ]);
        let config = cli.runner_config().unwrap();
        let mut world = Scenario::new(config.scenario, config.simulation.clone())
            .build()
            .unwrap();
        let (summary, recorder) = run_recorded(&mut world, &config.simulation).unwrap();
        assert_eq!(summary.generations, 0);
        assert_eq!(recorder.len(), 1);

        let cli = Cli::parse_from([
            "cellvox",
            "--scenario",
            "colorful-terrain",
            "--generations",
            "2",
        ]);
        assert_eq!(cli.runner_config().unwrap().simulation.num_generations, 2);
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        let cli = Cli::parse_from(["cellvox", "--length", "0"]);
        assert!(cli.runner_config().is_err());
    }

    #[test]
    fn test_unknown_scenario_rejected() {
        assert!(Cli::try_parse_from(["cellvox", "--scenario", "sandbox"]).is_err());
    }

    #[test]
    fn test_recorded_run() {
        let simulation = SimulationConfig {
            num_generations: 3,
            metrics_interval: 1,
            ..Default::default()
        };
        let mut world = Scenario::new(ScenarioKind::GameOfLife, simulation.clone())
            .build()
            .unwrap();

        let (summary, recorder) = run_recorded(&mut world, &simulation).unwrap();
        assert_eq!(summary.generations, 3);
        assert_eq!(recorder.len(), 4);
        assert_eq!(recorder.last().map(|frame| frame.generation), Some(3));
    }
}
