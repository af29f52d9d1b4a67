//! Simulation and evolution parameters.
//!
//! Both parameter sets are loaded together from a single JSON file. Every field
//! has a default, so a config file only needs to list the values it changes.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use super::car::Action;

/// Simulation parameters that control the track, the cars and an episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Width of the simulated screen in pixels.
    pub screen_width: f32,
    /// Height of the simulated screen in pixels.
    pub screen_height: f32,
    /// Car footprint width in pixels.
    pub car_width: f32,
    /// Car footprint height in pixels.
    pub car_height: f32,
    /// RGBA colour that marks a track boundary pixel.
    pub border_color: [u8; 4],
    /// Top-left corner of the car footprint at the start of an episode.
    pub start_position: [f32; 2],
    /// Heading in degrees at the start of an episode.
    pub start_angle: f32,
    /// Speed assigned on the first update of a car.
    pub default_speed: f32,
    /// Braking never takes the speed below this value.
    pub min_speed: f32,
    /// Speed change per accelerate/brake action.
    pub speed_step: f32,
    /// Heading change in degrees per turn action.
    pub turn_step: f32,
    /// Lower clamp for both position axes.
    pub clamp_min: f32,
    /// Upper clamp is `screen - clamp_margin` on each axis.
    pub clamp_margin: f32,
    /// Radar offsets in degrees relative to the heading.
    pub radar_angles: Vec<i32>,
    /// Maximum radar length in pixels.
    pub radar_max_range: u32,
    /// Radar distances are integer-divided by this before reaching the brain.
    pub radar_normalization: u32,
    /// Reward per step is `distance / fitness_divisor`.
    pub fitness_divisor: f32,
    /// Step budget for one episode.
    pub max_steps: u32,
    /// Frame-rate cap in windowed mode.
    pub fps: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            screen_width: 1920.0,
            screen_height: 1080.0,
            car_width: 60.0,
            car_height: 60.0,
            border_color: [255, 255, 255, 255],
            start_position: [830.0, 920.0],
            start_angle: 0.0,
            default_speed: 20.0,
            min_speed: 12.0,
            speed_step: 2.0,
            turn_step: 10.0,
            clamp_min: 20.0,
            clamp_margin: 120.0,
            radar_angles: vec![-90, -45, 0, 45, 90],
            radar_max_range: 300,
            radar_normalization: 30,
            fitness_divisor: 30.0,
            max_steps: 30 * 40,
            fps: 60,
        }
    }
}

impl Params {
    /// Upper clamp bound for the x axis.
    pub fn max_x(&self) -> f32 {
        self.screen_width - self.clamp_margin
    }

    /// Upper clamp bound for the y axis.
    pub fn max_y(&self) -> f32 {
        self.screen_height - self.clamp_margin
    }
}

/// Hyperparameters of the evolutionary driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionParams {
    /// Number of genomes per generation.
    pub population_size: usize,
    /// Neural network layer dimensions, input first.
    pub layer_sizes: Vec<usize>,
    /// Half-width of the uniform distribution used for fresh weights.
    pub init_weight_scale: f32,
    /// Number of top genomes copied unchanged into the next generation.
    pub elitism: usize,
    /// Fraction of the ranked population allowed to reproduce.
    pub survival_threshold: f32,
    /// Probability that a child is produced by crossover instead of cloning.
    pub crossover_probability: f32,
    /// Per-parameter probability of being perturbed during mutation.
    pub mutation_rate: f32,
    /// Lower bound of the log-uniform mutation scale.
    pub mutation_scale_min: f32,
    /// Upper bound of the log-uniform mutation scale.
    pub mutation_scale_max: f32,
    /// Generations without improvement before the non-elite population is reseeded.
    pub max_stagnation: u32,
    /// The run stops once the best fitness reaches this value.
    pub fitness_threshold: f32,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            population_size: 30,
            layer_sizes: vec![5, 6, Action::COUNT],
            init_weight_scale: 1.0,
            elitism: 3,
            survival_threshold: 0.2,
            crossover_probability: 0.5,
            mutation_rate: 0.8,
            mutation_scale_min: 0.01,
            mutation_scale_max: 0.5,
            max_stagnation: 20,
            fitness_threshold: 100_000_000.0,
        }
    }
}

/// Complete configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Track, car and episode settings.
    pub simulation: Params,
    /// Evolutionary algorithm settings.
    pub evolution: EvolutionParams,
}

impl Config {
    /// Loads and validates a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_json(&json)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Parses and validates a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that both parameter sets are consistent with each other.
    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        let evo = &self.evolution;

        ensure!(
            evo.layer_sizes.len() >= 2,
            "layer_sizes needs at least an input and an output layer, got {:?}",
            evo.layer_sizes
        );
        ensure!(
            evo.layer_sizes.iter().all(|&size| size > 0),
            "layer_sizes must not contain empty layers, got {:?}",
            evo.layer_sizes
        );
        ensure!(
            evo.layer_sizes[0] == sim.radar_angles.len(),
            "input layer has {} neurons but there are {} radars",
            evo.layer_sizes[0],
            sim.radar_angles.len()
        );
        ensure!(
            evo.layer_sizes[evo.layer_sizes.len() - 1] == Action::COUNT,
            "output layer must have {} neurons, one per action",
            Action::COUNT
        );
        ensure!(evo.population_size > 0, "population_size must be positive");
        ensure!(
            evo.elitism <= evo.population_size,
            "elitism ({}) exceeds population_size ({})",
            evo.elitism,
            evo.population_size
        );
        ensure!(
            evo.survival_threshold > 0.0 && evo.survival_threshold <= 1.0,
            "survival_threshold must be in (0, 1], got {}",
            evo.survival_threshold
        );
        ensure!(
            (0.0..=1.0).contains(&evo.crossover_probability),
            "crossover_probability must be in [0, 1], got {}",
            evo.crossover_probability
        );
        ensure!(
            (0.0..=1.0).contains(&evo.mutation_rate),
            "mutation_rate must be in [0, 1], got {}",
            evo.mutation_rate
        );
        ensure!(
            evo.init_weight_scale > 0.0,
            "init_weight_scale must be positive"
        );
        ensure!(
            evo.mutation_scale_min > 0.0 && evo.mutation_scale_min <= evo.mutation_scale_max,
            "mutation scales must satisfy 0 < min <= max, got {}..{}",
            evo.mutation_scale_min,
            evo.mutation_scale_max
        );

        ensure!(
            sim.clamp_min < sim.max_x() && sim.clamp_min < sim.max_y(),
            "clamp range is empty for a {}x{} screen",
            sim.screen_width,
            sim.screen_height
        );
        ensure!(
            sim.car_width > 0.0 && sim.car_height > 0.0,
            "car footprint must be positive"
        );
        ensure!(
            sim.radar_normalization > 0,
            "radar_normalization must be positive"
        );
        ensure!(sim.fitness_divisor > 0.0, "fitness_divisor must be positive");
        ensure!(sim.max_steps > 0, "max_steps must be positive");
        ensure!(sim.fps > 0, "fps must be positive");

        Ok(())
    }
}
