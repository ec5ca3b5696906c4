//! Simulation parameters.
//!
//! Every tunable constant of the physics, fitness and evolution code lives in
//! [`Params`]. A value is built once (usually through [`Params::for_world`] or
//! loaded from JSON), validated, and then passed by reference into every update.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Reference screen size the length-like defaults are tuned for.
const REFERENCE_SIZE: f32 = 800.0;

/// Errors raised while loading or validating parameters.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// Reading or writing the parameter file failed.
    #[error("failed to access parameter file: {0}")]
    Io(#[from] std::io::Error),
    /// The parameter file is not valid JSON for [`Params`].
    #[error("failed to parse parameter file: {0}")]
    Json(#[from] serde_json::Error),
    /// A parameter value is out of its allowed range.
    #[error("invalid parameter: {0}")]
    Invalid(String),
}

/// Simulation parameters that control physics, fitness and evolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// World width; points are clamped into `[radius, width - radius]`.
    pub world_width: f32,
    /// World height; points are clamped into `[radius, height - radius]`.
    pub world_height: f32,
    /// Length scale relative to an 800 unit world.
    pub scale: f32,

    /// Radius of every point mass.
    pub point_radius: f32,
    /// Mass of newly created points.
    pub point_mass: f32,
    /// Gravitational acceleration (positive y is down).
    pub gravity: f32,
    /// Time scaling applied to gravity.
    pub gravity_time_scale: f32,
    /// Velocity retention per tick (1.0 means no drag).
    pub friction: f32,

    /// Base muscle strength, multiplied by a per-muscle factor.
    pub muscle_strength: f32,
    /// Restoring constant pulling muscles back to their rest length.
    pub stiffness: f32,
    /// Lower bound for a muscle's target length.
    pub min_muscle_length: f32,
    /// Upper bound for a muscle's target length.
    pub max_muscle_length: f32,
    /// Time scaling applied to the actuator force.
    pub actuator_time_scale: f32,
    /// Time scaling applied to the stiffness force.
    pub stiffness_time_scale: f32,
    /// Lower bound of the sampled oscillation speed.
    pub muscle_speed_min: f32,
    /// Upper bound (exclusive) of the sampled oscillation speed.
    pub muscle_speed_max: f32,

    /// Energy a creature starts with.
    pub initial_energy: f32,
    /// Energy drained per unit of total muscle deformation per second.
    pub movement_cost_rate: f32,
    /// Age gained per simulated second.
    pub age_rate: f32,
    /// Fitness weight of the horizontal distance travelled.
    pub distance_weight: f32,
    /// Fitness weight of the horizontal centre velocity.
    pub velocity_weight: f32,
    /// Fitness penalty per unit of vertical drift from the spawn point.
    pub height_penalty_weight: f32,
    /// Fitness weight of the remaining energy.
    pub energy_weight: f32,
    /// Simulated seconds a creature lives before the generation advances.
    pub lifetime: f32,
    /// Fixed time step of one tick before the speed multiplier.
    pub base_dt: f32,

    /// Number of creatures per generation.
    pub population_size: usize,
    /// Fraction of the sorted population that forms the breeding pool.
    pub elite_fraction: f32,
    /// Number of top creatures copied unchanged into the next generation.
    pub elite_count: usize,
    /// Probability that a parent muscle is inherited by a child.
    pub muscle_inheritance: f32,
    /// Probability that a child is mutated after crossover.
    pub child_mutation_probability: f32,
    /// Points are only added while a creature has fewer than this many.
    pub max_points: usize,
    /// Points are only removed while a creature has more than this many.
    pub min_points: usize,
    /// Smallest number of points of a randomly built creature.
    pub initial_points_min: usize,
    /// Largest number of points of a randomly built creature.
    pub initial_points_max: usize,
    /// Smallest polar offset of a new point from the spawn.
    pub spawn_offset_min: f32,
    /// Largest polar offset of a new point from the spawn.
    pub spawn_offset_max: f32,
    /// Maximum distance between two points joined at construction.
    pub initial_muscle_reach: f32,
    /// Maximum distance between two points joined by mutation.
    pub mutation_muscle_reach: f32,

    /// Trial every population member before selection.
    pub evaluate_population: bool,
    /// Number of generation summaries kept in memory.
    pub history_len: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self::for_world(1600.0, 800.0)
    }
}

impl Params {
    /// Creates parameters for a world of the given size.
    ///
    /// Length-like values scale with `min(width, height) / 800`.
    pub fn for_world(world_width: f32, world_height: f32) -> Self {
        let scale = world_width.min(world_height) / REFERENCE_SIZE;
        Self {
            world_width,
            world_height,
            scale,
            point_radius: 10.0 * scale,
            point_mass: 1.0,
            gravity: 0.5 * scale,
            gravity_time_scale: 50.0,
            friction: 0.99,
            muscle_strength: 0.5,
            stiffness: 0.4,
            min_muscle_length: 40.0 * scale,
            max_muscle_length: 180.0 * scale,
            actuator_time_scale: 50.0,
            stiffness_time_scale: 30.0,
            muscle_speed_min: 0.5,
            muscle_speed_max: 1.5,
            initial_energy: 100.0,
            movement_cost_rate: 0.001,
            age_rate: 0.01,
            distance_weight: 0.2,
            velocity_weight: 3.0,
            height_penalty_weight: 0.2,
            energy_weight: 0.01,
            lifetime: 10.0,
            base_dt: 0.05,
            population_size: 8,
            elite_fraction: 0.4,
            elite_count: 2,
            muscle_inheritance: 0.6,
            child_mutation_probability: 0.8,
            max_points: 10,
            min_points: 3,
            initial_points_min: 4,
            initial_points_max: 8,
            spawn_offset_min: 30.0 * scale,
            spawn_offset_max: 100.0 * scale,
            initial_muscle_reach: 200.0 * scale,
            mutation_muscle_reach: 250.0 * scale,
            evaluate_population: true,
            history_len: 100,
        }
    }

    /// Spawn point of every creature: the centre of the world.
    pub fn spawn_point(&self) -> (f32, f32) {
        (self.world_width / 2.0, self.world_height / 2.0)
    }

    /// Size of the breeding pool for the configured population.
    pub fn breeding_pool_size(&self) -> usize {
        ((self.population_size as f32 * self.elite_fraction) as usize).max(1)
    }

    /// Checks that all values are inside their allowed ranges.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.world_width <= 2.0 * self.point_radius || self.world_height <= 2.0 * self.point_radius
        {
            return Err(ParamsError::Invalid(format!(
                "world {}x{} is too small for point radius {}",
                self.world_width, self.world_height, self.point_radius
            )));
        }
        if self.point_mass <= 0.0 {
            return Err(ParamsError::Invalid("point_mass must be positive".into()));
        }
        if self.min_muscle_length > self.max_muscle_length {
            return Err(ParamsError::Invalid(
                "min_muscle_length exceeds max_muscle_length".into(),
            ));
        }
        if self.muscle_speed_min >= self.muscle_speed_max {
            return Err(ParamsError::Invalid(
                "muscle_speed_min must be below muscle_speed_max".into(),
            ));
        }
        if self.lifetime <= 0.0 || self.base_dt <= 0.0 {
            return Err(ParamsError::Invalid(
                "lifetime and base_dt must be positive".into(),
            ));
        }
        if self.population_size < 2 {
            return Err(ParamsError::Invalid(
                "population_size must be at least 2".into(),
            ));
        }
        if self.initial_points_min < 2 || self.initial_points_min > self.initial_points_max {
            return Err(ParamsError::Invalid(
                "initial point range must satisfy 2 <= min <= max".into(),
            ));
        }
        if self.spawn_offset_min > self.spawn_offset_max {
            return Err(ParamsError::Invalid(
                "spawn_offset_min exceeds spawn_offset_max".into(),
            ));
        }
        for (name, value) in [
            ("elite_fraction", self.elite_fraction),
            ("muscle_inheritance", self.muscle_inheritance),
            ("child_mutation_probability", self.child_mutation_probability),
            ("friction", self.friction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ParamsError::Invalid(format!(
                    "{name} must lie in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Saves the parameters to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ParamsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads and validates parameters from a JSON file.
    ///
    /// Missing fields are taken from [`Params::for_world`] for the file's
    /// world size, so a file that only sets `world_width` and `world_height`
    /// gets lengths scaled to that world. Without a world size the defaults
    /// of [`Params::default`] apply.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let json = std::fs::read_to_string(path)?;
        let params = Self::from_json(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Parses parameters from JSON, filling missing fields as
    /// [`Params::load_from_file`] does. The result is not validated.
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        let overrides = match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => map,
            other => return Ok(serde_json::from_value(other)?),
        };

        let defaults = Self::default();
        let world_side = |key: &str, fallback: f32| {
            overrides
                .get(key)
                .and_then(Value::as_f64)
                .map_or(fallback, |v| v as f32)
        };
        let base = Self::for_world(
            world_side("world_width", defaults.world_width),
            world_side("world_height", defaults.world_height),
        );

        let mut merged = serde_json::to_value(base)?;
        if let Value::Object(fields) = &mut merged {
            fields.extend(overrides);
        }
        Ok(serde_json::from_value(merged)?)
    }
}
