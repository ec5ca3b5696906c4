//! Fixed-step driver.
//!
//! [`Simulation`] advances one active creature per tick and, when its life
//! ends, runs an evolve step and continues with the best creature ever found.
//! Pausing, the speed multiplier and resets are the only controls exposed to
//! an input layer.

use log::info;

use super::creature::Creature;
use super::evolution::Evolution;
use super::params::Params;

/// Highest value reached by [`Simulation::cycle_speed`].
const MAX_CYCLED_SPEED: u32 = 3;

/// What happened during one call to [`Simulation::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The simulation is paused; nothing moved.
    Paused,
    /// The active creature advanced one step.
    Running,
    /// The active creature's life ended and a new generation was produced.
    GenerationAdvanced {
        /// Generation number after the evolve step.
        generation: u32,
        /// Best fitness ever observed.
        best_fitness: f32,
    },
}

/// Drives the active creature and triggers generation changes.
#[derive(Debug, Clone)]
pub struct Simulation {
    evolution: Evolution,
    current: Creature,
    simulating: bool,
    speed_multiplier: u32,
    best_distance: f32,
}

impl Simulation {
    /// Creates a simulation seeded from entropy, starting with the starter walker.
    pub fn new(params: Params) -> Self {
        Self::from_evolution(Evolution::new(params))
    }

    /// Creates a reproducible simulation.
    pub fn with_seed(params: Params, seed: u64) -> Self {
        Self::from_evolution(Evolution::with_seed(params, seed))
    }

    fn from_evolution(mut evolution: Evolution) -> Self {
        let current = evolution.spawn_starter_walker();
        Self {
            evolution,
            current,
            simulating: true,
            speed_multiplier: 1,
            best_distance: 0.0,
        }
    }

    /// Advances the active creature by one tick of `base_dt * speed_multiplier`.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.simulating {
            return TickOutcome::Paused;
        }

        let dt = self.dt();
        self.current.update(self.evolution.params(), dt);

        if !self.current.life_expired(self.evolution.params()) {
            return TickOutcome::Running;
        }

        self.best_distance = self.best_distance.max(self.current.distance_traveled);
        if self.evolution.params().evaluate_population {
            self.evolution.evaluate_population();
        }
        self.current = self.evolution.evolve();

        info!(
            "generation {} starts, best distance so far {:.1}",
            self.evolution.generation(),
            self.best_distance
        );
        TickOutcome::GenerationAdvanced {
            generation: self.evolution.generation(),
            best_fitness: self.evolution.best_fitness(),
        }
    }

    /// Time step of the next tick.
    pub fn dt(&self) -> f32 {
        self.evolution.params().base_dt * self.speed_multiplier as f32
    }

    /// Discards the population and the active creature and starts over with
    /// fresh randomness.
    pub fn reset(&mut self) {
        let params = self.evolution.params().clone();
        *self = Self::new(params);
        info!("simulation reset");
    }

    /// Pauses or resumes ticking.
    pub fn toggle_pause(&mut self) {
        self.simulating = !self.simulating;
    }

    /// Whether ticks currently advance the creature.
    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    /// Cycles the speed multiplier 1, 2, 3, 1, ...
    pub fn cycle_speed(&mut self) -> u32 {
        self.speed_multiplier = self.speed_multiplier % MAX_CYCLED_SPEED + 1;
        self.speed_multiplier
    }

    /// Sets the speed multiplier; values below 1 are raised to 1.
    pub fn set_speed_multiplier(&mut self, multiplier: u32) {
        self.speed_multiplier = multiplier.max(1);
    }

    /// Current speed multiplier.
    pub fn speed_multiplier(&self) -> u32 {
        self.speed_multiplier
    }

    /// The creature being simulated.
    pub fn current(&self) -> &Creature {
        &self.current
    }

    /// The evolution state.
    pub fn evolution(&self) -> &Evolution {
        &self.evolution
    }

    /// Number of completed generations.
    pub fn generation(&self) -> u32 {
        self.evolution.generation()
    }

    /// Longest distance any finished creature travelled.
    pub fn best_distance(&self) -> f32 {
        self.best_distance
    }
}
