//! # Strider - Evolving Soft-Bodied Walkers
//!
//! A simulation of soft-bodied creatures built from point masses and muscles
//! that learn to walk through a genetic algorithm.
//!
//! ## Features
//!
//! - Position-history (Verlet style) point integration with a hard world clamp
//! - Oscillating spring muscles with a separate stiffness term
//! - Scripted brains: looping timed contraction patterns with random flips
//! - Generational evolution: elitism, graph crossover, structural mutation
//! - Seedable randomness for reproducible runs
//! - Read-only render snapshots for a polling renderer
//!
//! ## Core Modules
//!
//! - [`simulation::point_mass`] - Mass points and their integration
//! - [`simulation::muscle`] - Spring actuators
//! - [`simulation::brain`] - Scripted muscle controller
//! - [`simulation::creature`] - Body assembly, fitness and lifetime
//! - [`simulation::evolution`] - Selection, crossover and mutation
//! - [`simulation::clock`] - Fixed-step driver with pause, speed and reset

/// Core simulation logic and data structures.
pub mod simulation {
    /// Scripted controller toggling muscle contraction over time.
    pub mod brain;
    /// Fixed-step driver that triggers generation advancement.
    pub mod clock;
    /// Creatures: points, muscles, brain and fitness.
    pub mod creature;
    /// Generational genetic algorithm.
    pub mod evolution;
    /// Geometric utility functions for distance calculations.
    pub mod geometric_utils;
    /// Spring-like actuators between two points.
    pub mod muscle;
    /// Simulation parameters.
    pub mod params;
    /// Mass points with position history.
    pub mod point_mass;
    /// Read-only drawable state for renderers.
    pub mod render_state;
    /// Seedable random number generation.
    pub mod rng;
}
