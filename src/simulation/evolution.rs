//! Generational evolution of creatures.
//!
//! Each call to [`Evolution::evolve`] sorts the population by fitness, keeps
//! the top of the breeding pool unchanged, and fills the remaining slots with
//! mutated crossover children of random breeding-pool parents.

use std::collections::{HashMap, VecDeque};

use log::{debug, info};
use rand::Rng;
use rand::seq::index;
use rayon::prelude::*;

use super::creature::{self, Creature};
use super::geometric_utils;
use super::muscle::Muscle;
use super::params::Params;
use super::point_mass::{IdAllocator, PointId, PointMass};
use super::rng::{self, SimRng};

/// Probability of a point-level structural mutation.
const POINT_MUTATION_PROBABILITY: f32 = 0.3;
/// Probability of choosing to add (rather than remove) a point.
const ADD_POINT_PROBABILITY: f32 = 0.5;
/// Inclusive range of muscles attached to a newly added point.
const NEW_POINT_CONNECTIONS: std::ops::RangeInclusive<usize> = 1..=3;
/// Probability of a muscle-level structural mutation.
const MUSCLE_MUTATION_PROBABILITY: f32 = 0.4;
/// Within a muscle mutation, probability of removing a muscle.
const REMOVE_MUSCLE_PROBABILITY: f32 = 0.7;
/// Within a muscle mutation, probability of adding a muscle.
const ADD_MUSCLE_PROBABILITY: f32 = 0.7;
/// Per-muscle probability of rescaling its strength.
const STRENGTH_MUTATION_PROBABILITY: f32 = 0.2;
/// Per-muscle probability of rescaling its oscillation speed.
const SPEED_MUTATION_PROBABILITY: f32 = 0.1;
/// Range of the strength rescaling factor.
const STRENGTH_FACTOR: std::ops::RangeInclusive<f32> = 0.8..=1.2;
/// Range of the speed rescaling factor.
const SPEED_FACTOR: std::ops::RangeInclusive<f32> = 0.7..=1.3;

/// Summary of one generation, recorded when it is replaced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Generation number after the evolve step.
    pub generation: u32,
    /// Best fitness within the replaced population.
    pub best_fitness: f32,
    /// Mean fitness of the replaced population.
    pub mean_fitness: f32,
    /// Best fitness ever observed.
    pub best_ever_fitness: f32,
    /// Mean point count of the replaced population.
    pub mean_points: f32,
    /// Mean muscle count of the replaced population.
    pub mean_muscles: f32,
}

/// Holds the population and runs selection, crossover and mutation.
#[derive(Debug, Clone)]
pub struct Evolution {
    params: Params,
    population: Vec<Creature>,
    generation: u32,
    best_fitness: f32,
    best_creature: Option<Creature>,
    history: VecDeque<GenerationStats>,
    ids: IdAllocator,
    rng: SimRng,
}

impl Evolution {
    /// Creates an evolution seeded from entropy.
    pub fn new(params: Params) -> Self {
        Self::with_rng(params, rng::entropy_rng())
    }

    /// Creates an evolution whose every random decision follows `seed`.
    pub fn with_seed(params: Params, seed: u64) -> Self {
        Self::with_rng(params, rng::create_rng(seed))
    }

    /// Creates an evolution drawing from `rng` and builds the first population.
    pub fn with_rng(params: Params, rng: SimRng) -> Self {
        let mut evolution = Self {
            population: Vec::with_capacity(params.population_size),
            params,
            generation: 0,
            best_fitness: f32::NEG_INFINITY,
            best_creature: None,
            history: VecDeque::new(),
            ids: IdAllocator::new(),
            rng,
        };
        evolution.initialize_population();
        evolution
    }

    /// Replaces the population with freshly built random creatures.
    pub fn initialize_population(&mut self) {
        self.population = (0..self.params.population_size)
            .map(|_| Creature::random(&self.params, &mut self.ids, &mut self.rng))
            .collect();
    }

    /// Builds the hand-designed starter walker with this evolution's ids and randomness.
    pub fn spawn_starter_walker(&mut self) -> Creature {
        Creature::starter_walker(&self.params, &mut self.ids, &mut self.rng)
    }

    /// The parameters this evolution runs with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The current population.
    pub fn population(&self) -> &[Creature] {
        &self.population
    }

    /// Mutable access to the current population, e.g. to record fitness.
    pub fn population_mut(&mut self) -> &mut [Creature] {
        &mut self.population
    }

    /// Number of completed evolve steps.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Best fitness ever observed (`-inf` before the first evolve).
    pub fn best_fitness(&self) -> f32 {
        self.best_fitness
    }

    /// Best creature ever observed.
    pub fn best_creature(&self) -> Option<&Creature> {
        self.best_creature.as_ref()
    }

    /// Recent generation summaries, oldest first.
    pub fn history(&self) -> &VecDeque<GenerationStats> {
        &self.history
    }

    /// Trials every population member for one lifetime and records its fitness.
    ///
    /// Trials run in parallel; each uses the creature's own brain stream, so
    /// the outcome does not depend on scheduling.
    pub fn evaluate_population(&mut self) {
        let params = &self.params;
        self.population.par_iter_mut().for_each(|creature| {
            creature.fitness = creature.trial_fitness(params);
        });
    }

    /// Advances to the next generation and returns the best creature ever seen.
    ///
    /// The population size is `population_size` afterwards, whatever the
    /// fitness values were.
    pub fn evolve(&mut self) -> Creature {
        if self.population.is_empty() {
            self.initialize_population();
        }
        self.generation += 1;

        for creature in &self.population {
            if creature.fitness > self.best_fitness {
                self.best_fitness = creature.fitness;
                self.best_creature = Some(creature.clone());
            }
        }

        let mut previous = std::mem::take(&mut self.population);
        previous.sort_by(|a, b| selection_key(b).total_cmp(&selection_key(a)));

        if self.best_creature.is_none() {
            self.best_creature = previous.first().cloned();
        }
        self.record_stats(&previous);

        let pool_size = self.params.breeding_pool_size().min(previous.len());
        let pool = &previous[..pool_size];

        let size = self.params.population_size;
        let mut next: Vec<Creature> = pool
            .iter()
            .take(self.params.elite_count.min(size))
            .cloned()
            .collect();

        while next.len() < size {
            let parent1 = &pool[self.rng.random_range(0..pool.len())];
            let parent2 = &pool[self.rng.random_range(0..pool.len())];

            let mut child = Self::crossover(parent1, parent2, &self.params, &mut self.rng);
            if self.rng.random::<f32>() < self.params.child_mutation_probability {
                self.mutate_creature(&mut child);
            }
            next.push(child);
        }

        self.population = next;

        if let Some(best) = &self.best_creature {
            return best.clone();
        }
        self.spawn_starter_walker()
    }

    /// Builds a child from the union of two parents' bodies.
    ///
    /// Points are deduplicated by [`PointId`], so only shared ancestry merges.
    /// Each parent muscle is inherited with probability `muscle_inheritance`
    /// unless the child already has a muscle between the same pair of points.
    pub fn crossover(
        parent1: &Creature,
        parent2: &Creature,
        params: &Params,
        rng: &mut SimRng,
    ) -> Creature {
        let mut points: Vec<PointMass> = Vec::new();
        let mut point_map: HashMap<PointId, usize> = HashMap::new();
        for point in parent1.points.iter().chain(&parent2.points) {
            point_map.entry(point.id).or_insert_with(|| {
                points.push(point.respawned());
                points.len() - 1
            });
        }

        let mut muscles: Vec<Muscle> = Vec::new();
        for (parent, muscle) in parent1
            .muscles
            .iter()
            .map(|m| (parent1, m))
            .chain(parent2.muscles.iter().map(|m| (parent2, m)))
        {
            if rng.random::<f32>() >= params.muscle_inheritance {
                continue;
            }
            let a = point_map.get(&parent.points[muscle.a].id).copied();
            let b = point_map.get(&parent.points[muscle.b].id).copied();
            let (Some(a), Some(b)) = (a, b) else {
                continue;
            };
            if a == b || muscles.iter().any(|m| m.connects(a, b)) {
                continue;
            }
            if let Some(child_muscle) =
                Muscle::new(&points, a, b, muscle.strength_mult(params), params, rng)
            {
                muscles.push(child_muscle);
            }
        }

        debug!(
            "crossover produced {} points and {} muscles",
            points.len(),
            muscles.len()
        );
        Creature::new(points, muscles, params, rng)
    }

    /// Mutates a creature's brain, body structure and muscle parameters.
    pub fn mutate_creature(&mut self, creature: &mut Creature) {
        creature.brain.mutate();

        if self.rng.random::<f32>() < POINT_MUTATION_PROBABILITY {
            let add = self.rng.random::<f32>() < ADD_POINT_PROBABILITY;
            if add && creature.points.len() < self.params.max_points {
                self.add_random_point(creature);
            } else if creature.points.len() > self.params.min_points {
                self.remove_random_point(creature);
            }
        }

        if self.rng.random::<f32>() < MUSCLE_MUTATION_PROBABILITY {
            self.mutate_muscle_structure(creature);
        }

        self.mutate_muscle_parameters(creature);
    }

    /// Adds a point near the spawn and joins it to one to three existing points.
    ///
    /// Returns the index of the new point.
    pub fn add_random_point(&mut self, creature: &mut Creature) -> usize {
        let params = &self.params;
        let rng = &mut self.rng;

        let pos = creature::random_spawn_offset(&creature.spawn, params, rng);
        let point = PointMass::at(self.ids.next_id(), pos, params)
            .with_color(creature::random_point_color(rng));
        let new_index = creature.add_point(point);

        let wanted = rng.random_range(NEW_POINT_CONNECTIONS).min(new_index);
        for other in index::sample(rng, new_index, wanted) {
            if let Some(muscle) = Muscle::new(&creature.points, new_index, other, 1.0, params, rng) {
                creature.muscles.push(muscle);
            }
        }
        debug!("added point with {} connections", wanted);
        new_index
    }

    /// Removes a random movable point and its muscles. Anchors are never removed.
    pub fn remove_random_point(&mut self, creature: &mut Creature) {
        let movable: Vec<usize> = creature
            .points
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.fixed)
            .map(|(i, _)| i)
            .collect();
        if !movable.is_empty() {
            let victim = movable[self.rng.random_range(0..movable.len())];
            creature.remove_point(victim);
        }
    }

    /// Possibly removes one muscle, then possibly joins a nearby unconnected pair.
    pub fn mutate_muscle_structure(&mut self, creature: &mut Creature) {
        let params = &self.params;
        let rng = &mut self.rng;

        if rng.random::<f32>() < REMOVE_MUSCLE_PROBABILITY && !creature.muscles.is_empty() {
            let idx = rng.random_range(0..creature.muscles.len());
            creature.muscles.remove(idx);
        }

        if rng.random::<f32>() < ADD_MUSCLE_PROBABILITY && creature.points.len() >= 2 {
            let pair = index::sample(rng, creature.points.len(), 2);
            let (a, b) = (pair.index(0), pair.index(1));
            let dist = geometric_utils::distance(&creature.points[a].pos, &creature.points[b].pos);
            if dist < params.mutation_muscle_reach && !creature.has_muscle_between(a, b) {
                if let Some(muscle) = Muscle::new(&creature.points, a, b, 1.0, params, rng) {
                    creature.muscles.push(muscle);
                }
            }
        }
    }

    /// Rescales muscle strengths by `[0.8, 1.2]` and speeds by `[0.7, 1.3]`,
    /// each with a small per-muscle probability.
    pub fn mutate_muscle_parameters(&mut self, creature: &mut Creature) {
        for muscle in &mut creature.muscles {
            if self.rng.random::<f32>() < STRENGTH_MUTATION_PROBABILITY {
                muscle.base_strength *= self.rng.random_range(STRENGTH_FACTOR);
            }
            if self.rng.random::<f32>() < SPEED_MUTATION_PROBABILITY {
                muscle.speed *= self.rng.random_range(SPEED_FACTOR);
            }
        }
    }

    fn record_stats(&mut self, sorted: &[Creature]) {
        let count = sorted.len().max(1) as f32;
        let stats = GenerationStats {
            generation: self.generation,
            best_fitness: sorted.first().map_or(f32::NEG_INFINITY, |c| c.fitness),
            mean_fitness: sorted.iter().map(|c| c.fitness).sum::<f32>() / count,
            best_ever_fitness: self.best_fitness,
            mean_points: sorted.iter().map(|c| c.points.len() as f32).sum::<f32>() / count,
            mean_muscles: sorted.iter().map(|c| c.muscles.len() as f32).sum::<f32>() / count,
        };

        info!(
            "generation {}: best {:.2}, mean {:.2}, best ever {:.2}",
            stats.generation, stats.best_fitness, stats.mean_fitness, stats.best_ever_fitness
        );

        self.history.push_back(stats);
        while self.history.len() > self.params.history_len {
            self.history.pop_front();
        }
    }
}

/// Fitness used for ranking; NaN ranks below every real value.
fn selection_key(creature: &Creature) -> f32 {
    if creature.fitness.is_nan() {
        f32::NEG_INFINITY
    } else {
        creature.fitness
    }
}
