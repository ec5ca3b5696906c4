//! Creatures: a body graph of points and muscles driven by a scripted brain.

use log::debug;
use ndarray::Array1;
use rand::Rng;
use rand::seq::index;

use super::brain::Brain;
use super::geometric_utils;
use super::muscle::Muscle;
use super::params::Params;
use super::point_mass::{IdAllocator, PointMass};
use super::render_state::{MuscleVisual, PointVisual, Rgb};
use super::rng::{self, SimRng};

/// Offsets (in reference units) and colours of the starter body, relative to spawn.
const STARTER_POINTS: [(f32, f32, Rgb); 5] = [
    (-60.0, 40.0, Rgb::BLUE),
    (60.0, 40.0, Rgb::BLUE),
    (-90.0, 90.0, Rgb::GREEN),
    (90.0, 90.0, Rgb::GREEN),
    (0.0, -60.0, Rgb::ORANGE),
];

/// Muscles of the starter body: endpoint indices and strength multiplier.
const STARTER_MUSCLES: [(usize, usize, f32); 9] = [
    (0, 1, 1.2),
    (0, 2, 1.2),
    (1, 2, 0.8),
    (1, 3, 1.0),
    (2, 4, 1.0),
    (3, 4, 1.1),
    (0, 5, 0.9),
    (5, 1, 0.7),
    (5, 2, 0.7),
];

/// A soft-bodied creature.
///
/// The creature owns its points and muscles exclusively. Fitness is recomputed
/// from the current state on every [`Creature::update`].
#[derive(Debug, Clone)]
pub struct Creature {
    /// Body nodes. Muscles refer to them by index.
    pub points: Vec<PointMass>,
    /// Actuators between pairs of points.
    pub muscles: Vec<Muscle>,
    /// Scripted controller.
    pub brain: Brain,
    /// Where the creature started; distance and drift are measured from here.
    pub spawn: Array1<f32>,
    /// Unweighted centre of all points.
    pub center: Array1<f32>,
    /// Simulated seconds since birth.
    pub time_alive: f32,
    /// Age penalty accumulated so far.
    pub age: f32,
    /// Remaining energy, drained by muscle deformation.
    pub energy: f32,
    /// Horizontal displacement of the centre from the spawn.
    pub distance_traveled: f32,
    /// Horizontal centre velocity over the last tick.
    pub velocity: f32,
    /// Fitness derived from the current state.
    pub fitness: f32,
    /// Body colour for display.
    pub color: Rgb,
}

impl Creature {
    /// Assembles a creature from a body; the brain stream is derived from `rng`.
    pub fn new(
        points: Vec<PointMass>,
        muscles: Vec<Muscle>,
        params: &Params,
        rng: &mut SimRng,
    ) -> Self {
        let brain = Brain::new(rng::derive_rng(rng));
        let color = Rgb(
            rng.random_range(100..=255),
            rng.random_range(100..=255),
            rng.random_range(100..=255),
        );
        let (sx, sy) = params.spawn_point();
        let spawn = Array1::from_vec(vec![sx, sy]);
        let center = geometric_utils::centroid(points.iter().map(|p| &p.pos))
            .unwrap_or_else(|| spawn.clone());

        Self {
            points,
            muscles,
            brain,
            spawn,
            center,
            time_alive: 0.0,
            age: 0.0,
            energy: params.initial_energy,
            distance_traveled: 0.0,
            velocity: 0.0,
            fitness: 0.0,
            color,
        }
    }

    /// Builds a random body around the spawn point.
    ///
    /// The first point is an anchor at the spawn; the others sit at a random
    /// polar offset. Muscles join random pairs closer than the initial reach.
    pub fn random(params: &Params, ids: &mut IdAllocator, rng: &mut SimRng) -> Self {
        let (sx, sy) = params.spawn_point();
        let spawn = Array1::from_vec(vec![sx, sy]);
        let num_points = rng.random_range(params.initial_points_min..=params.initial_points_max);

        let mut points = Vec::with_capacity(num_points);
        points.push(PointMass::at(ids.next_id(), spawn.clone(), params).anchored());
        for _ in 1..num_points {
            let pos = random_spawn_offset(&spawn, params, rng);
            points.push(PointMass::at(ids.next_id(), pos, params).with_color(random_point_color(rng)));
        }

        let mut muscles = Vec::new();
        let attempts = rng.random_range(num_points..=num_points * 2);
        for _ in 0..attempts {
            let pair = index::sample(rng, points.len(), 2);
            let (a, b) = (pair.index(0), pair.index(1));
            if geometric_utils::distance(&points[a].pos, &points[b].pos) < params.initial_muscle_reach {
                let strength_mult = rng.random_range(0.7f32..1.3);
                if let Some(muscle) = Muscle::new(&points, a, b, strength_mult, params, rng) {
                    muscles.push(muscle);
                }
            }
        }

        Self::new(points, muscles, params, rng)
    }

    /// Builds the hand-designed six point, nine muscle walker.
    pub fn starter_walker(params: &Params, ids: &mut IdAllocator, rng: &mut SimRng) -> Self {
        let (sx, sy) = params.spawn_point();
        let mut points = vec![PointMass::new(ids.next_id(), sx, sy, params).anchored()];
        for (dx, dy, color) in STARTER_POINTS {
            let (x, y) = (sx + dx * params.scale, sy + dy * params.scale);
            points.push(PointMass::new(ids.next_id(), x, y, params).with_color(color));
        }

        let muscles = STARTER_MUSCLES
            .iter()
            .filter_map(|&(a, b, mult)| Muscle::new(&points, a, b, mult, params, rng))
            .collect();

        Self::new(points, muscles, params, rng)
    }

    /// Advances the creature by one tick and recomputes its fitness.
    ///
    /// Points integrate first, then muscles push them. Muscle pushes can cross
    /// a wall, so every point is clamped again afterwards and the body ends
    /// each tick inside the world.
    ///
    /// # Arguments
    ///
    /// * `params` - Simulation parameters
    /// * `dt` - Time delta in seconds
    pub fn update(&mut self, params: &Params, dt: f32) {
        self.time_alive += dt;
        self.age += dt * params.age_rate;

        self.brain.update(&mut self.muscles, dt);

        for point in &mut self.points {
            point.update(params, dt);
        }
        for muscle in &mut self.muscles {
            muscle.update(&mut self.points, params, dt);
        }
        for point in &mut self.points {
            point.clamp_to_world(params);
        }

        let previous_x = self.center[0];
        if let Some(center) = geometric_utils::centroid(self.points.iter().map(|p| &p.pos)) {
            self.center = center;
        }
        self.distance_traveled = self.center[0] - self.spawn[0];

        let movement_cost: f32 = self
            .muscles
            .iter()
            .map(|m| (m.get_length(&self.points) - m.rest_length).abs() * params.movement_cost_rate)
            .sum();
        self.energy -= movement_cost * dt;

        self.velocity = if dt > 0.0 {
            (self.center[0] - previous_x) / dt
        } else {
            0.0
        };
        self.fitness = self.compute_fitness(params);
    }

    /// Fitness of the current state.
    pub fn compute_fitness(&self, params: &Params) -> f32 {
        let height_penalty = (self.center[1] - self.spawn[1]).abs() * params.height_penalty_weight;
        let energy_bonus = self.energy * params.energy_weight;
        self.distance_traveled * params.distance_weight + self.velocity * params.velocity_weight
            - height_penalty
            + energy_bonus
            - self.age
    }

    /// Whether the creature has used up its lifetime or its energy.
    pub fn life_expired(&self, params: &Params) -> bool {
        self.time_alive > params.lifetime || self.energy <= 0.0
    }

    /// Runs a copy of this creature for one lifetime and returns its final fitness.
    ///
    /// The copy carries its own brain stream, so the result only depends on
    /// this creature's state.
    pub fn trial_fitness(&self, params: &Params) -> f32 {
        let mut trial = self.clone();
        let max_ticks = (params.lifetime / params.base_dt).ceil() as usize + 1;
        for _ in 0..max_ticks {
            trial.update(params, params.base_dt);
            if trial.life_expired(params) {
                break;
            }
        }
        trial.fitness
    }

    /// Appends a point and returns its index.
    pub fn add_point(&mut self, point: PointMass) -> usize {
        self.points.push(point);
        self.points.len() - 1
    }

    /// Removes a point together with every muscle attached to it.
    ///
    /// Muscle indices above the removed point shift down by one.
    pub fn remove_point(&mut self, index: usize) -> PointMass {
        let removed = self.points.remove(index);
        let before = self.muscles.len();
        self.muscles.retain(|m| !m.touches(index));
        for muscle in &mut self.muscles {
            if muscle.a > index {
                muscle.a -= 1;
            }
            if muscle.b > index {
                muscle.b -= 1;
            }
        }
        debug!(
            "removed point {:?} and {} attached muscles",
            removed.id,
            before - self.muscles.len()
        );
        removed
    }

    /// Whether a muscle already joins points `i` and `j` (either direction).
    pub fn has_muscle_between(&self, i: usize, j: usize) -> bool {
        self.muscles.iter().any(|m| m.connects(i, j))
    }

    /// Number of anchored points.
    pub fn fixed_point_count(&self) -> usize {
        self.points.iter().filter(|p| p.fixed).count()
    }

    /// Drawable snapshot of all points.
    pub fn point_visuals(&self) -> Vec<PointVisual> {
        self.points.iter().map(PointMass::visual).collect()
    }

    /// Drawable snapshot of all muscles.
    pub fn muscle_visuals(&self) -> Vec<MuscleVisual> {
        self.muscles.iter().map(|m| m.visual(&self.points)).collect()
    }
}

/// Random position at a polar offset from `origin` within the spawn ring.
pub(crate) fn random_spawn_offset(
    origin: &Array1<f32>,
    params: &Params,
    rng: &mut SimRng,
) -> Array1<f32> {
    let angle = rng.random::<f32>() * std::f32::consts::TAU;
    let dist = if params.spawn_offset_min < params.spawn_offset_max {
        rng.random_range(params.spawn_offset_min..=params.spawn_offset_max)
    } else {
        params.spawn_offset_min
    };
    geometric_utils::polar_offset(origin, angle, dist)
}

/// Random colour for a movable point.
pub(crate) fn random_point_color(rng: &mut SimRng) -> Rgb {
    Rgb(
        rng.random_range(50..=255),
        rng.random_range(50..=255),
        rng.random_range(50..=255),
    )
}
