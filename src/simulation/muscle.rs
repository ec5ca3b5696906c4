//! Muscles: spring-like actuators between two point masses.
//!
//! A muscle stores indices into its creature's point list rather than
//! references, so removing a point is a filter over muscle indices.

use ndarray::Array1;
use rand::Rng;

use super::geometric_utils;
use super::params::Params;
use super::point_mass::PointMass;
use super::render_state::{MuscleVisual, Rgb};
use super::rng::SimRng;

/// Colour class of a muscle, derived from its state after each update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuscleTone {
    /// The brain is asking the muscle to contract.
    Contracting,
    /// Longer than 120% of rest length.
    Stretched,
    /// Shorter than 80% of rest length.
    Compressed,
    /// Anything else.
    Relaxed,
}

impl MuscleTone {
    /// Display colour for this tone.
    pub fn color(self) -> Rgb {
        match self {
            MuscleTone::Contracting => Rgb::GREEN,
            MuscleTone::Stretched => Rgb::ORANGE,
            MuscleTone::Compressed => Rgb::PURPLE,
            MuscleTone::Relaxed => Rgb::BLUE,
        }
    }
}

/// A spring-like actuator connecting two distinct points.
#[derive(Debug, Clone, PartialEq)]
pub struct Muscle {
    /// Index of the first endpoint in the owning creature's points.
    pub a: usize,
    /// Index of the second endpoint in the owning creature's points.
    pub b: usize,
    /// Natural length, measured when the muscle was built.
    pub rest_length: f32,
    /// Length the actuator is currently pulling towards.
    pub target_length: f32,
    /// Actuator strength (global strength times a per-muscle multiplier).
    pub base_strength: f32,
    /// Oscillation phase in radians.
    pub phase: f32,
    /// Oscillation speed, phase advances by `dt * speed`.
    pub speed: f32,
    /// Contract/relax state set by the brain.
    pub contracting: bool,
    /// Colour class from the last update.
    pub tone: MuscleTone,
}

impl Muscle {
    /// Builds a muscle between `points[a]` and `points[b]`.
    ///
    /// The rest length is the current distance between the endpoints; phase
    /// and speed are sampled from `rng`. Returns `None` when `a == b` or the
    /// endpoints coincide, since such a muscle has no direction.
    pub fn new(
        points: &[PointMass],
        a: usize,
        b: usize,
        strength_mult: f32,
        params: &Params,
        rng: &mut SimRng,
    ) -> Option<Self> {
        if a == b {
            return None;
        }
        let rest_length = geometric_utils::distance(&points[a].pos, &points[b].pos);
        if rest_length <= 0.0 {
            return None;
        }
        Some(Self {
            a,
            b,
            rest_length,
            target_length: rest_length,
            base_strength: params.muscle_strength * strength_mult,
            phase: rng.random::<f32>() * std::f32::consts::TAU,
            speed: rng.random_range(params.muscle_speed_min..params.muscle_speed_max),
            contracting: false,
            tone: MuscleTone::Relaxed,
        })
    }

    /// Strength relative to the global muscle strength.
    pub fn strength_mult(&self, params: &Params) -> f32 {
        if params.muscle_strength == 0.0 {
            1.0
        } else {
            self.base_strength / params.muscle_strength
        }
    }

    /// Current distance between the endpoints.
    pub fn get_length(&self, points: &[PointMass]) -> f32 {
        geometric_utils::distance(&points[self.a].pos, &points[self.b].pos)
    }

    /// Whether this muscle joins `i` and `j`, in either order.
    pub fn connects(&self, i: usize, j: usize) -> bool {
        (self.a == i && self.b == j) || (self.a == j && self.b == i)
    }

    /// Whether either endpoint is `i`.
    pub fn touches(&self, i: usize) -> bool {
        self.a == i || self.b == i
    }

    /// Updates the target length and pushes the endpoints.
    ///
    /// The actuator pulls the current length towards the oscillating target;
    /// a separate stiffness term pulls towards the rest length. A zero length
    /// muscle applies no force.
    ///
    /// # Arguments
    ///
    /// * `points` - The owning creature's points
    /// * `params` - Simulation parameters
    /// * `dt` - Time delta in seconds
    pub fn update(&mut self, points: &mut [PointMass], params: &Params, dt: f32) {
        self.target_length = if self.contracting {
            (self.rest_length * (0.6 + 0.1 * self.phase.sin())).max(params.min_muscle_length)
        } else {
            (self.rest_length * (1.0 + 0.2 * (self.phase * 0.5).sin()))
                .min(params.max_muscle_length)
        };
        self.phase += dt * self.speed;

        let current_length = self.get_length(points);
        if current_length == 0.0 {
            return;
        }

        let direction: Array1<f32> = (&points[self.b].pos - &points[self.a].pos) / current_length;

        let force = (current_length - self.target_length) * self.base_strength;
        let actuator_step = force * dt * params.actuator_time_scale;
        self.push(points, &direction, actuator_step, true);

        let stiffness_force = (current_length - self.rest_length) * params.stiffness;
        let stiffness_step = stiffness_force * dt * params.stiffness_time_scale;
        self.push(points, &direction, stiffness_step, false);

        self.tone = if self.contracting {
            MuscleTone::Contracting
        } else {
            let ratio = current_length / self.rest_length;
            if ratio > 1.2 {
                MuscleTone::Stretched
            } else if ratio < 0.8 {
                MuscleTone::Compressed
            } else {
                MuscleTone::Relaxed
            }
        };
    }

    /// Moves `a` along `direction` and `b` against it by `step`.
    fn push(&self, points: &mut [PointMass], direction: &Array1<f32>, step: f32, by_mass: bool) {
        for (index, sign) in [(self.a, 1.0), (self.b, -1.0)] {
            let point = &mut points[index];
            if point.fixed {
                continue;
            }
            let scale = if by_mass { step / point.mass } else { step };
            point.pos.scaled_add(sign * scale, direction);
        }
    }

    /// Drawable snapshot of the muscle.
    pub fn visual(&self, points: &[PointMass]) -> MuscleVisual {
        let from = &points[self.a].pos;
        let to = &points[self.b].pos;
        MuscleVisual {
            from: [from[0], from[1]],
            to: [to[0], to[1]],
            contracting: self.contracting,
            color: self.tone.color(),
        }
    }
}
