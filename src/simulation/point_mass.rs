//! Point masses: the nodes of a creature's body graph.
//!
//! Points integrate with a position-history (Verlet style) scheme: velocity is
//! never stored, it is the difference between the current and the previous
//! position.

use ndarray::Array1;

use super::geometric_utils;
use super::params::Params;
use super::render_state::{PointVisual, Rgb};

/// Stable identity of a point, carried through crossover copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub u64);

/// Hands out monotonically increasing [`PointId`]s.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Creates an allocator starting at id 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh, never used id.
    pub fn next_id(&mut self) -> PointId {
        let id = PointId(self.next);
        self.next += 1;
        id
    }
}

/// A simulated mass particle.
#[derive(Debug, Clone, PartialEq)]
pub struct PointMass {
    /// Identity used as graph-node key during crossover.
    pub id: PointId,
    /// Current position.
    pub pos: Array1<f32>,
    /// Position before the last integration step.
    pub prev_pos: Array1<f32>,
    /// Immovable anchor flag.
    pub fixed: bool,
    /// Mass, always positive.
    pub mass: f32,
    /// Collision radius used for the world clamp.
    pub radius: f32,
    /// Display colour.
    pub color: Rgb,
}

impl PointMass {
    /// Creates a movable point at rest at `(x, y)`.
    pub fn new(id: PointId, x: f32, y: f32, params: &Params) -> Self {
        Self::at(id, Array1::from_vec(vec![x, y]), params)
    }

    /// Creates a movable point at rest at `pos`.
    pub fn at(id: PointId, pos: Array1<f32>, params: &Params) -> Self {
        Self {
            id,
            prev_pos: pos.clone(),
            pos,
            fixed: false,
            mass: params.point_mass,
            radius: params.point_radius,
            color: Rgb::YELLOW,
        }
    }

    /// Turns the point into an immovable anchor.
    #[must_use]
    pub fn anchored(mut self) -> Self {
        self.fixed = true;
        self.color = Rgb::RED;
        self
    }

    /// Sets the display colour. Anchors stay red.
    #[must_use]
    pub fn with_color(mut self, color: Rgb) -> Self {
        if !self.fixed {
            self.color = color;
        }
        self
    }

    /// Copies this point for a new body: same identity and position, at rest.
    pub fn respawned(&self) -> Self {
        Self {
            prev_pos: self.pos.clone(),
            ..self.clone()
        }
    }

    /// Implicit velocity: displacement since the previous step.
    pub fn velocity(&self) -> Array1<f32> {
        &self.pos - &self.prev_pos
    }

    /// Advances the point by one step.
    ///
    /// Fixed points are left untouched. Movable points keep a fraction
    /// (`friction`) of their implicit velocity, fall under gravity and are then
    /// clamped into the world. The clamp is a hard wall: the previous position
    /// is not corrected, so a point pressed against a wall stays there.
    ///
    /// # Arguments
    ///
    /// * `params` - Simulation parameters
    /// * `dt` - Time delta in seconds
    pub fn update(&mut self, params: &Params, dt: f32) {
        if self.fixed {
            return;
        }

        let velocity = self.velocity() * params.friction;
        let previous = self.pos.clone();

        self.pos += &velocity;
        self.pos[1] += params.gravity * dt * params.gravity_time_scale;
        self.prev_pos = previous;

        self.clamp_to_world(params);
    }

    /// Pulls a movable point back inside the world, keeping `radius` from
    /// every wall. The previous position is left alone.
    pub fn clamp_to_world(&mut self, params: &Params) {
        if self.fixed {
            return;
        }
        geometric_utils::clamp_to_bounds_mut(
            &mut self.pos,
            params.world_width,
            params.world_height,
            self.radius,
        );
    }

    /// Drawable snapshot of the point.
    pub fn visual(&self) -> PointVisual {
        PointVisual {
            pos: [self.pos[0], self.pos[1]],
            radius: self.radius,
            fixed: self.fixed,
            color: self.color,
        }
    }
}
