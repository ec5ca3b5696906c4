//! Read-only snapshot of a creature for renderers.
//!
//! The simulation never draws; a renderer polls these values once per frame.

/// An 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Anchored points.
    pub const RED: Rgb = Rgb(255, 50, 50);
    /// Relaxed muscles.
    pub const BLUE: Rgb = Rgb(50, 50, 255);
    /// Contracting muscles.
    pub const GREEN: Rgb = Rgb(50, 255, 50);
    /// Default point colour.
    pub const YELLOW: Rgb = Rgb(255, 255, 50);
    /// Stretched muscles.
    pub const ORANGE: Rgb = Rgb(255, 150, 50);
    /// Compressed muscles.
    pub const PURPLE: Rgb = Rgb(150, 50, 255);
}

/// Drawable state of one point mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointVisual {
    /// World position.
    pub pos: [f32; 2],
    /// Draw radius.
    pub radius: f32,
    /// Whether the point is an immovable anchor.
    pub fixed: bool,
    /// Fill colour.
    pub color: Rgb,
}

/// Drawable state of one muscle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MuscleVisual {
    /// Position of the first endpoint.
    pub from: [f32; 2],
    /// Position of the second endpoint.
    pub to: [f32; 2],
    /// Whether the brain currently asks the muscle to contract.
    pub contracting: bool,
    /// Line colour derived from contraction state and length ratio.
    pub color: Rgb,
}
