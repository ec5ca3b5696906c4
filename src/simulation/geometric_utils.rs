//! Geometric utility functions for distance calculations and spatial operations.

use geo::algorithm::Distance;
use geo::{Euclidean, Point};
use ndarray::Array1;

/// Calculates the Euclidean distance between two 2D positions.
///
/// # Arguments
///
/// * `a` - First position
/// * `b` - Second position
///
/// # Returns
///
/// The straight-line distance, identical for `(a, b)` and `(b, a)`.
pub fn distance(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    Euclidean.distance(&Point::new(a[0], a[1]), &Point::new(b[0], b[1]))
}

/// Clamps a position into the world rectangle, keeping `margin` from every edge.
///
/// # Arguments
///
/// * `v` - Mutable position vector to clamp
/// * `width` - Width of the world
/// * `height` - Height of the world
/// * `margin` - Distance to keep from each edge (the point radius)
pub fn clamp_to_bounds_mut(v: &mut Array1<f32>, width: f32, height: f32, margin: f32) {
    v[0] = v[0].min(width - margin).max(margin);
    v[1] = v[1].min(height - margin).max(margin);
}

/// Returns the position at `dist` from `origin` in direction `angle` (radians).
pub fn polar_offset(origin: &Array1<f32>, angle: f32, dist: f32) -> Array1<f32> {
    Array1::from_vec(vec![
        origin[0] + angle.cos() * dist,
        origin[1] + angle.sin() * dist,
    ])
}

/// Unweighted mean of a set of positions, or `None` when the set is empty.
pub fn centroid<'a>(positions: impl IntoIterator<Item = &'a Array1<f32>>) -> Option<Array1<f32>> {
    let mut sum = Array1::zeros(2);
    let mut count = 0usize;
    for pos in positions {
        sum += pos;
        count += 1;
    }
    (count > 0).then(|| sum / count as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_symmetric() {
        let a = Array1::from_vec(vec![1.0, 2.0]);
        let b = Array1::from_vec(vec![4.0, 6.0]);
        assert!((distance(&a, &b) - 5.0).abs() < 1e-6);
        assert_eq!(distance(&a, &b), distance(&b, &a));
    }

    #[test]
    fn test_clamp_outside_point() {
        let mut v = Array1::from_vec(vec![-50.0, 900.0]);
        clamp_to_bounds_mut(&mut v, 100.0, 100.0, 5.0);
        assert_eq!(v[0], 5.0);
        assert_eq!(v[1], 95.0);
    }

    #[test]
    fn test_centroid_of_empty_set() {
        let empty: Vec<Array1<f32>> = Vec::new();
        assert!(centroid(&empty).is_none());
    }
}
