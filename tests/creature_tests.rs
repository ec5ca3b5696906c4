#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use strider::simulation::creature::Creature;
use strider::simulation::muscle::Muscle;
use strider::simulation::params::Params;
use strider::simulation::point_mass::{IdAllocator, PointId, PointMass};
use strider::simulation::rng::create_rng;

fn create_test_params() -> Params {
    Params::for_world(800.0, 800.0)
}

/// Params in which nothing moves: no gravity, no muscle forces.
fn still_params() -> Params {
    let mut params = create_test_params();
    params.gravity = 0.0;
    params.stiffness = 0.0;
    params.muscle_strength = 0.0;
    params
}

/// A triangle whose centroid sits exactly on the spawn point (400, 400).
fn triangle(params: &Params, seed: u64) -> Creature {
    let mut rng = create_rng(seed);
    let points = vec![
        PointMass::new(PointId(0), 340.0, 420.0, params),
        PointMass::new(PointId(1), 460.0, 420.0, params),
        PointMass::new(PointId(2), 400.0, 360.0, params),
    ];
    let muscles = [(0, 1), (1, 2), (2, 0)]
        .iter()
        .filter_map(|&(a, b)| Muscle::new(&points, a, b, 1.0, params, &mut rng))
        .collect();
    Creature::new(points, muscles, params, &mut rng)
}

#[test]
fn test_still_triangle_fitness() {
    let params = still_params();
    let mut creature = triangle(&params, 1);
    assert_eq!(creature.muscles.len(), 3);

    for _ in 0..100 {
        creature.update(&params, 0.05);
    }

    // 5 s alive: age 0.05, energy untouched
    assert_eq!(creature.energy, 100.0);
    assert!(creature.distance_traveled.abs() < 1e-3);
    assert!(creature.velocity.abs() < 1e-3);
    assert!((creature.fitness - 0.95).abs() < 1e-4, "fitness {}", creature.fitness);
}

#[test]
fn test_zero_dt_has_no_velocity() {
    let params = create_test_params();
    let mut creature = triangle(&params, 2);
    creature.update(&params, 0.0);

    assert_eq!(creature.velocity, 0.0);
    assert!(creature.fitness.is_finite());
}

#[test]
fn test_starter_walker_layout() {
    let params = create_test_params();
    let mut ids = IdAllocator::new();
    let creature = Creature::starter_walker(&params, &mut ids, &mut create_rng(3));

    assert_eq!(creature.points.len(), 6);
    assert_eq!(creature.muscles.len(), 9);
    assert_eq!(creature.fixed_point_count(), 1);
    assert!(creature.points[0].fixed);
    assert_eq!(creature.points[0].pos[0], 400.0);
    assert_eq!(creature.points[0].pos[1], 400.0);
}

#[test]
fn test_random_creature_is_well_formed() {
    let params = create_test_params();
    let mut ids = IdAllocator::new();
    let mut rng = create_rng(4);

    for _ in 0..50 {
        let creature = Creature::random(&params, &mut ids, &mut rng);
        let n = creature.points.len();

        assert!((params.initial_points_min..=params.initial_points_max).contains(&n));
        assert!(creature.points[0].fixed);
        assert_eq!(creature.fixed_point_count(), 1);
        for muscle in &creature.muscles {
            assert!(muscle.a < n && muscle.b < n);
            assert_ne!(muscle.a, muscle.b);
            assert!(muscle.rest_length < params.initial_muscle_reach);
        }
        assert_eq!(creature.energy, params.initial_energy);
    }
}

#[test]
fn test_remove_point_remaps_muscles() {
    let params = create_test_params();
    let mut rng = create_rng(5);
    let points = vec![
        PointMass::new(PointId(0), 300.0, 400.0, &params),
        PointMass::new(PointId(1), 400.0, 400.0, &params),
        PointMass::new(PointId(2), 400.0, 300.0, &params),
        PointMass::new(PointId(3), 300.0, 300.0, &params),
    ];
    let muscles = [(0, 1), (1, 2), (2, 3), (0, 3)]
        .iter()
        .filter_map(|&(a, b)| Muscle::new(&points, a, b, 1.0, &params, &mut rng))
        .collect();
    let mut creature = Creature::new(points, muscles, &params, &mut rng);

    let removed = creature.remove_point(1);

    assert_eq!(removed.id, PointId(1));
    assert_eq!(creature.points.len(), 3);
    assert_eq!(creature.muscles.len(), 2);
    assert!(creature.has_muscle_between(1, 2));
    assert!(creature.has_muscle_between(0, 2));
    assert!(!creature.has_muscle_between(0, 1));
    for muscle in &creature.muscles {
        let length = muscle.get_length(&creature.points);
        assert!((length - muscle.rest_length).abs() < 1e-3);
    }
}

#[test]
fn test_add_point_returns_index() {
    let params = create_test_params();
    let mut creature = triangle(&params, 6);
    let index = creature.add_point(PointMass::new(PointId(9), 500.0, 500.0, &params));
    assert_eq!(index, 3);
    assert_eq!(creature.points[index].id, PointId(9));
}

#[test]
fn test_life_expiry() {
    let params = create_test_params();
    let mut creature = triangle(&params, 7);
    assert!(!creature.life_expired(&params));

    creature.time_alive = params.lifetime + 0.1;
    assert!(creature.life_expired(&params));

    creature.time_alive = 0.0;
    creature.energy = 0.0;
    assert!(creature.life_expired(&params));
}

#[test]
fn test_trial_fitness_is_deterministic_and_pure() {
    let mut params = create_test_params();
    params.lifetime = 2.0;
    let mut ids = IdAllocator::new();
    let creature = Creature::random(&params, &mut ids, &mut create_rng(8));

    let first = creature.trial_fitness(&params);
    let second = creature.trial_fitness(&params);

    assert_eq!(first, second);
    assert_eq!(creature.time_alive, 0.0);
}

#[test]
fn test_unsupported_points_fall() {
    let params = create_test_params();
    let mut ids = IdAllocator::new();
    let mut creature = Creature::starter_walker(&params, &mut ids, &mut create_rng(9));
    creature.muscles.clear();
    let start: Vec<f32> = creature.points.iter().map(|p| p.pos[1]).collect();

    for _ in 0..10 {
        creature.update(&params, params.base_dt);
    }

    for (point, y) in creature.points.iter().zip(start) {
        if point.fixed {
            assert_eq!(point.pos[1], y);
        } else {
            assert!(point.pos[1] > y);
        }
    }
}

#[test]
fn test_visuals_match_body() {
    let params = create_test_params();
    let creature = triangle(&params, 10);
    assert_eq!(creature.point_visuals().len(), 3);
    assert_eq!(creature.muscle_visuals().len(), 3);
}

/// The triangle's points without muscles, with the apex given a known
/// implicit velocity of (10, -5) per tick.
fn drifting_triangle(params: &Params) -> Creature {
    let mut rng = create_rng(11);
    let mut points = vec![
        PointMass::new(PointId(0), 340.0, 420.0, params),
        PointMass::new(PointId(1), 460.0, 420.0, params),
        PointMass::new(PointId(2), 400.0, 360.0, params),
    ];
    points[2].prev_pos = ndarray::Array1::from_vec(vec![390.0, 365.0]);
    Creature::new(points, Vec::new(), params, &mut rng)
}

#[test]
fn test_fitness_combines_every_term() {
    let params = still_params();
    let mut creature = drifting_triangle(&params);
    let dt = 0.05;

    creature.update(&params, dt);

    // the apex keeps 99% of its displacement, the centre moves a third of it
    let dx = 10.0 * params.friction / 3.0;
    let dy = -5.0 * params.friction / 3.0;
    assert!((creature.distance_traveled - dx).abs() < 1e-4);
    assert!((creature.velocity - dx / dt).abs() < 1e-2);
    assert!((creature.center[1] - (400.0 + dy)).abs() < 1e-4);
    assert_eq!(creature.energy, params.initial_energy);

    let expected = dx * params.distance_weight + (dx / dt) * params.velocity_weight
        - dy.abs() * params.height_penalty_weight
        + params.initial_energy * params.energy_weight
        - dt * params.age_rate;
    assert!(
        (creature.fitness - expected).abs() < 1e-2,
        "fitness {} expected {}",
        creature.fitness,
        expected
    );
    assert_eq!(creature.fitness, creature.compute_fitness(&params));
}

#[test]
fn test_height_drift_is_penalised_either_way() {
    let params = still_params();
    let mut creature = triangle(&params, 12);
    let level = creature.compute_fitness(&params);

    creature.center[1] = creature.spawn[1] + 30.0;
    let sunk = creature.compute_fitness(&params);
    creature.center[1] = creature.spawn[1] - 30.0;
    let lifted = creature.compute_fitness(&params);

    let penalty = 30.0 * params.height_penalty_weight;
    assert!((level - sunk - penalty).abs() < 1e-4);
    assert!((level - lifted - penalty).abs() < 1e-4);
}

#[test]
fn test_zero_dt_with_moving_body() {
    let params = still_params();
    let mut creature = drifting_triangle(&params);

    creature.update(&params, 0.0);

    let dx = 10.0 * params.friction / 3.0;
    let dy = 5.0 * params.friction / 3.0;
    assert_eq!(creature.velocity, 0.0);
    assert!((creature.distance_traveled - dx).abs() < 1e-4);
    let expected = dx * params.distance_weight - dy * params.height_penalty_weight
        + params.initial_energy * params.energy_weight;
    assert!((creature.fitness - expected).abs() < 1e-4);
}

#[test]
fn test_body_stays_inside_world_under_muscle_forces() {
    let params = create_test_params();
    let mut ids = IdAllocator::new();
    let mut rng = create_rng(13);

    for _ in 0..5 {
        let mut creature = Creature::random(&params, &mut ids, &mut rng);
        for _ in 0..300 {
            creature.update(&params, params.base_dt);
            for point in &creature.points {
                let r = point.radius;
                assert!(point.pos[0] >= r && point.pos[0] <= params.world_width - r);
                assert!(point.pos[1] >= r && point.pos[1] <= params.world_height - r);
            }
        }
    }
}

#[test]
fn test_muscle_pushing_into_floor_is_clamped() {
    let mut params = still_params();
    params.muscle_strength = 0.5;
    params.stiffness = 0.4;
    let mut rng = create_rng(14);
    let floor = params.world_height - params.point_radius;
    let points = vec![
        PointMass::new(PointId(0), 400.0, floor - 100.0, &params),
        PointMass::new(PointId(1), 400.0, floor, &params),
    ];
    let muscles = Muscle::new(&points, 0, 1, 1.0, &params, &mut rng)
        .into_iter()
        .collect();
    let mut creature = Creature::new(points, muscles, &params, &mut rng);

    // squash the muscle so it pushes the foot downwards
    creature.points[0].pos[1] = floor - 10.0;
    creature.points[0].prev_pos[1] = floor - 10.0;
    creature.update(&params, params.base_dt);

    assert!(creature.points[1].pos[1] <= floor);
}
