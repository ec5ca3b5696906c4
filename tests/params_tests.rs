#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::path::PathBuf;

use strider::simulation::params::{Params, ParamsError};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("strider_{}_{}.json", name, std::process::id()))
}

#[test]
fn test_default_is_valid() {
    let params = Params::default();
    assert!(params.validate().is_ok());
    assert_eq!(params.world_width, 1600.0);
    assert_eq!(params.world_height, 800.0);
    assert_eq!(params.scale, 1.0);
    assert_eq!(params.spawn_point(), (800.0, 400.0));
}

#[test]
fn test_lengths_scale_with_smaller_side() {
    let params = Params::for_world(400.0, 1000.0);
    assert_eq!(params.scale, 0.5);
    assert_eq!(params.point_radius, 5.0);
    assert_eq!(params.min_muscle_length, 20.0);
    assert_eq!(params.max_muscle_length, 90.0);
    assert!(params.validate().is_ok());
}

#[test]
fn test_breeding_pool_size() {
    let mut params = Params::default();
    assert_eq!(params.breeding_pool_size(), 3);
    params.population_size = 2;
    assert_eq!(params.breeding_pool_size(), 1);
}

#[test]
fn test_invalid_values_are_rejected() {
    let mut params = Params::default();
    params.population_size = 1;
    assert!(matches!(params.validate(), Err(ParamsError::Invalid(_))));

    let mut params = Params::default();
    params.elite_fraction = 1.5;
    assert!(matches!(params.validate(), Err(ParamsError::Invalid(_))));

    let mut params = Params::default();
    params.base_dt = 0.0;
    assert!(params.validate().is_err());

    let mut params = Params::default();
    params.min_muscle_length = params.max_muscle_length + 1.0;
    assert!(params.validate().is_err());
}

#[test]
fn test_save_and_load() {
    let path = temp_path("roundtrip");
    let mut params = Params::for_world(1200.0, 900.0);
    params.population_size = 16;

    params.save_to_file(&path).unwrap();
    let loaded = Params::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, params);
}

#[test]
fn test_missing_fields_use_defaults() {
    let path = temp_path("partial");
    std::fs::write(&path, r#"{ "population_size": 12 }"#).unwrap();
    let loaded = Params::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let mut expected = Params::default();
    expected.population_size = 12;
    assert_eq!(loaded, expected);
}

#[test]
fn test_load_errors() {
    let path = temp_path("broken");
    std::fs::write(&path, "{ not json").unwrap();
    let result = Params::load_from_file(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(ParamsError::Json(_))));

    let result = Params::load_from_file(temp_path("missing"));
    assert!(matches!(result, Err(ParamsError::Io(_))));

    let path = temp_path("invalid");
    std::fs::write(&path, r#"{ "population_size": 0 }"#).unwrap();
    let result = Params::load_from_file(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(ParamsError::Invalid(_))));
}

#[test]
fn test_world_size_alone_rescales_lengths() {
    let path = temp_path("small_world");
    std::fs::write(&path, r#"{ "world_width": 400.0, "world_height": 400.0 }"#).unwrap();
    let loaded = Params::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, Params::for_world(400.0, 400.0));
    assert_eq!(loaded.scale, 0.5);
    assert_eq!(loaded.point_radius, 5.0);
}

#[test]
fn test_explicit_lengths_win_over_world_scaling() {
    let params = Params::from_json(r#"{ "world_width": 400.0, "world_height": 400.0, "point_radius": 8.0 }"#)
        .unwrap();

    assert_eq!(params.point_radius, 8.0);
    assert_eq!(params.gravity, Params::for_world(400.0, 400.0).gravity);
}
