//! Interactive viewer: watches one creature at a time while the population evolves.

use macroquad::prelude::*;
use strider::simulation::clock::{Simulation, TickOutcome};
use strider::simulation::params::Params;

mod graphics;

/// Optional parameter file read at startup.
const PARAMS_PATH: &str = "strider.json";

fn load_params() -> Params {
    if !std::path::Path::new(PARAMS_PATH).exists() {
        return Params::default();
    }
    match Params::load_from_file(PARAMS_PATH) {
        Ok(params) => params,
        Err(e) => {
            log::warn!("ignoring {}: {}", PARAMS_PATH, e);
            Params::default()
        }
    }
}

#[macroquad::main("Evolving Walkers")]
async fn main() {
    env_logger::init();

    let params = load_params();
    let mut sim = Simulation::new(params);
    let mut camera = graphics::Camera::new();

    log::info!("Starting walker evolution");

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::Space) {
            sim.toggle_pause();
        }
        if is_key_pressed(KeyCode::S) {
            sim.cycle_speed();
        }
        if is_key_pressed(KeyCode::R) {
            sim.reset();
            camera.reset();
        }

        match sim.tick() {
            TickOutcome::GenerationAdvanced { .. } => camera.reset(),
            TickOutcome::Running => camera.follow(&sim),
            TickOutcome::Paused => {}
        }

        clear_background(WHITE);
        graphics::draw_world(&sim, &camera);
        graphics::draw_hud(&sim);

        next_frame().await
    }
}
