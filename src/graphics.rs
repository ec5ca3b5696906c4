use macroquad::prelude::*;
use strider::simulation::clock::Simulation;
use strider::simulation::params::Params;
use strider::simulation::render_state::Rgb;

/// Fraction of the world height covered by sky; the rest is ground.
const GROUND_LEVEL: f32 = 0.8;

trait ToColor {
    fn to_color(&self) -> Color;
}

impl ToColor for Rgb {
    fn to_color(&self) -> Color {
        Color::from_rgba(self.0, self.1, self.2, 255)
    }
}

/// Maps world coordinates to the window, shifted horizontally by the camera.
struct View {
    scale: f32,
    offset: f32,
}

impl View {
    fn new(params: &Params, offset: f32) -> Self {
        let scale = (screen_width() / params.world_width).min(screen_height() / params.world_height);
        Self { scale, offset }
    }

    fn to_screen(&self, pos: [f32; 2]) -> (f32, f32) {
        ((pos[0] + self.offset) * self.scale, pos[1] * self.scale)
    }
}

/// Horizontal camera offset that eases towards keeping the creature centred.
#[derive(Default)]
pub struct Camera {
    offset: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn follow(&mut self, sim: &Simulation) {
        let params = sim.evolution().params();
        let target = params.world_width / 2.0 - sim.current().center[0];
        self.offset += (target - self.offset) * 0.1 * sim.speed_multiplier() as f32;
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
    }
}

pub fn draw_world(sim: &Simulation, camera: &Camera) {
    let params = sim.evolution().params();
    let view = View::new(params, camera.offset);

    let ground_y = params.world_height * GROUND_LEVEL * view.scale;
    draw_rectangle(0.0, 0.0, screen_width(), ground_y, Color::from_rgba(240, 240, 255, 255));
    draw_rectangle(
        0.0,
        ground_y,
        screen_width(),
        screen_height() - ground_y,
        Color::from_rgba(120, 70, 30, 255),
    );

    // grass tufts scroll with the camera
    let spacing = 25.0 * view.scale;
    let shift = (camera.offset * view.scale).rem_euclid(spacing);
    let mut x = -spacing + shift;
    while x < screen_width() + spacing {
        draw_line(x, ground_y, x - 12.0 * view.scale, ground_y - 15.0 * view.scale, 3.0, GREEN);
        x += spacing;
    }

    let creature = sim.current();
    for muscle in creature.muscle_visuals() {
        let (x1, y1) = view.to_screen(muscle.from);
        let (x2, y2) = view.to_screen(muscle.to);
        let width = if muscle.contracting { 6.0 } else { 4.0 };
        draw_line(x1, y1, x2, y2, width * view.scale, muscle.color.to_color());
    }

    for point in creature.point_visuals() {
        let (px, py) = view.to_screen(point.pos);
        let radius = point.radius * view.scale;
        draw_circle(px, py, radius, point.color.to_color());
        if point.fixed {
            let (ring_radius, ring_width) = anchor_ring(radius, view.scale);
            draw_circle_lines(px, py, ring_radius, ring_width, BLACK);
        }
    }
}

/// Radius and line width of the ring drawn around an anchor of screen radius `radius`.
fn anchor_ring(radius: f32, scale: f32) -> (f32, f32) {
    (radius + 4.0 * scale, 2.0 * scale)
}

pub fn draw_hud(sim: &Simulation) {
    draw_rectangle(0.0, 0.0, screen_width(), 100.0, Color::from_rgba(150, 150, 150, 150));

    let stats = [
        format!("Generation: {}", sim.generation()),
        format!("Best distance: {:.1}", sim.best_distance()),
        format!("Speed: {}x{}", sim.speed_multiplier(), if sim.is_simulating() { "" } else { " (paused)" }),
        format!("Fitness: {:.1}", sim.current().fitness),
    ];

    let font_size = 22.0;
    for (i, text) in stats.iter().enumerate() {
        draw_text(text, 10.0, 22.0 + i as f32 * (font_size + 2.0), font_size, WHITE);
    }

    let help = "Space: pause   S: speed   R: reset   Esc: quit";
    let size = measure_text(help, None, font_size as u16, 1.0);
    draw_text(
        help,
        screen_width() - size.width - 10.0,
        screen_height() - 10.0,
        font_size,
        DARKGRAY,
    );
}
