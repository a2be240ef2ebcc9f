// ABOUTME: Flow field animation: particles advected by a synthetic vector field.
// ABOUTME: The field is sampled from sin/cos of position and time; trails persist.

use mpl_core::Color;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::engine::Animation;
use crate::surface::Surface;

const PARTICLE_COUNT: usize = 60;
const SPEED: f32 = 1.5;

struct Tracer {
    x: f32,
    y: f32,
}

pub struct FlowField {
    rng: SmallRng,
    color: Color,
    tracers: Vec<Tracer>,
    t: f32,
}

impl FlowField {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            color: Color::ACCENT,
            tracers: Vec::new(),
            t: 0.0,
        }
    }

    fn generate(&mut self, surface: &Surface) {
        let w = surface.width() as f32;
        let h = surface.height() as f32;
        self.tracers = (0..PARTICLE_COUNT)
            .map(|_| Tracer {
                x: self.rng.gen::<f32>() * w,
                y: self.rng.gen::<f32>() * h,
            })
            .collect();
    }

    /// Field direction at a point, in radians
    fn field_angle(x: f32, y: f32, t: f32) -> f32 {
        ((x * 0.01 + t).sin() + (y * 0.01 - t).cos()) * std::f32::consts::PI
    }
}

impl Animation for FlowField {
    fn name(&self) -> &'static str {
        "flow-field"
    }

    fn init(&mut self, surface: &mut Surface, color: Color) {
        self.color = color;
        self.t = 0.0;
        self.generate(surface);
    }

    fn step(&mut self, surface: &mut Surface) {
        surface.fade(Color::BACKGROUND, 0.03);

        let w = surface.width() as f32;
        let h = surface.height() as f32;
        let trail = self.color.with_alpha(0.2);

        for tracer in &mut self.tracers {
            let angle = Self::field_angle(tracer.x, tracer.y, self.t);
            let nx = tracer.x + angle.cos() * SPEED;
            let ny = tracer.y + angle.sin() * SPEED;

            surface.line(
                tracer.x as i32,
                tracer.y as i32,
                nx as i32,
                ny as i32,
                trail,
            );

            // Respawn when a tracer leaves the surface
            if nx < 0.0 || nx >= w || ny < 0.0 || ny >= h {
                tracer.x = self.rng.gen::<f32>() * w;
                tracer.y = self.rng.gen::<f32>() * h;
            } else {
                tracer.x = nx;
                tracer.y = ny;
            }
        }

        self.t += 0.01;
    }

    fn resize(&mut self, surface: &mut Surface) {
        self.generate(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracers_remain_in_bounds() {
        let mut surface = Surface::new(50, 50);
        let mut anim = FlowField::new(4);
        anim.init(&mut surface, Color::ACCENT);
        for _ in 0..300 {
            anim.step(&mut surface);
        }
        for tracer in &anim.tracers {
            assert!(tracer.x >= 0.0 && tracer.x < 50.0);
            assert!(tracer.y >= 0.0 && tracer.y < 50.0);
        }
    }

    #[test]
    fn test_field_varies_with_time() {
        let a = FlowField::field_angle(10.0, 20.0, 0.0);
        let b = FlowField::field_angle(10.0, 20.0, 1.0);
        assert!((a - b).abs() > 1e-3);
    }
}
