// ABOUTME: Soft particle animation: radially-faded drifting motes.
// ABOUTME: Particles wrap at the edges; a rare glitch teleports one mid-drift.

use mpl_core::Color;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::engine::Animation;
use crate::surface::Surface;

const PARTICLE_COUNT: usize = 40;

struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    radius: f32,
    alpha: f32,
    sway: f32,
}

pub struct SoftParticles {
    rng: SmallRng,
    color: Color,
    particles: Vec<Particle>,
    t: f32,
}

impl SoftParticles {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            color: Color::ACCENT,
            particles: Vec::new(),
            t: 0.0,
        }
    }

    fn generate(&mut self, surface: &Surface) {
        let w = surface.width() as f32;
        let h = surface.height() as f32;
        self.particles = (0..PARTICLE_COUNT)
            .map(|_| Particle {
                x: self.rng.gen::<f32>() * w,
                y: self.rng.gen::<f32>() * h,
                vx: self.rng.gen_range(-0.4..0.4),
                vy: self.rng.gen_range(-0.25..0.25),
                radius: self.rng.gen_range(2.0..6.0),
                alpha: self.rng.gen_range(0.05..0.3),
                sway: self.rng.gen_range(0.0..std::f32::consts::TAU),
            })
            .collect();
    }
}

impl Animation for SoftParticles {
    fn name(&self) -> &'static str {
        "soft-particles"
    }

    fn init(&mut self, surface: &mut Surface, color: Color) {
        self.color = color;
        self.t = 0.0;
        self.generate(surface);
    }

    fn step(&mut self, surface: &mut Surface) {
        surface.fade(Color::BACKGROUND, 0.08);

        let w = surface.width() as f32;
        let h = surface.height() as f32;

        for p in &mut self.particles {
            surface.soft_circle(p.x, p.y, p.radius, self.color.with_alpha(p.alpha));

            p.x += p.vx + (self.t + p.sway).sin() * 0.15;
            p.y += p.vy;

            // Wrap with a margin so the fade-out happens off screen
            let m = p.radius;
            if p.x < -m {
                p.x = w + m;
            } else if p.x > w + m {
                p.x = -m;
            }
            if p.y < -m {
                p.y = h + m;
            } else if p.y > h + m {
                p.y = -m;
            }

            // Glitch: teleport
            if self.rng.gen::<f32>() < 0.002 {
                p.x = self.rng.gen::<f32>() * w;
                p.y = self.rng.gen::<f32>() * h;
            }
        }

        self.t += 0.02;
    }

    fn resize(&mut self, surface: &mut Surface) {
        self.generate(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particles_stay_within_wrap_margin() {
        let mut surface = Surface::new(60, 40);
        let mut anim = SoftParticles::new(8);
        anim.init(&mut surface, Color::ACCENT);
        for _ in 0..500 {
            anim.step(&mut surface);
        }
        for p in &anim.particles {
            assert!(p.x >= -p.radius - 1.0 && p.x <= 60.0 + p.radius + 1.0);
            assert!(p.y >= -p.radius - 1.0 && p.y <= 40.0 + p.radius + 1.0);
        }
    }

    #[test]
    fn test_pool_size_is_fixed() {
        let mut surface = Surface::new(60, 40);
        let mut anim = SoftParticles::new(8);
        anim.init(&mut surface, Color::ACCENT);
        anim.step(&mut surface);
        assert_eq!(anim.particles.len(), PARTICLE_COUNT);
    }
}
