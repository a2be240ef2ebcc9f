// ABOUTME: Feedback loop animation: the previous frame resampled into itself.
// ABOUTME: A rotate/scale transform plus decay produces recursive tunnels.

use mpl_core::Color;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::engine::Animation;
use crate::surface::Surface;

const ZOOM: f32 = 1.02;
const ANGLE_STEP: f32 = 0.02;
const DECAY: f32 = 0.94;

pub struct FeedbackLoop {
    rng: SmallRng,
    color: Color,
    angle: f32,
    t: f32,
}

impl FeedbackLoop {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            color: Color::ACCENT,
            angle: 0.0,
            t: 0.0,
        }
    }
}

impl Animation for FeedbackLoop {
    fn name(&self) -> &'static str {
        "feedback"
    }

    fn init(&mut self, surface: &mut Surface, color: Color) {
        self.color = color;
        self.angle = 0.0;
        self.t = 0.0;
        surface.clear(Color::BACKGROUND);
    }

    fn step(&mut self, surface: &mut Surface) {
        let w = surface.width();
        let h = surface.height();
        let cx = w as f32 / 2.0;
        let cy = h as f32 / 2.0;

        // Resample the previous frame under an inverse rotate/scale
        // about the center, with per-copy decay
        let prev = surface.snapshot();
        let (sin, cos) = (-self.angle).sin_cos();
        for y in 0..h {
            for x in 0..w {
                let dx = (x as f32 - cx) / ZOOM;
                let dy = (y as f32 - cy) / ZOOM;
                let sx = cx + dx * cos - dy * sin;
                let sy = cy + dx * sin + dy * cos;

                let rgba = if sx >= 0.0 && sy >= 0.0 && (sx as usize) < w && (sy as usize) < h {
                    let src = prev[sy as usize * w + sx as usize];
                    [
                        (src[0] as f32 * DECAY) as u8,
                        (src[1] as f32 * DECAY) as u8,
                        (src[2] as f32 * DECAY) as u8,
                        255,
                    ]
                } else {
                    [0, 0, 0, 255]
                };
                surface.put(x, y, rgba);
            }
        }

        // Seed geometry to keep the loop fed: a rotating line and a
        // drifting bright rect
        let r = w.min(h) as f32 * 0.35;
        let (s, c) = self.t.sin_cos();
        surface.line(
            (cx - c * r) as i32,
            (cy - s * r) as i32,
            (cx + c * r) as i32,
            (cy + s * r) as i32,
            self.color.with_alpha(0.8),
        );
        let bx = cx + (self.t * 0.7).cos() * r * 0.6;
        let by = cy + (self.t * 1.1).sin() * r * 0.6;
        surface.fill_rect(bx as i32 - 2, by as i32 - 2, 4, 4, self.color);

        // Glitch: a one-frame angular kick
        if self.rng.gen::<f32>() < 0.01 {
            self.angle += self.rng.gen_range(-0.3..0.3);
        }

        self.angle += ANGLE_STEP;
        self.t += 0.05;
    }

    fn resize(&mut self, surface: &mut Surface) {
        surface.clear(Color::BACKGROUND);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_persists_across_frames() {
        let mut surface = Surface::new(40, 40);
        let mut anim = FeedbackLoop::new(1);
        anim.init(&mut surface, Color::ACCENT);
        for _ in 0..20 {
            anim.step(&mut surface);
        }
        let lit = (0..40)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .filter(|&(x, y)| {
                let px = surface.pixel(x, y).unwrap();
                px[0] > 8 || px[1] > 8 || px[2] > 8
            })
            .count();
        assert!(lit > 40, "feedback should accumulate light, got {lit}");
    }

    #[test]
    fn test_angle_accumulates() {
        let mut surface = Surface::new(16, 16);
        let mut anim = FeedbackLoop::new(1);
        anim.init(&mut surface, Color::ACCENT);
        anim.step(&mut surface);
        assert!(anim.angle >= ANGLE_STEP - 0.31);
    }
}
