// ABOUTME: Wave interference animation: summed distance-based sine waves.
// ABOUTME: Sampled on a coarse pixel grid; sources drift slowly with time.

use mpl_core::Color;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::engine::Animation;
use crate::surface::Surface;

/// Sampling cell size in pixels. The whole surface repaints each tick,
/// so the loop runs on this coarse grid rather than per pixel.
const CELL: usize = 4;

struct Source {
    // Position as fractions of the surface, so resize keeps the layout
    fx: f32,
    fy: f32,
    frequency: f32,
    speed: f32,
}

pub struct WaveInterference {
    rng: SmallRng,
    color: Color,
    sources: Vec<Source>,
    t: f32,
}

impl WaveInterference {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            color: Color::ACCENT,
            sources: Vec::new(),
            t: 0.0,
        }
    }

    fn generate(&mut self) {
        let count = self.rng.gen_range(3..=5);
        self.sources = (0..count)
            .map(|_| Source {
                fx: self.rng.gen(),
                fy: self.rng.gen(),
                frequency: self.rng.gen_range(0.1..0.35),
                speed: self.rng.gen_range(1.0..3.0),
            })
            .collect();
    }
}

impl Animation for WaveInterference {
    fn name(&self) -> &'static str {
        "interference"
    }

    fn init(&mut self, _surface: &mut Surface, color: Color) {
        self.color = color;
        self.t = 0.0;
        self.generate();
    }

    fn step(&mut self, surface: &mut Surface) {
        let w = surface.width() as f32;
        let h = surface.height() as f32;

        surface.clear(Color::BACKGROUND);

        let mut y = 0;
        while y < surface.height() {
            let mut x = 0;
            while x < surface.width() {
                let px = x as f32 + CELL as f32 / 2.0;
                let py = y as f32 + CELL as f32 / 2.0;

                let mut sum = 0.0;
                for source in &self.sources {
                    let dx = px - source.fx * w;
                    let dy = py - source.fy * h;
                    let dist = (dx * dx + dy * dy).sqrt();
                    sum += (dist * source.frequency - self.t * source.speed).sin();
                }
                // Normalize the sum of n waves into 0..1
                let v = (sum / self.sources.len() as f32 + 1.0) / 2.0;

                surface.fill_rect(
                    x as i32,
                    y as i32,
                    CELL as i32,
                    CELL as i32,
                    self.color.with_alpha(v * 0.35),
                );
                x += CELL;
            }
            y += CELL;
        }

        // Glitch: invert a horizontal band
        if self.rng.gen::<f32>() < 0.01 && surface.height() > CELL {
            let band_y = self.rng.gen_range(0..surface.height() - CELL);
            surface.fill_rect(
                0,
                band_y as i32,
                surface.width() as i32,
                CELL as i32,
                self.color.with_alpha(0.6),
            );
        }

        self.t += 0.05;
    }

    fn resize(&mut self, _surface: &mut Surface) {
        // Sources are stored as fractions; nothing to rebuild
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_count_range() {
        let mut surface = Surface::new(32, 32);
        let mut anim = WaveInterference::new(6);
        anim.init(&mut surface, Color::ACCENT);
        assert!((3..=5).contains(&anim.sources.len()));
    }

    #[test]
    fn test_pattern_changes_over_time() {
        let mut surface = Surface::new(32, 32);
        let mut anim = WaveInterference::new(6);
        anim.init(&mut surface, Color::ACCENT);
        anim.step(&mut surface);
        let first = surface.snapshot();
        for _ in 0..10 {
            anim.step(&mut surface);
        }
        assert_ne!(first, surface.snapshot());
    }
}
