// ABOUTME: Oscilloscope animation: summed sine waves with amplitude modulation.
// ABOUTME: A slow scan line sweeps down; rare vertical jumps glitch the trace.

use mpl_core::Color;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::engine::Animation;
use crate::surface::Surface;

struct Wave {
    amplitude: f32,
    frequency: f32,
    offset: f32,
}

pub struct Oscilloscope {
    rng: SmallRng,
    color: Color,
    phase: f32,
    waves: Vec<Wave>,
}

impl Oscilloscope {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            color: Color::ACCENT,
            phase: 0.0,
            waves: Vec::new(),
        }
    }

    fn regenerate(&mut self, surface: &Surface) {
        let max_amp = surface.height() as f32 / 3.0;
        self.waves = (0..3)
            .map(|_| Wave {
                amplitude: self.rng.gen_range(20.0..70.0_f32).min(max_amp),
                frequency: self.rng.gen_range(0.01..0.03),
                offset: self.rng.gen_range(0.0..std::f32::consts::TAU),
            })
            .collect();
    }
}

impl Animation for Oscilloscope {
    fn name(&self) -> &'static str {
        "oscilloscope"
    }

    fn init(&mut self, surface: &mut Surface, color: Color) {
        self.color = color;
        self.phase = 0.0;
        self.regenerate(surface);
    }

    fn step(&mut self, surface: &mut Surface) {
        surface.fade(Color::BACKGROUND, 0.05);

        let w = surface.width() as i32;
        let h = surface.height() as f32;
        let trace = self.color.with_alpha(0.25);

        // Amplitude modulation shared across all waves this tick
        let am = 1.0 + (self.phase * 0.5).sin() * 0.3;

        for wave in &self.waves {
            let mut prev: Option<(i32, i32)> = None;
            let mut x = 0;
            while x < w {
                let y = h / 2.0
                    + (x as f32 * wave.frequency + self.phase + wave.offset).sin()
                        * wave.amplitude
                        * am;
                let y = y as i32;
                if let Some((px, py)) = prev {
                    surface.line(px, py, x, y, trace);
                }
                // Occasional glitch: a discontinuous vertical jump
                if self.rng.gen::<f32>() > 0.999 {
                    let jump = (self.rng.gen::<f32>() - 0.5) * 100.0;
                    surface.line(x, y, x, y + jump as i32, trace);
                }
                prev = Some((x, y));
                x += 2;
            }
        }

        // Scan line
        let scan_y = (self.phase * 50.0) % h;
        surface.line(0, scan_y as i32, w, scan_y as i32, self.color.with_alpha(0.5));

        self.phase += 0.05;
    }

    fn resize(&mut self, surface: &mut Surface) {
        self.regenerate(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_advances_per_tick() {
        let mut surface = Surface::new(32, 32);
        let mut anim = Oscilloscope::new(3);
        anim.init(&mut surface, Color::ACCENT);
        for _ in 0..10 {
            anim.step(&mut surface);
        }
        assert!((anim.phase - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_amplitude_clamped_to_surface() {
        let mut surface = Surface::new(32, 12);
        let mut anim = Oscilloscope::new(3);
        anim.init(&mut surface, Color::ACCENT);
        for wave in &anim.waves {
            assert!(wave.amplitude <= 4.0);
        }
    }

    #[test]
    fn test_same_seed_same_waves() {
        let mut surface = Surface::new(64, 64);
        let mut a = Oscilloscope::new(9);
        let mut b = Oscilloscope::new(9);
        a.init(&mut surface, Color::ACCENT);
        b.init(&mut surface, Color::ACCENT);
        for (wa, wb) in a.waves.iter().zip(&b.waves) {
            assert_eq!(wa.amplitude, wb.amplitude);
            assert_eq!(wa.frequency, wb.frequency);
        }
    }
}
