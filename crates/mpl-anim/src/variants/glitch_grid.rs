// ABOUTME: Glitch grid animation: a cellular glyph grid with randomized flicker.
// ABOUTME: Cells mutate their glyph occasionally; whole rows flash as glitches.

use mpl_core::Color;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::engine::Animation;
use crate::surface::Surface;

const CELL: usize = 8;
const CELL_CHARS: &[char] = &['█', '▓', '▒', '░', '0', '1', 'F', 'A', '#', '*'];

struct Cell {
    c: char,
    base_alpha: f32,
    flicker_rate: f32,
    flicker_phase: f32,
}

pub struct GlitchGrid {
    rng: SmallRng,
    color: Color,
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl GlitchGrid {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            color: Color::ACCENT,
            cols: 0,
            rows: 0,
            cells: Vec::new(),
        }
    }

    fn random_char(&mut self) -> char {
        CELL_CHARS[self.rng.gen_range(0..CELL_CHARS.len())]
    }

    fn generate(&mut self, surface: &Surface) {
        self.cols = surface.width() / CELL;
        self.rows = surface.height() / CELL;
        self.cells = (0..self.cols * self.rows)
            .map(|_| Cell {
                c: CELL_CHARS[self.rng.gen_range(0..CELL_CHARS.len())],
                base_alpha: self.rng.gen_range(0.05..0.35),
                flicker_rate: self.rng.gen_range(0.05..0.3),
                flicker_phase: self.rng.gen_range(0.0..std::f32::consts::TAU),
            })
            .collect();
    }
}

impl Animation for GlitchGrid {
    fn name(&self) -> &'static str {
        "glitch-grid"
    }

    fn init(&mut self, surface: &mut Surface, color: Color) {
        self.color = color;
        self.generate(surface);
    }

    fn step(&mut self, surface: &mut Surface) {
        surface.fade(Color::BACKGROUND, 0.15);

        for row in 0..self.rows {
            for col in 0..self.cols {
                let idx = row * self.cols + col;
                let (c, alpha) = {
                    let cell = &mut self.cells[idx];
                    cell.flicker_phase += cell.flicker_rate;
                    let flicker = 0.5 + 0.5 * cell.flicker_phase.sin();
                    (cell.c, cell.base_alpha * flicker)
                };
                surface.draw_glyph(
                    c,
                    (col * CELL) as i32 + 1,
                    (row * CELL) as i32,
                    self.color.with_alpha(alpha),
                );
                // Occasional glyph mutation
                if self.rng.gen::<f32>() < 0.002 {
                    self.cells[idx].c = self.random_char();
                }
            }
        }

        // Row flash glitch
        if self.rows > 0 && self.rng.gen::<f32>() < 0.01 {
            let row = self.rng.gen_range(0..self.rows);
            surface.fill_rect(
                0,
                (row * CELL) as i32,
                surface.width() as i32,
                CELL as i32,
                self.color.with_alpha(0.4),
            );
        }
    }

    fn resize(&mut self, surface: &mut Surface) {
        self.generate(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_matches_surface() {
        let mut surface = Surface::new(64, 40);
        let mut anim = GlitchGrid::new(2);
        anim.init(&mut surface, Color::ACCENT);
        assert_eq!(anim.cols, 8);
        assert_eq!(anim.rows, 5);
        assert_eq!(anim.cells.len(), 40);
    }

    #[test]
    fn test_step_survives_tiny_surface() {
        let mut surface = Surface::new(4, 4);
        let mut anim = GlitchGrid::new(2);
        anim.init(&mut surface, Color::ACCENT);
        anim.step(&mut surface);
        assert!(anim.cells.is_empty());
    }

    #[test]
    fn test_flicker_phase_advances() {
        let mut surface = Surface::new(32, 32);
        let mut anim = GlitchGrid::new(2);
        anim.init(&mut surface, Color::ACCENT);
        let before = anim.cells[0].flicker_phase;
        anim.step(&mut surface);
        assert!(anim.cells[0].flicker_phase > before);
    }
}
