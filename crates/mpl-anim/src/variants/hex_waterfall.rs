// ABOUTME: Hex waterfall animation: independent falling columns of hex glyphs.
// ABOUTME: Columns recycle past the bottom edge with fresh speed and opacity.

use mpl_core::Color;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::engine::Animation;
use crate::surface::Surface;

const HEX_CHARS: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F',
];
const GLITCH_CHARS: &[char] = &['░', '▒', '▓', '█'];

const COL_WIDTH: usize = 8;
const ROW_HEIGHT: f32 = 8.0;

struct Column {
    chars: Vec<char>,
    y: f32,
    speed: f32,
    opacity: f32,
}

pub struct HexWaterfall {
    rng: SmallRng,
    color: Color,
    columns: Vec<Column>,
}

impl HexWaterfall {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            color: Color::ACCENT,
            columns: Vec::new(),
        }
    }

    fn hex_string(&mut self) -> Vec<char> {
        let len = self.rng.gen_range(10..30);
        (0..len)
            .map(|_| HEX_CHARS[self.rng.gen_range(0..HEX_CHARS.len())])
            .collect()
    }

    fn generate(&mut self, surface: &Surface) {
        let cols = surface.width() / COL_WIDTH;
        let h = surface.height() as f32;
        self.columns = (0..cols)
            .map(|_| {
                let chars = self.hex_string();
                Column {
                    chars,
                    y: -self.rng.gen::<f32>() * h,
                    speed: self.rng.gen_range(0.5..2.5),
                    opacity: self.rng.gen_range(0.1..0.6),
                }
            })
            .collect();
    }
}

impl Animation for HexWaterfall {
    fn name(&self) -> &'static str {
        "hex-waterfall"
    }

    fn init(&mut self, surface: &mut Surface, color: Color) {
        self.color = color;
        self.generate(surface);
    }

    fn step(&mut self, surface: &mut Surface) {
        surface.fade(Color::BACKGROUND, 0.05);

        let h = surface.height() as f32;

        for (i, column) in self.columns.iter_mut().enumerate() {
            let x = (i * COL_WIDTH) as i32 + 1;

            for (j, &c) in column.chars.iter().enumerate() {
                let y = column.y + j as f32 * ROW_HEIGHT;
                if y < 0.0 || y >= h {
                    continue;
                }
                // Fade toward the bottom edge
                let positional = 1.0 - y / h;
                let alpha = column.opacity * positional;

                // Rare substitution with a shade-block glitch glyph
                let shown = if self.rng.gen::<f32>() > 0.995 {
                    GLITCH_CHARS[self.rng.gen_range(0..GLITCH_CHARS.len())]
                } else {
                    c
                };
                surface.draw_glyph(shown, x, y as i32, self.color.with_alpha(alpha));
            }

            column.y += column.speed;

            // Recycle once fully below the bottom edge
            if column.y > h {
                column.y = -(column.chars.len() as f32 * ROW_HEIGHT);
                column.speed = self.rng.gen_range(0.5..2.5);
                column.opacity = self.rng.gen_range(0.1..0.6);
                let len = self.rng.gen_range(10..30);
                column.chars = (0..len)
                    .map(|_| HEX_CHARS[self.rng.gen_range(0..HEX_CHARS.len())])
                    .collect();
            }
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
    fn test_column_count_tracks_width() {
        let mut surface = Surface::new(80, 60);
        let mut anim = HexWaterfall::new(5);
        anim.init(&mut surface, Color::ACCENT);
        assert_eq!(anim.columns.len(), 10);

        surface.resize(160, 60);
        anim.resize(&mut surface);
        assert_eq!(anim.columns.len(), 20);
    }

    #[test]
    fn test_columns_recycle_above_bottom() {
        let mut surface = Surface::new(40, 24);
        let mut anim = HexWaterfall::new(5);
        anim.init(&mut surface, Color::ACCENT);
        for _ in 0..2000 {
            anim.step(&mut surface);
        }
        for column in &anim.columns {
            assert!(column.y <= surface.height() as f32 + 2.5);
            assert!(!column.chars.is_empty());
        }
    }

    #[test]
    fn test_chars_are_hex_or_glitch() {
        let mut surface = Surface::new(40, 24);
        let mut anim = HexWaterfall::new(5);
        anim.init(&mut surface, Color::ACCENT);
        for column in &anim.columns {
            for c in &column.chars {
                assert!(HEX_CHARS.contains(c));
            }
        }
    }
}
