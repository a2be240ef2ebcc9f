// ABOUTME: Corrupted terminal animation: scrolling glitched shell transcripts.
// ABOUTME: Commands type in one glyph per tick; old lines corrode in place.

use mpl_core::Color;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::engine::Animation;
use crate::glyph;
use crate::surface::Surface;

const ROW_HEIGHT: i32 = glyph::HEIGHT + 2;
const CORRUPT_CHARS: &[char] = &['█', '▓', '▒', '░', '#', '$', '*', '!'];

const COMMANDS: &[&str] = &[
    "> init consciousness.sys",
    "> mount /dev/entity0",
    "> rm -rf /mem/cache/*",
    "> decrypt lattice.key",
    "ERR 0x4F: reality not found",
    "> retry --force",
    "> cat /proc/self/dreams",
    "segfault at 0xdeadbeef",
    "> patch kernel.glitch",
    "> sync...sync...sync",
    "signal lost. reacquiring",
    "> chmod 777 /the/void",
];

pub struct CorruptedTerminal {
    rng: SmallRng,
    color: Color,
    lines: Vec<Vec<char>>,
    current: Vec<char>,
    pending: Vec<char>,
    max_lines: usize,
    tick: u64,
}

impl CorruptedTerminal {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            color: Color::ACCENT,
            lines: Vec::new(),
            current: Vec::new(),
            pending: Vec::new(),
            max_lines: 0,
            tick: 0,
        }
    }

    fn next_command(&mut self) {
        let cmd = COMMANDS[self.rng.gen_range(0..COMMANDS.len())];
        self.pending = cmd.chars().rev().collect();
        self.current = Vec::new();
    }

    fn layout(&mut self, surface: &Surface) {
        self.max_lines = (surface.height() / ROW_HEIGHT as usize).saturating_sub(1);
        self.lines.clear();
        self.next_command();
    }
}

impl Animation for CorruptedTerminal {
    fn name(&self) -> &'static str {
        "corrupted-terminal"
    }

    fn init(&mut self, surface: &mut Surface, color: Color) {
        self.color = color;
        self.tick = 0;
        self.layout(surface);
    }

    fn step(&mut self, surface: &mut Surface) {
        surface.fade(Color::BACKGROUND, 0.35);

        // Type one glyph per tick; start the next command when done
        match self.pending.pop() {
            Some(c) => self.current.push(c),
            None => {
                let finished = std::mem::take(&mut self.current);
                self.lines.push(finished);
                if self.lines.len() > self.max_lines {
                    self.lines.remove(0);
                }
                self.next_command();
            }
        }

        // Corrode a random glyph in the scrollback
        if !self.lines.is_empty() && self.rng.gen::<f32>() < 0.1 {
            let li = self.rng.gen_range(0..self.lines.len());
            if !self.lines[li].is_empty() {
                let ci = self.rng.gen_range(0..self.lines[li].len());
                self.lines[li][ci] = CORRUPT_CHARS[self.rng.gen_range(0..CORRUPT_CHARS.len())];
            }
        }

        let dim = self.color.with_alpha(0.35);
        for (i, line) in self.lines.iter().enumerate() {
            let text: String = line.iter().collect();
            surface.draw_text(&text, 2, 2 + i as i32 * ROW_HEIGHT, dim);
        }

        // Active line with a blinking block cursor
        let y = 2 + self.lines.len() as i32 * ROW_HEIGHT;
        let text: String = self.current.iter().collect();
        surface.draw_text(&text, 2, y, self.color.with_alpha(0.8));
        if (self.tick / 12) % 2 == 0 {
            let cursor_x = 2 + self.current.len() as i32 * (glyph::WIDTH + 1);
            surface.draw_glyph('█', cursor_x, y, self.color.with_alpha(0.8));
        }

        self.tick += 1;
    }

    fn resize(&mut self, surface: &mut Surface) {
        self.layout(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrollback_bounded() {
        let mut surface = Surface::new(120, 60);
        let mut anim = CorruptedTerminal::new(13);
        anim.init(&mut surface, Color::ACCENT);
        for _ in 0..3000 {
            anim.step(&mut surface);
        }
        assert!(anim.lines.len() <= anim.max_lines);
    }

    #[test]
    fn test_typing_advances_one_char_per_tick() {
        let mut surface = Surface::new(120, 60);
        let mut anim = CorruptedTerminal::new(13);
        anim.init(&mut surface, Color::ACCENT);
        let target = anim.pending.len();
        for _ in 0..target {
            anim.step(&mut surface);
        }
        assert_eq!(anim.current.len(), target);
    }
}
