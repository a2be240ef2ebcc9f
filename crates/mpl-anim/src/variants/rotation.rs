// ABOUTME: Meta animation that round-robins through every concrete variant.
// ABOUTME: Owns one active sub-animation and swaps it on a tick threshold.

use mpl_core::{AnimationKind, Color};

use crate::engine::{create, Animation};
use crate::surface::Surface;

/// Ticks each sub-animation runs before the rotation advances
const TICKS_PER_VARIANT: u64 = 240;

/// Fixed rotation order; `All` itself is excluded
const ORDER: &[AnimationKind] = &[
    AnimationKind::Oscilloscope,
    AnimationKind::Circuit,
    AnimationKind::HexWaterfall,
    AnimationKind::GlitchGrid,
    AnimationKind::SoftParticles,
    AnimationKind::FlowField,
    AnimationKind::WaveInterference,
    AnimationKind::FeedbackLoop,
    AnimationKind::CorruptedTerminal,
];

pub struct Rotation {
    seed: u64,
    color: Color,
    index: usize,
    ticks: u64,
    current: Box<dyn Animation>,
}

impl Rotation {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            color: Color::ACCENT,
            index: 0,
            ticks: 0,
            current: create(ORDER[0], seed),
        }
    }

    pub fn current_kind(&self) -> AnimationKind {
        ORDER[self.index]
    }

    fn advance(&mut self, surface: &mut Surface) {
        self.index = (self.index + 1) % ORDER.len();
        // Derive a fresh sub-seed so each pass through the rotation differs
        self.seed = self.seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(1);
        self.current = create(ORDER[self.index], self.seed);
        self.current.init(surface, self.color);
        self.ticks = 0;
    }
}

impl Animation for Rotation {
    fn name(&self) -> &'static str {
        "all"
    }

    fn init(&mut self, surface: &mut Surface, color: Color) {
        self.color = color;
        self.index = 0;
        self.ticks = 0;
        self.current = create(ORDER[0], self.seed);
        self.current.init(surface, color);
    }

    fn step(&mut self, surface: &mut Surface) {
        self.current.step(surface);
        self.ticks += 1;
        if self.ticks >= TICKS_PER_VARIANT {
            self.advance(surface);
        }
    }

    fn resize(&mut self, surface: &mut Surface) {
        self.current.resize(surface);
    }
}
