// ABOUTME: The four-part animation contract and the host-driven frame pump.
// ABOUTME: Animations never self-schedule; the pump calls step explicitly.

use mpl_core::{AnimationKind, Color};

use crate::surface::Surface;
use crate::variants;

/// One background animation. Instances own all of their mutable state
/// (phase accumulators, particles, layouts) and share nothing.
///
/// Contract:
/// - `init` binds the seed color and builds layout for the surface size.
///   Calling it again rebuilds from scratch without leaking prior state.
/// - `step` advances one tick: fade fill, draw, mutate, maybe glitch.
/// - `resize` regenerates any size-dependent layout after the surface
///   has been reallocated. Old layout is discarded, not merged.
pub trait Animation {
    fn name(&self) -> &'static str;
    fn init(&mut self, surface: &mut Surface, color: Color);
    fn step(&mut self, surface: &mut Surface);
    fn resize(&mut self, surface: &mut Surface);
}

/// Construct an animation instance for an entity's assigned kind.
/// The seed fixes every random choice the instance will ever make.
pub fn create(kind: AnimationKind, seed: u64) -> Box<dyn Animation> {
    match kind {
        AnimationKind::Oscilloscope => Box::new(variants::Oscilloscope::new(seed)),
        AnimationKind::Circuit => Box::new(variants::Circuit::new(seed)),
        AnimationKind::HexWaterfall => Box::new(variants::HexWaterfall::new(seed)),
        AnimationKind::GlitchGrid => Box::new(variants::GlitchGrid::new(seed)),
        AnimationKind::SoftParticles => Box::new(variants::SoftParticles::new(seed)),
        AnimationKind::FlowField => Box::new(variants::FlowField::new(seed)),
        AnimationKind::WaveInterference => Box::new(variants::WaveInterference::new(seed)),
        AnimationKind::FeedbackLoop => Box::new(variants::FeedbackLoop::new(seed)),
        AnimationKind::CorruptedTerminal => Box::new(variants::CorruptedTerminal::new(seed)),
        AnimationKind::All => Box::new(variants::Rotation::new(seed)),
    }
}

/// Host-side driver. Owns the surface and the animation; a caller
/// (demo renderer, test) invokes `step` once per frame. After `stop`
/// no further tick reaches the animation.
pub struct FramePump {
    animation: Box<dyn Animation>,
    surface: Surface,
    running: bool,
    ticks: u64,
}

impl FramePump {
    pub fn new(
        mut animation: Box<dyn Animation>,
        width: usize,
        height: usize,
        color: Color,
    ) -> Self {
        let mut surface = Surface::new(width, height);
        animation.init(&mut surface, color);
        tracing::debug!(name = animation.name(), width, height, "animation initialized");
        Self {
            animation,
            surface,
            running: true,
            ticks: 0,
        }
    }

    /// Advance one frame. Returns false (and does nothing) once stopped.
    pub fn step(&mut self) -> bool {
        if !self.running || self.surface.is_empty() {
            return false;
        }
        self.animation.step(&mut self.surface);
        self.ticks += 1;
        true
    }

    /// Reallocate the surface and regenerate layout
    pub fn resize(&mut self, width: usize, height: usize) {
        self.surface.resize(width, height);
        self.animation.resize(&mut self.surface);
    }

    /// Cancel the pump. Idempotent; subsequent `step` calls are no-ops.
    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!(name = self.animation.name(), ticks = self.ticks, "animation stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts how many times step actually reaches the animation
    struct Counting {
        steps: std::rc::Rc<std::cell::Cell<u64>>,
    }

    impl Animation for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }
        fn init(&mut self, _surface: &mut Surface, _color: Color) {}
        fn step(&mut self, _surface: &mut Surface) {
            self.steps.set(self.steps.get() + 1);
        }
        fn resize(&mut self, _surface: &mut Surface) {}
    }

    #[test]
    fn test_no_step_after_stop() {
        let steps = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut pump = FramePump::new(
            Box::new(Counting {
                steps: steps.clone(),
            }),
            8,
            8,
            Color::ACCENT,
        );

        for _ in 0..5 {
            assert!(pump.step());
        }
        pump.stop();
        for _ in 0..5 {
            assert!(!pump.step());
        }

        assert_eq!(steps.get(), 5);
        assert_eq!(pump.ticks(), 5);
    }

    #[test]
    fn test_zero_sized_surface_never_steps() {
        let steps = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut pump = FramePump::new(
            Box::new(Counting {
                steps: steps.clone(),
            }),
            0,
            10,
            Color::ACCENT,
        );
        assert!(!pump.step());
        assert_eq!(steps.get(), 0);
    }

    #[test]
    fn test_every_kind_constructs_and_steps() {
        for kind in AnimationKind::all() {
            let mut pump = FramePump::new(create(*kind, 42), 64, 48, Color::ACCENT);
            for _ in 0..3 {
                assert!(pump.step(), "step failed for {}", kind.label());
            }
            pump.resize(48, 64);
            assert!(pump.step());
        }
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut pump = FramePump::new(create(AnimationKind::Oscilloscope, 1), 16, 16, Color::ACCENT);
        pump.stop();
        pump.stop();
        assert!(!pump.is_running());
    }
}
