// ABOUTME: Offline synthesis primitives: oscillators, envelopes, filters.
// ABOUTME: Everything renders into plain f32 PCM buffers, no audio backend.

use std::f32::consts::PI;

const TAU: f32 = PI * 2.0;

/// Basic oscillator shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Sample the waveform at a normalized phase in `[0, 1)`.
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (phase * TAU).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => phase * 2.0 - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }
}

/// Phase-accumulating oscillator. Frequency is passed per sample so
/// callers can modulate it.
pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    pub fn next(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let out = self.waveform.sample(self.phase);
        self.phase += frequency / sample_rate;
        self.phase -= self.phase.floor();
        out
    }
}

/// How a scheduled envelope point is approached from the previous one.
#[derive(Debug, Clone, Copy)]
enum Ramp {
    Step,
    Linear,
    Exponential,
}

/// Piecewise automation curve, built in the order points occur in time.
pub struct Envelope {
    points: Vec<(f32, f32, Ramp)>,
}

impl Envelope {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Hold `value` from time `t` onward.
    pub fn set(mut self, t: f32, value: f32) -> Self {
        self.points.push((t, value, Ramp::Step));
        self
    }

    /// Ramp linearly from the previous point to `value` at time `t`.
    pub fn linear_to(mut self, t: f32, value: f32) -> Self {
        self.points.push((t, value, Ramp::Linear));
        self
    }

    /// Ramp exponentially from the previous point to `value` at time `t`.
    /// Falls back to linear when either endpoint is not strictly positive.
    pub fn exp_to(mut self, t: f32, value: f32) -> Self {
        self.points.push((t, value, Ramp::Exponential));
        self
    }

    pub fn value_at(&self, t: f32) -> f32 {
        let mut prev: Option<(f32, f32)> = None;
        for &(pt, pv, ramp) in &self.points {
            if t < pt {
                return match (ramp, prev) {
                    (Ramp::Step, Some((_, v0))) => v0,
                    (Ramp::Step, None) => pv,
                    (Ramp::Linear, Some((t0, v0))) => {
                        let f = (t - t0) / (pt - t0).max(f32::EPSILON);
                        v0 + (pv - v0) * f
                    }
                    (Ramp::Exponential, Some((t0, v0))) if v0 > 0.0 && pv > 0.0 => {
                        let f = (t - t0) / (pt - t0).max(f32::EPSILON);
                        v0 * (pv / v0).powf(f)
                    }
                    (_, Some((t0, v0))) => {
                        let f = (t - t0) / (pt - t0).max(f32::EPSILON);
                        v0 + (pv - v0) * f
                    }
                    (_, None) => pv,
                };
            }
            prev = Some((pt, pv));
        }
        prev.map(|(_, v)| v).unwrap_or(0.0)
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum FilterKind {
    Highpass,
    Bandpass,
    Peaking,
}

/// Direct-form-I biquad with RBJ cookbook coefficients.
pub struct Biquad {
    kind: FilterKind,
    sample_rate: f32,
    q: f32,
    gain_db: f32,
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    pub fn highpass(sample_rate: f32, frequency: f32, q: f32) -> Self {
        Self::build(FilterKind::Highpass, sample_rate, frequency, q, 0.0)
    }

    pub fn bandpass(sample_rate: f32, frequency: f32, q: f32) -> Self {
        Self::build(FilterKind::Bandpass, sample_rate, frequency, q, 0.0)
    }

    pub fn peaking(sample_rate: f32, frequency: f32, q: f32, gain_db: f32) -> Self {
        Self::build(FilterKind::Peaking, sample_rate, frequency, q, gain_db)
    }

    fn build(kind: FilterKind, sample_rate: f32, frequency: f32, q: f32, gain_db: f32) -> Self {
        let mut filter = Self {
            kind,
            sample_rate,
            q: q.max(0.1),
            gain_db,
            b0: 0.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        };
        filter.retune(frequency);
        filter
    }

    /// Recompute coefficients for a new center frequency, keeping state.
    /// Used for per-sample frequency sweeps.
    pub fn retune(&mut self, frequency: f32) {
        let freq = frequency.clamp(10.0, self.sample_rate * 0.45);
        let omega = TAU * freq / self.sample_rate;
        let (sin, cos) = omega.sin_cos();
        let alpha = sin / (2.0 * self.q);

        let (b0, b1, b2, a0, a1, a2) = match self.kind {
            FilterKind::Highpass => (
                (1.0 + cos) / 2.0,
                -(1.0 + cos),
                (1.0 + cos) / 2.0,
                1.0 + alpha,
                -2.0 * cos,
                1.0 - alpha,
            ),
            FilterKind::Bandpass => (alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cos, 1.0 - alpha),
            FilterKind::Peaking => {
                let a = 10f32.powf(self.gain_db / 40.0);
                (
                    1.0 + alpha * a,
                    -2.0 * cos,
                    1.0 - alpha * a,
                    1.0 + alpha / a,
                    -2.0 * cos,
                    1.0 - alpha / a,
                )
            }
        };

        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = a1 / a0;
        self.a2 = a2 / a0;
    }

    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

/// Soft-clipping waveshaper transfer function.
pub fn waveshape(x: f32, amount: f32) -> f32 {
    let deg = PI / 180.0;
    ((3.0 + amount) * x * 20.0 * deg) / (PI + amount * x.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_is_bipolar() {
        assert_eq!(Waveform::Square.sample(0.1), 1.0);
        assert_eq!(Waveform::Square.sample(0.9), -1.0);
    }

    #[test]
    fn test_oscillator_phase_wraps() {
        let mut osc = Oscillator::new(Waveform::Sine);
        for _ in 0..1000 {
            osc.next(440.0, 44_100.0);
        }
        assert!(osc.phase >= 0.0 && osc.phase < 1.0);
    }

    #[test]
    fn test_envelope_linear_midpoint() {
        let env = Envelope::new().set(0.0, 0.0).linear_to(1.0, 1.0);
        let v = env.value_at(0.5);
        assert!((v - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_envelope_exponential_decay_monotonic() {
        let env = Envelope::new().set(0.0, 0.1).exp_to(1.0, 0.001);
        let a = env.value_at(0.2);
        let b = env.value_at(0.8);
        assert!(a > b);
        assert!(b > 0.0);
    }

    #[test]
    fn test_envelope_holds_last_value() {
        let env = Envelope::new().set(0.0, 0.0).linear_to(0.5, 0.8);
        assert!((env.value_at(2.0) - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_bandpass_attenuates_distant_frequency() {
        let sr = 44_100.0;
        let mut filter = Biquad::bandpass(sr, 1000.0, 10.0);
        let mut osc = Oscillator::new(Waveform::Sine);
        let mut peak = 0f32;
        for i in 0..4410 {
            let y = filter.process(osc.next(100.0, sr));
            // Skip the transient before measuring
            if i > 1000 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak < 0.2, "100 Hz through a 1 kHz bandpass, peak {peak}");
    }

    #[test]
    fn test_waveshape_bounded_and_odd() {
        for i in -10..=10 {
            let x = i as f32 / 10.0;
            let y = waveshape(x, 50.0);
            assert!(y.abs() <= 1.5);
            assert!((y + waveshape(-x, 50.0)).abs() < 1e-5);
        }
    }
}
