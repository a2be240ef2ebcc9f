// ABOUTME: Procedural audio cue rendering in the glitch house style.
// ABOUTME: Each cue returns a mono f32 PCM buffer at the engine sample rate.

use mpl_core::{string_hash, AudioConfig};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::synth::{waveshape, Biquad, Envelope, Oscillator, Waveform};

/// Per-entity tone parameters, all derived from the id hash so the same
/// entity always sounds the same.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityToneParams {
    pub base_freq: f32,
    pub mod_freq: f32,
    pub filter_freq: f32,
    pub q: f32,
    pub waveform: Waveform,
}

impl EntityToneParams {
    pub fn derive(entity_id: &str) -> Self {
        let hash = string_hash(entity_id);
        let waveform = match hash % 4 {
            0 => Waveform::Sine,
            1 => Waveform::Square,
            2 => Waveform::Sawtooth,
            _ => Waveform::Triangle,
        };
        Self {
            base_freq: 200.0 + (hash % 800) as f32,
            mod_freq: 1.0 + (hash % 10) as f32,
            filter_freq: 500.0 + (hash % 3000) as f32,
            q: 5.0 + (hash % 10) as f32,
            waveform,
        }
    }
}

/// Renders the site's audio cues offline. Owns the master volume and
/// mute state; a muted engine still renders, at zero gain. A disabled
/// engine (no audio capability at all) renders every cue empty.
pub struct AudioEngine {
    sample_rate: f32,
    master_volume: f32,
    muted: bool,
    enabled: bool,
    rng: SmallRng,
}

impl AudioEngine {
    pub fn new(config: &AudioConfig) -> Self {
        Self::seeded(config, rand::random())
    }

    /// Engine with a fixed rng seed, so randomized cues are reproducible.
    pub fn seeded(config: &AudioConfig, seed: u64) -> Self {
        Self {
            sample_rate: config.sample_rate as f32,
            master_volume: config.master_volume.clamp(0.0, 1.0),
            muted: config.muted,
            enabled: true,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Engine for hosts with no audio capability. Every cue comes back
    /// as an empty buffer; nothing errors.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::seeded(&AudioConfig::default(), 0)
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate as u32
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    /// Flips the mute state and returns the new state.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        tracing::debug!(muted = self.muted, "audio mute toggled");
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume
        }
    }

    /// Zeroed render buffer for a cue. Disabled engines allocate
    /// nothing, which short-circuits every cue to empty output.
    fn buffer(&self, seconds: f32) -> Vec<f32> {
        if !self.enabled {
            return Vec::new();
        }
        vec![0.0; (self.sample_rate * seconds) as usize]
    }

    /// Three rising square beeps, 150 ms apart.
    pub fn boot(&mut self) -> Vec<f32> {
        let sr = self.sample_rate;
        let mut out = self.buffer(3.0 * 0.15 + 0.1);
        for i in 0..3 {
            let start = i as f32 * 0.15;
            let freq = 200.0 + i as f32 * 100.0;
            let env = Envelope::new()
                .set(start, 0.0)
                .linear_to(start + 0.01, 0.1)
                .linear_to(start + 0.1, 0.0);
            let mut osc = Oscillator::new(Waveform::Square);
            for (n, sample) in out.iter_mut().enumerate() {
                let t = n as f32 / sr;
                let y = osc.next(freq, sr);
                if t >= start && t < start + 0.1 {
                    *sample += y * env.value_at(t);
                }
            }
        }
        self.finish(out)
    }

    /// Quick sawtooth chirp through a narrow bandpass.
    pub fn system_check(&mut self) -> Vec<f32> {
        let sr = self.sample_rate;
        let duration = 0.05;
        let mut out = self.buffer(duration);
        let mut osc = Oscillator::new(Waveform::Sawtooth);
        let mut filter = Biquad::bandpass(sr, 1200.0, 10.0);
        let env = Envelope::new()
            .set(0.0, 0.0)
            .linear_to(0.01, 0.05)
            .exp_to(duration, 0.001);
        for (n, sample) in out.iter_mut().enumerate() {
            let t = n as f32 / sr;
            // Exponential sweep 800 -> 1600 Hz over the cue
            let freq = 800.0 * 2f32.powf(t / duration);
            let y = filter.process(osc.next(freq, sr));
            *sample = y * env.value_at(t);
        }
        self.finish(out)
    }

    /// Filtered noise burst with a swept resonant peak and distortion.
    pub fn glitch(&mut self) -> Vec<f32> {
        let sr = self.sample_rate;
        let duration = 0.1 + self.rng.gen::<f32>() * 0.2;
        let mut out = self.buffer(duration);

        let hp_freq = 1000.0 + self.rng.gen::<f32>() * 2000.0;
        let hp_q = self.rng.gen::<f32>() * 10.0;
        let mut highpass = Biquad::highpass(sr, hp_freq, hp_q);
        let mut peak = Biquad::peaking(sr, 500.0, 20.0, 10.0);
        let env = Envelope::new().set(0.0, 0.1).exp_to(duration, 0.001);

        for (n, sample) in out.iter_mut().enumerate() {
            let t = n as f32 / sr;
            let mut y = (self.rng.gen::<f32>() - 0.5) * 0.5;
            // Occasional full-scale digital artifacts
            if self.rng.gen::<f32>() > 0.95 {
                y = if self.rng.gen::<bool>() { 1.0 } else { -1.0 };
            }
            y = highpass.process(y);
            peak.retune(500.0 * 10f32.powf(t / duration));
            y = peak.process(y);
            y = waveshape(y, 50.0);
            *sample = y * env.value_at(t);
        }
        self.finish(out)
    }

    /// Four detuned harmonic voices with slow frequency modulation.
    /// Durations under one second are stretched to one second so the
    /// attack and release ramps cannot cross.
    pub fn ambient_drone(&mut self, duration: f32) -> Vec<f32> {
        let sr = self.sample_rate;
        let duration = duration.max(1.0);
        let mut out = self.buffer(duration);
        let fundamental = 50.0 + self.rng.gen::<f32>() * 30.0;

        for i in 0..4 {
            let freq = fundamental * (i + 1) as f32 + (self.rng.gen::<f32>() - 0.5) * 2.0;
            let waveform = if i % 2 == 0 {
                Waveform::Sine
            } else {
                Waveform::Triangle
            };
            let lfo_freq = 0.1 + self.rng.gen::<f32>() * 0.3;
            let level = 0.02 / (i + 1) as f32;
            let env = Envelope::new()
                .set(0.0, 0.0)
                .linear_to(0.5, level)
                .set(duration - 0.5, level)
                .linear_to(duration, 0.0);

            let mut osc = Oscillator::new(waveform);
            let mut lfo = Oscillator::new(Waveform::Sine);
            for (n, sample) in out.iter_mut().enumerate() {
                let t = n as f32 / sr;
                let wobble = lfo.next(lfo_freq, sr) * 2.0;
                let y = osc.next(freq + wobble, sr);
                *sample += y * env.value_at(t);
            }
        }
        self.finish(out)
    }

    /// 10 ms square click for typewriter output.
    pub fn keystroke(&mut self) -> Vec<f32> {
        let sr = self.sample_rate;
        let duration = 0.01;
        let mut out = self.buffer(duration);
        let freq = 2000.0 + self.rng.gen::<f32>() * 1000.0;
        let mut osc = Oscillator::new(Waveform::Square);
        let env = Envelope::new().set(0.0, 0.02).exp_to(duration, 0.001);
        for (n, sample) in out.iter_mut().enumerate() {
            let t = n as f32 / sr;
            *sample = osc.next(freq, sr) * env.value_at(t);
        }
        self.finish(out)
    }

    /// Signature tone for a lab entity. Every parameter comes from the
    /// id hash, so this cue takes no randomness at all.
    pub fn entity_tone(&mut self, entity_id: &str) -> Vec<f32> {
        let sr = self.sample_rate;
        let duration = 0.3;
        let params = EntityToneParams::derive(entity_id);
        let mut out = self.buffer(duration);

        let mut osc = Oscillator::new(params.waveform);
        let mut modulator = Oscillator::new(Waveform::Sine);
        let mut filter = Biquad::bandpass(sr, params.filter_freq, params.q);
        let env = Envelope::new()
            .set(0.0, 0.0)
            .linear_to(0.05, 0.1)
            .exp_to(duration, 0.001);

        for (n, sample) in out.iter_mut().enumerate() {
            let t = n as f32 / sr;
            let freq = params.base_freq + modulator.next(params.mod_freq, sr) * 50.0;
            let y = filter.process(osc.next(freq, sr));
            *sample = y * env.value_at(t);
        }
        self.finish(out)
    }

    fn finish(&self, mut buffer: Vec<f32>) -> Vec<f32> {
        let gain = self.gain();
        for sample in &mut buffer {
            *sample = (*sample * gain).clamp(-1.0, 1.0);
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AudioConfig {
        AudioConfig {
            master_volume: 0.3,
            muted: false,
            sample_rate: 44_100,
        }
    }

    fn peak(buffer: &[f32]) -> f32 {
        buffer.iter().fold(0f32, |acc, s| acc.max(s.abs()))
    }

    #[test]
    fn test_boot_cue_has_audible_signal() {
        let mut engine = AudioEngine::seeded(&config(), 7);
        let pcm = engine.boot();
        assert_eq!(pcm.len(), (44_100f32 * 0.55) as usize);
        assert!(peak(&pcm) > 0.001);
    }

    #[test]
    fn test_muted_engine_renders_silence() {
        let mut engine = AudioEngine::seeded(&config(), 7);
        engine.toggle_mute();
        let pcm = engine.glitch();
        assert!(!pcm.is_empty());
        assert_eq!(peak(&pcm), 0.0);
    }

    #[test]
    fn test_disabled_engine_renders_empty_cues() {
        let mut engine = AudioEngine::disabled();
        assert!(!engine.is_enabled());
        assert!(engine.boot().is_empty());
        assert!(engine.system_check().is_empty());
        assert!(engine.glitch().is_empty());
        assert!(engine.ambient_drone(2.0).is_empty());
        assert!(engine.keystroke().is_empty());
        assert!(engine.entity_tone("null-form").is_empty());
    }

    #[test]
    fn test_seeded_engine_is_enabled() {
        let engine = AudioEngine::seeded(&config(), 7);
        assert!(engine.is_enabled());
    }

    #[test]
    fn test_entity_tone_params_deterministic() {
        let a = EntityToneParams::derive("null-form");
        let b = EntityToneParams::derive("null-form");
        assert_eq!(a, b);
        assert!(a.base_freq >= 200.0 && a.base_freq < 1000.0);
        assert!(a.filter_freq >= 500.0 && a.filter_freq < 3500.0);
        assert!(a.q >= 5.0 && a.q < 15.0);
    }

    #[test]
    fn test_entity_tones_differ_between_entities() {
        let a = EntityToneParams::derive("null-form");
        let b = EntityToneParams::derive("drexom");
        assert_ne!(a, b);
    }

    #[test]
    fn test_entity_tone_pcm_reproducible() {
        let mut one = AudioEngine::seeded(&config(), 1);
        let mut two = AudioEngine::seeded(&config(), 2);
        // The cue draws nothing from the rng, so different seeds agree
        assert_eq!(one.entity_tone("null-form"), two.entity_tone("null-form"));
    }

    #[test]
    fn test_glitch_reproducible_with_same_seed() {
        let mut one = AudioEngine::seeded(&config(), 9);
        let mut two = AudioEngine::seeded(&config(), 9);
        assert_eq!(one.glitch(), two.glitch());
    }

    #[test]
    fn test_drone_respects_duration_floor() {
        let mut engine = AudioEngine::seeded(&config(), 3);
        let pcm = engine.ambient_drone(0.2);
        assert_eq!(pcm.len(), 44_100);
    }

    #[test]
    fn test_samples_stay_in_range() {
        let mut engine = AudioEngine::seeded(&config(), 11);
        engine.set_volume(1.0);
        let pcm = engine.glitch();
        assert!(pcm.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn test_set_volume_clamps() {
        let mut engine = AudioEngine::seeded(&config(), 1);
        engine.set_volume(7.0);
        let pcm = engine.keystroke();
        assert!(peak(&pcm) <= 1.0);
    }
}
