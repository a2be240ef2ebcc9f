// ABOUTME: The boot intro: scripted roll-call with typewriter pacing.
// ABOUTME: Script generation is pure; the printer owns timing and audio.

use std::io::Write;
use std::time::Duration;

use mpl_audio::AudioEngine;
use mpl_core::{BootConfig, ClientState, LabEntity};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const GLITCH_CHARS: &[char] = &[
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '_', '+', '-', '=', '[', ']', '{', '}',
    '|', ';', ':', ',', '.', '<', '>', '?', '/', '~', '`', '█', '▓', '▒', '░',
];

/// Audio cue attached to a script line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootCue {
    Boot,
    SystemCheck,
    EntityTone(&'static str),
}

#[derive(Debug, Clone)]
pub struct BootLine {
    pub text: String,
    pub delay_ms: u64,
    pub cue: Option<BootCue>,
}

fn line(text: &str, delay_ms: u64, cue: Option<BootCue>) -> BootLine {
    BootLine {
        text: text.to_string(),
        delay_ms,
        cue,
    }
}

/// The full boot transcript, in order. Pure so tests can assert on it.
pub fn script() -> Vec<BootLine> {
    let mut lines = vec![
        line("> Initializing core systems...", 0, Some(BootCue::Boot)),
        line("> Loading entity matrix...", 200, None),
        line("> [OK] Entity authentication:", 400, Some(BootCue::SystemCheck)),
    ];
    for entity in LabEntity::all() {
        lines.push(BootLine {
            text: format!("   ✓ {} authenticated {}", entity.name, entity.signature),
            delay_ms: 150,
            cue: Some(BootCue::EntityTone(entity.id)),
        });
    }
    lines.extend([
        line("> Establishing quantum tunnel...", 2500, None),
        line("> Synchronizing collective consciousness...", 200, None),
        line("> Building reality mesh...", 200, None),
        line("> Compiling glitch shaders...", 200, None),
        line("> ", 200, None),
        line("> System ready.", 200, Some(BootCue::SystemCheck)),
        line("> All entities online.", 200, None),
    ]);
    lines
}

/// Whether the intro should play this run.
pub fn should_play(config: &BootConfig, state: &ClientState) -> bool {
    config.show_intro && !state.intro_seen
}

/// Type the script to the writer with glitch bursts, firing audio cues
/// as their lines appear. Marks the intro as seen in `state`.
/// A zero `typewriter_ms` disables all pacing.
pub fn play<W: Write>(
    out: &mut W,
    config: &BootConfig,
    state: &mut ClientState,
    audio: &mut AudioEngine,
) -> std::io::Result<()> {
    let mut rng = SmallRng::from_entropy();
    for entry in script() {
        if config.typewriter_ms > 0 {
            std::thread::sleep(Duration::from_millis(entry.delay_ms));
        }
        if let Some(cue) = entry.cue {
            let pcm = match cue {
                BootCue::Boot => audio.boot(),
                BootCue::SystemCheck => audio.system_check(),
                BootCue::EntityTone(id) => audio.entity_tone(id),
            };
            tracing::debug!(samples = pcm.len(), ?cue, "boot cue rendered");
        }
        type_line(out, &entry.text, config, &mut rng)?;
    }
    state.intro_seen = true;
    Ok(())
}

/// One line of typewriter output. Characters land one at a time; some
/// flash as a glitch before settling.
fn type_line<W: Write>(
    out: &mut W,
    text: &str,
    config: &BootConfig,
    rng: &mut SmallRng,
) -> std::io::Result<()> {
    let pace = Duration::from_millis(config.typewriter_ms);
    for c in text.chars() {
        if rng.gen::<f32>() < config.glitch_frequency {
            let noise = GLITCH_CHARS[rng.gen_range(0..GLITCH_CHARS.len())];
            write!(out, "{noise}")?;
            out.flush()?;
            std::thread::sleep(pace);
            // Erase the glitch and type the real character
            write!(out, "\u{8}")?;
        }
        write!(out, "{c}")?;
        out.flush()?;
        std::thread::sleep(pace);
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_rolls_call_every_entity() {
        let script = script();
        for entity in LabEntity::all() {
            assert!(
                script.iter().any(|l| l.cue == Some(BootCue::EntityTone(entity.id))),
                "no roll-call line for {}",
                entity.id
            );
        }
    }

    #[test]
    fn test_script_starts_with_boot_cue_and_ends_online() {
        let script = script();
        assert_eq!(script[0].cue, Some(BootCue::Boot));
        assert_eq!(script.last().unwrap().text, "> All entities online.");
    }

    #[test]
    fn test_gating_on_config_and_state() {
        let config = BootConfig::default();
        let mut state = ClientState::new();
        assert!(should_play(&config, &state));

        state.intro_seen = true;
        assert!(!should_play(&config, &state));

        let muted_config = BootConfig {
            show_intro: false,
            ..BootConfig::default()
        };
        assert!(!should_play(&muted_config, &ClientState::new()));
    }

    #[test]
    fn test_play_marks_intro_seen() {
        let config = BootConfig {
            show_intro: true,
            typewriter_ms: 0,
            glitch_frequency: 0.0,
        };
        let mut state = ClientState::new();
        let mut audio = AudioEngine::seeded(&mpl_core::AudioConfig::default(), 1);
        let mut out = Vec::new();
        play(&mut out, &config, &mut state, &mut audio).unwrap();
        assert!(state.intro_seen);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("System ready."));
    }
}
