// ABOUTME: Terminal demo mode: drives one animation through the frame
// ABOUTME: pump and prints frames as ANSI truecolor half-blocks.

use std::io::Write;
use std::time::Duration;

use anyhow::{anyhow, Result};
use mpl_anim::{create, FramePump, Surface};
use mpl_core::{AnimationKind, Color, Config};

const WIDTH: usize = 80;
const HEIGHT: usize = 48;
const DEFAULT_FRAMES: u64 = 300;

pub fn run(variant: &str, frames: u64, seed: Option<u64>, config: &Config) -> Result<()> {
    let kind = AnimationKind::from_label(variant).ok_or_else(|| {
        let known: Vec<&str> = AnimationKind::all().iter().map(|k| k.label()).collect();
        anyhow!("unknown animation '{variant}', expected one of: {}", known.join(", "))
    })?;

    let seed = seed.unwrap_or_else(rand::random);
    let frames = if frames > 0 {
        frames
    } else if config.anim.demo_frames > 0 {
        config.anim.demo_frames
    } else {
        DEFAULT_FRAMES
    };
    let frame_time = Duration::from_secs(1) / config.anim.fps.max(1);
    tracing::info!(variant = kind.label(), seed, frames, "demo starting");

    let mut pump = FramePump::new(create(kind, seed), WIDTH, HEIGHT, Color::ACCENT);
    let mut stdout = std::io::stdout().lock();
    // Hide the cursor for the duration of the run
    write!(stdout, "\u{1b}[2J\u{1b}[?25l")?;
    for _ in 0..frames {
        if !pump.step() {
            break;
        }
        let frame = render_ansi(pump.surface());
        write!(stdout, "\u{1b}[H{frame}")?;
        stdout.flush()?;
        std::thread::sleep(frame_time);
    }
    pump.stop();
    write!(stdout, "\u{1b}[?25h\u{1b}[0m")?;
    writeln!(stdout)?;
    Ok(())
}

/// One frame as ANSI half-block cells: each character column carries two
/// pixel rows, upper via foreground, lower via background.
pub fn render_ansi(surface: &Surface) -> String {
    let mut out = String::new();
    let height = surface.height() & !1;
    for y in (0..height).step_by(2) {
        for x in 0..surface.width() {
            let top = surface.pixel(x, y).unwrap_or([0, 0, 0, 255]);
            let bottom = surface.pixel(x, y + 1).unwrap_or([0, 0, 0, 255]);
            out.push_str(&format!(
                "\u{1b}[38;2;{};{};{}m\u{1b}[48;2;{};{};{}m▀",
                top[0], top[1], top[2], bottom[0], bottom[1], bottom[2],
            ));
        }
        out.push_str("\u{1b}[0m\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_ansi_line_count() {
        let surface = Surface::new(4, 6);
        let frame = render_ansi(&surface);
        assert_eq!(frame.lines().count(), 3);
        assert_eq!(frame.matches('▀').count(), 12);
    }

    #[test]
    fn test_render_ansi_carries_pixel_color() {
        let mut surface = Surface::new(2, 2);
        surface.put(0, 0, [255, 0, 0, 255]);
        let frame = render_ansi(&surface);
        assert!(frame.contains("\u{1b}[38;2;255;0;0m"));
    }

    #[test]
    fn test_odd_height_drops_last_row() {
        let surface = Surface::new(3, 5);
        let frame = render_ansi(&surface);
        assert_eq!(frame.lines().count(), 2);
    }
}
