// ABOUTME: CPU raster surface the animations draw into.
// ABOUTME: RGBA8 pixel buffer with alpha blending, lines, rects, and glyphs.

use mpl_core::Color;

use crate::glyph;

/// An owned RGBA8 drawing surface. Resizing discards the old contents
/// entirely; animations regenerate their layout afterwards.
#[derive(Debug, Clone)]
pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 4]>,
}

impl Surface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// A zero-area surface; drawing into it is a no-op
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Reallocate at a new size. Old contents are discarded, not scaled.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![[0, 0, 0, 255]; width * height];
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Snapshot of the current pixels, for feedback-style self-sampling
    pub fn snapshot(&self) -> Vec<[u8; 4]> {
        self.pixels.clone()
    }

    pub fn put(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = rgba;
        }
    }

    /// Opaque fill of the whole surface
    pub fn clear(&mut self, color: Color) {
        let rgba = opaque(color);
        self.pixels.fill(rgba);
    }

    /// Blend `color` over every pixel at the given alpha. Low alpha
    /// produces the trailing/fade effect the variants rely on.
    pub fn fade(&mut self, color: Color, alpha: f32) {
        let src = color.with_alpha(alpha);
        for px in &mut self.pixels {
            *px = blend(*px, src);
        }
    }

    /// Alpha-blend a single pixel. Out-of-bounds coordinates are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y * self.width + x;
        self.pixels[idx] = blend(self.pixels[idx], color);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        for py in y..y + h {
            for px in x..x + w {
                self.blend_pixel(px, py, color);
            }
        }
    }

    /// Bresenham line
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.blend_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Filled circle with alpha falling off toward the rim
    pub fn soft_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let r = radius.ceil() as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                let dist = ((dx * dx + dy * dy) as f32).sqrt();
                if dist <= radius {
                    let falloff = 1.0 - dist / radius;
                    self.blend_pixel(
                        cx as i32 + dx,
                        cy as i32 + dy,
                        color.with_alpha(color.a * falloff),
                    );
                }
            }
        }
    }

    /// Draw a character on the 5x7 cell grid. Shade blocks render as
    /// dithered fills; characters missing from the font render solid.
    pub fn draw_glyph(&mut self, c: char, x: i32, y: i32, color: Color) {
        match c {
            '█' => self.fill_rect(x, y, glyph::WIDTH, glyph::HEIGHT, color),
            '▓' => self.dither(x, y, color, 3),
            '▒' => self.dither(x, y, color, 2),
            '░' => self.dither(x, y, color, 1),
            _ => {
                let rows = glyph::rows(c);
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..glyph::WIDTH {
                        if bits & (0x10 >> col) != 0 {
                            self.blend_pixel(x + col, y + row as i32, color);
                        }
                    }
                }
            }
        }
    }

    /// Draw a string left to right on the glyph grid
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) {
        for (i, c) in text.chars().enumerate() {
            self.draw_glyph(c, x + i as i32 * (glyph::WIDTH + 1), y, color);
        }
    }

    fn dither(&mut self, x: i32, y: i32, color: Color, level: u8) {
        // level out of 4 pixels in each 2x2 block
        for dy in 0..glyph::HEIGHT {
            for dx in 0..glyph::WIDTH {
                let on = match level {
                    1 => dx % 2 == 0 && dy % 2 == 0,
                    2 => (dx + dy) % 2 == 0,
                    _ => !(dx % 2 == 1 && dy % 2 == 1),
                };
                if on {
                    self.blend_pixel(x + dx, y + dy, color);
                }
            }
        }
    }
}

fn opaque(color: Color) -> [u8; 4] {
    let [r, g, b, _] = color.to_rgba8();
    [r, g, b, 255]
}

/// Standard source-over blend; destination stays opaque
fn blend(dst: [u8; 4], src: Color) -> [u8; 4] {
    let a = src.a.clamp(0.0, 1.0);
    let mix = |d: u8, s: f32| -> u8 {
        let d = d as f32 / 255.0;
        ((s * a + d * (1.0 - a)).clamp(0.0, 1.0) * 255.0).round() as u8
    };
    [
        mix(dst[0], src.r),
        mix(dst[1], src.g),
        mix(dst[2], src.b),
        255,
    ]
}
