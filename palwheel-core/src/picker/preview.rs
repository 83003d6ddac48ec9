//! The bitmap shown next to the cursor while picking: a swatch of the sampled color and its hex code.
//!
//! Rendered here rather than by each backend so that every platform shows the same thing, using
//! a tiny built-in pixel font that needs no font loading at all.

use crate::color::{hex_rgb_label, Rgb8};

const PADDING: u32 = 4;
const SWATCH: u32 = 24;
const GAP: u32 = 6;
const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + 1;
/// `#RRGGBB`
const LABEL_CHARS: u32 = 7;

const BACKGROUND: Rgb8 = Rgb8::new(30, 30, 30);
const FOREGROUND: Rgb8 = Rgb8::new(235, 235, 235);

/// Top-down, tightly packed 32-bit BGRA, the layout GDI and most compositors take directly.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PreviewBitmap {
    width: u32,
    height: u32,
    bgra: Vec<u8>,
}
impl PreviewBitmap {
    pub const WIDTH: u32 = PADDING + SWATCH + GAP + LABEL_CHARS * GLYPH_ADVANCE + PADDING;
    pub const HEIGHT: u32 = PADDING + SWATCH + PADDING;

    /// Draw the preview for a sampled color.
    #[must_use]
    pub fn render(rgb: Rgb8) -> Self {
        let mut this = Self {
            width: Self::WIDTH,
            height: Self::HEIGHT,
            bgra: vec![0; (Self::WIDTH * Self::HEIGHT * 4) as usize],
        };
        this.fill_rect(0, 0, Self::WIDTH, Self::HEIGHT, BACKGROUND);
        // Outline, so dark samples stay visible against the background.
        this.fill_rect(PADDING - 1, PADDING - 1, SWATCH + 2, SWATCH + 2, FOREGROUND);
        this.fill_rect(PADDING, PADDING, SWATCH, SWATCH, rgb);

        let label = hex_rgb_label(rgb);
        let mut x = PADDING + SWATCH + GAP;
        let y = (Self::HEIGHT - GLYPH_HEIGHT) / 2;
        for ch in label.chars() {
            this.draw_glyph(x, y, ch);
            x += GLYPH_ADVANCE;
        }
        this
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }
    #[must_use]
    pub fn bgra(&self) -> &[u8] {
        &self.bgra
    }
    /// Color at a pixel, for inspection.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let pixel: [u8; 4] = self.bgra.get(idx..idx + 4)?.try_into().ok()?;
        let [b, g, r, _] = pixel;
        Some(Rgb8 { r, g, b })
    }
    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb8) {
        let pixel = [color.b, color.g, color.r, 0xFF];
        for py in y..(y + h).min(self.height) {
            for px in x..(x + w).min(self.width) {
                let idx = ((py * self.width + px) * 4) as usize;
                self.bgra[idx..idx + 4].copy_from_slice(&pixel);
            }
        }
    }
    fn draw_glyph(&mut self, x: u32, y: u32, ch: char) {
        for (row, bits) in (0..).zip(glyph(ch)) {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                    self.fill_rect(x + col, y + row, 1, 1, FOREGROUND);
                }
            }
        }
    }
}

/// 5x7 glyphs, one row per byte, high bit on the left. Only what a hex label needs.
fn glyph(ch: char) -> [u8; GLYPH_HEIGHT as usize] {
    match ch.to_ascii_uppercase() {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        '#' => [0x0A, 0x0A, 0x1F, 0x0A, 0x1F, 0x0A, 0x0A],
        _ => [0x00; GLYPH_HEIGHT as usize],
    }
}
