/// Digital rain: falling glyph columns drawn over the screen for a short
/// while after every view change. Pure animation; reads no app state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const GLYPHS: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'R', 'S', 'T', 'U',
    'V', 'X', 'Y', 'Z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'ｱ', 'ｲ', 'ｳ', 'ｴ',
    'ｵ', 'ｶ', 'ｷ', 'ｸ', 'ｹ', 'ｺ', 'ｻ', 'ｼ', 'ｽ', 'ﾀ', 'ﾁ', 'ﾂ', 'ﾃ', 'ﾄ', 'ﾅ', 'ﾆ', 'ﾇ', 'ﾈ',
];

/// Chance per frame that a column which left the screen restarts at the top.
const RESTART_CHANCE: f64 = 0.05;
const TRAIL: i32 = 8;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Shade {
    Head,
    Bright,
    Dim,
}

pub struct RainCell {
    pub x: u16,
    pub y: u16,
    pub ch: char,
    pub shade: Shade,
}

pub struct DigitalRain {
    width: u16,
    height: u16,
    /// Head row per column (may be negative before entering or past the bottom).
    heads: Vec<i32>,
    glyphs: Vec<char>,
    rng: StdRng,
}

impl DigitalRain {
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_rng(width, height, StdRng::from_rng(&mut rand::rng()))
    }

    fn with_rng(width: u16, height: u16, mut rng: StdRng) -> Self {
        // Staggered starts so the columns do not fall as one sheet.
        let heads = (0..width).map(|_| -rng.random_range(0..(height as i32 / 2).max(1))).collect();
        let glyphs = (0..width as usize * height as usize)
            .map(|_| GLYPHS[rng.random_range(0..GLYPHS.len())])
            .collect();
        DigitalRain { width, height, heads, glyphs, rng }
    }

    /// Advance one frame.
    pub fn step(&mut self) {
        let h = self.height as i32;
        for x in 0..self.width as usize {
            let head = self.heads[x] + 1;
            self.heads[x] = head;
            if (0..h).contains(&head) {
                let idx = head as usize * self.width as usize + x;
                self.glyphs[idx] = GLYPHS[self.rng.random_range(0..GLYPHS.len())];
            }
            if head - TRAIL > h && self.rng.random_bool(RESTART_CHANCE) {
                self.heads[x] = -1;
            }
        }
    }

    /// Visible glyphs for the current frame.
    pub fn cells(&self) -> Vec<RainCell> {
        let mut out = Vec::new();
        let h = self.height as i32;
        for (x, &head) in self.heads.iter().enumerate() {
            for age in 0..=TRAIL {
                let y = head - age;
                if !(0..h).contains(&y) {
                    continue;
                }
                let shade = match age {
                    0 => Shade::Head,
                    1..=3 => Shade::Bright,
                    _ => Shade::Dim,
                };
                let ch = self.glyphs[y as usize * self.width as usize + x];
                out.push(RainCell { x: x as u16, y: y as u16, ch, shade });
            }
        }
        out
    }
}
