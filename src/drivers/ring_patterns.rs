//! Ring pattern engine — time-varying colour for the NeoPixel ring.
//!
//! Generates the RGB value to fill the ring with each render cycle. The
//! main loop calls `tick()` at the control cadence and feeds the output
//! into `NeopixelRing::fill()`. Patterns that modulate a colour use the
//! base colour held in `ActuatorState`, so a gateway colour write shows
//! through immediately whatever the active pattern.
//!
//! | Pattern  | Description                            | Period |
//! |----------|----------------------------------------|--------|
//! | Solid    | Base colour, unmodulated               | —      |
//! | Breathe  | Brightness ramp 30 % → 100 % → 30 %    | 3 s    |
//! | Rainbow  | Hue rotation around the colour wheel   | 3 s    |
//! | Fire     | Warm colour with random flicker        | —      |
//! | Off      | Ring blanked                           | —      |

use serde::{Deserialize, Serialize};

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

/// Pattern identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingPattern {
    /// Show the base colour as-is.
    #[default]
    Solid,
    /// Base colour with a triangle-wave brightness sweep.
    Breathe,
    /// Full-saturation hue rotation (base colour ignored).
    Rainbow,
    /// Ember-like flicker around a warm orange (base colour ignored).
    Fire,
    Off,
}

/// Warm base colour for the fire pattern.
const FIRE_COLOUR: Rgb = (255, 96, 12);

const BREATHE_PERIOD_MS: u32 = 3000;
const RAINBOW_PERIOD_MS: u32 = 3000;

/// Ring pattern engine. Stack-allocated, no heap.
pub struct RingPatternEngine {
    pattern: RingPattern,
    phase_ms: u32,
    /// xorshift32 state for the fire flicker; any non-zero seed works.
    rng: u32,
}

impl RingPatternEngine {
    pub fn new() -> Self {
        Self {
            pattern: RingPattern::Solid,
            phase_ms: 0,
            rng: 0x2545_f491,
        }
    }

    pub fn set_pattern(&mut self, pattern: RingPattern) {
        if self.pattern != pattern {
            self.pattern = pattern;
            self.phase_ms = 0;
        }
    }

    pub fn pattern(&self) -> RingPattern {
        self.pattern
    }

    /// Advance the pattern phase and return the colour to fill the ring
    /// with. `delta_ms` is the time since the last call (typically the
    /// control-loop interval).
    pub fn tick(&mut self, delta_ms: u32, base: Rgb) -> Rgb {
        self.phase_ms = self.phase_ms.wrapping_add(delta_ms);

        match self.pattern {
            RingPattern::Solid => base,
            RingPattern::Off => (0, 0, 0),
            RingPattern::Breathe => {
                // Map the 0..255 triangle onto 30%..100% brightness.
                let tri = Self::triangle_brightness(self.phase_ms, BREATHE_PERIOD_MS);
                let brightness = 77 + ((u16::from(tri) * 178) / 255) as u8;
                Self::scale(base, brightness)
            }
            RingPattern::Rainbow => {
                let pos = ((self.phase_ms % RAINBOW_PERIOD_MS) * 255 / RAINBOW_PERIOD_MS) as u8;
                Self::wheel(pos)
            }
            RingPattern::Fire => {
                // 60%..100% random brightness each tick.
                let brightness = 153 + (self.next_rand() % 103) as u8;
                Self::scale(FIRE_COLOUR, brightness)
            }
        }
    }

    /// Triangular brightness curve: ramps 0→255→0 over `period_ms`.
    fn triangle_brightness(phase_ms: u32, period_ms: u32) -> u8 {
        let pos = u64::from(phase_ms % period_ms);
        let half = u64::from(period_ms) / 2;
        if pos < half {
            ((pos * 255) / half) as u8
        } else {
            (((u64::from(period_ms) - pos) * 255) / half) as u8
        }
    }

    /// Classic 256-step colour wheel; channel sum is 255 at every step.
    fn wheel(pos: u8) -> Rgb {
        let p = u16::from(pos);
        if pos < 85 {
            ((255 - p * 3) as u8, (p * 3) as u8, 0)
        } else if pos < 170 {
            let p = p - 85;
            (0, (255 - p * 3) as u8, (p * 3) as u8)
        } else {
            let p = p - 170;
            ((p * 3) as u8, 0, (255 - p * 3) as u8)
        }
    }

    fn scale(colour: Rgb, brightness: u8) -> Rgb {
        let (r, g, b) = colour;
        let br = u16::from(brightness);
        (
            ((u16::from(r) * br) / 255) as u8,
            ((u16::from(g) * br) / 255) as u8,
            ((u16::from(b) * br) / 255) as u8,
        )
    }

    fn next_rand(&mut self) -> u32 {
        // xorshift32 (Marsaglia).
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng = x;
        x
    }
}
