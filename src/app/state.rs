//! Shared actuator state — the single source of truth for outputs.
//!
//! `ActuatorState` is constructed once at boot (pump off, SMA 0 %, ring
//! black) and shared **by reference** between the automation service and
//! the gateway engine; nothing else may alias it mutably.  Every field
//! group lives in one atomic word, so a reader never observes a torn
//! `(r, g, b)` triple or a half-written duty value, and no operation can
//! block — the access pattern is the same lock-free style as the event
//! queue.
//!
//! Writes clamp on entry: SMA duty to 0 – 100, LED channels to 0 – 255.
//! Ordering between automation and gateway writers is last-writer-wins;
//! the design intentionally offers no cross-field transaction.

use core::fmt::Write as _;
use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

/// One RGB colour for the ring.  `hex()` is derived formatting, never
/// stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl LedColor {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    /// Lowercase `#rrggbb`.
    pub fn hex(&self) -> heapless::String<8> {
        let mut s = heapless::String::new();
        // Writing 7 ASCII chars into an 8-byte buffer cannot fail.
        let _ = write!(s, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b);
        s
    }

    /// Parse `#rrggbb` or `rrggbb`, case-insensitive.
    pub fn parse_hex(input: &str) -> Option<Self> {
        let digits = input.strip_prefix('#').unwrap_or(input);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: core::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    fn pack(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    fn unpack(word: u32) -> Self {
        Self {
            r: (word >> 16) as u8,
            g: (word >> 8) as u8,
            b: word as u8,
        }
    }
}

/// SMA read-back: current duty plus the fixed PWM frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmaState {
    pub percent: u8,
    pub freq_hz: u32,
}

/// Shared, torn-read-free actuator state.
pub struct ActuatorState {
    pump_on: AtomicBool,
    sma_percent: AtomicU8,
    /// Packed `0x00RRGGBB` — one word so the triple updates atomically.
    led_word: AtomicU32,
    /// Fixed at construction; read-only to every caller.
    sma_freq_hz: u32,
}

impl ActuatorState {
    pub fn new(sma_freq_hz: u32) -> Self {
        Self {
            pump_on: AtomicBool::new(false),
            sma_percent: AtomicU8::new(0),
            led_word: AtomicU32::new(0),
            sma_freq_hz,
        }
    }

    // ── Pump ──────────────────────────────────────────────────

    pub fn pump(&self) -> bool {
        self.pump_on.load(Ordering::Acquire)
    }

    pub fn set_pump(&self, on: bool) {
        self.pump_on.store(on, Ordering::Release);
    }

    // ── SMA ───────────────────────────────────────────────────

    pub fn sma(&self) -> SmaState {
        SmaState {
            percent: self.sma_percent.load(Ordering::Acquire),
            freq_hz: self.sma_freq_hz,
        }
    }

    /// Clamps to 0 – 100 before storing.  Frequency is untouched.
    /// Callers that can *raise* power must route through the
    /// [`SmaGovernor`](crate::safety::SmaGovernor) first.
    pub fn set_sma(&self, percent: i32) -> u8 {
        let clamped = percent.clamp(0, 100) as u8;
        self.sma_percent.store(clamped, Ordering::Release);
        clamped
    }

    // ── LED ring ──────────────────────────────────────────────

    pub fn led(&self) -> LedColor {
        LedColor::unpack(self.led_word.load(Ordering::Acquire))
    }

    /// Clamps each channel to 0 – 255 before storing.
    pub fn set_led(&self, r: i32, g: i32, b: i32) -> LedColor {
        let color = LedColor {
            r: r.clamp(0, 255) as u8,
            g: g.clamp(0, 255) as u8,
            b: b.clamp(0, 255) as u8,
        };
        self.led_word.store(color.pack(), Ordering::Release);
        color
    }

    pub fn set_led_color(&self, color: LedColor) {
        self.led_word.store(color.pack(), Ordering::Release);
    }

    /// Convenience for `set_led(0, 0, 0)`.
    pub fn off_led(&self) {
        self.led_word.store(0, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boots_all_off() {
        let state = ActuatorState::new(25_000);
        assert!(!state.pump());
        assert_eq!(state.sma().percent, 0);
        assert_eq!(state.led(), LedColor::BLACK);
    }

    #[test]
    fn sma_clamps_and_roundtrips() {
        let state = ActuatorState::new(25_000);
        assert_eq!(state.set_sma(42), 42);
        assert_eq!(state.sma().percent, 42);
        assert_eq!(state.set_sma(250), 100);
        assert_eq!(state.sma().percent, 100);
        assert_eq!(state.set_sma(-7), 0);
        assert_eq!(state.sma().percent, 0);
    }

    #[test]
    fn sma_freq_is_fixed() {
        let state = ActuatorState::new(25_000);
        let _ = state.set_sma(80);
        assert_eq!(state.sma().freq_hz, 25_000);
    }

    #[test]
    fn led_clamps_each_channel() {
        let state = ActuatorState::new(25_000);
        let c = state.set_led(-1, 300, 128);
        assert_eq!((c.r, c.g, c.b), (0, 255, 128));
        assert_eq!(state.led(), c);
    }

    #[test]
    fn led_packing_survives_roundtrip() {
        let state = ActuatorState::new(25_000);
        state.set_led_color(LedColor { r: 1, g: 2, b: 3 });
        let c = state.led();
        assert_eq!((c.r, c.g, c.b), (1, 2, 3));
        state.off_led();
        assert_eq!(state.led(), LedColor::BLACK);
    }

    #[test]
    fn hex_formatting_is_lowercase() {
        let c = LedColor {
            r: 255,
            g: 165,
            b: 0,
        };
        assert_eq!(c.hex().as_str(), "#ffa500");
        assert_eq!(LedColor::BLACK.hex().as_str(), "#000000");
    }

    #[test]
    fn hex_parsing_accepts_both_forms() {
        assert_eq!(
            LedColor::parse_hex("#00FF00"),
            Some(LedColor { r: 0, g: 255, b: 0 })
        );
        assert_eq!(
            LedColor::parse_hex("ff5500"),
            Some(LedColor {
                r: 255,
                g: 85,
                b: 0
            })
        );
        assert_eq!(LedColor::parse_hex("#12345"), None);
        assert_eq!(LedColor::parse_hex("#12345g"), None);
    }
}
