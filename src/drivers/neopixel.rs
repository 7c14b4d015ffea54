//! NeoPixel ring driver (12 × WS2812, RMT-driven).
//!
//! The ring is always filled with a single colour — per-pixel addressing
//! is not needed for the lamp. Colour data is shifted out as a WS2812
//! bitstream (GRB order, ~1.25 µs per bit) through an RMT TX channel.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: owns an `esp_idf_hal` RMT TX driver constructed in
//! `main()` (channel 0 on the pin from `pins::NEOPIXEL_GPIO`).
//! On host/test: tracks the last written colour in-memory only.

#[cfg(target_os = "espidf")]
use std::time::Duration;

#[cfg(target_os = "espidf")]
use esp_idf_hal::rmt::{FixedLengthSignal, PinState, Pulse, TxRmtDriver};

use crate::error::ActuatorError;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Bits per frame: 24 per LED, GRB, MSB first.
#[cfg(target_os = "espidf")]
const FRAME_BITS: usize = pins::NEOPIXEL_COUNT * 24;

pub struct NeopixelRing {
    #[cfg(target_os = "espidf")]
    tx: TxRmtDriver<'static>,
    /// WS2812 bit timings at the channel's counter clock:
    /// (zero-high, zero-low, one-high, one-low).
    #[cfg(target_os = "espidf")]
    pulses: (Pulse, Pulse, Pulse, Pulse),
    current: (u8, u8, u8),
}

impl NeopixelRing {
    #[cfg(target_os = "espidf")]
    pub fn new(tx: TxRmtDriver<'static>) -> Result<Self, ActuatorError> {
        let ticks_hz = tx
            .counter_clock()
            .map_err(|_| ActuatorError::RmtWriteFailed)?;
        let pulse = |state, ns| {
            Pulse::new_with_duration(ticks_hz, state, &Duration::from_nanos(ns))
                .map_err(|_| ActuatorError::RmtWriteFailed)
        };
        let pulses = (
            pulse(PinState::High, 350)?,
            pulse(PinState::Low, 800)?,
            pulse(PinState::High, 700)?,
            pulse(PinState::Low, 600)?,
        );
        Ok(Self {
            tx,
            pulses,
            current: (0, 0, 0),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Result<Self, ActuatorError> {
        Ok(Self { current: (0, 0, 0) })
    }

    /// Fill the whole ring with one colour.
    pub fn fill(&mut self, r: u8, g: u8, b: u8) -> Result<(), ActuatorError> {
        self.write_frame(r, g, b)?;
        self.current = (r, g, b);
        Ok(())
    }

    /// Blank the ring.
    pub fn off(&mut self) -> Result<(), ActuatorError> {
        self.fill(0, 0, 0)
    }

    pub fn current(&self) -> (u8, u8, u8) {
        self.current
    }

    #[cfg(target_os = "espidf")]
    fn write_frame(&mut self, r: u8, g: u8, b: u8) -> Result<(), ActuatorError> {
        let (t0h, t0l, t1h, t1l) = self.pulses;
        let grb: u32 = (u32::from(g) << 16) | (u32::from(r) << 8) | u32::from(b);

        let mut signal = FixedLengthSignal::<FRAME_BITS>::new();
        for led in 0..pins::NEOPIXEL_COUNT {
            for bit in 0..24 {
                let one = grb & (1 << (23 - bit)) != 0;
                let pair = if one { (t1h, t1l) } else { (t0h, t0l) };
                signal
                    .set(led * 24 + bit, &pair)
                    .map_err(|_| ActuatorError::RmtWriteFailed)?;
            }
        }

        self.tx
            .start_blocking(&signal)
            .map_err(|_| ActuatorError::RmtWriteFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_frame(&mut self, _r: u8, _g: u8, _b: u8) -> Result<(), ActuatorError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_tracks_last_colour() {
        let mut ring = NeopixelRing::new().unwrap();
        ring.fill(255, 165, 0).unwrap();
        assert_eq!(ring.current(), (255, 165, 0));
        ring.off().unwrap();
        assert_eq!(ring.current(), (0, 0, 0));
    }
}
