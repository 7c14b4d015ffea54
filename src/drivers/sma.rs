//! SMA heating wire driver (LEDC PWM).
//!
//! The shape-memory-alloy wire contracts when heated; power is delivered
//! as a 25 kHz PWM signal whose duty cycle sets the heating rate. The
//! public unit is percent (0 – 100); the hardware unit is the 10-bit
//! LEDC duty register (0 – 1023).
//!
//! ## Safety contract
//!
//! Activation timing is enforced by the `SmaGovernor` upstream; this
//! driver is a dumb actuator and writes whatever duty it is handed.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real LEDC channel via the hw_init helper.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct SmaDriver {
    percent: u8,
}

impl SmaDriver {
    pub fn new() -> Self {
        // Channel is configured with duty 0 during init_ledc().
        Self { percent: 0 }
    }

    /// Set heating power as a percentage. Values above 100 are clamped.
    pub fn set_duty(&mut self, percent: u8) {
        let percent = percent.min(100);
        hw_init::ledc_set(hw_init::LEDC_CH_SMA, Self::duty_10bit(percent));
        self.percent = percent;
    }

    /// De-energise the wire.
    pub fn off(&mut self) {
        self.set_duty(0);
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn freq_hz(&self) -> u32 {
        pins::SMA_PWM_FREQ_HZ
    }

    /// Scale percent to the 10-bit duty register (100% → 1023).
    fn duty_10bit(percent: u8) -> u16 {
        (u32::from(percent) * 1023 / 100) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duty_scaling_matches_10bit_register() {
        assert_eq!(SmaDriver::duty_10bit(0), 0);
        assert_eq!(SmaDriver::duty_10bit(50), 511);
        assert_eq!(SmaDriver::duty_10bit(100), 1023);
    }

    #[test]
    fn set_duty_clamps_to_100() {
        let mut sma = SmaDriver::new();
        sma.set_duty(250);
        assert_eq!(sma.percent(), 100);
    }

    #[test]
    fn off_resets_percent() {
        let mut sma = SmaDriver::new();
        sma.set_duty(60);
        assert_eq!(sma.percent(), 60);
        sma.off();
        assert_eq!(sma.percent(), 0);
    }
}
