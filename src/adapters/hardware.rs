//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the radar driver and all actuator drivers, exposing them
//! through [`RadarPort`] and [`ActuatorPort`]. This is the only module
//! in the system that touches actual hardware from the control loop.
//! On non-espidf targets, the underlying drivers use cfg-gated
//! simulation stubs.

use log::warn;

use crate::app::ports::{ActuatorPort, RadarPort};
use crate::drivers::neopixel::NeopixelRing;
use crate::drivers::pump::PumpDriver;
use crate::drivers::sma::SmaDriver;
use crate::error::SensorError;
use crate::radar::RadarSnapshot;
use crate::sensors;
use crate::sensors::ld2410::Ld2410;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    radar: Ld2410,
    pump: PumpDriver,
    sma: SmaDriver,
    ring: NeopixelRing,
}

impl HardwareAdapter {
    pub fn new(radar: Ld2410, pump: PumpDriver, sma: SmaDriver, ring: NeopixelRing) -> Self {
        Self {
            radar,
            pump,
            sma,
            ring,
        }
    }
}

// ── RadarPort implementation ──────────────────────────────────

impl RadarPort for HardwareAdapter {
    fn poll(&mut self) -> Result<RadarSnapshot, SensorError> {
        let report = self.radar.try_read_report()?;
        Ok(RadarSnapshot::from_report(report, sensors::presence_level()))
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_pump(&mut self, on: bool) {
        self.pump.set(on);
    }

    fn set_sma_duty(&mut self, percent: u8) {
        self.sma.set_duty(percent);
    }

    fn set_ring(&mut self, r: u8, g: u8, b: u8) {
        if self.ring.current() == (r, g, b) {
            return;
        }
        if let Err(e) = self.ring.fill(r, g, b) {
            warn!("ring write failed: {}", e);
        }
    }

    fn all_off(&mut self) {
        self.pump.off();
        self.sma.off();
        if let Err(e) = self.ring.off() {
            warn!("ring blank failed: {}", e);
        }
    }
}
