//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AutomationService (domain)
//! ```
//!
//! Driven adapters (the radar driver, the actuator drivers, event sinks)
//! implement these traits.  The domain core consumes them via generics, so
//! it never touches hardware directly and every test can substitute mocks.

use crate::error::SensorError;
use crate::radar::RadarSnapshot;

// ───────────────────────────────────────────────────────────────
// Radar port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain the latest radar sample.
///
/// `poll` may block for up to one hardware read timeout but never
/// indefinitely — the driver bounds the UART read and maps expiry to
/// [`SensorError::Timeout`].  Callers run it inside a bounded control tick.
pub trait RadarPort {
    fn poll(&mut self) -> Result<RadarSnapshot, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the control loop pushes the shared
/// [`ActuatorState`](super::state::ActuatorState) through this each tick.
/// Implementations are dumb — clamping and gating happen upstream.
pub trait ActuatorPort {
    /// Drive the pump GPIO.
    fn set_pump(&mut self, on: bool);

    /// Set the SMA wire PWM duty (0 – 100, pre-clamped).
    fn set_sma_duty(&mut self, percent: u8);

    /// Fill the whole NeoPixel ring with one colour.
    fn set_ring(&mut self, r: u8, g: u8, b: u8);

    /// Kill all actuators (pump off, SMA 0 %, ring dark) — safe shutdown.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log today;
/// an MQTT or BLE sink would implement the same trait).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
