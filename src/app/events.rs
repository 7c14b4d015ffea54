//! Outbound application events.
//!
//! The [`AutomationService`](super::service::AutomationService) emits
//! these through the [`EventSink`](super::ports::EventSink) port.  The
//! adapter on the other side decides what to do with them — today that
//! is the serial log.

use crate::error::SensorError;
use crate::radar::TargetState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy)]
pub enum AppEvent {
    /// The firmware finished bootstrapping.
    Started { automation_enabled: bool },

    /// Automation was toggled via the gateway.
    AutomationToggled { enabled: bool },

    /// The radar classification changed between polls.
    TargetChanged { from: TargetState, to: TargetState },

    /// The governor refused to raise SMA power.
    SmaDenied { requested_percent: u8, cooldown_remaining_ms: u32 },

    /// A radar poll failed; the loop is backing off.
    SensorFailed(SensorError),

    /// Poll succeeded again after a run of failures.
    SensorRecovered { failed_polls: u32 },

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryData {
    pub automation_enabled: bool,
    pub target_state: TargetState,
    pub detection_distance_cm: u16,
    pub pump_on: bool,
    pub sma_percent: u8,
    pub led_rgb: (u8, u8, u8),
    pub consecutive_poll_failures: u32,
}
