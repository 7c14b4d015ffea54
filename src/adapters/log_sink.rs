//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A future MQTT or BLE adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                let (r, g, b) = t.led_rgb;
                info!(
                    "TELEM | auto={} | target={:?} d={}cm | pump={} sma={}% | \
                     led=#{:02x}{:02x}{:02x} | poll_fails={}",
                    t.automation_enabled,
                    t.target_state,
                    t.detection_distance_cm,
                    if t.pump_on { "ON" } else { "off" },
                    t.sma_percent,
                    r,
                    g,
                    b,
                    t.consecutive_poll_failures,
                );
            }
            AppEvent::TargetChanged { from, to } => {
                info!("TARGET | {:?} -> {:?}", from, to);
            }
            AppEvent::SmaDenied {
                requested_percent,
                cooldown_remaining_ms,
            } => {
                info!(
                    "SMA | denied {}% ({}ms of cooldown left)",
                    requested_percent, cooldown_remaining_ms
                );
            }
            AppEvent::SensorFailed(e) => {
                warn!("RADAR | poll failed: {}", e);
            }
            AppEvent::SensorRecovered { failed_polls } => {
                info!("RADAR | recovered after {} failed polls", failed_polls);
            }
            AppEvent::AutomationToggled { enabled } => {
                info!("AUTO | {}", if *enabled { "enabled" } else { "disabled" });
            }
            AppEvent::Started { automation_enabled } => {
                info!("START | automation_enabled={}", automation_enabled);
            }
        }
    }
}
