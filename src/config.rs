//! System configuration parameters
//!
//! All tunable parameters for the LiveLamp system.  Pin and peripheral
//! assignments live in `pins`; everything here is policy and timing.

use serde::{Deserialize, Serialize};

use crate::app::policy::PolicyKind;
use crate::drivers::ring_patterns::RingPattern;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Automation ---
    /// Whether the sensor-driven automation loop starts enabled.
    pub automation_enabled_at_boot: bool,
    /// Which actuator policy the automation loop evaluates.
    pub policy: PolicyKind,

    // --- Ring ---
    /// Pattern the ring renders the policy colour through.
    pub ring_pattern: RingPattern,

    // --- SMA safety ---
    /// Minimum interval between SMA re-activations (milliseconds).
    pub sma_cooldown_ms: u32,

    // --- Timing ---
    /// Control loop tick period (milliseconds).
    pub control_loop_interval_ms: u32,
    /// Elevated wait after a failed radar poll (milliseconds).
    pub sensor_backoff_ms: u32,
    /// Telemetry report interval (seconds).
    pub telemetry_interval_secs: u32,

    // --- Gateway ---
    /// Sustained request budget for the API gateway (requests/second).
    pub api_rate_limit_per_sec: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Automation: manual control until explicitly enabled.
            automation_enabled_at_boot: false,
            policy: PolicyKind::StateTable,

            // Ring: unmodulated colour straight from the policy.
            ring_pattern: RingPattern::Solid,

            // SMA safety: matches the web UI re-arm delay.
            sma_cooldown_ms: 5_000,

            // Timing
            control_loop_interval_ms: 100, // 10 Hz
            sensor_backoff_ms: 1_000,
            telemetry_interval_secs: 60,

            // Gateway
            api_rate_limit_per_sec: 10,
        }
    }
}

impl SystemConfig {
    /// Number of control ticks covered by the sensor backoff window.
    pub fn backoff_ticks(&self) -> u32 {
        self.sensor_backoff_ms.div_ceil(self.control_loop_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert!(!c.automation_enabled_at_boot);
        assert!(c.sma_cooldown_ms >= 1_000);
        assert!(c.control_loop_interval_ms > 0);
        assert!(c.sensor_backoff_ms > c.control_loop_interval_ms);
        assert!(c.api_rate_limit_per_sec > 0);
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.sma_cooldown_ms, c2.sma_cooldown_ms);
        assert_eq!(c.control_loop_interval_ms, c2.control_loop_interval_ms);
        assert_eq!(c.policy, c2.policy);
        assert_eq!(c.ring_pattern, c2.ring_pattern);
    }

    #[test]
    fn ring_pattern_serde_names() {
        let c = SystemConfig {
            ring_pattern: RingPattern::Breathe,
            ..SystemConfig::default()
        };
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"ring_pattern\":\"breathe\""));
    }

    #[test]
    fn backoff_spans_whole_ticks() {
        let c = SystemConfig::default();
        // 1000ms backoff at a 100ms tick = 10 skipped ticks.
        assert_eq!(c.backoff_ticks(), 10);

        let c = SystemConfig {
            sensor_backoff_ms: 250,
            control_loop_interval_ms: 100,
            ..SystemConfig::default()
        };
        assert_eq!(c.backoff_ticks(), 3, "partial ticks round up");
    }
}
