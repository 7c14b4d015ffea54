//! Automation service — the recurring sensor-to-actuator control core.
//!
//! [`AutomationService`] owns the policy selection, the SMA governor and
//! the last radar snapshot.  The main loop calls [`tick`](AutomationService::tick)
//! once per control period; the gateway calls [`request_sma`](AutomationService::request_sma)
//! and [`set_enabled`](AutomationService::set_enabled) from its dispatch
//! path.  All I/O flows through port traits injected at call sites, so
//! the whole service runs under test with mock adapters and a fake clock.
//!
//! ```text
//!  RadarPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                │    AutomationService      │
//!                │  policy · governor · last │──▶ ActuatorState
//!                └──────────────────────────┘
//! ```
//!
//! Each tick is phased explicitly — poll, evaluate, apply — and every
//! phase reports its outcome in [`TickOutcome`] instead of being
//! swallowed.  Sensor failures arm a backoff window (poll skipped for
//! `sensor_backoff_ms`) and are never fatal: the loop survives
//! arbitrarily many of them and resumes on the first good poll.

use log::info;

use crate::config::SystemConfig;
use crate::radar::RadarSnapshot;
use crate::safety::{SmaDecision, SmaGovernor};

use super::events::{AppEvent, TelemetryData};
use super::policy::{self, ActuatorCommand, PolicyKind};
use super::ports::{EventSink, RadarPort};
use super::state::ActuatorState;

/// What one control tick did, phase by phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Poll succeeded and the policy output was applied (SMA possibly
    /// withheld by the governor — that is still a normal apply).
    Applied(ActuatorCommand),
    /// Poll succeeded but automation is disabled; no state was mutated.
    Disabled,
    /// Poll failed; backoff armed; no state was mutated.
    SensorFailure(crate::error::SensorError),
    /// Inside the backoff window; poll skipped; no state was mutated.
    BackingOff,
}

/// The automation control core.
pub struct AutomationService {
    enabled: bool,
    policy: PolicyKind,
    governor: SmaGovernor,
    /// Last successfully parsed snapshot; default until the first good poll.
    /// Served to the gateway's radar resource even while polls fail.
    last_snapshot: RadarSnapshot,
    consecutive_poll_failures: u32,
    backoff_ticks_remaining: u32,
    backoff_ticks: u32,
    tick_count: u64,
}

impl AutomationService {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            enabled: config.automation_enabled_at_boot,
            policy: config.policy,
            governor: SmaGovernor::new(config.sma_cooldown_ms),
            last_snapshot: RadarSnapshot::default(),
            consecutive_poll_failures: 0,
            backoff_ticks_remaining: 0,
            backoff_ticks: config.backoff_ticks(),
            tick_count: 0,
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: poll radar → evaluate policy → apply.
    ///
    /// `now_us` is monotonic microseconds since boot, injected so the
    /// cooldown window is deterministic under test.
    pub fn tick(
        &mut self,
        radar: &mut impl RadarPort,
        state: &ActuatorState,
        now_us: u64,
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        self.tick_count += 1;

        // Phase 0: an armed backoff window eats this tick.
        if self.backoff_ticks_remaining > 0 {
            self.backoff_ticks_remaining -= 1;
            return TickOutcome::BackingOff;
        }

        // Phase 1: poll.  Runs even when automation is disabled so the
        // gateway's radar resource stays fresh.
        let snapshot = match radar.poll() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.consecutive_poll_failures += 1;
                self.backoff_ticks_remaining = self.backoff_ticks;
                sink.emit(&AppEvent::SensorFailed(e));
                return TickOutcome::SensorFailure(e);
            }
        };

        if self.consecutive_poll_failures > 0 {
            sink.emit(&AppEvent::SensorRecovered {
                failed_polls: self.consecutive_poll_failures,
            });
            self.consecutive_poll_failures = 0;
        }
        if snapshot.target_state != self.last_snapshot.target_state {
            sink.emit(&AppEvent::TargetChanged {
                from: self.last_snapshot.target_state,
                to: snapshot.target_state,
            });
        }
        self.last_snapshot = snapshot;

        // Phase 2: disabled automation leaves the actuators to manual
        // control — not a single state mutation this tick.
        if !self.enabled {
            return TickOutcome::Disabled;
        }

        // Phase 3: evaluate policy, phase 4: apply.
        let cmd = policy::evaluate(self.policy, &snapshot);
        state.set_pump(cmd.pump_on);
        self.request_sma(i32::from(cmd.sma_percent), now_us, state, sink);
        let (r, g, b) = cmd.led_rgb;
        state.set_led(i32::from(r), i32::from(g), i32::from(b));

        TickOutcome::Applied(cmd)
    }

    // ── Shared SMA write path ─────────────────────────────────

    /// Route an SMA duty request through the governor and into the state.
    ///
    /// This is the only way SMA power changes — automation ticks and
    /// gateway writes both land here.  On denial the stored duty is left
    /// untouched and its current value is returned.
    pub fn request_sma(
        &mut self,
        percent: i32,
        now_us: u64,
        state: &ActuatorState,
        sink: &mut impl EventSink,
    ) -> u8 {
        let clamped = percent.clamp(0, 100) as u8;
        match self.governor.request(clamped, now_us) {
            SmaDecision::Apply(p) => state.set_sma(i32::from(p)),
            SmaDecision::Deny => {
                sink.emit(&AppEvent::SmaDenied {
                    requested_percent: clamped,
                    cooldown_remaining_ms: self.governor.cooldown_remaining_ms(now_us),
                });
                state.sma().percent
            }
        }
    }

    // ── Gateway-facing configuration ──────────────────────────

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Toggle automation.  The SMA cooldown window is deliberately left
    /// running — disabling automation must not re-arm the wire early.
    pub fn set_enabled(&mut self, enabled: bool, sink: &mut impl EventSink) {
        if self.enabled != enabled {
            self.enabled = enabled;
            info!("automation {}", if enabled { "enabled" } else { "disabled" });
            sink.emit(&AppEvent::AutomationToggled { enabled });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Last successfully parsed radar snapshot (default until one lands).
    pub fn radar_snapshot(&self) -> RadarSnapshot {
        self.last_snapshot
    }

    pub fn consecutive_poll_failures(&self) -> u32 {
        self.consecutive_poll_failures
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Build a telemetry snapshot from the current context.
    pub fn build_telemetry(&self, state: &ActuatorState) -> TelemetryData {
        let led = state.led();
        TelemetryData {
            automation_enabled: self.enabled,
            target_state: self.last_snapshot.target_state,
            detection_distance_cm: self.last_snapshot.detection_distance_cm,
            pump_on: state.pump(),
            sma_percent: state.sma().percent,
            led_rgb: (led.r, led.g, led.b),
            consecutive_poll_failures: self.consecutive_poll_failures,
        }
    }
}
