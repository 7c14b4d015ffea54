//! Actuator policies — radar snapshot in, desired outputs out.
//!
//! Policies are a fixed set of named strategies selected in
//! `SystemConfig`, not a pluggable rules engine.  Evaluation is pure and
//! timing-free, so the dispatch tables are unit-testable in isolation
//! from the control loop.

use serde::{Deserialize, Serialize};

use crate::radar::{RadarSnapshot, TargetState};

/// Which strategy the automation loop evaluates each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Exhaustive dispatch over the target classification (default).
    StateTable,
    /// SMA power proportional to proximity; LED blends red↔blue with power.
    DistanceBased,
}

/// Desired actuator outputs for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCommand {
    pub pump_on: bool,
    pub sma_percent: u8,
    pub led_rgb: (u8, u8, u8),
}

impl ActuatorCommand {
    pub const ALL_OFF: Self = Self {
        pump_on: false,
        sma_percent: 0,
        led_rgb: (0, 0, 0),
    };
}

/// Evaluate the selected policy against a snapshot.
pub fn evaluate(kind: PolicyKind, snapshot: &RadarSnapshot) -> ActuatorCommand {
    match kind {
        PolicyKind::StateTable => state_table(snapshot.target_state),
        PolicyKind::DistanceBased => distance_based(snapshot),
    }
}

/// The fixed target-state dispatch table.
///
/// | state  | pump | sma | led           |
/// |--------|------|-----|---------------|
/// | None   | off  | 0   | (0, 0, 0)     |
/// | Moving | on   | 30  | (255, 165, 0) |
/// | Static | off  | 60  | (0, 255, 255) |
/// | Both   | on   | 100 | (255, 0, 255) |
fn state_table(state: TargetState) -> ActuatorCommand {
    match state {
        TargetState::None => ActuatorCommand::ALL_OFF,
        TargetState::Moving => ActuatorCommand {
            pump_on: true,
            sma_percent: 30,
            led_rgb: (255, 165, 0),
        },
        TargetState::Static => ActuatorCommand {
            pump_on: false,
            sma_percent: 60,
            led_rgb: (0, 255, 255),
        },
        TargetState::Both => ActuatorCommand {
            pump_on: true,
            sma_percent: 100,
            led_rgb: (255, 0, 255),
        },
    }
}

/// Proximity-proportional variant: full power at ≤ 0 cm, zero at ≥ 300 cm.
fn distance_based(snapshot: &RadarSnapshot) -> ActuatorCommand {
    let power: u8 = if snapshot.presence && snapshot.detection_distance_cm > 0 {
        let raw = (300.0 - f32::from(snapshot.detection_distance_cm)) / 3.0;
        raw.round().clamp(0.0, 100.0) as u8
    } else {
        0
    };

    ActuatorCommand {
        pump_on: power > 0,
        sma_percent: power,
        led_rgb: (
            (f32::from(power) * 2.55).round() as u8,
            0,
            (f32::from(100 - power) * 2.55).round() as u8,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radar::{TargetReport, TargetSignal};

    fn snapshot_with_state(state: TargetState) -> RadarSnapshot {
        let sig = |d| {
            Some(TargetSignal {
                distance_cm: d,
                energy: 50,
            })
        };
        let report = match state {
            TargetState::None => TargetReport::default(),
            TargetState::Moving => TargetReport {
                moving: sig(100),
                stationary: None,
            },
            TargetState::Static => TargetReport {
                moving: None,
                stationary: sig(100),
            },
            TargetState::Both => TargetReport {
                moving: sig(100),
                stationary: sig(150),
            },
        };
        RadarSnapshot::from_report(report, false)
    }

    #[test]
    fn state_table_is_exact() {
        let cases = [
            (TargetState::None, false, 0, (0, 0, 0)),
            (TargetState::Moving, true, 30, (255, 165, 0)),
            (TargetState::Static, false, 60, (0, 255, 255)),
            (TargetState::Both, true, 100, (255, 0, 255)),
        ];
        for (state, pump, sma, led) in cases {
            let cmd = evaluate(PolicyKind::StateTable, &snapshot_with_state(state));
            assert_eq!(cmd.pump_on, pump, "{state:?} pump");
            assert_eq!(cmd.sma_percent, sma, "{state:?} sma");
            assert_eq!(cmd.led_rgb, led, "{state:?} led");
        }
    }

    fn distance_snapshot(distance_cm: u16) -> RadarSnapshot {
        RadarSnapshot::from_report(
            TargetReport {
                moving: Some(TargetSignal {
                    distance_cm,
                    energy: 80,
                }),
                stationary: None,
            },
            true,
        )
    }

    #[test]
    fn distance_power_curve() {
        // 150 cm → (300-150)/3 = 50 %.
        let cmd = evaluate(PolicyKind::DistanceBased, &distance_snapshot(150));
        assert_eq!(cmd.sma_percent, 50);
        assert!(cmd.pump_on);
        assert_eq!(cmd.led_rgb, (128, 0, 128));

        // 30 cm → 90 %.
        let cmd = evaluate(PolicyKind::DistanceBased, &distance_snapshot(30));
        assert_eq!(cmd.sma_percent, 90);

        // Beyond range: clamped to 0.
        let cmd = evaluate(PolicyKind::DistanceBased, &distance_snapshot(450));
        assert_eq!(cmd.sma_percent, 0);
        assert!(!cmd.pump_on);
        assert_eq!(cmd.led_rgb, (0, 0, 255));
    }

    #[test]
    fn distance_no_presence_is_idle() {
        let snap = RadarSnapshot::from_report(TargetReport::default(), true);
        let cmd = evaluate(PolicyKind::DistanceBased, &snap);
        assert_eq!(cmd.sma_percent, 0);
        assert!(!cmd.pump_on);
    }

    #[test]
    fn policy_kind_serde_names() {
        assert_eq!(
            serde_json::to_string(&PolicyKind::StateTable).unwrap(),
            "\"state_table\""
        );
        let kind: PolicyKind = serde_json::from_str("\"distance_based\"").unwrap();
        assert_eq!(kind, PolicyKind::DistanceBased);
    }
}
