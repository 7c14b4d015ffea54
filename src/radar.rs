//! Radar data model — the immutable per-poll snapshot.
//!
//! The LD2410 reports up to two concurrent targets: a *moving* one and a
//! *stationary* one.  The driver hands over a raw [`TargetReport`]; this
//! module derives the classification and the authoritative detection
//! distance from it.  The derivation is pure, so the whole policy layer is
//! testable without hardware or timing.

/// Radar target classification, wire-compatible with the LD2410 state
/// byte and the `target_state` field of the gateway's radar resource
/// (serialized there as the raw integer 0 – 3).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum TargetState {
    /// No target detected.
    #[default]
    None = 0,
    /// Moving target only.
    Moving = 1,
    /// Stationary target only.
    Static = 2,
    /// Moving and stationary targets simultaneously.
    Both = 3,
}

impl TargetState {
    /// Classification is a pure function of which signals are active.
    pub fn from_signals(moving: bool, stationary: bool) -> Self {
        match (moving, stationary) {
            (false, false) => Self::None,
            (true, false) => Self::Moving,
            (false, true) => Self::Static,
            (true, true) => Self::Both,
        }
    }
}

/// One detected target: distance plus signal energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSignal {
    /// Distance to the target in centimetres.
    pub distance_cm: u16,
    /// Signal energy, 0 – 100.
    pub energy: u8,
}

/// Raw driver output for one radar report, before derivation.
/// `None` means the corresponding signal is inactive this report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetReport {
    pub moving: Option<TargetSignal>,
    pub stationary: Option<TargetSignal>,
}

/// Immutable value type representing one radar sample.
///
/// Invariants (enforced by [`RadarSnapshot::from_report`]):
/// - `target_state` reflects exactly which signals were active;
/// - `presence == (target_state != None)`;
/// - `detection_distance_cm` is the moving distance when a moving target
///   exists, else the stationary distance, else 0;
/// - energies are clamped to 0 – 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RadarSnapshot {
    /// Radar-derived presence (any target active).
    pub presence: bool,
    /// Level of the dedicated hardware presence line.
    pub presence_gpio: bool,
    pub target_state: TargetState,
    pub moving_distance_cm: u16,
    /// Moving-target energy, 0 – 100.
    pub moving_energy: u8,
    pub static_distance_cm: u16,
    /// Stationary-target energy, 0 – 100.
    pub static_energy: u8,
    /// Distance of the authoritative signal (moving takes precedence).
    pub detection_distance_cm: u16,
}

impl RadarSnapshot {
    /// Derive a snapshot from a raw report plus the presence GPIO level.
    pub fn from_report(report: TargetReport, presence_gpio: bool) -> Self {
        let target_state =
            TargetState::from_signals(report.moving.is_some(), report.stationary.is_some());

        let detection_distance_cm = match (report.moving, report.stationary) {
            (Some(m), _) => m.distance_cm,
            (None, Some(s)) => s.distance_cm,
            (None, None) => 0,
        };

        Self {
            presence: target_state != TargetState::None,
            presence_gpio,
            target_state,
            moving_distance_cm: report.moving.map_or(0, |m| m.distance_cm),
            moving_energy: report.moving.map_or(0, |m| m.energy.min(100)),
            static_distance_cm: report.stationary.map_or(0, |s| s.distance_cm),
            static_energy: report.stationary.map_or(0, |s| s.energy.min(100)),
            detection_distance_cm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(distance_cm: u16, energy: u8) -> Option<TargetSignal> {
        Some(TargetSignal {
            distance_cm,
            energy,
        })
    }

    #[test]
    fn state_is_pure_function_of_signals() {
        assert_eq!(TargetState::from_signals(false, false), TargetState::None);
        assert_eq!(TargetState::from_signals(true, false), TargetState::Moving);
        assert_eq!(TargetState::from_signals(false, true), TargetState::Static);
        assert_eq!(TargetState::from_signals(true, true), TargetState::Both);
    }

    #[test]
    fn empty_report_is_quiet_room() {
        let snap = RadarSnapshot::from_report(TargetReport::default(), false);
        assert_eq!(snap.target_state, TargetState::None);
        assert!(!snap.presence);
        assert_eq!(snap.detection_distance_cm, 0);
    }

    #[test]
    fn moving_takes_precedence_for_detection_distance() {
        let snap = RadarSnapshot::from_report(
            TargetReport {
                moving: sig(120, 85),
                stationary: sig(200, 40),
            },
            true,
        );
        assert_eq!(snap.target_state, TargetState::Both);
        assert!(snap.presence);
        assert_eq!(snap.detection_distance_cm, 120);
        assert_eq!(snap.static_distance_cm, 200);
    }

    #[test]
    fn static_only_uses_static_distance() {
        let snap = RadarSnapshot::from_report(
            TargetReport {
                moving: None,
                stationary: sig(310, 55),
            },
            true,
        );
        assert_eq!(snap.target_state, TargetState::Static);
        assert_eq!(snap.detection_distance_cm, 310);
        assert_eq!(snap.moving_energy, 0);
    }

    #[test]
    fn energies_clamped_to_100() {
        let snap = RadarSnapshot::from_report(
            TargetReport {
                moving: sig(50, 255),
                stationary: sig(60, 180),
            },
            false,
        );
        assert_eq!(snap.moving_energy, 100);
        assert_eq!(snap.static_energy, 100);
    }

    #[test]
    fn target_state_int_encoding() {
        assert_eq!(TargetState::None as u8, 0);
        assert_eq!(TargetState::Moving as u8, 1);
        assert_eq!(TargetState::Static as u8, 2);
        assert_eq!(TargetState::Both as u8, 3);
    }
}
