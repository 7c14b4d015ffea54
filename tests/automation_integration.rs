//! Integration tests: AutomationService → policy → ActuatorState.
//!
//! Drives full control cycles through the port traits with scripted
//! radar data and an injected clock, and checks what the service wrote
//! into the shared state and what it emitted on the event sink.

use livelamp::app::events::AppEvent;
use livelamp::app::policy::PolicyKind;
use livelamp::app::ports::{EventSink, RadarPort};
use livelamp::app::service::{AutomationService, TickOutcome};
use livelamp::app::state::ActuatorState;
use livelamp::config::SystemConfig;
use livelamp::error::SensorError;
use livelamp::radar::{RadarSnapshot, TargetReport, TargetSignal, TargetState};

// ── Mock implementations ──────────────────────────────────────

struct ScriptedRadar {
    script: Vec<Result<RadarSnapshot, SensorError>>,
    polls: usize,
}

impl ScriptedRadar {
    fn new(script: Vec<Result<RadarSnapshot, SensorError>>) -> Self {
        Self { script, polls: 0 }
    }
}

impl RadarPort for ScriptedRadar {
    fn poll(&mut self) -> Result<RadarSnapshot, SensorError> {
        let i = self.polls.min(self.script.len() - 1);
        self.polls += 1;
        self.script[i]
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

fn snapshot(moving: Option<(u16, u8)>, stationary: Option<(u16, u8)>) -> RadarSnapshot {
    let sig = |(distance_cm, energy)| TargetSignal {
        distance_cm,
        energy,
    };
    RadarSnapshot::from_report(
        TargetReport {
            moving: moving.map(sig),
            stationary: stationary.map(sig),
        },
        moving.is_some() || stationary.is_some(),
    )
}

fn micros(ms: u64) -> u64 {
    ms * 1_000
}

// ── State-table policy over the full classification range ─────

#[test]
fn state_table_rows_apply_over_successive_ticks() {
    let config = SystemConfig::default();
    let mut service = AutomationService::new(&config);
    let state = ActuatorState::new(25_000);
    let mut sink = RecordingSink::default();
    service.set_enabled(true, &mut sink);

    // None → Moving → Static → Both, one classification per tick.
    // Cooldown: start each SMA-raising tick outside the previous window.
    let mut radar = ScriptedRadar::new(vec![
        Ok(snapshot(None, None)),
        Ok(snapshot(Some((120, 55)), None)),
        Ok(snapshot(None, Some((200, 40)))),
        Ok(snapshot(Some((90, 80)), Some((90, 70)))),
    ]);

    let expected = [
        (TargetState::None, false, 0u8, (0u8, 0u8, 0u8)),
        (TargetState::Moving, true, 30, (255, 165, 0)),
        (TargetState::Static, false, 60, (0, 255, 255)),
        (TargetState::Both, true, 100, (255, 0, 255)),
    ];

    for (i, (target, pump, sma, led)) in expected.into_iter().enumerate() {
        let now = micros(i as u64 * 10_000); // 10 s apart, outside cooldown
        let outcome = service.tick(&mut radar, &state, now, &mut sink);
        assert!(matches!(outcome, TickOutcome::Applied(_)), "{target:?}");
        assert_eq!(service.radar_snapshot().target_state, target);
        assert_eq!(state.pump(), pump, "{target:?} pump");
        assert_eq!(state.sma().percent, sma, "{target:?} sma");
        let c = state.led();
        assert_eq!((c.r, c.g, c.b), led, "{target:?} led");
    }

    // Three classification changes → three TargetChanged events.
    let changes: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::TargetChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            (TargetState::None, TargetState::Moving),
            (TargetState::Moving, TargetState::Static),
            (TargetState::Static, TargetState::Both),
        ]
    );
}

#[test]
fn distance_policy_tracks_proximity() {
    let config = SystemConfig {
        policy: PolicyKind::DistanceBased,
        ..SystemConfig::default()
    };
    let mut service = AutomationService::new(&config);
    let state = ActuatorState::new(25_000);
    let mut sink = RecordingSink::default();
    service.set_enabled(true, &mut sink);

    // 150 cm → 50 % power, red/blue blend at the midpoint.
    let mut radar = ScriptedRadar::new(vec![Ok(snapshot(Some((150, 60)), None))]);
    let _ = service.tick(&mut radar, &state, 0, &mut sink);
    assert!(state.pump());
    assert_eq!(state.sma().percent, 50);
    let c = state.led();
    assert_eq!((c.r, c.g, c.b), (128, 0, 128));
}

// ── Disabled automation ───────────────────────────────────────

#[test]
fn disabled_service_never_overrides_manual_state() {
    let config = SystemConfig::default(); // automation off at boot
    let mut service = AutomationService::new(&config);
    let state = ActuatorState::new(25_000);
    let mut sink = RecordingSink::default();

    // Manual writes, as the gateway would make them.
    state.set_pump(true);
    let _ = service.request_sma(45, 0, &state, &mut sink);
    let _ = state.set_led(1, 2, 3);

    let mut radar = ScriptedRadar::new(vec![Ok(snapshot(Some((50, 90)), Some((50, 90))))]);
    for i in 0..5 {
        let outcome = service.tick(&mut radar, &state, micros(i * 100), &mut sink);
        assert_eq!(outcome, TickOutcome::Disabled);
    }

    assert!(state.pump());
    assert_eq!(state.sma().percent, 45);
    let c = state.led();
    assert_eq!((c.r, c.g, c.b), (1, 2, 3));

    // Polling still happened, so the radar resource stays fresh.
    assert_eq!(service.radar_snapshot().target_state, TargetState::Both);
}

#[test]
fn toggle_emits_once_per_transition() {
    let config = SystemConfig::default();
    let mut service = AutomationService::new(&config);
    let mut sink = RecordingSink::default();

    service.set_enabled(true, &mut sink);
    service.set_enabled(true, &mut sink); // no-op
    service.set_enabled(false, &mut sink);

    let toggles: Vec<bool> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::AutomationToggled { enabled } => Some(*enabled),
            _ => None,
        })
        .collect();
    assert_eq!(toggles, vec![true, false]);
}

// ── Sensor failure and recovery ───────────────────────────────

#[test]
fn failure_backoff_and_recovery_events() {
    let config = SystemConfig::default();
    let mut service = AutomationService::new(&config);
    let state = ActuatorState::new(25_000);
    let mut sink = RecordingSink::default();
    service.set_enabled(true, &mut sink);

    let good = snapshot(Some((100, 50)), None);
    let mut radar = ScriptedRadar::new(vec![
        Ok(good),
        Err(SensorError::Timeout),
        Ok(good), // served after the backoff window
    ]);

    // Tick 1: good poll.
    let _ = service.tick(&mut radar, &state, 0, &mut sink);
    assert_eq!(service.consecutive_poll_failures(), 0);

    // Tick 2: failure arms the backoff window; the last good snapshot
    // is retained for the gateway.
    let outcome = service.tick(&mut radar, &state, micros(100), &mut sink);
    assert_eq!(outcome, TickOutcome::SensorFailure(SensorError::Timeout));
    assert_eq!(service.consecutive_poll_failures(), 1);
    assert_eq!(service.radar_snapshot().target_state, TargetState::Moving);

    // The window eats exactly backoff_ticks() polls.
    for i in 0..config.backoff_ticks() {
        let now = micros(200 + u64::from(i) * 100);
        assert_eq!(
            service.tick(&mut radar, &state, now, &mut sink),
            TickOutcome::BackingOff
        );
    }
    assert_eq!(radar.polls, 2);

    // First tick after the window polls again and recovers.
    let outcome = service.tick(&mut radar, &state, micros(10_000), &mut sink);
    assert!(matches!(outcome, TickOutcome::Applied(_)));
    assert_eq!(service.consecutive_poll_failures(), 0);

    assert!(
        sink.events
            .iter()
            .any(|e| matches!(e, AppEvent::SensorFailed(SensorError::Timeout)))
    );
    assert!(
        sink.events
            .iter()
            .any(|e| matches!(e, AppEvent::SensorRecovered { failed_polls: 1 }))
    );
}

// ── SMA cooldown across automation and manual writers ─────────

#[test]
fn cooldown_gates_both_write_paths() {
    let config = SystemConfig::default(); // 5 s cooldown
    let mut service = AutomationService::new(&config);
    let state = ActuatorState::new(25_000);
    let mut sink = RecordingSink::default();
    service.set_enabled(true, &mut sink);

    let mut radar = ScriptedRadar::new(vec![Ok(snapshot(Some((100, 50)), None))]);

    // t=0: automation activates at 30 % and arms the window.
    let _ = service.tick(&mut radar, &state, 0, &mut sink);
    assert_eq!(state.sma().percent, 30);

    // t=1s: a manual raise through the shared path is denied.
    assert_eq!(service.request_sma(80, micros(1_000), &state, &mut sink), 30);
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::SmaDenied {
            requested_percent: 80,
            ..
        }
    )));

    // t=2s: deactivation is exempt and does not re-arm.
    assert_eq!(service.request_sma(0, micros(2_000), &state, &mut sink), 0);

    // t=3s: still inside the original window.
    assert_eq!(service.request_sma(80, micros(3_000), &state, &mut sink), 0);

    // t=5.1s: window expired; the raise applies and re-arms.
    assert_eq!(service.request_sma(80, micros(5_100), &state, &mut sink), 80);
    assert_eq!(service.request_sma(90, micros(5_200), &state, &mut sink), 80);
}

#[test]
fn telemetry_reports_current_context() {
    let config = SystemConfig::default();
    let mut service = AutomationService::new(&config);
    let state = ActuatorState::new(25_000);
    let mut sink = RecordingSink::default();
    service.set_enabled(true, &mut sink);

    let mut radar = ScriptedRadar::new(vec![Ok(snapshot(Some((80, 70)), None))]);
    let _ = service.tick(&mut radar, &state, 0, &mut sink);

    let t = service.build_telemetry(&state);
    assert!(t.automation_enabled);
    assert_eq!(t.target_state, TargetState::Moving);
    assert_eq!(t.detection_distance_cm, 80);
    assert!(t.pump_on);
    assert_eq!(t.sma_percent, 30);
    assert_eq!(t.led_rgb, (255, 165, 0));
    assert_eq!(t.consecutive_poll_failures, 0);
}
