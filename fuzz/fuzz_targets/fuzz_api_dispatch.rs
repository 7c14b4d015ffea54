//! Fuzz target: `ApiEngine::dispatch`
//!
//! Throws arbitrary request lines at the gateway engine backed by real
//! domain state and asserts that every response is a newline-terminated
//! JSON envelope and that the shared state stays within its invariants.
//!
//! cargo fuzz run fuzz_api_dispatch

#![no_main]

use libfuzzer_sys::fuzz_target;
use livelamp::app::events::AppEvent;
use livelamp::app::ports::EventSink;
use livelamp::app::service::AutomationService;
use livelamp::app::state::ActuatorState;
use livelamp::config::SystemConfig;
use livelamp::gateway::ApiEngine;

struct NullSink;
impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = SystemConfig {
        api_rate_limit_per_sec: u32::MAX,
        ..SystemConfig::default()
    };
    let mut engine = ApiEngine::new(&config);
    let mut service = AutomationService::new(&config);
    let state = ActuatorState::new(25_000);

    let out = engine.dispatch(data, &mut service, &state, 0, &mut NullSink);

    assert_eq!(out.last(), Some(&b'\n'));
    let envelope: serde_json::Value =
        serde_json::from_slice(&out).expect("responses are always valid JSON");
    let status = envelope["status"].as_u64().expect("status is numeric");
    assert!((200..=599).contains(&status));

    // Whatever the request did, the stored duty stays clamped.
    assert!(state.sma().percent <= 100);
});
