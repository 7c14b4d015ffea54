//! Fuzz target: LD2410 basic-frame extraction
//!
//! Feeds arbitrary UART byte windows into `extract_last_report` and
//! asserts that parsing never panics and that any report it does accept
//! carries in-range energies once derived into a snapshot.
//!
//! cargo fuzz run fuzz_radar_frame

#![no_main]

use libfuzzer_sys::fuzz_target;
use livelamp::radar::RadarSnapshot;
use livelamp::sensors::ld2410::extract_last_report;

fuzz_target!(|data: &[u8]| {
    if let Ok(report) = extract_last_report(data) {
        let snap = RadarSnapshot::from_report(report, false);
        assert!(snap.moving_energy <= 100);
        assert!(snap.static_energy <= 100);
        // A non-zero distance implies an active signal.
        if snap.detection_distance_cm > 0 {
            assert!(snap.presence);
        }
    }
});
