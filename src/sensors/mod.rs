//! Sensor sources and ISR-fed shared state.

pub mod ld2410;

use core::sync::atomic::{AtomicBool, Ordering};

/// Level of the LD2410 hardware presence line, written by the GPIO edge
/// ISR and read by the poll path. Lock-free single atomic.
static PRESENCE_LEVEL: AtomicBool = AtomicBool::new(false);

/// Record the presence line level. ISR-safe: one relaxed store.
pub fn set_presence_from_isr(high: bool) {
    PRESENCE_LEVEL.store(high, Ordering::Relaxed);
}

/// Last presence line level captured by the edge ISR (seeded at boot).
pub fn presence_level() -> bool {
    PRESENCE_LEVEL.load(Ordering::Relaxed)
}
