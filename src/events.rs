//! Interrupt-driven event system.
//!
//! Events are produced by:
//! - the presence GPIO ISR (radar hardware line edges)
//! - timer callbacks (control tick, ring render, telemetry)
//! - the gateway I/O task (a request is waiting on the channel)
//!
//! Events are consumed by the main control loop, which processes them
//! one at a time in FIFO order.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ GPIO ISR    │────▶│              │     │              │
//! │ Timer ISR   │────▶│  Event Queue │────▶│  Main Loop   │
//! │ I/O thread  │────▶│  (lock-free) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 32;

/// System event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// Presence GPIO line changed level (ISR).
    PresenceEdge = 1,

    /// Automation control loop tick (10 Hz).
    ControlTick = 20,
    /// NeoPixel ring pattern frame timer fired.
    RenderTick = 21,

    /// Telemetry report timer fired.
    TelemetryTick = 30,
    /// The gateway I/O task queued a request on the command channel.
    CommandReceived = 31,
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// ISRs and the I/O thread write (produce), main loop reads (consume).
// Atomic head/tail indices; slots are atomics so no `static mut` is
// needed and ISR-context writes stay data-race free.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
#[allow(clippy::declare_interior_mutable_const)]
const SLOT_INIT: AtomicU8 = AtomicU8::new(0);
static EVENT_BUFFER: [AtomicU8; EVENT_QUEUE_CAP] = [SLOT_INIT; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from ISR context (lock-free).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop event.
    }

    EVENT_BUFFER[head as usize].store(event as u8, Ordering::Relaxed);
    EVENT_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    let raw = EVENT_BUFFER[tail as usize].load(Ordering::Relaxed);
    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

    event_from_u8(raw)
}

/// Drain all pending events into a callback, FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

/// Number of pending events.
pub fn queue_len() -> usize {
    let head = EVENT_HEAD.load(Ordering::Relaxed) as usize;
    let tail = EVENT_TAIL.load(Ordering::Relaxed) as usize;
    (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
}

// ── Internal ──────────────────────────────────────────────────

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        1 => Some(Event::PresenceEdge),
        20 => Some(Event::ControlTick),
        21 => Some(Event::RenderTick),
        30 => Some(Event::TelemetryTick),
        31 => Some(Event::CommandReceived),
        _ => None,
    }
}

/// The queue is a process-wide static; tests that touch it must hold
/// this lock so parallel test threads do not interleave.
#[cfg(test)]
pub(crate) static QUEUE_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_fifo() {
        let _guard = QUEUE_TEST_LOCK.lock().unwrap();
        drain_events(|_| {});
        assert!(push_event(Event::ControlTick));
        assert!(push_event(Event::PresenceEdge));
        assert_eq!(pop_event(), Some(Event::ControlTick));
        assert_eq!(pop_event(), Some(Event::PresenceEdge));
        assert_eq!(pop_event(), None);
    }

    #[test]
    fn full_queue_drops() {
        let _guard = QUEUE_TEST_LOCK.lock().unwrap();
        drain_events(|_| {});
        // Capacity is CAP - 1 (one slot sacrificed to disambiguate full/empty).
        for _ in 0..EVENT_QUEUE_CAP - 1 {
            assert!(push_event(Event::RenderTick));
        }
        assert!(!push_event(Event::RenderTick));
        assert_eq!(queue_len(), EVENT_QUEUE_CAP - 1);
        drain_events(|_| {});
        assert_eq!(queue_len(), 0);
    }
}
