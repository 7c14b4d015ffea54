//! SMA safety governor.
//!
//! The shape-memory-alloy wire must not be re-energised too frequently or
//! it overheats and loses its training.  The governor enforces a mandatory
//! cooldown window between activations and is the **single gate** for every
//! path that can raise SMA power — the automation loop and the gateway's
//! manual write path both route through [`SmaGovernor::request`].
//!
//! ## Interlock rules
//!
//! 1. Deactivation (`percent == 0`) is always allowed — turning the wire
//!    off never needs gating and never touches the cooldown.
//! 2. Any activation (`percent > 0`) inside the cooldown window is denied;
//!    the caller must leave the current duty untouched.
//! 3. Every accepted activation re-arms the cooldown, including repeated
//!    and automation-driven activations.
//!
//! A denial is a normal decision outcome, not an error.  The cooldown
//! persists independently of the automation `enabled` flag: disabling
//! automation does not release a running window.
//!
//! Time is injected as microseconds-since-boot so the window is testable
//! without real-time waits.

use log::debug;

/// Outcome of an SMA duty request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmaDecision {
    /// Write this duty (already clamped by the caller's state container).
    Apply(u8),
    /// Cooldown active — do not mutate the stored duty.
    Deny,
}

/// Cooldown interlock for the SMA heating wire.
pub struct SmaGovernor {
    /// Cooldown window length in microseconds.
    cooldown_us: u64,
    /// Monotonic deadline before which activations are rejected.
    /// `None` until the first accepted activation.
    cooldown_until_us: Option<u64>,
}

impl SmaGovernor {
    /// `cooldown_ms` comes from `SystemConfig::sma_cooldown_ms`.
    pub fn new(cooldown_ms: u32) -> Self {
        Self {
            cooldown_us: u64::from(cooldown_ms) * 1_000,
            cooldown_until_us: None,
        }
    }

    /// Gate an SMA duty request against the cooldown window.
    ///
    /// `now_us` is monotonic microseconds since boot (see
    /// [`MonotonicClock`](crate::adapters::time::MonotonicClock)).
    pub fn request(&mut self, percent: u8, now_us: u64) -> SmaDecision {
        if percent == 0 {
            return SmaDecision::Apply(0);
        }

        if let Some(until) = self.cooldown_until_us {
            if now_us < until {
                debug!(
                    "SMA governor: deny {}% ({}ms of cooldown left)",
                    percent,
                    (until - now_us) / 1_000
                );
                return SmaDecision::Deny;
            }
        }

        self.cooldown_until_us = Some(now_us + self.cooldown_us);
        SmaDecision::Apply(percent)
    }

    /// True while activations would currently be denied.
    pub fn in_cooldown(&self, now_us: u64) -> bool {
        matches!(self.cooldown_until_us, Some(until) if now_us < until)
    }

    /// Remaining cooldown in milliseconds (0 when the window has elapsed).
    pub fn cooldown_remaining_ms(&self, now_us: u64) -> u32 {
        match self.cooldown_until_us {
            Some(until) if now_us < until => ((until - now_us) / 1_000) as u32,
            _ => 0,
        }
    }
}
