//! LD2410 mmWave radar driver.
//!
//! Reads basic-mode report frames from the radar's UART data stream and
//! extracts the target fields into a [`TargetReport`]. The configuration
//! protocol (command frames, engineering mode) is not implemented — the
//! module runs with the radar's factory reporting defaults.
//!
//! ## Basic-mode frame layout
//!
//! ```text
//! F4 F3 F2 F1 | len(2,LE) | 02 AA | state | mov_dist(2,LE) mov_energy
//!             | stat_dist(2,LE) stat_energy | det_dist(2,LE) | 55 00
//! F8 F7 F6 F5
//! ```
//!
//! `state` bit 0 = moving target active, bit 1 = stationary target
//! active. Frame extraction is a pure function so it is fully testable
//! on the host; only the UART read is device-gated.

use crate::error::SensorError;
use crate::radar::{TargetReport, TargetSignal};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

const FRAME_HEADER: [u8; 4] = [0xF4, 0xF3, 0xF2, 0xF1];
const FRAME_TAIL: [u8; 4] = [0xF8, 0xF7, 0xF6, 0xF5];
/// Intra-frame payload length of a basic-mode report.
const BASIC_PAYLOAD_LEN: usize = 13;
/// Header(4) + len(2) + payload(13) + tail(4).
const BASIC_FRAME_LEN: usize = 4 + 2 + BASIC_PAYLOAD_LEN + 4;

const DATA_TYPE_BASIC: u8 = 0x02;
const HEAD_MARKER: u8 = 0xAA;
const TAIL_MARKER: u8 = 0x55;

/// Bounded UART wait per poll; expiry is a normal [`SensorError::Timeout`].
#[cfg(target_os = "espidf")]
const READ_TIMEOUT_MS: u32 = 100;

pub struct Ld2410 {
    #[cfg(target_os = "espidf")]
    buf: [u8; 128],
}

impl Ld2410 {
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "espidf")]
            buf: [0; 128],
        }
    }

    /// Read the most recent complete report from the UART stream.
    #[cfg(target_os = "espidf")]
    pub fn try_read_report(&mut self) -> Result<TargetReport, SensorError> {
        let n = hw_init::uart_read(&mut self.buf, READ_TIMEOUT_MS);
        if n == 0 {
            return Err(SensorError::Timeout);
        }
        let report = extract_last_report(&self.buf[..n])?;
        // At 10 reports/s the stream outpaces the poll cadence; drop
        // whatever queued up behind the frame we just consumed.
        hw_init::uart_flush();
        Ok(report)
    }

    /// Host builds have no radar attached.
    #[cfg(not(target_os = "espidf"))]
    pub fn try_read_report(&mut self) -> Result<TargetReport, SensorError> {
        Err(SensorError::DeviceNotReady)
    }
}

/// Scan a byte window for basic-mode frames and return the last valid
/// one. Partial or corrupt frames earlier in the window are skipped.
pub fn extract_last_report(bytes: &[u8]) -> Result<TargetReport, SensorError> {
    let mut last = None;

    let mut i = 0;
    while i + BASIC_FRAME_LEN <= bytes.len() {
        if bytes[i..i + 4] != FRAME_HEADER {
            i += 1;
            continue;
        }
        match parse_basic_frame(&bytes[i..i + BASIC_FRAME_LEN]) {
            Ok(report) => {
                last = Some(report);
                i += BASIC_FRAME_LEN;
            }
            Err(_) => i += 4,
        }
    }

    last.ok_or(SensorError::MalformedFrame)
}

/// Parse one complete basic-mode frame (header through tail).
fn parse_basic_frame(frame: &[u8]) -> Result<TargetReport, SensorError> {
    if frame.len() != BASIC_FRAME_LEN
        || frame[..4] != FRAME_HEADER
        || frame[BASIC_FRAME_LEN - 4..] != FRAME_TAIL
    {
        return Err(SensorError::MalformedFrame);
    }

    let len = u16::from_le_bytes([frame[4], frame[5]]) as usize;
    if len != BASIC_PAYLOAD_LEN {
        return Err(SensorError::MalformedFrame);
    }

    let payload = &frame[6..6 + BASIC_PAYLOAD_LEN];
    if payload[0] != DATA_TYPE_BASIC
        || payload[1] != HEAD_MARKER
        || payload[11] != TAIL_MARKER
        || payload[12] != 0x00
    {
        return Err(SensorError::MalformedFrame);
    }

    let state = payload[2];
    let moving_active = state & 0b01 != 0;
    let stationary_active = state & 0b10 != 0;

    let moving = moving_active.then(|| TargetSignal {
        distance_cm: u16::from_le_bytes([payload[3], payload[4]]),
        energy: payload[5],
    });
    let stationary = stationary_active.then(|| TargetSignal {
        distance_cm: u16::from_le_bytes([payload[6], payload[7]]),
        energy: payload[8],
    });
    // payload[9..11] is the module's own detection distance; the
    // snapshot derives its authoritative distance instead.

    Ok(TargetReport { moving, stationary })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(state: u8, mov: (u16, u8), stat: (u16, u8)) -> Vec<u8> {
        let mut f = Vec::new();
        f.extend_from_slice(&FRAME_HEADER);
        f.extend_from_slice(&(BASIC_PAYLOAD_LEN as u16).to_le_bytes());
        f.push(DATA_TYPE_BASIC);
        f.push(HEAD_MARKER);
        f.push(state);
        f.extend_from_slice(&mov.0.to_le_bytes());
        f.push(mov.1);
        f.extend_from_slice(&stat.0.to_le_bytes());
        f.push(stat.1);
        f.extend_from_slice(&mov.0.to_le_bytes()); // detection distance
        f.push(TAIL_MARKER);
        f.push(0x00);
        f.extend_from_slice(&FRAME_TAIL);
        f
    }

    #[test]
    fn parses_both_targets() {
        let report = extract_last_report(&frame(0x03, (120, 85), (200, 40))).unwrap();
        let moving = report.moving.unwrap();
        let stationary = report.stationary.unwrap();
        assert_eq!(moving.distance_cm, 120);
        assert_eq!(moving.energy, 85);
        assert_eq!(stationary.distance_cm, 200);
        assert_eq!(stationary.energy, 40);
    }

    #[test]
    fn state_bits_gate_the_signals() {
        let report = extract_last_report(&frame(0x01, (120, 85), (200, 40))).unwrap();
        assert!(report.moving.is_some());
        assert!(report.stationary.is_none());

        let report = extract_last_report(&frame(0x00, (0, 0), (0, 0))).unwrap();
        assert!(report.moving.is_none());
        assert!(report.stationary.is_none());
    }

    #[test]
    fn last_frame_wins_when_stream_buffers() {
        let mut stream = frame(0x01, (300, 50), (0, 0));
        stream.extend_from_slice(&frame(0x01, (90, 95), (0, 0)));
        let report = extract_last_report(&stream).unwrap();
        assert_eq!(report.moving.unwrap().distance_cm, 90);
    }

    #[test]
    fn garbage_prefix_is_skipped() {
        let mut stream = vec![0x00, 0xFF, 0xF4, 0x12];
        stream.extend_from_slice(&frame(0x02, (0, 0), (150, 60)));
        let report = extract_last_report(&stream).unwrap();
        assert_eq!(report.stationary.unwrap().distance_cm, 150);
    }

    #[test]
    fn corrupt_frame_is_malformed() {
        let mut bad = frame(0x01, (120, 85), (0, 0));
        bad[7] = 0xEE; // stomp the head marker
        assert_eq!(
            extract_last_report(&bad),
            Err(SensorError::MalformedFrame)
        );
    }

    #[test]
    fn truncated_stream_is_malformed() {
        let full = frame(0x01, (120, 85), (0, 0));
        assert_eq!(
            extract_last_report(&full[..10]),
            Err(SensorError::MalformedFrame)
        );
    }
}
