//! Fuzz target: `LineDecoder::feed`
//!
//! Drives arbitrary byte sequences into the newline splitter and asserts
//! that it never panics, never yields an empty or over-long line, and
//! accepts input cleanly again after a reset.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use livelamp::gateway::codec::{LineDecoder, MAX_LINE};

fuzz_target!(|data: &[u8]| {
    let mut decoder = LineDecoder::new();

    decoder.feed(data, |line| {
        assert!(line.len() <= MAX_LINE, "line exceeds MAX_LINE");
        assert!(!line.is_empty(), "decoder must not yield empty lines");
        assert!(!line.contains(&b'\n'));
        assert!(!line.contains(&b'\r'));
    });

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    decoder.feed(data, |_| {});
});
