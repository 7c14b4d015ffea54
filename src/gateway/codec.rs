//! Newline-delimited request codec.
//!
//! Wire format: one JSON request envelope per line. Both `\n` and
//! `\r` act as terminators, so LF, CRLF and bare-CR clients all work
//! and yielded lines never contain either control byte (a CRLF pair
//! produces one line plus an empty one, which is skipped).
//!
//! The decoder accumulates incoming bytes and yields complete lines.
//! This handles partial reads gracefully — a single `Transport::read`
//! may return part of a line, or several lines concatenated. Lines
//! longer than [`MAX_LINE`] are discarded up to the next terminator
//! rather than truncated, so a runaway client cannot smuggle a prefix
//! of one request into the next.

/// Maximum request line length (protects against memory exhaustion).
pub const MAX_LINE: usize = 512;

/// Streaming line decoder.
pub struct LineDecoder {
    buf: [u8; MAX_LINE],
    len: usize,
    /// Set while discarding an overlong line.
    overflowed: bool,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            buf: [0; MAX_LINE],
            len: 0,
            overflowed: false,
        }
    }

    /// Feed bytes into the decoder, invoking `on_line` once per complete
    /// line (terminator stripped, empty lines skipped).
    pub fn feed(&mut self, data: &[u8], mut on_line: impl FnMut(&[u8])) {
        for &byte in data {
            if byte == b'\n' || byte == b'\r' {
                if !self.overflowed {
                    let line = &self.buf[..self.len];
                    if !line.is_empty() {
                        on_line(line);
                    }
                }
                self.len = 0;
                self.overflowed = false;
                continue;
            }

            if self.overflowed {
                continue;
            }
            if self.len == MAX_LINE {
                self.overflowed = true;
                continue;
            }
            self.buf[self.len] = byte;
            self.len += 1;
        }
    }

    /// Reset decoder state (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.len = 0;
        self.overflowed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(decoder: &mut LineDecoder, data: &[u8]) -> Vec<Vec<u8>> {
        let mut lines = Vec::new();
        decoder.feed(data, |line| lines.push(line.to_vec()));
        lines
    }

    #[test]
    fn single_line() {
        let mut d = LineDecoder::new();
        let lines = collect(&mut d, b"{\"method\":\"GET\"}\n");
        assert_eq!(lines, vec![b"{\"method\":\"GET\"}".to_vec()]);
    }

    #[test]
    fn line_split_across_reads() {
        let mut d = LineDecoder::new();
        assert!(collect(&mut d, b"{\"met").is_empty());
        let lines = collect(&mut d, b"hod\":\"GET\"}\n");
        assert_eq!(lines, vec![b"{\"method\":\"GET\"}".to_vec()]);
    }

    #[test]
    fn multiple_lines_in_one_read() {
        let mut d = LineDecoder::new();
        let lines = collect(&mut d, b"one\ntwo\nthr");
        assert_eq!(lines, vec![b"one".to_vec(), b"two".to_vec()]);
        let lines = collect(&mut d, b"ee\n");
        assert_eq!(lines, vec![b"three".to_vec()]);
    }

    #[test]
    fn crlf_and_blank_lines() {
        let mut d = LineDecoder::new();
        let lines = collect(&mut d, b"req\r\n\r\n\n");
        assert_eq!(lines, vec![b"req".to_vec()]);
    }

    #[test]
    fn bare_cr_terminates_a_line() {
        let mut d = LineDecoder::new();
        let lines = collect(&mut d, b"a\rb\n");
        assert_eq!(lines, vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn overlong_line_discarded_whole() {
        let mut d = LineDecoder::new();
        let long = vec![b'x'; MAX_LINE + 10];
        assert!(collect(&mut d, &long).is_empty());
        // Terminating the runaway line yields nothing, not a prefix.
        assert!(collect(&mut d, b"tail\n").is_empty());
        // The decoder recovers for the next line.
        let lines = collect(&mut d, b"ok\n");
        assert_eq!(lines, vec![b"ok".to_vec()]);
    }

    #[test]
    fn exactly_max_line_is_accepted() {
        let mut d = LineDecoder::new();
        let mut data = vec![b'y'; MAX_LINE];
        data.push(b'\n');
        let lines = collect(&mut d, &data);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), MAX_LINE);
    }
}
