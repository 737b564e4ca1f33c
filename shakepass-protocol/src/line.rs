//! Line framing for the serial link.
//!
//! Line format:
//! - PAYLOAD (1-64 bytes): printable text, no `\n`
//! - TERMINATOR: `\n`, optionally preceded by `\r`
//!
//! A line that exceeds [`MAX_LINE_LEN`] is reported once and then skipped
//! up to the next terminator, so one corrupt burst cannot desynchronise the
//! following lines.

use heapless::Vec;

/// Line terminator
pub const LINE_END: u8 = b'\n';

/// Maximum line length in bytes, excluding the terminator
pub const MAX_LINE_LEN: usize = 64;

/// A complete line as received, terminator removed
pub type Line = Vec<u8, MAX_LINE_LEN>;

/// Errors that can occur while assembling lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded the maximum length and is being discarded
    Overflow,
}

/// Accumulates bytes into newline-terminated lines
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    buffer: Line,
    discarding: bool,
}

impl LineBuffer {
    /// Create an empty line buffer
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
        }
    }

    /// Drop any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Number of bytes waiting for a terminator
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a terminator completes a non-empty line,
    /// `Ok(None)` when more bytes are needed, or `Err` the moment a line
    /// overflows.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        if byte == LINE_END {
            if self.discarding {
                self.reset();
                return Ok(None);
            }

            let mut line = core::mem::take(&mut self.buffer);
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if line.is_empty() {
                return Ok(None);
            }
            return Ok(Some(line));
        }

        if self.discarding {
            return Ok(None);
        }

        if self.buffer.push(byte).is_err() {
            self.buffer.clear();
            self.discarding = true;
            return Err(LineError::Overflow);
        }

        Ok(None)
    }

    /// Feed a chunk of bytes, handing every completed line (or overflow) to
    /// `on_line` in arrival order
    pub fn feed_bytes<F>(&mut self, bytes: &[u8], mut on_line: F)
    where
        F: FnMut(Result<Line, LineError>),
    {
        for &byte in bytes {
            match self.feed(byte) {
                Ok(Some(line)) => on_line(Ok(line)),
                Ok(None) => {}
                Err(e) => on_line(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(buffer: &mut LineBuffer, bytes: &[u8]) -> std::vec::Vec<Result<Line, LineError>> {
        let mut out = std::vec::Vec::new();
        buffer.feed_bytes(bytes, |r| out.push(r));
        out
    }

    #[test]
    fn test_single_line() {
        let mut buffer = LineBuffer::new();
        let lines = collect(&mut buffer, b"GEN\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_ref().unwrap().as_slice(), b"GEN");
        assert_eq!(buffer.pending(), 0);
    }

    #[test]
    fn test_crlf_is_stripped() {
        let mut buffer = LineBuffer::new();
        let lines = collect(&mut buffer, b"EV:PRE\r\n");
        assert_eq!(lines[0].as_ref().unwrap().as_slice(), b"EV:PRE");
    }

    #[test]
    fn test_split_across_chunks() {
        let mut buffer = LineBuffer::new();
        assert!(collect(&mut buffer, b"S:10,1,").is_empty());
        assert_eq!(buffer.pending(), 7);
        let lines = collect(&mut buffer, b"2,3,-1\nPW:");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_ref().unwrap().as_slice(), b"S:10,1,2,3,-1");
        assert_eq!(buffer.pending(), 3);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let mut buffer = LineBuffer::new();
        let lines = collect(&mut buffer, b"\n\r\n\nLAST\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_ref().unwrap().as_slice(), b"LAST");
    }

    #[test]
    fn test_overflow_resyncs_on_next_line() {
        let mut buffer = LineBuffer::new();
        let mut data = std::vec::Vec::new();
        data.extend(core::iter::repeat(b'x').take(MAX_LINE_LEN + 10));
        data.extend_from_slice(b"\nGEN\n");

        let lines = collect(&mut buffer, &data);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], Err(LineError::Overflow));
        assert_eq!(lines[1].as_ref().unwrap().as_slice(), b"GEN");
    }

    #[test]
    fn test_exact_max_length_fits() {
        let mut buffer = LineBuffer::new();
        let mut data = std::vec::Vec::new();
        data.extend(core::iter::repeat(b'a').take(MAX_LINE_LEN));
        data.push(b'\n');

        let lines = collect(&mut buffer, &data);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_ref().unwrap().len(), MAX_LINE_LEN);
    }

    #[test]
    fn test_reset_drops_partial() {
        let mut buffer = LineBuffer::new();
        let _ = collect(&mut buffer, b"PW:abc");
        buffer.reset();
        let lines = collect(&mut buffer, b"LAST\n");
        assert_eq!(lines[0].as_ref().unwrap().as_slice(), b"LAST");
    }
}
