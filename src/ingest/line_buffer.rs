use log::warn;

/// Default cap on an unterminated line.
pub const DEFAULT_MAX_LINE_BYTES: usize = 16 * 1024;

/// Accumulates raw stream bytes and hands out complete lines.
///
/// Splitting happens on bytes, so a multi-byte character cut in half by the
/// transport is put back together before decoding. Whatever follows the last
/// `\n` stays buffered until the next chunk.
#[derive(Debug)]
pub struct LineBuffer {
    pending: Vec<u8>,
    max_line_bytes: usize,
    // Set after an overflow; bytes are dropped up to the next newline.
    discarding: bool,
    overflows: u64,
}

impl LineBuffer {
    pub fn new(max_line_bytes: usize) -> Self {
        Self {
            pending: Vec::new(),
            max_line_bytes: max_line_bytes.max(1),
            discarding: false,
            overflows: 0,
        }
    }

    /// Appends a chunk and returns every line it completed, trimmed, with
    /// blank lines removed. A line longer than the limit is dropped whether
    /// it arrives whole or split over several chunks.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            let (head, tail) = rest.split_at(pos);
            rest = &tail[1..];

            if self.discarding {
                self.discarding = false;
                continue;
            }
            let len = self.pending.len() + head.len();
            if len > self.max_line_bytes {
                self.overflow(len);
                continue;
            }
            self.pending.extend_from_slice(head);
            if let Some(line) = self.take_line() {
                lines.push(line);
            }
        }

        if !self.discarding {
            let len = self.pending.len() + rest.len();
            if len > self.max_line_bytes {
                self.overflow(len);
                self.discarding = true;
            } else {
                self.pending.extend_from_slice(rest);
            }
        }

        lines
    }

    /// Bytes waiting for their line terminator.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of lines dropped for exceeding the limit.
    pub fn overflows(&self) -> u64 {
        self.overflows
    }

    fn overflow(&mut self, len: usize) {
        warn!(
            "dropping sensor line of at least {len} bytes (limit {})",
            self.max_line_bytes
        );
        self.pending.clear();
        self.overflows += 1;
    }

    fn take_line(&mut self) -> Option<String> {
        let raw = std::mem::take(&mut self.pending);
        let line = String::from_utf8_lossy(&raw);
        let line = line.trim();
        (!line.is_empty()).then(|| line.to_string())
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_complete_lines_and_keeps_the_remainder() {
        let mut buf = LineBuffer::default();
        let lines = buf.push(b"Temperature = 22.8\nHumidity = 3");
        assert_eq!(lines, vec!["Temperature = 22.8"]);
        assert_eq!(buf.pending_len(), "Humidity = 3".len());

        let lines = buf.push(b"7.0\n");
        assert_eq!(lines, vec!["Humidity = 37.0"]);
        assert_eq!(buf.pending_len(), 0);
    }

    #[test]
    fn trims_and_skips_blank_lines() {
        let mut buf = LineBuffer::default();
        let lines = buf.push(b"  CO2 = 604 \r\n\r\n   \n\nAQI = 3\n");
        assert_eq!(lines, vec!["CO2 = 604", "AQI = 3"]);
    }

    #[test]
    fn reassembles_utf8_split_across_chunks() {
        let text = "Temperature = 22.8°C\n".as_bytes();
        let split = text.iter().position(|&b| b == 0xC2).unwrap() + 1;

        let mut buf = LineBuffer::default();
        assert!(buf.push(&text[..split]).is_empty());
        assert_eq!(buf.push(&text[split..]), vec!["Temperature = 22.8°C"]);
    }

    #[test]
    fn drops_an_overlong_line_up_to_its_newline() {
        let mut buf = LineBuffer::new(8);
        assert!(buf.push(b"0123456789").is_empty());
        assert_eq!(buf.overflows(), 1);
        assert_eq!(buf.pending_len(), 0);

        // tail of the dropped line, then a good one
        let lines = buf.push(b"abc\nAQI = 3\n");
        assert_eq!(lines, vec!["AQI = 3"]);
    }

    #[test]
    fn overlong_line_is_dropped_however_it_is_chunked() {
        let stream = b"0123456789\nAQI = 3\n";

        let mut whole = LineBuffer::new(8);
        assert_eq!(whole.push(stream), vec!["AQI = 3"]);
        assert_eq!(whole.overflows(), 1);

        let mut split = LineBuffer::new(8);
        let mut lines = split.push(&stream[..9]);
        lines.extend(split.push(&stream[9..]));
        assert_eq!(lines, vec!["AQI = 3"]);
        assert_eq!(split.overflows(), 1);
    }

    #[test]
    fn accepted_line_never_exceeds_the_limit() {
        let mut buf = LineBuffer::new(8);
        assert!(buf.push(b"AQI = ").is_empty());
        // completes an 11 byte line from a 6 byte remainder
        assert_eq!(buf.push(b"300.0\nCO2=1\n"), vec!["CO2=1"]);
        assert_eq!(buf.overflows(), 1);
        assert_eq!(buf.pending_len(), 0);
    }

    #[test]
    fn a_line_within_the_limit_is_kept() {
        let mut buf = LineBuffer::new(8);
        assert_eq!(buf.push(b"AQI = 3\n"), vec!["AQI = 3"]);
        assert_eq!(buf.overflows(), 0);
    }
}
