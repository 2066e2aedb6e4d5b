//! ==============================================================================
//! ingest - sensor stream -> sensor cache
//! ==============================================================================
//!
//! purpose:
//!     reads the sensor's endless metadata stream chunk by chunk, cuts it into
//!     lines and publishes every parsed line into the cache.
//!
//! relationships:
//!     - line_buffer.rs: bytes -> trimmed lines
//!     - parser.rs:      line -> formatted metric values
//!     - stream.rs:      the reqwest connection that supplies the chunks
//!     - writes:         cache.rs (sole writer)
//!
//! ==============================================================================

mod line_buffer;
mod parser;
mod stream;

pub use line_buffer::{LineBuffer, DEFAULT_MAX_LINE_BYTES};
pub use parser::{parse_line, ParseIssue, ParsedLine};
pub use stream::SensorStream;

use std::future::Future;

use log::{debug, info, trace, warn};

use crate::cache::SensorCache;
use crate::error::IngestError;

/// Anything that yields the sensor stream one chunk at a time.
///
/// `Ok(None)` means the stream ended.
pub trait ChunkSource {
    fn next_chunk(&mut self) -> impl Future<Output = Result<Option<Vec<u8>>, IngestError>> + Send;
}

/// Owns the line buffer and feeds parsed lines into the cache.
pub struct Ingester {
    cache: SensorCache,
    buffer: LineBuffer,
    show_sensor_data: bool,
    lines: u64,
}

impl Ingester {
    pub fn new(cache: SensorCache, max_line_bytes: usize) -> Self {
        Self {
            cache,
            buffer: LineBuffer::new(max_line_bytes),
            show_sensor_data: false,
            lines: 0,
        }
    }

    /// Logs the whole cache after every applied line.
    pub fn show_sensor_data(mut self, show: bool) -> Self {
        self.show_sensor_data = show;
        self
    }

    /// Non-empty lines seen so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Processes one chunk. Returns the number of lines that updated the cache.
    pub fn feed(&mut self, chunk: &[u8]) -> usize {
        trace!("sensor chunk: {} bytes", chunk.len());
        let mut applied = 0;
        for line in self.buffer.push(chunk) {
            self.lines += 1;
            if self.apply_line(&line) {
                applied += 1;
            }
        }
        applied
    }

    /// Parses one trimmed line and writes its known metrics as one update.
    pub fn apply_line(&self, line: &str) -> bool {
        debug!("sensor line: '{line}'");

        let parsed = parse_line(line);
        let readings = parsed.readings();
        for issue in &parsed.issues {
            warn!("skipping part of sensor line: {issue}");
        }
        if readings.is_empty() {
            return false;
        }

        self.cache.update_many(readings);
        if self.show_sensor_data {
            info!("sensor data: {}", self.cache.snapshot());
        }
        true
    }

    /// Runs until the source fails or ends. Both are fatal: there is no
    /// reconnect, so the error is handed back to the caller.
    pub async fn run<S: ChunkSource>(mut self, mut source: S) -> IngestError {
        loop {
            match source.next_chunk().await {
                Ok(Some(chunk)) => {
                    self.feed(&chunk);
                }
                Ok(None) => {
                    return IngestError::Closed { lines: self.lines };
                }
                Err(e) => return e,
            }
        }
    }
}
