//! ==============================================================================
//! error.rs - error types for each side of the bridge
//! ==============================================================================
//!
//! purpose:
//! keeps the fatal and the recoverable failures apart.
//!
//! - ConfigError:  the config file cannot be used. fatal, before any loop.
//! - IngestError:  the sensor stream could not be opened or ended. fatal.
//! - DisplayError: one REST call to the display failed. logged, skipped.
//!
//! malformed sensor segments are not errors at all, they are recorded as
//! `ParseIssue`s by the parser (see ingest/parser.rs).
//!
//! ==============================================================================

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum IngestError {
    /// Connection could not be established (refused, DNS, TLS, connect timeout).
    #[error("failed to connect to sensor at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("sensor at {url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read sensor stream: {0}")]
    Read(#[source] reqwest::Error),

    /// The stream ended. There is no reconnect, so this ends ingestion.
    #[error("sensor stream closed after {lines} line(s)")]
    Closed { lines: u64 },
}

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("display request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("display at {url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
}
