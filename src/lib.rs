//! Bridges an air quality sensor's metadata stream to a networked text display.
//!
//! Two tasks share one [`SensorCache`]: the [`Ingester`] writes every parsed
//! line into it, the [`DisplayScheduler`] reads a snapshot per cycle and
//! rotates the enabled metrics on the display.

pub mod cache;
pub mod config;
pub mod display;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod shutdown;

pub use cache::SensorCache;
pub use config::AppConfig;
pub use display::{DisplayClient, DisplayScheduler, NotificationSink, RotationEntry, Timing};
pub use domain::{Metric, MetricValue, SensorSnapshot, NO_DATA};
pub use ingest::{ChunkSource, Ingester, SensorStream};
