//! Parser for the sensor's metadata lines.
//!
//! A line looks like
//! `PM1.0 = 0.1, PM2.5 = 0.3, Temperature = 22.8, Humidity = 37.0, Vaping = 0`.
//! Segments are separated by `,` and split on their first `=`. Bad segments
//! are recorded and skipped, they never discard the rest of the line.

use std::fmt;

use crate::domain::{Metric, MetricValue};

/// Why a segment was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseIssue {
    /// Segment has no `=`.
    MissingSeparator(String),
    /// Known key with nothing after the `=`.
    EmptyValue(Metric),
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseIssue::MissingSeparator(segment) => {
                write!(f, "segment '{segment}' has no '='")
            }
            ParseIssue::EmptyValue(metric) => write!(f, "{metric} has an empty value"),
        }
    }
}

/// Key/value pairs of one line, in the order they were sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLine {
    pub fields: Vec<(String, String)>,
    pub issues: Vec<ParseIssue>,
}

impl ParsedLine {
    /// Known metrics with their formatted values. Unknown keys are dropped
    /// silently; a repeated key keeps its last value.
    pub fn readings(&self) -> Vec<(Metric, MetricValue)> {
        let mut readings: Vec<(Metric, MetricValue)> = Vec::new();
        for (key, raw) in &self.fields {
            let Some(metric) = Metric::from_wire_key(key) else {
                continue;
            };
            let value = metric.format(raw);
            match readings.iter_mut().find(|(m, _)| *m == metric) {
                Some(slot) => slot.1 = value,
                None => readings.push((metric, value)),
            }
        }
        readings
    }
}

/// Splits one line into trimmed key/value pairs. A known key with an empty
/// value is recorded as an issue and left out of `fields`.
pub fn parse_line(line: &str) -> ParsedLine {
    let mut parsed = ParsedLine::default();

    for segment in line.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let Some((key, value)) = segment.split_once('=') else {
            parsed
                .issues
                .push(ParseIssue::MissingSeparator(segment.to_string()));
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        match Metric::from_wire_key(key) {
            Some(metric) if value.is_empty() => {
                parsed.issues.push(ParseIssue::EmptyValue(metric));
            }
            _ => parsed.fields.push((key.to_string(), value.to_string())),
        }
    }

    parsed
}
