//! ==============================================================================
//! display - sensor cache -> text display
//! ==============================================================================
//!
//! purpose:
//!     rotates the enabled metrics over a networked text display.
//!
//! relationships:
//!     - scheduler.rs: the per-cycle rotation (sole reader of cache.rs)
//!     - client.rs:    reqwest implementation of NotificationSink
//!
//! ==============================================================================

mod client;
mod scheduler;

pub use client::{DisplayClient, TextStyle};
pub use scheduler::{CycleReport, DisplayScheduler, RotationEntry, Timing, LIVENESS_METRIC};

use std::future::Future;
use std::time::Duration;

use crate::error::DisplayError;

/// Longest message sent to the display, in characters.
pub const MAX_MESSAGE_CHARS: usize = 127;

/// One message to show for a fixed time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNotification {
    pub message: String,
    pub display_for: Duration,
}

impl TextNotification {
    /// Builds `"{label}: {value}"`, cut to `MAX_MESSAGE_CHARS`.
    pub fn new(label: &str, value: &str, display_for: Duration) -> Self {
        let mut message = format!("{label}: {value}");
        if let Some((cut, _)) = message.char_indices().nth(MAX_MESSAGE_CHARS) {
            message.truncate(cut);
        }
        Self {
            message,
            display_for,
        }
    }
}

/// Where the scheduler sends its notifications.
pub trait NotificationSink {
    /// Shows one notification.
    fn show(
        &self,
        notification: &TextNotification,
    ) -> impl Future<Output = Result<(), DisplayError>> + Send;

    /// Removes whatever is on screen.
    fn clear(&self) -> impl Future<Output = Result<(), DisplayError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_label_colon_value() {
        let n = TextNotification::new("Temperature", "22.8°C", Duration::from_secs(5));
        assert_eq!(n.message, "Temperature: 22.8°C");
        assert_eq!(n.display_for, Duration::from_secs(5));
    }

    #[test]
    fn long_message_is_cut_on_a_char_boundary() {
        let value = "µ".repeat(200);
        let n = TextNotification::new("PM1.0", &value, Duration::ZERO);
        assert_eq!(n.message.chars().count(), MAX_MESSAGE_CHARS);
        assert!(n.message.starts_with("PM1.0: µ"));
    }
}
