use std::time::Duration;

use log::debug;
use serde::Serialize;

use super::{NotificationSink, TextNotification};
use crate::config::{DisplayConfig, DurationUnit};
use crate::error::DisplayError;

const SIMPLE_PATH: &str = "/config/rest/speaker-display-notification/v1/simple";
const STOP_PATH: &str = "/config/rest/speaker-display-notification/v1/stop";

/// How the text looks on the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    pub text_color: String,
    pub text_size: String,
    pub scroll_direction: String,
    pub scroll_speed: u32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            text_color: "#FFFFFF".to_string(),
            text_size: "medium".to_string(),
            scroll_direction: "fromRightToLeft".to_string(),
            scroll_speed: 0,
        }
    }
}

impl From<&DisplayConfig> for TextStyle {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            text_color: config.text_color.clone(),
            text_size: config.text_size.clone(),
            scroll_direction: config.scroll_direction.clone(),
            scroll_speed: config.scroll_speed,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Envelope<T> {
    data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SimpleNotification<'a> {
    message: &'a str,
    text_color: &'a str,
    text_size: &'a str,
    scroll_direction: &'a str,
    scroll_speed: u32,
    duration: DurationSpec,
}

#[derive(Debug, Serialize)]
struct DurationSpec {
    #[serde(rename = "type")]
    kind: &'static str,
    value: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct Empty {}

/// Body of the "simple" notification request.
pub(crate) fn notification_body<'a>(
    notification: &'a TextNotification,
    style: &'a TextStyle,
    unit: DurationUnit,
) -> Envelope<SimpleNotification<'a>> {
    Envelope {
        data: SimpleNotification {
            message: &notification.message,
            text_color: &style.text_color,
            text_size: &style.text_size,
            scroll_direction: &style.scroll_direction,
            scroll_speed: style.scroll_speed,
            duration: DurationSpec {
                kind: "time",
                value: unit.encode(notification.display_for),
            },
        },
    }
}

/// Body of the stop request: `{"data": {}}`.
pub(crate) fn stop_body() -> Envelope<Empty> {
    Envelope { data: Empty {} }
}

/// REST client for the display's notification API.
#[derive(Clone)]
pub struct DisplayClient {
    http: reqwest::Client,
    base_url: String,
    user: String,
    password: String,
    style: TextStyle,
    unit: DurationUnit,
}

impl DisplayClient {
    pub fn new(config: &DisplayConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            user: config.user.clone(),
            password: config.password.clone(),
            style: TextStyle::from(config),
            unit: config.duration_unit,
        })
    }

    async fn post<B>(&self, path: &str, body: &B) -> Result<(), DisplayError>
    where
        B: Serialize + std::fmt::Debug + Sync,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("sending to display ({url}): {body:?}");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.user, Some(&self.password))
            .json(body)
            .send()
            .await
            .map_err(|source| DisplayError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DisplayError::Status {
                url,
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

impl NotificationSink for DisplayClient {
    async fn show(&self, notification: &TextNotification) -> Result<(), DisplayError> {
        let body = notification_body(notification, &self.style, self.unit);
        self.post(SIMPLE_PATH, &body).await
    }

    async fn clear(&self) -> Result<(), DisplayError> {
        self.post(STOP_PATH, &stop_body()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn notification_body_has_every_field() {
        let n = TextNotification::new("CO2", "604 ppm", Duration::from_secs(5));
        let style = TextStyle::default();
        let body = serde_json::to_value(notification_body(&n, &style, DurationUnit::Seconds)).unwrap();

        assert_eq!(
            body,
            json!({
                "data": {
                    "message": "CO2: 604 ppm",
                    "textColor": "#FFFFFF",
                    "textSize": "medium",
                    "scrollDirection": "fromRightToLeft",
                    "scrollSpeed": 0,
                    "duration": { "type": "time", "value": 5 }
                }
            })
        );
    }

    #[test]
    fn duration_value_follows_the_unit() {
        let n = TextNotification::new("AQI", "3", Duration::from_secs(4));
        let style = TextStyle::default();
        let body =
            serde_json::to_value(notification_body(&n, &style, DurationUnit::Milliseconds)).unwrap();
        assert_eq!(body["data"]["duration"]["value"], 4000);
    }

    #[test]
    fn stop_body_is_empty_data() {
        let body = serde_json::to_value(stop_body()).unwrap();
        assert_eq!(body, json!({ "data": {} }));
    }
}
