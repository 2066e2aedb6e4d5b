use std::time::Duration;

use log::info;

use super::ChunkSource;
use crate::config::SensorConfig;
use crate::error::IngestError;

/// Open HTTP response carrying the sensor's metadata stream.
pub struct SensorStream {
    url: String,
    response: reqwest::Response,
}

impl SensorStream {
    /// Connects and checks the status. Only the connect phase has a timeout,
    /// the body is read for as long as the sensor keeps sending.
    pub async fn connect(config: &SensorConfig) -> Result<Self, IngestError> {
        let url = config.url();
        let connect_error = |source| IngestError::Connect {
            url: url.clone(),
            source,
        };

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(connect_error)?;

        info!("connecting to sensor at {url} as '{}'", config.user);
        let response = client
            .get(&url)
            .basic_auth(&config.user, Some(&config.password))
            .send()
            .await
            .map_err(connect_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Status {
                url,
                status: status.as_u16(),
            });
        }
        info!("sensor stream open (HTTP {})", status.as_u16());

        Ok(Self { url, response })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ChunkSource for SensorStream {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, IngestError> {
        let chunk = self.response.chunk().await.map_err(IngestError::Read)?;
        Ok(chunk.map(|bytes| bytes.to_vec()))
    }
}
