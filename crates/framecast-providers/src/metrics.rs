//! Metrics push client and sensor poller.
//!
//! Readings go out as `application/x-www-form-urlencoded` POSTs of
//! `sensor_id=<id>&data=<value>`, one value per request, matching what the
//! collection endpoint expects. Push failures are logged and the next tick
//! tries again; nothing here is fatal.

use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::air::{read_with_retry, AirQualitySensor, GasReading};

/// Attempts per sample before a tick is skipped.
const SAMPLE_ATTEMPTS: u32 = 3;
/// Delay between sample retries.
const SAMPLE_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Errors from pushing a reading.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metrics transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("metrics endpoint returned status {0}")]
    Status(u16),
}

/// HTTP client for the metrics collection endpoint.
pub struct MetricsClient {
    client: reqwest::Client,
    endpoint: String,
}

impl MetricsClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Post one named value.
    pub async fn post_value(&self, sensor_id: &str, value: &str) -> Result<(), MetricsError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .form(&[("sensor_id", sensor_id), ("data", value)])
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(MetricsError::Status(resp.status().as_u16()))
        }
    }

    /// Post both values of a gas reading.
    pub async fn post_gas_reading(&self, reading: &GasReading) -> Result<(), MetricsError> {
        self.post_value("TVOC", &reading.tvoc_ppb.to_string())
            .await?;
        self.post_value("eCO2", &reading.eco2_ppm.to_string()).await
    }
}

/// Sample `sensor` every `interval` and push each reading.
///
/// Sampling runs on the blocking pool (bus transactions block). A failed
/// sample or push skips the tick; the loop only ends if the blocking task
/// itself dies.
pub async fn run_poller<S>(mut sensor: S, client: MetricsClient, interval: Duration)
where
    S: AirQualitySensor + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;

        let join = tokio::task::spawn_blocking(move || {
            let result = read_with_retry(&mut sensor, SAMPLE_ATTEMPTS, SAMPLE_RETRY_DELAY);
            (sensor, result)
        })
        .await;

        let (returned, result) = match join {
            Ok(pair) => pair,
            Err(e) => {
                error!("sensor task failed: {e}");
                return;
            }
        };
        sensor = returned;

        match result {
            Ok(reading) => {
                info!(
                    "TVOC: {} ppb, eCO2: {} ppm",
                    reading.tvoc_ppb, reading.eco2_ppm
                );
                if let Err(e) = client.post_gas_reading(&reading).await {
                    warn!("failed to push reading: {e}");
                }
            }
            Err(e) => warn!("sensor sample failed: {e}"),
        }
    }
}
