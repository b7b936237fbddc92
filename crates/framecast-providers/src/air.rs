//! Air-quality sensor sources.
//!
//! Gas sensors on a marginal I2C bus fail sporadically; the firmware answer
//! is a bounded fixed-delay retry around each sample. Calibration stays a
//! pure transform with no state.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// MQ135 analog baseline: raw reading at the base concentration.
pub const MQ135_BASE_VALUE: u16 = 500;
/// Concentration (ppm) at the baseline reading.
pub const MQ135_BASE_PPM: f32 = 0.10;
/// ppm per raw analog count above the baseline.
pub const MQ135_CONVERSION_FACTOR: f32 = 0.0002;

/// Estimate gas concentration from a raw MQ135 analog reading.
pub fn estimate_ppm(raw_analog: u16) -> f32 {
    MQ135_BASE_PPM + (raw_analog as f32 - MQ135_BASE_VALUE as f32) * MQ135_CONVERSION_FACTOR
}

/// Errors from sampling a sensor.
#[derive(Debug, Error)]
pub enum SensorError {
    /// The sensor has not finished warming up or has no fresh measurement.
    #[error("sensor not ready")]
    NotReady,
    /// The bus transaction failed.
    #[error("i2c bus error: {0}")]
    Bus(String),
}

/// One air-quality measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasReading {
    /// Total volatile organic compounds, parts per billion.
    pub tvoc_ppb: u16,
    /// Equivalent CO2, parts per million.
    pub eco2_ppm: u16,
}

/// A pollable air-quality sensor.
pub trait AirQualitySensor: Send {
    fn sample(&mut self) -> Result<GasReading, SensorError>;
}

/// Sample with up to `attempts` tries, sleeping `delay` between failures.
///
/// Returns the first successful reading, or the last error once attempts
/// are exhausted.
pub fn read_with_retry<S: AirQualitySensor + ?Sized>(
    sensor: &mut S,
    attempts: u32,
    delay: Duration,
) -> Result<GasReading, SensorError> {
    let mut last_error = None;
    for attempt in 0..attempts {
        match sensor.sample() {
            Ok(reading) => return Ok(reading),
            Err(e) => {
                debug!("sensor sample attempt {} failed: {e}", attempt + 1);
                last_error = Some(e);
                if attempt + 1 < attempts {
                    std::thread::sleep(delay);
                }
            }
        }
    }
    Err(last_error.unwrap_or(SensorError::NotReady))
}

/// Deterministic sensor for demos and tests: fixed reading, optionally
/// failing the first N samples to exercise the retry path.
pub struct SimulatedGasSensor {
    reading: GasReading,
    failures_left: u32,
}

impl SimulatedGasSensor {
    pub fn new(tvoc_ppb: u16, eco2_ppm: u16) -> Self {
        Self {
            reading: GasReading { tvoc_ppb, eco2_ppm },
            failures_left: 0,
        }
    }

    /// Fail the next `count` samples before succeeding.
    pub fn failing_first(mut self, count: u32) -> Self {
        self.failures_left = count;
        self
    }
}

impl AirQualitySensor for SimulatedGasSensor {
    fn sample(&mut self) -> Result<GasReading, SensorError> {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(SensorError::NotReady);
        }
        Ok(self.reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_ppm_at_baseline() {
        assert!((estimate_ppm(MQ135_BASE_VALUE) - MQ135_BASE_PPM).abs() < 1e-6);
    }

    #[test]
    fn test_estimate_ppm_above_baseline() {
        // 500 counts above baseline at 0.0002 ppm/count.
        assert!((estimate_ppm(1000) - 0.20).abs() < 1e-6);
    }

    #[test]
    fn test_estimate_ppm_below_baseline() {
        assert!(estimate_ppm(0) < MQ135_BASE_PPM);
    }

    #[test]
    fn test_retry_returns_first_success() {
        let mut sensor = SimulatedGasSensor::new(120, 450).failing_first(2);
        let reading = read_with_retry(&mut sensor, 3, Duration::ZERO).unwrap();
        assert_eq!(
            reading,
            GasReading {
                tvoc_ppb: 120,
                eco2_ppm: 450
            }
        );
    }

    #[test]
    fn test_retry_exhausts_attempts() {
        let mut sensor = SimulatedGasSensor::new(120, 450).failing_first(5);
        let err = read_with_retry(&mut sensor, 3, Duration::ZERO).unwrap_err();
        assert!(matches!(err, SensorError::NotReady));
        // Three of the five scripted failures were consumed by the retries.
        assert!(sensor.sample().is_err());
        assert!(sensor.sample().is_err());
        assert!(sensor.sample().is_ok());
    }

    #[test]
    fn test_simulated_sensor_is_stable() {
        let mut sensor = SimulatedGasSensor::new(10, 400);
        assert_eq!(sensor.sample().unwrap(), sensor.sample().unwrap());
    }
}
