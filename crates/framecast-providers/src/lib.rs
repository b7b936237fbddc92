//! # framecast-providers
//!
//! Capability implementations for framecast:
//! - [`camera`] — a synthetic `CameraPlatform` with a software JPEG encoder
//!   and filesystem snapshot storage, for development and tests
//! - [`air`] — air-quality sensor sources and calibration transforms
//! - [`metrics`] — HTTP push of sensor readings to a metrics endpoint
//!
//! Hardware camera and I2C drivers are external collaborators; these
//! providers cover everything above that line.

pub mod air;
pub mod camera;
pub mod metrics;

pub use air::{
    estimate_ppm, read_with_retry, AirQualitySensor, GasReading, SensorError, SimulatedGasSensor,
};
pub use camera::PatternCamera;
pub use metrics::{run_poller, MetricsClient, MetricsError};
