//! Service configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the framecast service.
///
/// The service runs two listeners: the control listener serves the index
/// page and `/capture`; the stream listener serves only `/stream`, so a
/// long-lived streaming connection never starves single-shot requests.
/// By convention the stream listener binds the control port + 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name used in logs.
    pub name: String,
    /// Address of the index/capture listener.
    pub control_addr: SocketAddr,
    /// Address of the stream listener.
    pub stream_addr: SocketAddr,
    /// JPEG quality for software-encoded frames (0-100).
    pub jpeg_quality: u8,
    /// Fixed path overwritten by every `/capture` snapshot.
    pub snapshot_path: PathBuf,
    /// Window size of the FPS smoothing filter.
    pub fps_window: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "framecast".to_string(),
            control_addr: "0.0.0.0:8080".parse().unwrap(),
            stream_addr: "0.0.0.0:8081".parse().unwrap(),
            jpeg_quality: 80,
            snapshot_path: PathBuf::from("capture.jpg"),
            fps_window: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports_are_adjacent() {
        let config = ServiceConfig::default();
        assert_eq!(config.stream_addr.port(), config.control_addr.port() + 1);
        assert_eq!(config.jpeg_quality, 80);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = ServiceConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let loaded: ServiceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.control_addr, config.control_addr);
        assert_eq!(loaded.snapshot_path, config.snapshot_path);
    }
}
