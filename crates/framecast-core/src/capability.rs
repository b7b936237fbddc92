//! Camera capability surface.
//!
//! The streaming and capture handlers are written against a single injected
//! trait rather than a vendor SDK, so they can be exercised in tests with
//! deterministic fake platforms:
//! - `capture` — pull one frame from the sensor
//! - `encode_jpeg` — software-encode a raw frame
//! - `persist` — write a snapshot to local storage
//!
//! All methods are synchronous to support embedded platforms; async wrappers
//! live at the server layer.

use std::path::Path;

use bytes::Bytes;
use thiserror::Error;

use crate::frame::Frame;

/// Errors from pulling a frame off the sensor.
///
/// The underlying drivers give no way to tell transient from permanent
/// failure, so callers treat any capture error as "no frame this session".
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The driver returned no frame buffer.
    #[error("camera produced no frame")]
    NoFrame,
    /// The device reported an error.
    #[error("camera device error: {0}")]
    Device(String),
}

/// Errors from software JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The frame's format tag is not one the encoder accepts.
    #[error("unsupported source format for jpeg encoding")]
    UnsupportedFormat,
    /// The buffer does not match the dimensions in the format tag.
    #[error("frame buffer length {len} does not match {width}x{height} RGB888")]
    BufferMismatch {
        len: usize,
        width: u32,
        height: u32,
    },
    #[error("jpeg encoder failed: {0}")]
    Encoder(String),
}

/// Errors from persisting a snapshot.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The vendor capability surface: sensor, software encoder, and snapshot
/// storage behind one injected interface.
///
/// `capture` may block until the next frame is ready; the server layer runs
/// it on the blocking pool. The hardware is a single peripheral, so
/// implementations serialize captures internally and callers hold at most
/// one outstanding [`Frame`] at a time.
///
/// `encode_jpeg` consumes the raw frame: once it returns, only the encoded
/// copy remains, bounding peak memory to one raw plus one encoded buffer.
pub trait CameraPlatform: Send + Sync {
    /// Pull one frame from the sensor.
    fn capture(&self) -> Result<Frame, CaptureError>;

    /// Encode a raw frame to JPEG at the given quality (0-100).
    fn encode_jpeg(&self, frame: Frame, quality: u8) -> Result<Bytes, EncodeError>;

    /// Write snapshot bytes to `path`, overwriting any previous snapshot.
    fn persist(&self, path: &Path, data: &[u8]) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FrameFormat, FrameTimestamp};

    /// Minimal in-memory platform proving the trait is object-safe and
    /// usable behind `Arc<dyn CameraPlatform>`.
    struct NullPlatform;

    impl CameraPlatform for NullPlatform {
        fn capture(&self) -> Result<Frame, CaptureError> {
            Ok(Frame {
                data: Bytes::from_static(b"\xff\xd8\xff\xd9"),
                format: FrameFormat::Jpeg,
                timestamp: FrameTimestamp::new(0, 0),
            })
        }

        fn encode_jpeg(&self, _frame: Frame, _quality: u8) -> Result<Bytes, EncodeError> {
            Err(EncodeError::UnsupportedFormat)
        }

        fn persist(&self, _path: &Path, _data: &[u8]) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_trait_is_object_safe() {
        let platform: std::sync::Arc<dyn CameraPlatform> = std::sync::Arc::new(NullPlatform);
        let frame = platform.capture().unwrap();
        assert!(frame.format.is_jpeg());
        assert!(platform.encode_jpeg(frame, 80).is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(CaptureError::NoFrame.to_string(), "camera produced no frame");
        let e = EncodeError::BufferMismatch {
            len: 10,
            width: 4,
            height: 4,
        };
        assert_eq!(
            e.to_string(),
            "frame buffer length 10 does not match 4x4 RGB888"
        );
    }
}
