//! Single-shot frame production and snapshot persistence.
//!
//! Both the streaming loop and the `/capture` handler reduce to the same
//! step: pull one frame and end up with JPEG bytes plus the capture
//! timestamp. Raw frames are software-encoded; the raw buffer is consumed by
//! the encoder so at most one raw and one encoded copy ever coexist.

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, error, warn};

use framecast_core::{CameraPlatform, CaptureError, EncodeError, FrameFormat, FrameTimestamp};

/// One JPEG frame ready to go on the wire.
#[derive(Debug, Clone)]
pub struct JpegFrame {
    pub data: Bytes,
    pub timestamp: FrameTimestamp,
}

impl JpegFrame {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Failure to produce a frame. Capture and encode failures are equivalent
/// for callers: there is no frame this iteration and no retry.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Capture one frame and return it as JPEG, encoding if necessary.
///
/// Synchronous core shared by [`produce_jpeg`] and unit tests.
pub fn produce_jpeg_blocking(
    platform: &dyn CameraPlatform,
    quality: u8,
) -> Result<JpegFrame, FrameError> {
    let frame = platform.capture()?;
    let timestamp = frame.timestamp;
    let data = match frame.format {
        FrameFormat::Jpeg => frame.data,
        FrameFormat::Raw { .. } => platform.encode_jpeg(frame, quality)?,
    };
    Ok(JpegFrame { data, timestamp })
}

/// Capture one frame as JPEG, running the blocking capture/encode on the
/// blocking pool. Capture blocks until the sensor signals frame-ready.
pub async fn produce_jpeg(
    platform: &Arc<dyn CameraPlatform>,
    quality: u8,
) -> Result<JpegFrame, FrameError> {
    let platform = Arc::clone(platform);
    match tokio::task::spawn_blocking(move || produce_jpeg_blocking(platform.as_ref(), quality))
        .await
    {
        Ok(result) => result,
        Err(e) => {
            error!("capture task failed: {e}");
            Err(FrameError::Capture(CaptureError::Device(
                "capture task failed".to_string(),
            )))
        }
    }
}

/// Best-effort snapshot write.
///
/// The HTTP response is already committed by the time this runs; a storage
/// failure is logged and goes nowhere else.
pub async fn persist_snapshot(platform: Arc<dyn CameraPlatform>, path: PathBuf, data: Bytes) {
    let logged_path = path.display().to_string();
    let result =
        tokio::task::spawn_blocking(move || platform.persist(&path, &data)).await;
    match result {
        Ok(Ok(())) => debug!(path = %logged_path, "snapshot written"),
        Ok(Err(e)) => warn!(path = %logged_path, "failed to save snapshot: {e}"),
        Err(e) => warn!(path = %logged_path, "snapshot write task failed: {e}"),
    }
}
