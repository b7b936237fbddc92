//! The MJPEG streaming session.
//!
//! One session serves an unbounded sequence of JPEG frames as multipart
//! chunks until the camera stops producing frames or the client goes away.
//! The session is a chunk stream: the transport layer turns it into a
//! chunked response body, and a client disconnect simply drops the stream,
//! releasing whatever buffer was in flight.

use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use tracing::{error, info};

use framecast_core::CameraPlatform;
use framecast_protocol as protocol;

use crate::capture::{produce_jpeg, FrameError};
use crate::config::ServiceConfig;
use crate::session::SessionStats;

/// Per-stream tuning, snapshotted from [`ServiceConfig`] at accept time.
#[derive(Debug, Clone, Copy)]
pub struct StreamOptions {
    pub jpeg_quality: u8,
    pub fps_window: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 80,
            fps_window: 20,
        }
    }
}

impl From<&ServiceConfig> for StreamOptions {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            jpeg_quality: config.jpeg_quality,
            fps_window: config.fps_window,
        }
    }
}

struct StreamSession {
    platform: Arc<dyn CameraPlatform>,
    options: StreamOptions,
    stats: SessionStats,
}

/// Serve frames as multipart chunks until the first failure.
///
/// Each frame yields exactly three chunks: the boundary marker, the part
/// header, and the JPEG payload. A capture or encode failure is logged and
/// ends the stream — with no way to tell a transient camera fault from a
/// permanent one there is no sensible retry, the client must reconnect.
/// The very first failure therefore produces zero body bytes.
pub fn multipart_stream(
    platform: Arc<dyn CameraPlatform>,
    options: StreamOptions,
) -> impl Stream<Item = Result<Bytes, Infallible>> {
    let session = StreamSession {
        platform,
        stats: SessionStats::new(options.fps_window),
        options,
    };

    stream::unfold(session, |mut session| async move {
        let frame = match produce_jpeg(&session.platform, session.options.jpeg_quality).await {
            Ok(frame) => frame,
            Err(FrameError::Capture(e)) => {
                error!("camera capture failed: {e}");
                return None;
            }
            Err(FrameError::Encode(e)) => {
                error!("jpeg compression failed: {e}");
                return None;
            }
        };

        let timing = session.stats.observe();
        info!(
            "MJPG: {}B {}ms ({:.1}fps), AVG: {}ms ({:.1}fps)",
            frame.len(),
            timing.frame_time_ms,
            timing.fps(),
            timing.avg_frame_time_ms,
            timing.avg_fps()
        );

        let header = protocol::part_header(frame.len(), &frame.timestamp);
        let chunks: [Result<Bytes, Infallible>; 3] = [
            Ok(Bytes::from_static(protocol::BOUNDARY.as_bytes())),
            Ok(Bytes::from(header)),
            Ok(frame.data),
        ];
        Some((stream::iter(chunks), session))
    })
    .flatten()
}
