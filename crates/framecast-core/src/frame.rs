//! Frame types.
//!
//! A [`Frame`] is one image capture handed over by the camera capability:
//! an owned byte buffer, a format tag, and the capture timestamp. Ownership
//! transfers to whoever pulled the frame; dropping it is the release.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;

/// Pixel format of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    /// Already JPEG-encoded; can go on the wire as-is.
    Jpeg,
    /// Tightly packed RGB888. Dimensions travel with the tag so the
    /// software encoder needs no side channel.
    Raw { width: u32, height: u32 },
}

impl FrameFormat {
    pub fn is_jpeg(&self) -> bool {
        matches!(self, FrameFormat::Jpeg)
    }
}

/// Capture timestamp as seconds + microseconds since the Unix epoch.
///
/// Renders as `<sec>.<usec>` with the microseconds zero-padded to six
/// digits, the exact form carried in `X-Timestamp` headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTimestamp {
    pub sec: i64,
    /// Always < 1_000_000.
    pub usec: u32,
}

impl FrameTimestamp {
    pub fn new(sec: i64, usec: u32) -> Self {
        debug_assert!(usec < 1_000_000);
        Self { sec, usec }
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        SystemTime::now().into()
    }
}

impl From<SystemTime> for FrameTimestamp {
    fn from(t: SystemTime) -> Self {
        match t.duration_since(UNIX_EPOCH) {
            Ok(d) => Self {
                sec: d.as_secs() as i64,
                usec: d.subsec_micros(),
            },
            // Pre-epoch clocks collapse to zero rather than going negative.
            Err(_) => Self { sec: 0, usec: 0 },
        }
    }
}

impl fmt::Display for FrameTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.sec, self.usec)
    }
}

/// One image capture, raw or JPEG-encoded, with its capture timestamp.
///
/// The buffer is reference-counted (`Bytes`), so handing the payload to a
/// response body and to the snapshot store does not copy pixel data.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Bytes,
    pub format: FrameFormat,
    pub timestamp: FrameTimestamp,
}

impl Frame {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
