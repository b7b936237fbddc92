//! # framecast-server
//!
//! Streaming and single-shot capture sessions over an injected
//! [`CameraPlatform`](framecast_core::CameraPlatform).
//!
//! This crate owns the per-connection logic:
//! - the MJPEG streaming loop ([`stream::multipart_stream`])
//! - single-shot JPEG production ([`capture::produce_jpeg`]) and best-effort
//!   snapshot persistence ([`capture::persist_snapshot`])
//! - per-session FPS telemetry ([`session::SessionStats`])
//!
//! Transport concerns (routing, headers, listeners) live in `framecast-web`.

pub mod capture;
pub mod config;
pub mod session;
pub mod stream;

pub use capture::{persist_snapshot, produce_jpeg, FrameError, JpegFrame};
pub use config::ServiceConfig;
pub use session::SessionStats;
pub use stream::{multipart_stream, StreamOptions};
