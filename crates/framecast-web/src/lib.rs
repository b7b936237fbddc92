//! # framecast-web
//!
//! HTTP surface for framecast.
//!
//! Two routers over shared state, one per listener:
//! - control: `/` (embedded index page) and `/capture` (single-shot JPEG
//!   with a best-effort snapshot write)
//! - stream: `/stream` (long-lived multipart/x-mixed-replace MJPEG)
//!
//! The split keeps a long-lived streaming connection from starving
//! single-shot requests; within a listener, handlers contend only for the
//! camera itself.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use framecast_web::{control_router, stream_router, ServerState};
//!
//! let state = ServerState::new(platform, config);
//! let control = control_router(state.clone());
//! let stream = stream_router(state);
//! ```

pub mod routes;

pub use routes::{control_router, stream_router};

use std::sync::Arc;

use framecast_core::CameraPlatform;
use framecast_server::ServiceConfig;

/// Shared state for all route handlers.
#[derive(Clone)]
pub struct ServerState {
    /// The injected camera/encoder/storage capability surface.
    pub platform: Arc<dyn CameraPlatform>,
    pub config: Arc<ServiceConfig>,
}

impl ServerState {
    pub fn new(platform: Arc<dyn CameraPlatform>, config: ServiceConfig) -> Self {
        Self {
            platform,
            config: Arc::new(config),
        }
    }
}
