//! HTTP route handlers.
//!
//! Response headers mirror the firmware handlers this service replaces:
//! stills carry `X-Timestamp` and an inline `Content-Disposition`; the
//! stream response advertises the fixed multipart boundary and allows
//! cross-origin embedding.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::error;

use framecast_protocol as protocol;
use framecast_server::{multipart_stream, persist_snapshot, produce_jpeg, StreamOptions};

use crate::ServerState;

/// The index page, gzip-compressed at build time.
static INDEX_HTML_GZ: &[u8] = include_bytes!("../assets/index.html.gz");

/// Router for the control listener: index page and single-shot capture.
pub fn control_router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/capture", get(capture_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router for the stream listener: the MJPEG endpoint only.
pub fn stream_router(state: ServerState) -> Router {
    Router::new()
        .route("/stream", get(stream_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler for `/`: the compiled-in, pre-gzipped index page.
async fn index_handler() -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html")
        .header(header::CONTENT_ENCODING, "gzip")
        .body(Body::from(INDEX_HTML_GZ))
        .unwrap()
}

/// Handler for `/capture`: one frame as the response body, plus a detached
/// best-effort snapshot write.
async fn capture_handler(State(state): State<ServerState>) -> Response {
    let frame = match produce_jpeg(&state.platform, state.config.jpeg_quality).await {
        Ok(frame) => frame,
        Err(e) => {
            error!("capture failed: {e}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // The response is committed first; persistence runs detached and its
    // failure never reaches the client. The payload clone is a refcount
    // bump, not a copy.
    tokio::spawn(persist_snapshot(
        Arc::clone(&state.platform),
        state.config.snapshot_path.clone(),
        frame.data.clone(),
    ));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/jpeg")
        .header(header::CONTENT_DISPOSITION, "inline; filename=capture.jpg")
        .header("X-Timestamp", frame.timestamp.to_string())
        .body(Body::from(frame.data))
        .unwrap()
}

/// Handler for `/stream`: hands the connection to a streaming session.
async fn stream_handler(State(state): State<ServerState>) -> Response {
    let stream = multipart_stream(
        Arc::clone(&state.platform),
        StreamOptions::from(state.config.as_ref()),
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, protocol::STREAM_CONTENT_TYPE)
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header("X-Framerate", "60")
        .body(Body::from_stream(stream))
        .unwrap()
}
