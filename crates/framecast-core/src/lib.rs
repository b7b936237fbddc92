//! # framecast-core
//!
//! Core framecast data model and capability surface.
//!
//! This crate provides:
//! - Frame types (buffer, format tag, capture timestamp)
//! - The `CameraPlatform` capability trait the handlers are written against
//! - The rolling-average filter used for FPS telemetry
//!
//! This crate is intentionally runtime-agnostic and contains no async code
//! or I/O, making it usable on both Linux (tokio) and embedded targets.

pub mod capability;
pub mod filter;
pub mod frame;

pub use capability::{CameraPlatform, CaptureError, EncodeError, StorageError};
pub use filter::RollingAverage;
pub use frame::{Frame, FrameFormat, FrameTimestamp};
