//! # framecast-protocol
//!
//! The multipart/x-mixed-replace wire format used by the MJPEG stream.
//!
//! This crate defines the boundary constants, the per-part header rendering,
//! and a decoder used by tests to verify streams are wire-exact.

pub mod multipart;

pub use multipart::*;
