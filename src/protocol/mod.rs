//! # Wire Protocol Module
//!
//! Fixed-size binary message exchanged between the ground controller,
//! the kite and the telemetry receiver.
//!
//! This module handles:
//! - The message layout (mode word, 6 control channels, 23 telemetry samples)
//! - Encoding to and decoding from the 120-byte wire frame
//! - Length validation before any payload field is touched

pub mod codec;
pub mod message;
