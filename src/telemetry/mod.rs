//! # Telemetry Module
//!
//! Outgoing telemetry frames and received-telemetry logging.
//!
//! This module handles:
//! - Downsampling outgoing telemetry to bound radio traffic
//! - Formatting received sample frames as JSONL (JSON Lines)
//! - Writing to rotating log files (max N records per file)
//! - Retaining only the last M files

pub mod downsampler;
pub mod logger;
