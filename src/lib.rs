//! # Kite Link Library
//!
//! Broadcast control/telemetry link and failsafe supervisor for an
//! autonomous kite.
//!
//! This library provides the wire protocol shared by the ground
//! controller, the kite and the telemetry receiver, the calibration
//! handshake that zero-centers raw channel readings, the failsafe
//! supervisor that forces a safe landing on link loss or low battery,
//! and the gain scheduling that turns channel values into control-loop
//! parameters.

pub mod config;
pub mod control;
pub mod error;
pub mod link;
pub mod protocol;
pub mod roles;
pub mod telemetry;
pub mod transport;
