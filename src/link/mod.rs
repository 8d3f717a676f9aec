//! # Link Module
//!
//! Receive-side state for the control link.
//!
//! This module handles:
//! - Per-channel calibration offsets established from the first frames
//! - The controller-side power-on marker on the first outgoing frame
//! - The shared snapshot handed from the receive path to the control loop
//! - The failsafe supervisor watching link staleness and battery reserve

pub mod calibration;
pub mod failsafe;
pub mod state;
