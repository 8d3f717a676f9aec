//! # Control Module
//!
//! Turns calibrated channel values into control-loop parameters.
//!
//! This module handles:
//! - Exponential gain scheduling from the gain channels
//! - Discrete flight-mode selection from the mode channel
//! - Goal height and trim, including the fixed landing profile
//! - The sensor/actuator seams the control loop drives
//!
//! The PID arithmetic itself, servo output and raw sensing live behind
//! the [`FlightSensors`] and [`FlightActuators`] traits and are supplied
//! by the hardware integration.

pub mod gains;

use crate::protocol::message::NUM_SAMPLES;

use gains::LoopCommand;

/// Live flight measurements consumed by the control loop.
pub trait FlightSensors {
    /// Current battery reserve in `[0, 1]`
    fn battery_fraction(&mut self) -> f32;

    /// Current 23-value telemetry sample frame
    fn sample_frame(&mut self) -> [f32; NUM_SAMPLES];
}

/// Output side of the control loop.
pub trait FlightActuators {
    /// Apply gains, flight mode, goal height and trim for this tick
    fn apply(&mut self, command: &LoopCommand);
}
