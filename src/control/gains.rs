//! # Gain Scheduler and Mode Selector
//!
//! Pure per-tick mapping from calibrated channel values to control-loop
//! parameters.
//!
//! ## Gain Mapping
//!
//! Gains are computed as `10^(2 * channel / 3003)`, so a linear
//! potentiometer sweep produces roughly decade-scaled gain sweeps.
//! Negative channel values map to gains below 1; a centered channel maps
//! to exactly 1.
//!
//! ## Mode Selection
//!
//! Flight mode is a plain threshold on channel 5, re-evaluated every
//! tick with no hysteresis. Rapid toggling near the threshold reproduces
//! the observed knob behavior faithfully.

use crate::protocol::message::NUM_CHANNELS;

/// Denominator of the gain and goal-height channel mappings
const CHANNEL_SCALE: f32 = 3003.0;

/// Calibrated channel 5 values above this select glide mode
const GLIDE_THRESHOLD: f32 = -100.0;

/// Goal height held while the landing latch is set, in meters
pub const LANDING_GOAL_HEIGHT: f32 = -5.0;

/// Trim held while the landing latch is set
pub const LANDING_TRIM: f32 = 0.0;

/// Discrete flight mode selected by the mode channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightMode {
    /// Manual glide, ignores orientation hold
    Glide,
    /// Orientation-stabilized hover
    Hover,
}

/// The four scheduled control-loop gains
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlGains {
    /// Proportional gain, yaw axis (channel 0)
    pub p_yaw: f32,
    /// Derivative gain, yaw axis (channel 1)
    pub d_yaw: f32,
    /// Derivative gain, z axis (channel 2)
    pub d_z: f32,
    /// Proportional gain, z axis (channel 3)
    pub p_z: f32,
}

/// Everything the control loop hands to the actuators for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopCommand {
    pub gains: ControlGains,
    pub mode: FlightMode,
    /// Height setpoint in meters
    pub goal_height: f32,
    /// Balancing trim around the y axis, radians (small-angle)
    pub y_axis_trim: f32,
}

/// Map one calibrated channel value to an exponential gain.
///
/// # Examples
///
/// ```
/// use kite_link::control::gains::channel_gain;
///
/// assert!((channel_gain(0.0) - 1.0).abs() < 1e-6);
/// assert!((channel_gain(1501.5) - 10.0).abs() < 1e-4);
/// assert!(channel_gain(-1501.5) < 1.0);
/// ```
#[must_use]
pub fn channel_gain(channel: f32) -> f32 {
    10f32.powf(2.0 * channel / CHANNEL_SCALE)
}

/// Select the flight mode from calibrated channel 5.
#[must_use]
pub fn select_mode(channel5: i64) -> FlightMode {
    if channel5 as f32 > GLIDE_THRESHOLD {
        FlightMode::Glide
    } else {
        FlightMode::Hover
    }
}

/// Compute the control-loop parameters for one tick.
///
/// Stateless and side-effect free; safe to call every tick. While the
/// landing latch is set the goal height and trim are pinned to the fixed
/// landing profile and the live channel values cannot override them.
///
/// # Arguments
///
/// * `channels` - Latest calibrated channel values
/// * `landing` - Landing latch from the failsafe supervisor
#[must_use]
pub fn schedule(channels: &[i64; NUM_CHANNELS], landing: bool) -> LoopCommand {
    let gains = ControlGains {
        p_yaw: channel_gain(channels[0] as f32),
        d_yaw: channel_gain(channels[1] as f32),
        d_z: channel_gain(channels[2] as f32),
        p_z: channel_gain(channels[3] as f32),
    };

    let mode = select_mode(channels[5]);

    let (goal_height, y_axis_trim) = if landing {
        (LANDING_GOAL_HEIGHT, LANDING_TRIM)
    } else {
        (-5.0 - 10.0 * channels[5] as f32 / CHANNEL_SCALE, 0.0)
    };

    LoopCommand {
        gains,
        mode,
        goal_height,
        y_axis_trim,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_channel_gain_is_unity() {
        assert!((channel_gain(0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_decade_gain_sweep() {
        // Half the scale up: one decade
        assert!((channel_gain(1501.5) - 10.0).abs() < 1e-4);
        // Half the scale down: one decade below unity
        assert!((channel_gain(-1501.5) - 0.1).abs() < 1e-5);
        // Full scale: two decades
        assert!((channel_gain(3003.0) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_negative_channels_give_sub_unity_gains() {
        let gain = channel_gain(-500.0);
        assert!(gain > 0.0 && gain < 1.0);
    }

    #[test]
    fn test_gains_assigned_from_first_four_channels() {
        let command = schedule(&[1501, -1501, 0, 3003, 0, 0], false);
        assert!((command.gains.p_yaw - 10.0).abs() < 0.01);
        assert!((command.gains.d_yaw - 0.1).abs() < 0.001);
        assert!((command.gains.d_z - 1.0).abs() < 1e-6);
        assert!((command.gains.p_z - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_mode_threshold() {
        assert_eq!(select_mode(-99), FlightMode::Glide);
        assert_eq!(select_mode(0), FlightMode::Glide);
        assert_eq!(select_mode(-100), FlightMode::Hover);
        assert_eq!(select_mode(-2000), FlightMode::Hover);
    }

    #[test]
    fn test_mode_reevaluated_without_hysteresis() {
        // Alternating around the threshold flips the mode every tick
        assert_eq!(select_mode(-99), FlightMode::Glide);
        assert_eq!(select_mode(-101), FlightMode::Hover);
        assert_eq!(select_mode(-99), FlightMode::Glide);
    }

    #[test]
    fn test_goal_height_follows_channel_five() {
        let command = schedule(&[0, 0, 0, 0, 0, 0], false);
        assert!((command.goal_height - (-5.0)).abs() < 1e-6);

        let command = schedule(&[0, 0, 0, 0, 0, -3003], false);
        assert!((command.goal_height - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_landing_pins_goal_and_trim() {
        // Live channel values cannot override the landing profile
        let command = schedule(&[3003, 3003, 3003, 3003, 3003, -3003], true);
        assert_eq!(command.goal_height, LANDING_GOAL_HEIGHT);
        assert_eq!(command.y_axis_trim, LANDING_TRIM);

        // Gains and mode are still scheduled from the live channels
        assert!((command.gains.p_yaw - 100.0).abs() < 0.01);
        assert_eq!(command.mode, FlightMode::Hover);
    }

    #[test]
    fn test_trim_is_zero_in_normal_flight() {
        let command = schedule(&[0, 0, 0, 0, 0, 500], false);
        assert_eq!(command.y_axis_trim, 0.0);
    }
}
