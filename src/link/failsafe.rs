//! # Failsafe Supervisor
//!
//! Watches link staleness and battery reserve and latches the landing
//! state.
//!
//! Loss of link or low power is treated as unrecoverable for the session:
//! once latched, the kite holds the fixed descent profile until a human
//! power-cycles it. Staleness and low battery are expected operating
//! conditions, never errors, and must never halt the control loop.

use tracing::warn;

use crate::config::FailsafeConfig;

/// One-way landing latch driven by per-tick link and power inputs.
///
/// # Examples
///
/// ```
/// use kite_link::config::FailsafeConfig;
/// use kite_link::link::failsafe::FailsafeSupervisor;
///
/// let mut failsafe = FailsafeSupervisor::new(&FailsafeConfig::default());
///
/// // Healthy link, full battery: no landing
/// assert!(!failsafe.tick(0.5, 0.9, 60.0));
///
/// // Link stale for more than 3 seconds: latch
/// assert!(failsafe.tick(3.1, 0.9, 60.0));
///
/// // Link recovery does not release the latch
/// assert!(failsafe.tick(0.0, 0.9, 61.0));
/// ```
#[derive(Debug)]
pub struct FailsafeSupervisor {
    link_timeout_s: f32,
    battery_floor: f32,
    battery_grace_s: f32,
    landing: bool,
}

impl FailsafeSupervisor {
    /// Build a supervisor from the failsafe policy values.
    #[must_use]
    pub fn new(config: &FailsafeConfig) -> Self {
        Self {
            link_timeout_s: config.link_timeout_s,
            battery_floor: config.battery_floor,
            battery_grace_s: config.battery_grace_s,
            landing: false,
        }
    }

    /// Evaluate one control-loop tick.
    ///
    /// # Arguments
    ///
    /// * `elapsed_s` - Seconds since the last accepted Control frame
    /// * `battery_fraction` - Battery reserve in `[0, 1]`
    /// * `uptime_s` - Session uptime in seconds
    ///
    /// # Returns
    ///
    /// Whether landing is engaged after this tick. The battery condition
    /// only applies after the grace period, so a sensor that reads low
    /// during startup cannot ground the kite on the pad.
    pub fn tick(&mut self, elapsed_s: f32, battery_fraction: f32, uptime_s: f32) -> bool {
        if !self.landing {
            let link_stale = elapsed_s > self.link_timeout_s;
            let power_low =
                battery_fraction < self.battery_floor && uptime_s > self.battery_grace_s;

            if link_stale || power_low {
                self.landing = true;
                warn!(
                    elapsed_s,
                    battery_fraction, uptime_s, "failsafe engaged, landing latched for the session"
                );
            }
        }
        self.landing
    }

    /// Whether the landing latch is set.
    #[must_use]
    pub fn landing(&self) -> bool {
        self.landing
    }
}
