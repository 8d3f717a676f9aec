//! # Calibration Module
//!
//! Establishes per-channel zero offsets so raw potentiometer readings
//! become zero-centered trim and gain values.
//!
//! ## Handshake
//!
//! The controller adds [`CALIBRATION_SENTINEL`] to channel 0 of the very
//! first frame it sends after power-on. A kite that sees a channel 0
//! value at or above the sentinel re-seeds all six offsets from that
//! frame, so a controller power-cycled mid-flight re-establishes a fresh
//! zero point without the kite rebooting. A kite that boots first, and
//! never sees the sentinel, seeds its offsets from the first frame it
//! receives instead.
//!
//! Once seeded, offsets persist for the rest of the session. Each later
//! frame publishes `calibrated[i] = raw[i] - offset[i]`.

use tracing::info;

use crate::protocol::message::{CALIBRATION_SENTINEL, NUM_CHANNELS};

/// Outcome of feeding one accepted Control frame into the calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationUpdate {
    /// Offsets were (re-)seeded from this frame; no channel values are
    /// published for this cycle.
    Recalibrated,
    /// Zero-centered channel values ready for the control loop.
    Channels([i64; NUM_CHANNELS]),
}

/// Kite-side calibration state machine.
///
/// Starts uninitialized and becomes calibrated on the first accepted
/// Control frame; re-enters the calibrated state whenever the sentinel
/// announces a controller power-cycle.
///
/// # Examples
///
/// ```
/// use kite_link::link::calibration::{CalibrationUpdate, ChannelCalibration};
///
/// let mut cal = ChannelCalibration::new();
///
/// // First frame seeds the offsets
/// assert_eq!(cal.apply(&[10, 0, 0, 0, 0, 0]), CalibrationUpdate::Recalibrated);
///
/// // Later frames publish zero-centered values
/// assert_eq!(
///     cal.apply(&[15, 0, 0, 0, 0, 0]),
///     CalibrationUpdate::Channels([5, 0, 0, 0, 0, 0])
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ChannelCalibration {
    offsets: [i64; NUM_CHANNELS],
    first_time: bool,
}

impl Default for ChannelCalibration {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelCalibration {
    /// Creates an uninitialized calibration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            offsets: [0; NUM_CHANNELS],
            first_time: true,
        }
    }

    /// Whether the offsets have been seeded.
    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        !self.first_time
    }

    /// Current per-channel offsets.
    #[must_use]
    pub fn offsets(&self) -> [i64; NUM_CHANNELS] {
        self.offsets
    }

    /// Feed one accepted Control frame through the calibration.
    ///
    /// Exactly one of three branches applies per frame:
    ///
    /// 1. Channel 0 carries the sentinel: the controller just powered on.
    ///    Re-seed all offsets (channel 0 minus the sentinel, the rest
    ///    verbatim). This branch always wins, even if already calibrated.
    /// 2. First frame ever without the sentinel: the kite booted after
    ///    the controller. Seed all offsets verbatim.
    /// 3. Normal operation: publish zero-centered channel values.
    ///
    /// A frame that seeds offsets never also publishes channel values in
    /// the same cycle.
    pub fn apply(&mut self, raw: &[u32; NUM_CHANNELS]) -> CalibrationUpdate {
        if raw[0] >= CALIBRATION_SENTINEL {
            self.offsets[0] = i64::from(raw[0] - CALIBRATION_SENTINEL);
            for i in 1..NUM_CHANNELS {
                self.offsets[i] = i64::from(raw[i]);
            }
            self.first_time = false;
            info!("controller power-on detected, calibration offsets re-seeded");
            CalibrationUpdate::Recalibrated
        } else if self.first_time {
            for i in 0..NUM_CHANNELS {
                self.offsets[i] = i64::from(raw[i]);
            }
            self.first_time = false;
            info!("calibration offsets seeded from first received frame");
            CalibrationUpdate::Recalibrated
        } else {
            let mut calibrated = [0i64; NUM_CHANNELS];
            for i in 0..NUM_CHANNELS {
                calibrated[i] = i64::from(raw[i]) - self.offsets[i];
            }
            CalibrationUpdate::Channels(calibrated)
        }
    }
}

/// Controller-side power-on marker.
///
/// Tags channel 0 of the first outgoing frame with the sentinel so the
/// kite can detect a controller power-cycle mid-flight. One-shot: it is
/// not re-armed until the process restarts.
#[derive(Debug, Clone)]
pub struct BootMarker {
    armed: bool,
}

impl Default for BootMarker {
    fn default() -> Self {
        Self::new()
    }
}

impl BootMarker {
    /// Creates an armed marker; the next [`tag`](Self::tag) fires it.
    #[must_use]
    pub fn new() -> Self {
        Self { armed: true }
    }

    /// Tag an outgoing channel set.
    ///
    /// Adds the sentinel to channel 0 on the first call only; every
    /// subsequent call returns the channels unmodified.
    pub fn tag(&mut self, mut channels: [u32; NUM_CHANNELS]) -> [u32; NUM_CHANNELS] {
        if self.armed {
            channels[0] += CALIBRATION_SENTINEL;
            self.armed = false;
        }
        channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_uninitialized() {
        let cal = ChannelCalibration::new();
        assert!(!cal.is_calibrated());
        assert_eq!(cal.offsets(), [0; NUM_CHANNELS]);
    }

    #[test]
    fn test_sentinel_seeds_offsets() {
        let mut cal = ChannelCalibration::new();
        let update = cal.apply(&[1_000_500, 10, 20, 30, 40, 50]);

        assert_eq!(update, CalibrationUpdate::Recalibrated);
        assert!(cal.is_calibrated());
        assert_eq!(cal.offsets(), [500, 10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_sentinel_wins_over_calibrated_state() {
        let mut cal = ChannelCalibration::new();
        cal.apply(&[100, 100, 100, 100, 100, 100]);
        assert!(cal.is_calibrated());

        // Controller power-cycled mid-flight: offsets are replaced, not
        // subtracted from
        let update = cal.apply(&[1_000_500, 1, 2, 3, 4, 5]);
        assert_eq!(update, CalibrationUpdate::Recalibrated);
        assert_eq!(cal.offsets(), [500, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sentinel_at_exact_threshold() {
        let mut cal = ChannelCalibration::new();
        let update = cal.apply(&[CALIBRATION_SENTINEL, 0, 0, 0, 0, 0]);
        assert_eq!(update, CalibrationUpdate::Recalibrated);
        assert_eq!(cal.offsets()[0], 0);
    }

    #[test]
    fn test_first_frame_without_sentinel_seeds_offsets() {
        let mut cal = ChannelCalibration::new();
        let update = cal.apply(&[2048, 2000, 1500, 1000, 500, 0]);

        assert_eq!(update, CalibrationUpdate::Recalibrated);
        assert_eq!(cal.offsets(), [2048, 2000, 1500, 1000, 500, 0]);
    }

    #[test]
    fn test_calibrated_frames_publish_centered_values() {
        let mut cal = ChannelCalibration::new();
        cal.apply(&[10, 0, 0, 0, 0, 0]);

        let update = cal.apply(&[15, 0, 0, 0, 0, 0]);
        assert_eq!(update, CalibrationUpdate::Channels([5, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn test_calibrated_values_can_go_negative() {
        let mut cal = ChannelCalibration::new();
        cal.apply(&[2048, 2048, 2048, 2048, 2048, 2048]);

        let update = cal.apply(&[1048, 2048, 3048, 2048, 2048, 0]);
        assert_eq!(
            update,
            CalibrationUpdate::Channels([-1000, 0, 1000, 0, 0, -2048])
        );
    }

    #[test]
    fn test_seeding_frame_never_publishes() {
        let mut cal = ChannelCalibration::new();

        // Neither seeding branch produces channel values in the same cycle
        assert!(matches!(
            cal.apply(&[1_000_000, 0, 0, 0, 0, 0]),
            CalibrationUpdate::Recalibrated
        ));
        assert!(matches!(
            cal.apply(&[1_000_000, 0, 0, 0, 0, 0]),
            CalibrationUpdate::Recalibrated
        ));
    }

    #[test]
    fn test_boot_marker_fires_once() {
        let mut marker = BootMarker::new();

        let first = marker.tag([100, 200, 300, 400, 500, 600]);
        assert_eq!(first[0], 100 + CALIBRATION_SENTINEL);
        assert_eq!(&first[1..], &[200, 300, 400, 500, 600]);

        let second = marker.tag([100, 200, 300, 400, 500, 600]);
        assert_eq!(second, [100, 200, 300, 400, 500, 600]);

        let third = marker.tag([0; NUM_CHANNELS]);
        assert_eq!(third, [0; NUM_CHANNELS]);
    }

    #[test]
    fn test_boot_marker_round_trips_through_calibration() {
        let mut marker = BootMarker::new();
        let mut cal = ChannelCalibration::new();

        // Controller's first frame seeds the kite with offset 500 on
        // channel 0
        let tagged = marker.tag([500, 0, 0, 0, 0, 0]);
        cal.apply(&tagged);
        assert_eq!(cal.offsets()[0], 500);

        // Steady-state frames come out centered on zero
        let update = cal.apply(&marker.tag([500, 0, 0, 0, 0, 0]));
        assert_eq!(update, CalibrationUpdate::Channels([0; NUM_CHANNELS]));
    }
}
