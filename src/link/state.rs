//! # Shared Link State
//!
//! Snapshot handoff between the receive path and the control loop.
//!
//! The receive path is the only writer and the control loop the only
//! reader. Updates go through a `tokio::sync::watch` channel carrying a
//! whole [`LinkSnapshot`] value, so the reader always observes the
//! channel values and the receive timestamp as one consistent group and
//! can never see a torn update.

use std::time::Instant;

use tokio::sync::watch;
use tracing::debug;

use crate::link::calibration::{CalibrationUpdate, ChannelCalibration};
use crate::protocol::message::{Message, MessageMode, NUM_CHANNELS};

/// Latest calibrated channel values plus the time of the last accepted
/// Control frame, published as one unit.
#[derive(Debug, Clone, Copy)]
pub struct LinkSnapshot {
    /// Zero-centered channel values from the calibration
    pub channels: [i64; NUM_CHANNELS],
    /// Monotonic time of the last accepted Control frame. Initialized to
    /// session start, so a kite that never hears a controller goes stale
    /// by the same clock.
    pub last_receive: Instant,
}

impl LinkSnapshot {
    /// Snapshot for the start of a session: centered channels, staleness
    /// clock running from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: [0; NUM_CHANNELS],
            last_receive: Instant::now(),
        }
    }

    /// Seconds since the last accepted Control frame.
    #[must_use]
    pub fn elapsed_secs(&self) -> f32 {
        self.last_receive.elapsed().as_secs_f32()
    }
}

impl Default for LinkSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the single-producer/single-consumer snapshot channel.
#[must_use]
pub fn link_channel() -> (watch::Sender<LinkSnapshot>, watch::Receiver<LinkSnapshot>) {
    watch::channel(LinkSnapshot::new())
}

/// Receive-path owner of the calibration and the snapshot sender.
///
/// Consumes decoded messages and publishes updated snapshots. Only
/// Control frames touch the state; Data frames and frames that failed to
/// decode never reset the staleness clock.
#[derive(Debug)]
pub struct LinkUpdater {
    calibration: ChannelCalibration,
    tx: watch::Sender<LinkSnapshot>,
}

impl LinkUpdater {
    /// Wrap the sending half of a [`link_channel`].
    #[must_use]
    pub fn new(tx: watch::Sender<LinkSnapshot>) -> Self {
        Self {
            calibration: ChannelCalibration::new(),
            tx,
        }
    }

    /// Process one decoded message from the transport.
    pub fn ingest(&mut self, msg: &Message) {
        if msg.mode != MessageMode::Control {
            debug!("ignoring non-control frame on kite receive path");
            return;
        }

        let update = self.calibration.apply(&msg.channels);
        let now = Instant::now();

        // Timestamp and channels change together or not at all from the
        // reader's point of view
        self.tx.send_modify(|snapshot| {
            snapshot.last_receive = now;
            if let CalibrationUpdate::Channels(channels) = update {
                snapshot.channels = channels;
            }
        });
    }

    /// Whether the calibration offsets have been seeded yet.
    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_calibrated()
    }
}
