//! # Controller Role
//!
//! Broadcasts pilot input frames at the configured packet rate.
//!
//! The first frame after startup carries the power-on marker on
//! channel 0 so a kite already in the air re-seeds its calibration.
//! Raw channel readings come from a [`ControlInputs`] source; the
//! shipped [`NeutralSticks`] source holds every channel at mid-scale
//! until a hardware input implementation is plugged in.

use anyhow::Result;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

use crate::config::Config;
use crate::link::calibration::BootMarker;
use crate::protocol::codec::encode;
use crate::protocol::message::{Message, NUM_CHANNELS};
use crate::transport::{BroadcastTransport, UdpBroadcast};

/// Number of frames between status log messages
const LOG_INTERVAL_FRAMES: u64 = 1000;

/// Mid-scale reading of a 12-bit potentiometer
const NEUTRAL_LEVEL: u32 = 2048;

/// Source of raw pilot input channel values.
pub trait ControlInputs {
    /// Read the current six raw channel values
    fn read_channels(&mut self) -> [u32; NUM_CHANNELS];
}

/// Fixed neutral-stick input source.
///
/// Stands in for the potentiometer bank: every channel reads mid-scale,
/// so the kite sees centered trim and unity gains.
#[derive(Debug, Clone, Copy)]
pub struct NeutralSticks {
    level: u32,
}

impl Default for NeutralSticks {
    fn default() -> Self {
        Self {
            level: NEUTRAL_LEVEL,
        }
    }
}

impl ControlInputs for NeutralSticks {
    fn read_channels(&mut self) -> [u32; NUM_CHANNELS] {
        [self.level; NUM_CHANNELS]
    }
}

/// Run the controller role until Ctrl+C.
pub async fn run(config: Config) -> Result<()> {
    let transport = UdpBroadcast::bind(&config.transport).await?;
    let mut inputs = NeutralSticks::default();
    let mut boot_marker = BootMarker::new();

    let period_ms = 1000 / config.control.packet_rate_hz;
    let mut frame_interval = interval(Duration::from_millis(u64::from(period_ms)));

    info!(
        rate_hz = config.control.packet_rate_hz,
        "starting control frame broadcast loop"
    );

    let mut frame_count: u64 = 0;
    let mut last_log_count: u64 = 0;

    loop {
        tokio::select! {
            _ = frame_interval.tick() => {
                let raw = inputs.read_channels();
                let tagged = boot_marker.tag(raw);
                let frame = encode(&Message::control(tagged));

                if let Err(e) = transport.send(&frame).await {
                    debug!("failed to send control frame: {}", e);
                    continue;
                }

                frame_count += 1;
                if frame_count - last_log_count >= LOG_INTERVAL_FRAMES {
                    info!("sent {} control frames", frame_count);
                    last_log_count = frame_count;
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C, shutting down...");
                info!("total control frames sent: {}", frame_count);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codec::decode;
    use crate::protocol::message::{MessageMode, CALIBRATION_SENTINEL};
    use crate::transport::mocks::MockTransport;

    #[test]
    fn test_neutral_sticks_are_mid_scale() {
        let mut inputs = NeutralSticks::default();
        assert_eq!(inputs.read_channels(), [NEUTRAL_LEVEL; NUM_CHANNELS]);
    }

    #[tokio::test]
    async fn test_first_frame_carries_power_on_marker() {
        let mock = MockTransport::new();
        let mut inputs = NeutralSticks::default();
        let mut boot_marker = BootMarker::new();

        // Two iterations of the send path
        for _ in 0..2 {
            let tagged = boot_marker.tag(inputs.read_channels());
            let frame = encode(&Message::control(tagged));
            mock.send(&frame).await.unwrap();
        }

        let frames = mock.sent_frames();
        let first = decode(&frames[0]).unwrap();
        let second = decode(&frames[1]).unwrap();

        assert_eq!(first.mode, MessageMode::Control);
        assert_eq!(first.channels[0], NEUTRAL_LEVEL + CALIBRATION_SENTINEL);
        assert_eq!(second.channels[0], NEUTRAL_LEVEL);
    }
}
