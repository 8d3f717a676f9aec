//! # Telemetry Downsampler
//!
//! Bounds outgoing telemetry traffic with a configurable omission budget.
//!
//! With a budget of `n`, every `n + 1`th call to
//! [`maybe_send`](TelemetryDownsampler::maybe_send) actually transmits
//! and the rest are skipped. The default budget of 0 sends on every call.

use tracing::warn;

use crate::protocol::codec::encode;
use crate::protocol::message::{Message, NUM_SAMPLES};
use crate::transport::BroadcastTransport;

/// Omission-budgeted sender for Data frames.
#[derive(Debug)]
pub struct TelemetryDownsampler {
    budget: u32,
    counter: u32,
}

impl TelemetryDownsampler {
    /// Create a downsampler skipping `budget` sends between transmissions.
    #[must_use]
    pub fn new(budget: u32) -> Self {
        Self { budget, counter: 0 }
    }

    /// Offer one sample frame for transmission.
    ///
    /// Skips while the omission counter is below the budget; otherwise
    /// resets the counter, builds a Data frame with zero-filled channels
    /// and hands it to the transport. A transport failure is logged and
    /// swallowed: telemetry is perishable and is never retried.
    ///
    /// # Returns
    ///
    /// Whether a transmission was attempted on this call.
    pub async fn maybe_send<T: BroadcastTransport + ?Sized>(
        &mut self,
        transport: &T,
        samples: &[f32; NUM_SAMPLES],
    ) -> bool {
        if self.counter < self.budget {
            self.counter += 1;
            return false;
        }
        self.counter = 0;

        let frame = encode(&Message::data(*samples));
        if let Err(e) = transport.send(&frame).await {
            warn!("telemetry send failed: {}", e);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codec::decode;
    use crate::protocol::message::{MessageMode, NUM_CHANNELS};
    use crate::transport::mocks::MockTransport;

    #[test]
    fn test_zero_budget_sends_every_call() {
        tokio_test::block_on(async {
            let mock = MockTransport::new();
            let mut downsampler = TelemetryDownsampler::new(0);

            for _ in 0..5 {
                assert!(downsampler.maybe_send(&mock, &[0.0; NUM_SAMPLES]).await);
            }
            assert_eq!(mock.sent_frames().len(), 5);
        });
    }

    #[test]
    fn test_budget_two_sends_every_third_call() {
        tokio_test::block_on(async {
            let mock = MockTransport::new();
            let mut downsampler = TelemetryDownsampler::new(2);

            assert!(!downsampler.maybe_send(&mock, &[0.0; NUM_SAMPLES]).await);
            assert!(!downsampler.maybe_send(&mock, &[0.0; NUM_SAMPLES]).await);
            assert!(downsampler.maybe_send(&mock, &[0.0; NUM_SAMPLES]).await);
            // Cycle restarts: the fourth call skips again
            assert!(!downsampler.maybe_send(&mock, &[0.0; NUM_SAMPLES]).await);

            assert_eq!(mock.sent_frames().len(), 1);
        });
    }

    #[test]
    fn test_sent_frame_is_data_mode_with_zero_channels() {
        tokio_test::block_on(async {
            let mock = MockTransport::new();
            let mut downsampler = TelemetryDownsampler::new(0);

            let mut samples = [0.0f32; NUM_SAMPLES];
            samples[0] = 9.75;
            samples[22] = -1.0;
            downsampler.maybe_send(&mock, &samples).await;

            let frames = mock.sent_frames();
            assert_eq!(frames.len(), 1);
            let msg = decode(&frames[0]).unwrap();
            assert_eq!(msg.mode, MessageMode::Data);
            assert_eq!(msg.channels, [0; NUM_CHANNELS]);
            assert_eq!(msg.samples, samples);
        });
    }

    #[test]
    fn test_send_failure_is_swallowed() {
        tokio_test::block_on(async {
            let mock = MockTransport::new();
            mock.set_send_error(std::io::ErrorKind::BrokenPipe);
            let mut downsampler = TelemetryDownsampler::new(0);

            // The attempt counts even though the transport failed
            assert!(downsampler.maybe_send(&mock, &[0.0; NUM_SAMPLES]).await);
            assert!(mock.sent_frames().is_empty());
        });
    }
}
