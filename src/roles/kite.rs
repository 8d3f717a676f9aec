//! # Kite Role
//!
//! Receive path plus control loop for the flying side of the link.
//!
//! A spawned task reads frames from the transport, decodes them and
//! feeds accepted Control frames through the calibration into the shared
//! link snapshot. The control loop ticks at the configured rate: it
//! reads the latest snapshot, runs the failsafe supervisor, schedules
//! gains and mode, drives the actuators and offers a telemetry frame to
//! the downsampler. Neither path ever blocks on the other.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::control::{gains, FlightActuators, FlightSensors};
use crate::link::failsafe::FailsafeSupervisor;
use crate::link::state::{link_channel, LinkUpdater};
use crate::protocol::codec::decode;
use crate::protocol::message::NUM_SAMPLES;
use crate::telemetry::downsampler::TelemetryDownsampler;
use crate::transport::UdpBroadcast;

/// Number of ticks between status log messages
const LOG_INTERVAL_TICKS: u64 = 1000;

/// Receive buffer size; comfortably larger than the fixed frame
const RECV_BUF_SIZE: usize = 256;

/// Bench sensor stand-in: full battery, zeroed sample frame.
///
/// Hardware integration replaces this with readings from the battery
/// monitor and the sensor-fusion pipeline.
#[derive(Debug, Clone, Copy)]
pub struct BenchSensors {
    battery_fraction: f32,
}

impl Default for BenchSensors {
    fn default() -> Self {
        Self {
            battery_fraction: 1.0,
        }
    }
}

impl FlightSensors for BenchSensors {
    fn battery_fraction(&mut self) -> f32 {
        self.battery_fraction
    }

    fn sample_frame(&mut self) -> [f32; NUM_SAMPLES] {
        [0.0; NUM_SAMPLES]
    }
}

/// Bench actuator stand-in that logs the applied command.
#[derive(Debug, Default)]
pub struct LogActuators;

impl FlightActuators for LogActuators {
    fn apply(&mut self, command: &gains::LoopCommand) {
        debug!(
            p_yaw = command.gains.p_yaw,
            d_yaw = command.gains.d_yaw,
            d_z = command.gains.d_z,
            p_z = command.gains.p_z,
            mode = ?command.mode,
            goal_height = command.goal_height,
            "applying control command"
        );
    }
}

/// Run the kite role until Ctrl+C.
pub async fn run(config: Config) -> Result<()> {
    let transport = Arc::new(UdpBroadcast::bind(&config.transport).await?);

    let (tx, rx) = link_channel();
    let mut updater = LinkUpdater::new(tx);

    // Receive path: decode and ingest, malformed traffic is dropped
    // without touching any state
    let recv_transport = Arc::clone(&transport);
    let recv_task = tokio::spawn(async move {
        let mut buf = [0u8; RECV_BUF_SIZE];
        loop {
            match recv_transport.recv_frame(&mut buf).await {
                Ok((len, peer)) => match decode(&buf[..len]) {
                    Ok(msg) => updater.ingest(&msg),
                    Err(e) => debug!("discarding frame from {}: {}", peer, e),
                },
                Err(e) => warn!("receive error: {}", e),
            }
        }
    });

    let session_start = Instant::now();
    let mut failsafe = FailsafeSupervisor::new(&config.failsafe);
    let mut downsampler = TelemetryDownsampler::new(config.telemetry.omitted_sends);
    let mut sensors = BenchSensors::default();
    let mut actuators = LogActuators;

    let period_ms = 1000 / config.control.tick_rate_hz;
    let mut tick_interval = interval(Duration::from_millis(u64::from(period_ms)));

    info!(
        rate_hz = config.control.tick_rate_hz,
        "starting control loop"
    );

    let mut tick_count: u64 = 0;

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                let snapshot = *rx.borrow();

                let landing = failsafe.tick(
                    snapshot.elapsed_secs(),
                    sensors.battery_fraction(),
                    session_start.elapsed().as_secs_f32(),
                );

                let command = gains::schedule(&snapshot.channels, landing);
                actuators.apply(&command);

                downsampler
                    .maybe_send(transport.as_ref(), &sensors.sample_frame())
                    .await;

                tick_count += 1;
                if tick_count % LOG_INTERVAL_TICKS == 0 {
                    info!(
                        tick_count,
                        landing,
                        elapsed_s = snapshot.elapsed_secs(),
                        "control loop running"
                    );
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C, shutting down...");
                info!("total control loop ticks: {}", tick_count);
                break;
            }
        }
    }

    recv_task.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FailsafeConfig;
    use crate::link::state::link_channel;
    use crate::protocol::message::Message;

    #[test]
    fn test_bench_sensors_report_full_battery() {
        let mut sensors = BenchSensors::default();
        assert_eq!(sensors.battery_fraction(), 1.0);
        assert_eq!(sensors.sample_frame(), [0.0; NUM_SAMPLES]);
    }

    #[test]
    fn test_receive_path_feeds_control_loop() {
        // One iteration of each path, wired the way run() wires them
        let (tx, rx) = link_channel();
        let mut updater = LinkUpdater::new(tx);
        let mut failsafe = FailsafeSupervisor::new(&FailsafeConfig::default());

        updater.ingest(&Message::control([2048; 6]));
        updater.ingest(&Message::control([2048, 2048, 2048, 2048, 2048, 1548]));

        let snapshot = *rx.borrow();
        assert_eq!(snapshot.channels[5], -500);

        let landing = failsafe.tick(snapshot.elapsed_secs(), 1.0, 5.0);
        assert!(!landing);

        let command = gains::schedule(&snapshot.channels, landing);
        assert_eq!(command.mode, gains::FlightMode::Hover);
        assert!((command.goal_height - (-5.0 - 10.0 * -500.0 / 3003.0)).abs() < 1e-4);
    }

    #[test]
    fn test_stale_link_forces_landing_command() {
        let (_tx, rx) = link_channel();
        let mut failsafe = FailsafeSupervisor::new(&FailsafeConfig::default());

        // No frame ever arrived; pretend the staleness clock ran out
        let landing = failsafe.tick(3.5, 1.0, 3.5);
        assert!(landing);

        let command = gains::schedule(&rx.borrow().channels, landing);
        assert_eq!(command.goal_height, gains::LANDING_GOAL_HEIGHT);
        assert_eq!(command.y_axis_trim, gains::LANDING_TRIM);
    }
}
