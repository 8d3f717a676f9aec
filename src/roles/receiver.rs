//! # Telemetry Receiver Role
//!
//! Passive ground station: listens for Data frames, echoes each sample
//! set to stdout as one CSV line and appends it to the rotating JSONL
//! log. Control frames and malformed traffic are ignored.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::protocol::codec::decode;
use crate::protocol::message::{MessageMode, NUM_SAMPLES};
use crate::telemetry::logger::TelemetryLogger;
use crate::transport::UdpBroadcast;

/// Receive buffer size; comfortably larger than the fixed frame
const RECV_BUF_SIZE: usize = 256;

/// Format a sample frame as one comma-separated line.
fn format_csv(samples: &[f32; NUM_SAMPLES]) -> String {
    samples
        .iter()
        .map(|v| format!("{:.6}", v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Run the telemetry receiver role until Ctrl+C.
pub async fn run(config: Config) -> Result<()> {
    let transport = UdpBroadcast::bind(&config.transport).await?;

    let mut logger = if config.telemetry.log_enabled {
        Some(TelemetryLogger::new(
            &config.telemetry.log_dir,
            config.telemetry.max_records_per_file,
            config.telemetry.max_files_to_keep,
        )?)
    } else {
        None
    };

    info!("listening for telemetry frames");
    let mut buf = [0u8; RECV_BUF_SIZE];
    let mut frame_count: u64 = 0;

    loop {
        tokio::select! {
            result = transport.recv_frame(&mut buf) => {
                match result {
                    Ok((len, peer)) => match decode(&buf[..len]) {
                        Ok(msg) if msg.mode == MessageMode::Data => {
                            frame_count += 1;
                            println!("{}", format_csv(&msg.samples));
                            if let Some(logger) = logger.as_mut() {
                                if let Err(e) = logger.log(&msg.samples) {
                                    warn!("failed to log telemetry record: {}", e);
                                }
                            }
                        }
                        Ok(_) => {
                            // Control traffic between controller and kite,
                            // not ours
                        }
                        Err(e) => debug!("discarding frame from {}: {}", peer, e),
                    },
                    Err(e) => warn!("receive error: {}", e),
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C, shutting down...");
                info!("total telemetry frames received: {}", frame_count);
                break;
            }
        }
    }

    Ok(())
}
