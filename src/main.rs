//! # Kite Link
//!
//! Broadcast control/telemetry link and failsafe supervisor for an
//! autonomous kite.
//!
//! One binary serves all three participants. The role comes from the
//! configuration file and is fixed for the process lifetime:
//!
//! - `controller` broadcasts pilot input frames, tagging the first one
//!   with the power-on marker
//! - `kite` receives control frames, calibrates channels, runs the
//!   failsafe-supervised control loop and sends telemetry
//! - `telemetry-receiver` logs received sample frames
//!
//! Run with an optional config path (defaults to `config/default.toml`;
//! built-in defaults apply if the file does not exist):
//!
//! ```bash
//! cargo run --release -- config/kite.toml
//! ```

use anyhow::Result;
use tracing::info;

use kite_link::config::{Config, Role};
use kite_link::roles;

/// Configuration path used when none is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Kite Link v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = if std::path::Path::new(&config_path).exists() {
        info!("loading configuration from {}", config_path);
        Config::load(&config_path)?
    } else {
        info!(
            "no configuration file at {}, using built-in defaults",
            config_path
        );
        Config::default()
    };

    info!("running as {:?}", config.role);

    match config.role {
        Role::Controller => roles::controller::run(config).await,
        Role::Kite => roles::kite::run(config).await,
        Role::TelemetryReceiver => roles::receiver::run(config).await,
    }
}
