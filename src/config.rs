//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Participant role, fixed for the process lifetime.
///
/// Selected once at startup; each role activates a different set of
/// state machines and they are not interchangeable at runtime.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Ground controller broadcasting pilot input
    Controller,
    /// The kite: consumes control frames, flies, sends telemetry
    Kite,
    /// Passive ground station logging telemetry
    TelemetryReceiver,
}

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_role")]
    pub role: Role,

    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub control: ControlConfig,

    #[serde(default)]
    pub failsafe: FailsafeConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Broadcast transport configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TransportConfig {
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    #[serde(default = "default_broadcast_addr")]
    pub broadcast_addr: String,

    #[serde(default = "default_broadcast_port")]
    pub broadcast_port: u16,
}

/// Control-loop and packet-rate configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ControlConfig {
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,

    #[serde(default = "default_packet_rate_hz")]
    pub packet_rate_hz: u32,
}

/// Failsafe policy values
#[derive(Debug, Deserialize, Clone)]
pub struct FailsafeConfig {
    /// Seconds without an accepted control frame before landing
    #[serde(default = "default_link_timeout_s")]
    pub link_timeout_s: f32,

    /// Battery fraction below which landing engages
    #[serde(default = "default_battery_floor")]
    pub battery_floor: f32,

    /// Uptime before the battery condition is armed, seconds
    #[serde(default = "default_battery_grace_s")]
    pub battery_grace_s: f32,
}

/// Telemetry configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    /// Outgoing telemetry sends skipped between transmissions
    #[serde(default = "default_omitted_sends")]
    pub omitted_sends: u32,

    #[serde(default = "default_log_enabled")]
    pub log_enabled: bool,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_max_records_per_file")]
    pub max_records_per_file: usize,

    #[serde(default = "default_max_files_to_keep")]
    pub max_files_to_keep: usize,
}

// Default value functions
fn default_role() -> Role {
    Role::Kite
}

fn default_bind_port() -> u16 {
    47800
}
fn default_broadcast_addr() -> String {
    "255.255.255.255".to_string()
}
fn default_broadcast_port() -> u16 {
    47800
}

fn default_tick_rate_hz() -> u32 {
    100
}
fn default_packet_rate_hz() -> u32 {
    50
}

fn default_link_timeout_s() -> f32 {
    3.0
}
fn default_battery_floor() -> f32 {
    0.10
}
fn default_battery_grace_s() -> f32 {
    10.0
}

fn default_omitted_sends() -> u32 {
    0
}
fn default_log_enabled() -> bool {
    true
}
fn default_log_dir() -> String {
    "./logs".to_string()
}
fn default_max_records_per_file() -> usize {
    10000
}
fn default_max_files_to_keep() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            role: default_role(),
            transport: TransportConfig::default(),
            control: ControlConfig::default(),
            failsafe: FailsafeConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            bind_port: default_bind_port(),
            broadcast_addr: default_broadcast_addr(),
            broadcast_port: default_broadcast_port(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate_hz(),
            packet_rate_hz: default_packet_rate_hz(),
        }
    }
}

impl Default for FailsafeConfig {
    fn default() -> Self {
        Self {
            link_timeout_s: default_link_timeout_s(),
            battery_floor: default_battery_floor(),
            battery_grace_s: default_battery_grace_s(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            omitted_sends: default_omitted_sends(),
            log_enabled: default_log_enabled(),
            log_dir: default_log_dir(),
            max_records_per_file: default_max_records_per_file(),
            max_files_to_keep: default_max_files_to_keep(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.transport.broadcast_addr.parse::<std::net::IpAddr>().is_err() {
            return Err(crate::error::KiteLinkError::Config(toml::de::Error::custom(
                format!(
                    "broadcast_addr '{}' is not a valid IP address",
                    self.transport.broadcast_addr
                ),
            )));
        }

        if self.control.tick_rate_hz == 0 || self.control.tick_rate_hz > 1000 {
            return Err(crate::error::KiteLinkError::Config(toml::de::Error::custom(
                "tick_rate_hz must be between 1 and 1000",
            )));
        }

        if self.control.packet_rate_hz == 0 || self.control.packet_rate_hz > 1000 {
            return Err(crate::error::KiteLinkError::Config(toml::de::Error::custom(
                "packet_rate_hz must be between 1 and 1000",
            )));
        }

        if self.failsafe.link_timeout_s <= 0.0 {
            return Err(crate::error::KiteLinkError::Config(toml::de::Error::custom(
                "link_timeout_s must be greater than 0",
            )));
        }

        if !(0.0..=1.0).contains(&self.failsafe.battery_floor) {
            return Err(crate::error::KiteLinkError::Config(toml::de::Error::custom(
                "battery_floor must be between 0.0 and 1.0",
            )));
        }

        if self.failsafe.battery_grace_s < 0.0 {
            return Err(crate::error::KiteLinkError::Config(toml::de::Error::custom(
                "battery_grace_s must not be negative",
            )));
        }

        if self.telemetry.log_enabled && self.telemetry.log_dir.is_empty() {
            return Err(crate::error::KiteLinkError::Config(toml::de::Error::custom(
                "telemetry log_dir cannot be empty when logging is enabled",
            )));
        }

        if self.telemetry.max_records_per_file == 0 {
            return Err(crate::error::KiteLinkError::Config(toml::de::Error::custom(
                "max_records_per_file must be greater than 0",
            )));
        }

        if self.telemetry.max_files_to_keep == 0 {
            return Err(crate::error::KiteLinkError::Config(toml::de::Error::custom(
                "max_files_to_keep must be greater than 0",
            )));
        }

        Ok(())
    }
}
