//! # Transport Module
//!
//! Broadcast transport for the control/telemetry link.
//!
//! This module handles:
//! - The [`BroadcastTransport`] seam the rest of the crate sends through
//! - A UDP broadcast implementation on `tokio::net::UdpSocket`
//! - Frame reception for the kite and telemetry-receiver roles
//!
//! Delivery is fire-and-forget and at-most-once. Control and telemetry
//! data are perishable, so a lost frame is logged and forgotten, never
//! retried.

use std::io;
use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::config::TransportConfig;
use crate::error::{KiteLinkError, Result};

/// Fire-and-forget broadcast send primitive.
///
/// A send failure is observable only as an error status for logging; no
/// caller treats it as fatal.
#[async_trait]
pub trait BroadcastTransport: Send + Sync {
    /// Send one frame to the broadcast destination
    async fn send(&self, frame: &[u8]) -> io::Result<()>;
}

/// UDP broadcast socket bound for one role instance.
///
/// All three roles share the same socket setup: bind the configured
/// port, enable broadcast, send to the single broadcast destination.
pub struct UdpBroadcast {
    socket: UdpSocket,
    destination: SocketAddr,
}

impl std::fmt::Debug for UdpBroadcast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpBroadcast")
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

impl UdpBroadcast {
    /// Bind the broadcast socket described by the transport config.
    ///
    /// # Errors
    ///
    /// Returns an error if the broadcast address does not parse, the
    /// port cannot be bound, or broadcast cannot be enabled.
    pub async fn bind(config: &TransportConfig) -> Result<Self> {
        let addr: IpAddr = config.broadcast_addr.parse().map_err(|_| {
            KiteLinkError::Transport(format!(
                "invalid broadcast address: {}",
                config.broadcast_addr
            ))
        })?;
        let destination = SocketAddr::new(addr, config.broadcast_port);

        let socket = UdpSocket::bind(("0.0.0.0", config.bind_port)).await?;
        socket.set_broadcast(true)?;

        info!(
            bind_port = config.bind_port,
            %destination,
            "broadcast socket ready"
        );

        Ok(Self {
            socket,
            destination,
        })
    }

    /// Receive one datagram into `buf`.
    ///
    /// Returns the received length and the sender address. Length
    /// validation is the codec's job, not the transport's.
    pub async fn recv_frame(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        self.socket.recv_from(buf).await
    }
}

#[async_trait]
impl BroadcastTransport for UdpBroadcast {
    async fn send(&self, frame: &[u8]) -> io::Result<()> {
        let sent = self.socket.send_to(frame, self.destination).await?;
        debug!("sent frame ({} bytes)", sent);
        Ok(())
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock transport recording sent frames for assertions
    #[derive(Clone)]
    pub struct MockTransport {
        pub sent_frames: Arc<Mutex<Vec<Vec<u8>>>>,
        pub send_error: Arc<Mutex<Option<io::ErrorKind>>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                sent_frames: Arc::new(Mutex::new(Vec::new())),
                send_error: Arc::new(Mutex::new(None)),
            }
        }

        pub fn sent_frames(&self) -> Vec<Vec<u8>> {
            self.sent_frames.lock().unwrap().clone()
        }

        pub fn set_send_error(&self, error: io::ErrorKind) {
            *self.send_error.lock().unwrap() = Some(error);
        }
    }

    #[async_trait]
    impl BroadcastTransport for MockTransport {
        async fn send(&self, frame: &[u8]) -> io::Result<()> {
            if let Some(error) = *self.send_error.lock().unwrap() {
                return Err(io::Error::new(error, "mock send error"));
            }
            self.sent_frames.lock().unwrap().push(frame.to_vec());
            Ok(())
        }
    }
}
