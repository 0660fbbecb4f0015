use std::net::SocketAddr;

use thiserror::Error;

/// Errors that can occur when handing payloads to a [`Transport`](super::transport::Transport)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No open connection exists for the address
    #[error("No connection to {address}")]
    NotConnected { address: SocketAddr },

    /// The transport has shut down and cannot send or receive
    #[error("Transport is closed")]
    Closed,

    /// The underlying channel rejected the payload
    #[error("Failed to send {payload_size} bytes to {address}: {reason}")]
    SendFailed {
        address: SocketAddr,
        payload_size: usize,
        reason: String,
    },
}
