use std::net::SocketAddr;

use super::error::TransportError;

/// Something that happened on the transport since it was last polled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Connected(SocketAddr),
    Disconnected(SocketAddr),
    /// One complete, already length-framed payload from a peer
    Received(SocketAddr, Box<[u8]>),
}

/// Reliable, ordered, message-framed byte channel to one or more peers.
///
/// Sessions poll it once per tick and hand it outgoing payloads; it never blocks.
pub trait Transport {
    /// Returns the next pending event, if any
    fn receive(&mut self) -> Result<Option<TransportEvent>, TransportError>;

    /// Queues a payload for delivery to `address`
    fn send(&mut self, address: &SocketAddr, payload: &[u8]) -> Result<(), TransportError>;

    /// Whether a connection to `address` is currently open
    fn is_connected(&self, address: &SocketAddr) -> bool;
}
