//! Shared transport-side abstractions.

use std::net::SocketAddr;

/// Identifies the peer of an accepted connection, for logging and host-based access checks
/// (share allow/deny lists).
pub trait PeerAddr {
    fn peer_addr(&self) -> std::io::Result<SocketAddr>;
}

impl PeerAddr for tokio::net::TcpStream {
    fn peer_addr(&self) -> std::io::Result<SocketAddr> {
        tokio::net::TcpStream::peer_addr(self)
    }
}
