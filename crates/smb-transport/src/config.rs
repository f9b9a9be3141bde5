//! Transport selection and per-transport configuration.

/// Which wire transport a connection (client) or listener (server) should use.
///
/// `Quic`/`Rdma` are intentionally not modeled here: this workspace only implements
/// NetBIOS-over-TCP (port 445) on both the connect and accept sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportConfig {
    #[default]
    Tcp,
}
