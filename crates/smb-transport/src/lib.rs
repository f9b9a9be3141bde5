#![forbid(unsafe_code)]
//! NetBIOS-over-TCP (RFC 1002) framing, shared by the connect side (tests driving the server
//! as a scripted client) and the accept side (the server's listener).

pub mod config;
pub mod error;
pub mod iovec;
pub mod tcp;
pub mod traits;
pub mod utils;

pub use config::*;
pub use error::TransportError;
pub use iovec::*;
pub use tcp::{NetBiosFrameReader, NetBiosFrameWriter, SmbTcpMessageHeader, TcpTransport};
pub use traits::*;
