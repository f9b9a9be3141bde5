//! A minimal DCE/RPC PDU codec: just enough of MS-RPCE to round-trip the `srvsvc`/`wkssvc`/
//! `winreg` traffic a named-pipe handler transceives over `FSCTL_PIPE_TRANSCEIVE`.
//!
//! Parsing/dispatching the operation payloads themselves (the actual `srvsvc` interface) is
//! a leaf dependency of this workspace — see [`crate::PipeHandler`]-shaped consumers in the
//! server crate; this crate only frames requests/responses at the PDU-header level.

#![forbid(unsafe_code)]

mod header;

pub use header::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("unsupported DCE/RPC packet type {0}")]
    UnsupportedPacketType(u8),
    #[error(transparent)]
    BinRw(#[from] binrw::Error),
}

pub type Result<T> = std::result::Result<T, RpcError>;
