//! Wire types for SMB2/SMB3 messages: request/response payloads for every command, the
//! plain/compressed/encrypted message envelopes, and the NT status code table.
//!
//! This crate only deals with on-the-wire representations (`binrw`-derived structs/enums);
//! it has no notion of a connection, session or share.

mod cancel;
mod compressed;
mod create;
pub mod dfsc;
mod echo;
mod encrypted;
mod error;
mod file;
mod header;
mod info;
mod ioctl;
mod lock;
mod message;
mod negotiate;
mod notify;
mod oplock;
mod plain;
mod query_dir;
mod session_setup;
mod smb1;
mod tree_connect;

#[cfg(test)]
mod test;
#[cfg(test)]
pub(crate) use test::*;

pub use cancel::CancelRequest;
pub use compressed::*;
pub use create::*;
pub use echo::{EchoMessage, EchoRequest, EchoResponse};
pub use encrypted::*;
pub use error::{ErrorId, ErrorResponse, ErrorResponseContext};
pub use file::*;
pub use header::*;
pub use info::*;
pub use ioctl::*;
pub use lock::*;
pub use message::{Request, Response};
pub use negotiate::*;
pub use notify::*;
pub use oplock::*;
pub use plain::*;
pub use query_dir::*;
pub use session_setup::*;
pub use smb1::SMB1NegotiateMessage;
pub use tree_connect::*;

/// Result alias for fallible operations on SMB2/SMB3 messages.
pub type Result<T> = std::result::Result<T, SmbMsgError>;

/// Errors that can occur when building, converting or matching SMB2/SMB3 message content.
#[derive(Debug, thiserror::Error)]
pub enum SmbMsgError {
    /// No [`Status`] variant is defined for this NT status code.
    #[error("no status definition for {0:#010x}")]
    MissingErrorCodeDefinition(u32),
    /// Tried to cast a [`RequestContent`]/[`ResponseContent`] (or similar tagged union) to a
    /// variant it does not currently hold.
    #[error("unexpected content: expected {expected}, got {actual}")]
    UnexpectedContent {
        expected: &'static str,
        actual: &'static str,
    },
    /// An FSCTL response was parsed as a type whose control codes do not match the one
    /// actually carried by the message.
    #[error("no FSCTL definition matches control code {0:#010x}")]
    MissingFsctlDefinition(u32),
    /// Malformed data that does not fit the expected shape (e.g. wrong byte count).
    #[error("invalid data: {0}")]
    InvalidData(String),
    /// Underlying binary (de)serialization failure.
    #[error(transparent)]
    BinRw(#[from] binrw::Error),
}
