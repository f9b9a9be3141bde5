//! Transport-level errors: framing violations and the underlying I/O failures that cause them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("NetBIOS length prefix top byte is non-zero")]
    InvalidLengthPrefix,
    #[error("frame of {0} bytes exceeds the maximum NetBIOS session message size")]
    FrameTooLarge(usize),
    #[error("connection closed before a full frame was read")]
    UnexpectedEof,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
