//! Top-level server error taxonomy: every fallible operation in the connection/session/
//! dispatcher/handler layers returns `Result<T, ServerError>`. Maps 1:1 onto the NT status
//! taxonomy of the component design (see [`ServerError::to_status`]).

use smb_msg::Status;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    // --- Authorization ---
    #[error("authentication failed")]
    LogonFailure,
    #[error("host or user rejected for share")]
    AccessDenied,
    #[error("session id is not valid on this connection")]
    UserSessionDeleted,

    // --- Resource ---
    #[error("allocation failed")]
    NoMemory,
    #[error("handle is not open")]
    FileClosed,
    #[error("tree id is not connected")]
    NetworkNameDeleted,
    #[error("share name is not registered")]
    BadNetworkName,

    // --- Filesystem ---
    #[error("path not found")]
    ObjectNameNotFound,
    #[error("directory enumeration exhausted")]
    NoMoreFiles,
    #[error("expected a file, found a directory")]
    FileIsADirectory,
    #[error("lock range conflicts with an existing lock")]
    FileLockConflict,
    #[error("truncate requested on a directory")]
    InvalidDeviceRequest,
    #[error("directory is not empty")]
    DirectoryNotEmpty,
    #[error("unexpected filesystem I/O error: {0}")]
    UnexpectedIoError(#[from] std::io::Error),

    // --- Protocol ---
    #[error("info class or ioctl code is not supported")]
    NotSupported,
    #[error("lock range overflowed")]
    InvalidLockRange,
    #[error("oplock break ack does not match any pending transition")]
    InvalidOplockProtocol,
    #[error("oplock is not currently breaking")]
    InvalidDeviceState,
    #[error("EA buffers are not supported")]
    EasNotSupported,
    #[error("no mutually supported dialect")]
    DialectNotSupported,
    #[error("malformed request: {0}")]
    InvalidParameter(&'static str),
    /// Not a failure: the first leg of NTLM SessionSetup signals this, carrying the built
    /// challenge blob, so the dispatcher can send it back tagged
    /// `STATUS_MORE_PROCESSING_REQUIRED` instead of treating the leg as an error.
    #[error("authentication requires another leg")]
    MoreProcessingRequired(Vec<u8>),

    // --- Buffer sizing ---
    #[error("requested output buffer is smaller than the minimum for this info class")]
    InfoLengthMismatch,
    #[error("requested output buffer is smaller than the actual data")]
    BufferOverflow,

    // --- Codec ---
    #[error(transparent)]
    Codec(#[from] smb_msg::SmbMsgError),
    #[error("malformed PDU, connection dropped: {0}")]
    ParseError(String),
    #[error(transparent)]
    Transport(#[from] smb_transport::TransportError),
}

impl ServerError {
    /// The NT status code to place in the response header's `Status` field.
    pub fn to_status(&self) -> Status {
        use ServerError::*;
        match self {
            LogonFailure => Status::LogonFailure,
            AccessDenied => Status::AccessDenied,
            UserSessionDeleted => Status::UserSessionDeleted,
            NoMemory => Status::NoMemory,
            FileClosed => Status::FileClosed,
            NetworkNameDeleted => Status::NetworkNameDeleted,
            BadNetworkName => Status::BadNetworkName,
            ObjectNameNotFound => Status::ObjectNameNotFound,
            NoMoreFiles => Status::NoMoreFiles,
            FileIsADirectory => Status::FileIsADirectory,
            FileLockConflict => Status::FileLockConflict,
            InvalidDeviceRequest => Status::InvalidParameter,
            DirectoryNotEmpty => Status::DirectoryNotEmpty,
            UnexpectedIoError(_) => Status::UnexpectedIoError,
            NotSupported => Status::NotSupported,
            InvalidLockRange => Status::InvalidLockRange,
            InvalidOplockProtocol => Status::InvalidOplockProtocol,
            InvalidDeviceState => Status::InvalidDeviceState,
            EasNotSupported => Status::EasNotSupported,
            DialectNotSupported => Status::NotSupported,
            InvalidParameter(_) => Status::InvalidParameter,
            MoreProcessingRequired(_) => Status::MoreProcessingRequired,
            InfoLengthMismatch => Status::InfoLengthMismatch,
            BufferOverflow => Status::BufferOverflow,
            Codec(_) => Status::InvalidParameter,
            ParseError(_) => Status::InvalidParameter,
            Transport(_) => Status::UnexpectedIoError,
        }
    }
}
