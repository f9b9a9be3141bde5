//! NetBIOS session-service framing (RFC 1002 §4.3.1) over a plain TCP stream: a 4-byte
//! big-endian length prefix (top byte reserved, must be zero) followed by exactly that many
//! bytes of SMB PDU.

use crate::error::{Result, TransportError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

/// Only the low 3 bytes of the 4-byte length prefix carry the message length.
const MAX_FRAME_LEN: usize = 0x00FF_FFFF;

/// Reads NetBIOS-framed SMB messages off a connection's read half.
///
/// This is the accept-side counterpart of [`TcpTransport`]: the server reads client
/// requests with this, the client reads server responses with the analogous logic in
/// [`TcpTransport::receive`].
pub struct NetBiosFrameReader {
    inner: OwnedReadHalf,
}

impl NetBiosFrameReader {
    pub fn new(inner: OwnedReadHalf) -> Self {
        Self { inner }
    }

    /// Reads one full frame, returning the PDU bytes (the length prefix itself is consumed
    /// and not included). Returns `Ok(None)` on a clean EOF at a frame boundary.
    pub async fn read_frame(&mut self) -> Result<Option<Vec<u8>>> {
        let mut len_buf = [0u8; 4];
        match self.inner.read_exact(&mut len_buf).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        if len_buf[0] != 0 {
            return Err(TransportError::InvalidLengthPrefix);
        }
        let len = u32::from_be_bytes(len_buf) as usize;
        if len > MAX_FRAME_LEN {
            return Err(TransportError::FrameTooLarge(len));
        }
        let mut body = vec![0u8; len];
        self.inner
            .read_exact(&mut body)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::UnexpectedEof => TransportError::UnexpectedEof,
                _ => TransportError::Io(e),
            })?;
        Ok(Some(body))
    }
}

/// Writes NetBIOS-framed SMB messages onto a connection's write half.
pub struct NetBiosFrameWriter {
    inner: OwnedWriteHalf,
}

impl NetBiosFrameWriter {
    pub fn new(inner: OwnedWriteHalf) -> Self {
        Self { inner }
    }

    /// Writes the 4-byte length prefix followed by `pdu`, as one frame. Multiple segments
    /// (e.g. a header and a zero-copy READ payload) may be passed to avoid concatenating
    /// them first.
    pub async fn write_frame(&mut self, segments: &[&[u8]]) -> Result<()> {
        let total: usize = segments.iter().map(|s| s.len()).sum();
        if total > MAX_FRAME_LEN {
            return Err(TransportError::FrameTooLarge(total));
        }
        let len_buf = (total as u32).to_be_bytes();
        self.inner.write_all(&len_buf).await?;
        for seg in segments {
            self.inner.write_all(seg).await?;
        }
        self.inner.flush().await?;
        Ok(())
    }
}

/// Splits an accepted [`TcpStream`] into its NetBIOS-framed read/write halves.
pub fn split(stream: TcpStream) -> (NetBiosFrameReader, NetBiosFrameWriter) {
    let (r, w) = stream.into_split();
    (NetBiosFrameReader::new(r), NetBiosFrameWriter::new(w))
}

/// Header of a NetBIOS session message, as parsed off the wire (connect-side helper: a
/// client reading a server's response frames it the same way).
#[derive(Debug, Clone, Copy)]
pub struct SmbTcpMessageHeader {
    pub length: u32,
}

impl SmbTcpMessageHeader {
    pub fn parse(bytes: [u8; 4]) -> Result<Self> {
        if bytes[0] != 0 {
            return Err(TransportError::InvalidLengthPrefix);
        }
        Ok(Self {
            length: u32::from_be_bytes(bytes),
        })
    }

    pub fn to_bytes(self) -> [u8; 4] {
        self.length.to_be_bytes()
    }
}

/// Connect-side transport: dials a server and speaks the same NetBIOS framing.
pub struct TcpTransport {
    timeout: std::time::Duration,
}

impl TcpTransport {
    pub fn new(timeout: std::time::Duration) -> Self {
        Self { timeout }
    }

    pub async fn connect(&self, addr: std::net::SocketAddr) -> Result<TcpStream> {
        let stream = tokio::time::timeout(self.timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| TransportError::UnexpectedEof)??;
        stream.set_nodelay(true).ok();
        Ok(stream)
    }
}
