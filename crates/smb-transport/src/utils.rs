//! Small framing helpers shared by the read and write paths.

/// 8-byte-aligns `len`, as MS-SMB2 requires for each PDU in a compound chain.
pub fn align8(len: usize) -> usize {
    (len + 7) & !7
}

/// Padding needed to take `len` up to the next 8-byte boundary.
pub fn pad8(len: usize) -> usize {
    align8(len) - len
}
