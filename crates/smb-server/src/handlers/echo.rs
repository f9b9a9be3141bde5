//! ECHO handler: a no-op round-trip used for keepalives and latency probing.

use smb_msg::{EchoRequest, EchoResponse};

use crate::error::Result;

pub async fn handle_echo(_req: &EchoRequest) -> Result<EchoResponse> {
    Ok(EchoResponse::default())
}
