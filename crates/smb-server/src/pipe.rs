//! Named-pipe RPC transceiving (component F): `FSCTL_PIPE_TRANSCEIVE` against `IPC$` is the
//! only IOCTL this server wires up to a real handler. Parsing/dispatching `srvsvc`/`wkssvc`/
//! `winreg` operation payloads is a leaf dependency, injected as a [`PipeHandler`]; this crate
//! only frames the DCE/RPC PDU via `smb-rpc`.

use smb_rpc::RpcHeader;

use crate::error::Result;

/// Handles one named pipe's RPC traffic: given a request PDU's payload (after the common
/// header), returns the response payload (also without its own header — the dispatcher
/// writes that using the `call_id`/`ptype` the handler reports back).
pub trait PipeHandler: Send + Sync {
    /// `true` if this handler services the named pipe (e.g. `"srvsvc"`, `"wkssvc"`).
    fn accepts(&self, pipe_name: &str) -> bool;

    fn process_rpc(&self, header: &RpcHeader, body: &[u8]) -> Result<Vec<u8>>;
}

/// A handler that accepts no pipes and answers nothing; used where a deployment has no
/// `srvsvc`/`wkssvc` needs and `IPC$` exists only to satisfy clients that probe for it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPipeHandler;

impl PipeHandler for NullPipeHandler {
    fn accepts(&self, _pipe_name: &str) -> bool {
        false
    }

    fn process_rpc(&self, _header: &RpcHeader, _body: &[u8]) -> Result<Vec<u8>> {
        Err(crate::error::ServerError::NotSupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_handler_accepts_nothing() {
        let handler = NullPipeHandler;
        assert!(!handler.accepts("srvsvc"));
    }
}
