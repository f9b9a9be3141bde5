//! MS-RPCE 2.2.3.1 common PDU header, shared by every DCE/RPC packet type this workspace
//! needs to frame (bind/bind_ack, request/response) when relaying RPC over a named pipe.

use binrw::prelude::*;
use modular_bitfield::prelude::*;

/// `PTYPE` (MS-RPCE 2.2.3.1).
#[binrw::binrw]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[brw(repr(u8))]
pub enum PacketType {
    Request = 0,
    Ping = 1,
    Response = 2,
    Fault = 3,
    Bind = 11,
    BindAck = 12,
    BindNak = 13,
    AlterContext = 14,
    AlterContextResp = 15,
    Shutdown = 17,
    CoCancel = 18,
    Orphaned = 19,
}

#[smb_dtyp::mbitfield]
pub struct PfcFlags {
    pub first_frag: bool,
    pub last_frag: bool,
    pub pending_cancel: bool,
    pub reserved: bool,
    pub conc_mpx: bool,
    pub did_not_execute: bool,
    pub maybe: bool,
    pub object: bool,
}

/// Common header present at the start of every DCE/RPC PDU.
#[binrw::binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcHeader {
    #[bw(calc = 5)]
    #[br(temp, assert(rpc_vers == 5))]
    rpc_vers: u8,
    #[bw(calc = 0)]
    #[br(temp)]
    rpc_vers_minor: u8,
    pub ptype: PacketType,
    pub pfc_flags: PfcFlags,
    /// NDR data representation: little-endian integers/floats/chars by default.
    pub packed_drep: [u8; 4],
    pub frag_length: u16,
    pub auth_length: u16,
    pub call_id: u32,
}

impl RpcHeader {
    pub const SIZE: usize = 16;

    pub fn new(ptype: PacketType, call_id: u32, frag_length: u16) -> Self {
        Self {
            ptype,
            pfc_flags: PfcFlags::new().with_first_frag(true).with_last_frag(true),
            packed_drep: [0x10, 0, 0, 0],
            frag_length,
            auth_length: 0,
            call_id,
        }
    }
}

/// `rpcconn_request_hdr_t` tail following [`RpcHeader`] for a `Request` PDU.
#[binrw::binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeader {
    pub alloc_hint: u32,
    pub p_cont_id: u16,
    pub opnum: u16,
}

/// `rpcconn_response_hdr_t` tail following [`RpcHeader`] for a `Response` PDU.
#[binrw::binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeader {
    pub alloc_hint: u32,
    pub p_cont_id: u16,
    pub cancel_count: u8,
    #[bw(calc = 0)]
    #[br(temp)]
    reserved: u8,
}

#[cfg(test)]
mod tests {
    use smb_tests::*;

    use super::*;

    test_binrw! {
        struct RpcHeader {
            ptype: PacketType::Request,
            pfc_flags: PfcFlags::new().with_first_frag(true).with_last_frag(true),
            packed_drep: [0x10, 0, 0, 0],
            frag_length: 24,
            auth_length: 0,
            call_id: 1,
        } => "05000003100000001800000001000000"
    }
}
