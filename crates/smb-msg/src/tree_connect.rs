//! Tree Connect / Tree Disconnect requests and responses.

use binrw::prelude::*;
use modular_bitfield::prelude::*;
use smb_dtyp::binrw_util::prelude::*;
use smb_msg_derive::*;

/// SMB2 TREE_CONNECT Request packet sent by the client to request access to a
/// particular share on the server.
///
/// MS-SMB2 2.2.9
#[smb_request(size = 9)]
pub struct TreeConnectRequest {
    pub flags: TreeConnectRequestFlags,
    #[bw(calc = PosMarker::default())]
    #[br(temp)]
    _path_offset: PosMarker<u16>,
    #[bw(calc = u16::try_from(buffer.size()).unwrap())]
    #[br(temp)]
    path_length: u16,

    #[br(args { size: SizedStringSize::bytes16(path_length) })]
    #[bw(write_with = PosMarker::write_aoff, args(&_path_offset))]
    /// UNC path of the share being connected to, e.g. `\\server\share`.
    pub buffer: SizedWideString,
}

impl TreeConnectRequest {
    pub fn new(path: &str) -> Self {
        Self {
            flags: TreeConnectRequestFlags::new(),
            buffer: path.into(),
        }
    }
}

/// Flags for the TREE_CONNECT request.
///
/// MS-SMB2 2.2.9
#[smb_dtyp::mbitfield]
pub struct TreeConnectRequestFlags {
    /// Client requests the server to reconnect this tree to a cluster node owning the
    /// resource (SMB 3.x only).
    pub cluster_reconnect: bool,
    /// Client requests redirection to the node owning the resource.
    pub redirect_to_owner: bool,
    /// Extension (claims) block follows the path in this request. Not produced or consumed
    /// by this implementation; requests carrying it are parsed as a plain connect.
    pub extension_present: bool,
    #[skip]
    __: B13,
}

/// SMB2 TREE_CONNECT Response packet sent by the server once a share connection is
/// established.
///
/// MS-SMB2 2.2.10
#[smb_response(size = 16)]
pub struct TreeConnectResponse {
    pub share_type: ShareType,
    #[bw(calc = 0)]
    #[br(temp)]
    _reserved: u8,
    pub share_flags: ShareFlags,
    pub capabilities: TreeCapabilities,
    /// Maximal access rights the client is granted on the share root.
    pub maximal_access: u32,
}

/// The kind of resource a share exposes.
///
/// MS-SMB2 2.2.10
#[binrw::binrw]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[brw(repr(u8))]
pub enum ShareType {
    Disk = 0x1,
    Pipe = 0x2,
    Print = 0x3,
}

/// Share-level properties reported by the server in a TREE_CONNECT response.
///
/// MS-SMB2 2.2.10
#[smb_dtyp::mbitfield]
pub struct ShareFlags {
    pub dfs: bool,
    pub dfs_root: bool,
    #[skip]
    __: B2,
    pub caching_mode: B4,
    pub restrict_exclusive_opens: bool,
    pub force_shared_delete: bool,
    pub allow_namespace_caching: bool,
    pub access_based_directory_enum: bool,
    pub force_levelii_oplock: bool,
    pub enable_hash_v1: bool,
    pub enable_hash_v2: bool,
    pub encrypt_data: bool,
    #[skip]
    __: B2,
    pub identity_remoting: bool,
    #[skip]
    __: B1,
    pub compress_data: bool,
    pub isolated_transport: bool,
    #[skip]
    __: B10,
}

/// Capabilities the underlying share/cluster implementation supports.
///
/// MS-SMB2 2.2.10
#[smb_dtyp::mbitfield]
pub struct TreeCapabilities {
    #[skip]
    __: B3,
    pub dfs: bool,
    pub continuous_availability: bool,
    pub scaleout: bool,
    pub cluster: bool,
    pub asymmetric: bool,
    pub redirect_to_owner: bool,
    #[skip]
    __: B23,
}

/// SMB2 TREE_DISCONNECT Request packet sent by the client to disconnect from a share.
///
/// MS-SMB2 2.2.11
#[smb_request(size = 4)]
#[derive(Default)]
pub struct TreeDisconnectRequest {
    reserved: u16,
}

/// SMB2 TREE_DISCONNECT Response packet.
///
/// MS-SMB2 2.2.12
#[smb_response(size = 4)]
#[derive(Default)]
pub struct TreeDisconnectResponse {
    reserved: u16,
}

#[cfg(test)]
mod tests {
    use smb_tests::*;

    use crate::*;
    use super::*;

    test_request! {
        TreeConnect {
            flags: TreeConnectRequestFlags::new(),
            buffer: r"\\adc.aviv.local\IPC$".into(),
        } => "0900000048002a005c005c006100640063002e0061007600690076002e006c006f00630061006c005c004900500043002400"
    }

    test_binrw! {
        struct TreeConnectResponse {
            share_type: ShareType::Disk,
            share_flags: ShareFlags::new().with_access_based_directory_enum(true),
            capabilities: TreeCapabilities::new(),
            maximal_access: 0x001f01ff,
        } => "100001000008000000000000ff011f00"
    }

    test_binrw_request! {
        struct TreeDisconnectRequest {} => "04000000"
    }

    test_binrw_response! {
        struct TreeDisconnectResponse {} => "04000000"
    }
}
