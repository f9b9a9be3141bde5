//! Common data types shared by the `smb-*` crates: MS-DTYP primitives (GUIDs, SIDs, ACLs,
//! security descriptors, FILETIME) and the binrw helper types they're built from.

pub mod binrw_util;
pub mod security;

pub use binrw_util::guid;
pub use binrw_util::fixed_string::FixedWideString;
pub use binrw_util::filetime::FileTime;
pub use binrw_util::guid::Guid;
pub use binrw_util::pos_marker::PosMarker;
pub use binrw_util::sized_wide_string::{SizedStringSize, SizedWideString};
pub use security::{SecurityDescriptor, SID};

pub use smb_dtyp_derive::mbitfield;
