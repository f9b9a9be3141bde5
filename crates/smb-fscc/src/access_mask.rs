//! File/pipe/directory access mask bits, as reported by FILE_ACCESS_INFORMATION
//! (MS-FSCC 2.4.1) and used throughout CREATE's desired-access negotiation.

use modular_bitfield::prelude::*;
use smb_dtyp::mbitfield;

#[mbitfield]
pub struct FileAccessMask {
    pub read_data: bool,
    pub write_data: bool,
    pub append_data: bool,
    pub read_ea: bool,

    pub write_ea: bool,
    pub execute: bool,
    #[skip]
    __: B1,
    pub read_attributes: bool,

    pub write_attributes: bool,
    #[skip]
    __: B7,

    pub delete: bool,
    pub read_control: bool,
    pub write_dac: bool,
    pub write_owner: bool,

    pub synchronize: bool,
    #[skip]
    __: B3,

    pub access_system_security: bool,
    pub maximum_allowed: bool,
    #[skip]
    __: B2,

    pub generic_all: bool,
    pub generic_execute: bool,
    pub generic_write: bool,
    pub generic_read: bool,
}
