//! MS-DTYP 2.4.4: ACE

use binrw::io::{Read, Seek, Write};
use binrw::prelude::*;
use binrw::{BinResult, Endian};
use modular_bitfield::prelude::*;

use super::SID;

#[smb_dtyp_derive::mbitfield]
pub struct AccessMask {
    #[skip]
    __: B16,
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

#[smb_dtyp_derive::mbitfield]
pub struct AceFlags {
    pub object_inherit: bool,
    pub container_inherit: bool,
    pub no_propagate_inherit: bool,
    pub inherit_only: bool,
    pub inherited: bool,
    #[skip]
    __: B1,
    pub successful_access: bool,
    pub failed_access: bool,
}

#[binrw::binrw]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessAce {
    pub access_mask: AccessMask,
    pub sid: SID,
}

#[binrw::binrw]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[brw(repr(u8))]
enum AceType {
    AccessAllowed = 0,
    AccessDenied = 1,
    SystemAudit = 2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AceValue {
    AccessAllowed(AccessAce),
    AccessDenied(AccessAce),
    SystemAudit(AccessAce),
}

impl AceValue {
    pub fn is_access_allowed(&self) -> bool {
        matches!(self, AceValue::AccessAllowed(_))
    }

    fn ace_type(&self) -> AceType {
        match self {
            AceValue::AccessAllowed(_) => AceType::AccessAllowed,
            AceValue::AccessDenied(_) => AceType::AccessDenied,
            AceValue::SystemAudit(_) => AceType::SystemAudit,
        }
    }

    fn inner(&self) -> &AccessAce {
        match self {
            AceValue::AccessAllowed(a) | AceValue::AccessDenied(a) | AceValue::SystemAudit(a) => a,
        }
    }
}

impl BinRead for AceValue {
    type Args<'a> = (AceType,);

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let (ace_type,) = args;
        let ace = AccessAce::read_options(reader, endian, ())?;
        Ok(match ace_type {
            AceType::AccessAllowed => AceValue::AccessAllowed(ace),
            AceType::AccessDenied => AceValue::AccessDenied(ace),
            AceType::SystemAudit => AceValue::SystemAudit(ace),
        })
    }
}

impl BinWrite for AceValue {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        self.inner().write_options(writer, endian, ())
    }
}

#[binrw::binrw]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ACE {
    #[bw(calc = self.value.ace_type())]
    ace_type: AceType,
    pub ace_flags: AceFlags,
    #[bw(calc = PosMarkerLen::default())]
    #[br(temp)]
    _ace_size: PosMarkerLen,
    #[br(args(ace_type))]
    pub value: AceValue,
}

// ACE's total size needs patching after writing `value`; reuse smb_dtyp's PosMarker for u16.
type PosMarkerLen = crate::binrw_util::pos_marker::PosMarker<u16>;
