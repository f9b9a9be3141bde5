//! Shared IOCTL/FSCTL plumbing: the raw pass-through buffer type, and the marker trait
//! implemented by every typed FSCTL request/response payload in [`super::fsctl`].

use binrw::io::{Read, Seek, Write};
use binrw::prelude::*;
use binrw::{BinResult, Endian};

/// Marker trait for a typed FSCTL request or response payload.
///
/// Anything that can be read/written on its own (no external args) and implements this
/// trait can be embedded as a variant of the IOCTL request/response data union.
pub trait IoctlRequestContent:
    BinRead<Args<'static> = ()> + BinWrite<Args<'static> = ()> + std::fmt::Debug
{
}

/// A raw, untyped IOCTL/FSCTL input or output buffer: used for FSCTL codes this core does
/// not need to interpret (forwarded verbatim to/from the consumed [`PipeHandler`] or
/// [`FilesystemBackend`] leaf interface).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IoctlBuffer(Vec<u8>);

impl IoctlBuffer {
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for IoctlBuffer {
    fn from(value: Vec<u8>) -> Self {
        IoctlBuffer(value)
    }
}

impl From<IoctlBuffer> for Vec<u8> {
    fn from(value: IoctlBuffer) -> Self {
        value.0
    }
}

impl std::ops::Deref for IoctlBuffer {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl IoctlRequestContent for IoctlBuffer {}

impl BinRead for IoctlBuffer {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(IoctlBuffer(buf))
    }
}

impl BinWrite for IoctlBuffer {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        writer.write_all(&self.0)?;
        Ok(())
    }
}
