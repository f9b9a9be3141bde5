//! [`SizedWideString`]: a UTF-16LE string whose length (in bytes, not null-terminated) is
//! carried by a sibling field rather than encoded inline.

use binrw::io::{Read, Seek, Write};
use binrw::prelude::*;
use binrw::{BinResult, Endian};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SizedWideString(String);

#[derive(Debug, Clone, Copy)]
pub struct SizedStringSize(pub u32);

impl SizedStringSize {
    /// Construct from a byte length.
    pub fn bytes(n: impl TryInto<u32>) -> Self {
        SizedStringSize(n.try_into().unwrap_or(0))
    }

    /// Construct from a byte length of a wide (UTF-16) string field. Same numeric value as
    /// [`Self::bytes`]; kept distinct so call sites read as "this length is for a wide
    /// string", matching the MS-SMB2 field names (e.g. `NameLength`) that are themselves
    /// always given in bytes.
    pub fn bytes16(n: impl TryInto<u32>) -> Self {
        SizedStringSize(n.try_into().unwrap_or(0))
    }
}

impl BinRead for SizedWideString {
    type Args<'a> = (SizedStringSize,);

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let (size,) = args;
        let n_units = (size.0 / 2) as usize;
        let mut units = vec![0u16; n_units];
        for u in units.iter_mut() {
            *u = u16::read_options(reader, endian, ())?;
        }
        Ok(SizedWideString(String::from_utf16_lossy(&units)))
    }
}

impl BinWrite for SizedWideString {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        for u in self.0.encode_utf16() {
            u.write_options(writer, endian, ())?;
        }
        Ok(())
    }
}

impl SizedWideString {
    pub fn size(&self) -> usize {
        self.0.encode_utf16().count() * 2
    }
}

impl From<&str> for SizedWideString {
    fn from(value: &str) -> Self {
        SizedWideString(value.to_string())
    }
}

impl std::fmt::Display for SizedWideString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for SizedWideString {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}
