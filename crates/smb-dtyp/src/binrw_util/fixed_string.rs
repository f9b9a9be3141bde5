//! [`FixedWideString<N>`]: a fixed `N`-byte UTF-16LE buffer, null-padded, used for short
//! (8.3-style) fixed-width name fields.

use binrw::io::{Read, Seek, Write};
use binrw::prelude::*;
use binrw::{BinResult, Endian};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedWideString<const N: usize>(String);

impl<const N: usize> BinRead for FixedWideString<N> {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let n_units = N / 2;
        let mut units = vec![0u16; n_units];
        for u in units.iter_mut() {
            *u = u16::read_options(reader, endian, ())?;
        }
        let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
        Ok(FixedWideString(String::from_utf16_lossy(&units[..end])))
    }
}

impl<const N: usize> BinWrite for FixedWideString<N> {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        let mut units: Vec<u16> = self.0.encode_utf16().collect();
        units.resize(N / 2, 0);
        for u in units {
            u.write_options(writer, endian, ())?;
        }
        Ok(())
    }
}

impl<const N: usize> From<&str> for FixedWideString<N> {
    fn from(value: &str) -> Self {
        FixedWideString(value.chars().take(N / 2).collect())
    }
}

impl<const N: usize> std::fmt::Display for FixedWideString<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
