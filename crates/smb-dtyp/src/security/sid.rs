//! [`SID`]: MS-DTYP 2.4.2.2 (SID)

use binrw::io::{Read, Seek, Write};
use binrw::prelude::*;
use binrw::{BinResult, Endian};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SID {
    pub revision: u8,
    pub authority: [u8; 6],
    pub sub_authorities: Vec<u32>,
}

impl SID {
    /// Minimum wire size: revision(1) + sub_authority_count(1) + authority(6).
    pub const MIN_SIZE: usize = 1 + 1 + 6;

    pub const S_EVERYONE: &'static str = "S-1-1-0";

    fn authority_value(&self) -> u64 {
        let mut v = 0u64;
        for b in self.authority {
            v = (v << 8) | b as u64;
        }
        v
    }
}

impl BinRead for SID {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let revision = u8::read_options(reader, endian, ())?;
        let count = u8::read_options(reader, endian, ())?;
        let mut authority = [0u8; 6];
        reader.read_exact(&mut authority)?;
        let mut sub_authorities = Vec::with_capacity(count as usize);
        for _ in 0..count {
            sub_authorities.push(u32::read_options(reader, endian, ())?);
        }
        Ok(SID {
            revision,
            authority,
            sub_authorities,
        })
    }
}

impl BinWrite for SID {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        self.revision.write_options(writer, endian, ())?;
        (self.sub_authorities.len() as u8).write_options(writer, endian, ())?;
        writer.write_all(&self.authority)?;
        for sa in &self.sub_authorities {
            sa.write_options(writer, endian, ())?;
        }
        Ok(())
    }
}

impl fmt::Display for SID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}-{}", self.revision, self.authority_value())?;
        for sa in &self.sub_authorities {
            write!(f, "-{sa}")?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid SID string")]
pub struct SidParseError;

impl FromStr for SID {
    type Err = SidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('-');
        if parts.next() != Some("S") {
            return Err(SidParseError);
        }
        let revision = parts.next().ok_or(SidParseError)?.parse().map_err(|_| SidParseError)?;
        let authority_value: u64 = parts.next().ok_or(SidParseError)?.parse().map_err(|_| SidParseError)?;
        let mut authority = [0u8; 6];
        for (i, b) in authority.iter_mut().enumerate() {
            *b = ((authority_value >> (8 * (5 - i))) & 0xff) as u8;
        }
        let sub_authorities = parts
            .map(|p| p.parse::<u32>().map_err(|_| SidParseError))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SID {
            revision,
            authority,
            sub_authorities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sid_display_roundtrip() {
        let sid = SID::from_str(SID::S_EVERYONE).unwrap();
        assert_eq!(sid.to_string(), SID::S_EVERYONE);
    }
}
