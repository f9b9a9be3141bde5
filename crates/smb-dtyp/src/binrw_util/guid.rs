//! [`Guid`]: MS-DTYP 2.3.4.2 (GUID)

use binrw::prelude::*;
use std::fmt;
use std::str::FromStr;

#[binrw::binrw]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    pub const ZERO: Guid = Guid {
        data1: 0,
        data2: 0,
        data3: 0,
        data4: [0; 8],
    };

    pub fn generate() -> Self {
        let mut data4 = [0u8; 8];
        rand::Rng::fill(&mut rand::thread_rng(), &mut data4);
        Guid {
            data1: rand::random(),
            data2: rand::random(),
            data3: rand::random(),
            data4,
        }
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.data1,
            self.data2,
            self.data3,
            self.data4[0],
            self.data4[1],
            self.data4[2],
            self.data4[3],
            self.data4[4],
            self.data4[5],
            self.data4[6],
            self.data4[7],
        )
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid GUID string")]
pub struct GuidParseError;

impl FromStr for Guid {
    type Err = GuidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 5 {
            return Err(GuidParseError);
        }
        let data1 = u32::from_str_radix(parts[0], 16).map_err(|_| GuidParseError)?;
        let data2 = u16::from_str_radix(parts[1], 16).map_err(|_| GuidParseError)?;
        let data3 = u16::from_str_radix(parts[2], 16).map_err(|_| GuidParseError)?;
        let tail = format!("{}{}", parts[3], parts[4]);
        if tail.len() != 16 {
            return Err(GuidParseError);
        }
        let mut data4 = [0u8; 8];
        for (i, b) in data4.iter_mut().enumerate() {
            *b = u8::from_str_radix(&tail[i * 2..i * 2 + 2], 16).map_err(|_| GuidParseError)?;
        }
        Ok(Guid {
            data1,
            data2,
            data3,
            data4,
        })
    }
}

/// Parses a literal GUID string at call time; panics on malformed input.
#[macro_export]
macro_rules! make_guid {
    ($s:expr) => {
        $s.parse::<$crate::binrw_util::guid::Guid>()
            .expect("invalid GUID literal")
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guid_roundtrip_display_parse() {
        let g = make_guid!("0000002b-000d-0000-3100-00000d000000");
        assert_eq!(g.to_string(), "0000002b-000d-0000-3100-00000d000000");
    }
}
