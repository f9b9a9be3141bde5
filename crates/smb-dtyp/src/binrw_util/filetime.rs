//! [`FileTime`]: MS-DTYP 2.3.3 (FILETIME), 100ns intervals since 1601-01-01.

use binrw::prelude::*;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

const UNIX_EPOCH_OFFSET_100NS: i64 = 116_444_736_000_000_000;

#[binrw::binrw]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct FileTime(pub u64);

impl FileTime {
    /// The special `0` value, used by MS-SMB2 to mean "do not change this timestamp".
    pub const NO_CHANGE: FileTime = FileTime(0);

    pub fn now() -> Self {
        OffsetDateTime::now_utc().into()
    }
}

impl From<OffsetDateTime> for FileTime {
    fn from(value: OffsetDateTime) -> Self {
        let since_unix_100ns = (value - OffsetDateTime::UNIX_EPOCH).whole_nanoseconds() / 100;
        FileTime((since_unix_100ns + UNIX_EPOCH_OFFSET_100NS) as u64)
    }
}

impl From<FileTime> for OffsetDateTime {
    fn from(value: FileTime) -> Self {
        let since_unix_100ns = value.0 as i64 - UNIX_EPOCH_OFFSET_100NS;
        OffsetDateTime::UNIX_EPOCH + Duration::nanoseconds(since_unix_100ns * 100)
    }
}

impl From<PrimitiveDateTime> for FileTime {
    fn from(value: PrimitiveDateTime) -> Self {
        value.assume_utc().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_roundtrip() {
        let now = OffsetDateTime::now_utc();
        let ft: FileTime = now.into();
        let back: OffsetDateTime = ft.into();
        assert!((back - now).abs() < Duration::microseconds(1));
    }
}
