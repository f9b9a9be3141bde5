//! Test-only helpers shared across the workspace's `#[cfg(test)] mod tests` blocks:
//! hex-literal decoding and `binrw` round-trip test generators.

#![forbid(unsafe_code)]

pub use pastey;

/// Decodes a hex string literal (no `0x`, no separators) into a byte vector.
pub fn hex_to_vec(hex: &str) -> Vec<u8> {
    assert!(hex.len() % 2 == 0, "hex string must have an even length");
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("invalid hex digit"))
        .collect()
}

/// `hex_to_u8_array!("0102...")` decodes a hex literal to a `Vec<u8>` at test time.
#[macro_export]
macro_rules! hex_to_u8_array {
    ($hex:expr) => {
        $crate::hex_to_vec($hex)
    };
}

/// Asserts that decoding `$hex` via [`binrw::BinRead`] produces the given value.
#[macro_export]
macro_rules! test_binrw_read {
    (struct $ty:ident { $($field:ident : $val:expr),* $(,)? } => $hex:expr) => {
        $crate::pastey::paste! {
            #[test]
            fn [<test_ $ty:snake _read>]() {
                let bytes = $crate::hex_to_u8_array!($hex);
                let mut cursor = ::binrw::io::Cursor::new(bytes);
                let actual: $ty = ::binrw::BinRead::read_le(&mut cursor).unwrap();
                assert_eq!(actual, $ty { $($field: $val),* });
            }
        }
    };
    ($ty:ident => $name:ident : $val:expr => $hex:expr) => {
        $crate::pastey::paste! {
            #[test]
            fn [<test_ $ty:snake _ $name _read>]() {
                let bytes = $crate::hex_to_u8_array!($hex);
                let mut cursor = ::binrw::io::Cursor::new(bytes);
                let actual: $ty = ::binrw::BinRead::read_le(&mut cursor).unwrap();
                assert_eq!(actual, $val);
            }
        }
    };
    ($ty:ident : $val:expr => $hex:expr) => {
        $crate::pastey::paste! {
            #[test]
            fn [<test_ $ty:snake _read>]() {
                let bytes = $crate::hex_to_u8_array!($hex);
                let mut cursor = ::binrw::io::Cursor::new(bytes);
                let actual: $ty = ::binrw::BinRead::read_le(&mut cursor).unwrap();
                assert_eq!(actual, $val);
            }
        }
    };
}

/// Asserts that encoding the given value via [`binrw::BinWrite`] produces `$hex`.
#[macro_export]
macro_rules! test_binrw_write {
    (struct $ty:ident { $($field:ident : $val:expr),* $(,)? } => $hex:expr) => {
        $crate::pastey::paste! {
            #[test]
            fn [<test_ $ty:snake _write>]() {
                let value = $ty { $($field: $val),* };
                let mut cursor = ::binrw::io::Cursor::new(Vec::new());
                ::binrw::BinWrite::write_le(&value, &mut cursor).unwrap();
                assert_eq!(cursor.into_inner(), $crate::hex_to_u8_array!($hex));
            }
        }
    };
    ($ty:ident => $name:ident : $val:expr => $hex:expr) => {
        $crate::pastey::paste! {
            #[test]
            fn [<test_ $ty:snake _ $name _write>]() {
                let value: $ty = $val;
                let mut cursor = ::binrw::io::Cursor::new(Vec::new());
                ::binrw::BinWrite::write_le(&value, &mut cursor).unwrap();
                assert_eq!(cursor.into_inner(), $crate::hex_to_u8_array!($hex));
            }
        }
    };
    ($ty:ident : $val:expr => $hex:expr) => {
        $crate::pastey::paste! {
            #[test]
            fn [<test_ $ty:snake _write>]() {
                let value: $ty = $val;
                let mut cursor = ::binrw::io::Cursor::new(Vec::new());
                ::binrw::BinWrite::write_le(&value, &mut cursor).unwrap();
                assert_eq!(cursor.into_inner(), $crate::hex_to_u8_array!($hex));
            }
        }
    };
}

/// Round-trip read+write test in one call; see [`test_binrw_read`]/[`test_binrw_write`]
/// for the accepted forms.
#[macro_export]
macro_rules! test_binrw {
    (struct $ty:ident { $($field:ident : $val:expr),* $(,)? } => $hex:expr) => {
        $crate::test_binrw_read! { struct $ty { $($field: $val),* } => $hex }
        $crate::test_binrw_write! { struct $ty { $($field: $val),* } => $hex }
    };
    ($ty:ident => $name:ident : $val:expr => $hex:expr) => {
        $crate::test_binrw_read! { $ty => $name : $val => $hex }
        $crate::test_binrw_write! { $ty => $name : $val => $hex }
    };
    ($ty:ident : $val:expr => $hex:expr) => {
        $crate::test_binrw_read! { $ty : $val => $hex }
        $crate::test_binrw_write! { $ty : $val => $hex }
    };
}
