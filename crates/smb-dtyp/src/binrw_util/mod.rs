//! binrw helper types shared across the `smb-*` crates: fixed/sized strings, GUIDs,
//! timestamps, booleans, and the offset-patching [`pos_marker::PosMarker`].

pub mod boolean;
pub mod fixed_string;
pub mod filetime;
pub mod guid;
pub mod multi_sz;
pub mod pos_marker;
pub mod sized_wide_string;

/// Re-exports the types used at nearly every wire-struct call site in the `smb-*` crates.
pub mod prelude {
    pub use super::boolean::Boolean;
    pub use super::filetime::FileTime;
    pub use super::fixed_string::FixedWideString;
    pub use super::guid::Guid;
    pub use super::multi_sz::MultiWSz;
    pub use super::pos_marker::PosMarker;
    pub use super::sized_wide_string::{SizedStringSize, SizedWideString};
}
