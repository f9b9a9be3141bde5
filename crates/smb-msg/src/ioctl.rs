//! IOCTL requessts and responses implementation, and FSCTLs.

mod common;
mod fsctl;
mod msg;

pub use common::*;
pub use fsctl::*;
pub use msg::*;
