//! QUERY_INFO / SET_INFO request and response payloads.

mod common;
mod query;
mod set;

pub use common::*;
pub use query::*;
pub use set::*;
