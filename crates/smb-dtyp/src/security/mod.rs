//! MS-DTYP security types: SIDs, ACLs, ACEs, and security descriptors.

mod ace;
mod acl;
mod security_descriptor;
mod sid;

pub use ace::{AccessAce, AccessMask, AceFlags, AceValue, ACE};
pub use acl::{AclRevision, ACL};
pub use security_descriptor::{SecurityDescriptor, SecurityDescriptorControl};
pub use sid::SID;
