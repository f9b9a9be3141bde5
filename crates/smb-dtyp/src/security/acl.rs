//! MS-DTYP 2.4.5: ACL

use binrw::prelude::*;

use crate::binrw_util::prelude::*;

use super::ACE;

#[binrw::binrw]
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ACL {
    pub acl_revision: AclRevision,
    #[bw(calc = 0)]
    #[br(temp)]
    #[br(assert(sbz1 == 0))]
    sbz1: u8,
    #[bw(calc = PosMarker::default())]
    #[br(temp)]
    _acl_size: PosMarker<u16>,
    #[bw(calc = ace.len() as u16)]
    #[br(temp)]
    ace_count: u16,
    #[bw(calc = 0)]
    #[br(temp)]
    #[br(assert(sbz2 == 0))]
    sbz2: u16,

    #[br(count = ace_count)]
    #[bw(write_with = PosMarker::write_size_plus, args(&_acl_size, Self::HEADER_SIZE))]
    pub ace: Vec<ACE>,
}

impl ACL {
    const HEADER_SIZE: u64 = 8;

    /// Orders the ACEs in the ACL according to the standard order.
    ///
    /// Note that since we do not have sufficient information about the inheritance,
    /// we only apply order which is independent of inheritance.
    ///
    /// The following steps describe the preferred order:
    /// 1. ✅ All explicit ACEs are placed in a group before any inherited ACEs.
    /// 2. ✅ Within the group of explicit ACEs, access-denied ACEs are placed before access-allowed ACEs.
    /// 3. ❌ Inherited ACEs are placed in the order in which they are inherited. ACEs inherited from the child object's parent come first, then ACEs inherited from the grandparent, and so on up the tree of objects.
    /// 4. ❌ For each level of inherited ACEs, access-denied ACEs are placed before access-allowed ACEs.
    ///
    /// See more information on [Order of ACEs in a DACL - MSDN](<https://learn.microsoft.com/en-us/windows/win32/secauthz/order-of-aces-in-a-dacl>)
    pub fn order_aces(&mut self) {
        self.ace.sort_by(Self::sort_aces_by);
    }

    /// Whether ACE ordering rules apply to this ACL.
    ///
    /// See [`order_aces`][ACL::order_aces] for the ordering rules.
    pub fn is_ace_sorted(&self) -> bool {
        self.ace
            .is_sorted_by(|a, b| Self::sort_aces_by(a, b).is_le())
    }

    /// Sorting function for ACEs.
    ///
    /// See [`order_aces`][ACL::order_aces] for the ordering rules.
    fn sort_aces_by(a: &ACE, b: &ACE) -> std::cmp::Ordering {
        let a_inherited = a.ace_flags.inherited();
        let b_inherited = b.ace_flags.inherited();
        if a_inherited != b_inherited {
            return a_inherited.cmp(&b_inherited); // (1)
        }
        if a_inherited {
            return std::cmp::Ordering::Equal; // keep original order for inherited ACEs (3)
        }
        let a_denied = a.value.is_access_allowed();
        let b_denied = b.value.is_access_allowed();
        a_denied.cmp(&b_denied) // (2) on explicit ACEs, access-denied first <=> access-allowed last
        // Note: the sort is stable, so we keep the original order for inherited ACEs
    }

    /// Insert an ACE into the ACL, maintaining the correct order.
    /// See [`order_aces`][ACL::order_aces] for the ordering rules.
    pub fn insert_ace(&mut self, ace: ACE) {
        self.ace.push(ace);
        self.order_aces();
    }
}

#[binrw::binrw]
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[brw(repr(u8))]
pub enum AclRevision {
    /// Windows NT 4.0
    Nt4 = 2,
    /// Active directory
    DS = 4,
}
