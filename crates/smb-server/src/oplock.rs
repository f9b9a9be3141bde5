//! Oplock and lease state machine (component D): grant policy at CREATE, break rules on a
//! conflicting open, and the break-completion waitqueue.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OplockLevel {
    None,
    LevelII,
    Exclusive,
    Batch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeaseState {
    pub read: bool,
    pub write: bool,
    pub handle: bool,
}

impl LeaseState {
    pub const NONE: Self = Self {
        read: false,
        write: false,
        handle: false,
    };

    /// A lease requesting Write without Read, or Handle without Read, is invalid; downgrade
    /// it to the nearest valid state (per the grant-policy rule in the component design).
    pub fn sanitized(self) -> Self {
        if !self.read {
            return Self::NONE;
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakState {
    NotBreaking,
    Breaking,
}

/// Whether a newcomer's access would conflict with an existing oplock holder, per the
/// grant-policy note: "attribute-only" opens never cause a break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewcomerAccess {
    pub writes: bool,
    pub attribute_only: bool,
}

/// Applies the break rule for an existing holder against a newcomer's access, per §4.D.
/// Returns the level the holder should be downgraded to (`None` if no break is needed).
pub fn break_target(existing: OplockLevel, newcomer: NewcomerAccess) -> Option<OplockLevel> {
    if newcomer.attribute_only {
        return None;
    }
    match existing {
        OplockLevel::Exclusive | OplockLevel::Batch => {
            if !newcomer.writes {
                Some(OplockLevel::LevelII)
            } else {
                Some(OplockLevel::None)
            }
        }
        OplockLevel::LevelII => {
            if newcomer.writes {
                Some(OplockLevel::None)
            } else {
                None
            }
        }
        OplockLevel::None => None,
    }
}

/// One Open's oplock/lease record.
pub struct OplockRecord {
    pub level: Mutex<OplockLevel>,
    pub lease_key: Option<[u8; 16]>,
    pub lease_state: Mutex<LeaseState>,
    pub break_state: Mutex<BreakState>,
}

impl OplockRecord {
    pub fn new(level: OplockLevel, lease_key: Option<[u8; 16]>, lease_state: LeaseState) -> Self {
        Self {
            level: Mutex::new(level),
            lease_key,
            lease_state: Mutex::new(lease_state),
            break_state: Mutex::new(BreakState::NotBreaking),
        }
    }
}

/// Process-wide per-inode aggregator: every Open sharing an inode links into the same
/// `Ofile`, which owns the break-completion waitqueue. A single mutex guards grant/break
/// transitions for the inode (`ofile_list_lock` in the component design).
pub struct Ofile {
    holder: Mutex<Option<OplockLevel>>,
    break_complete: Notify,
    breaking: AtomicBool,
}

impl Ofile {
    pub fn new() -> Self {
        Self {
            holder: Mutex::new(None),
            break_complete: Notify::new(),
            breaking: AtomicBool::new(false),
        }
    }

    pub fn current_level(&self) -> OplockLevel {
        (*self.holder.lock()).unwrap_or(OplockLevel::None)
    }

    /// Records a freshly granted level for this inode's sole oplock holder.
    pub fn grant(&self, level: OplockLevel) {
        *self.holder.lock() = Some(level);
    }

    /// Begins a break: downgrades the recorded holder level and marks the Ofile as
    /// breaking, so subsequent CREATEs on this inode wait at the grant step (invariant 4).
    pub fn begin_break(&self, target: OplockLevel) {
        self.breaking.store(true, Ordering::SeqCst);
        *self.holder.lock() = Some(target);
    }

    /// Called once the holder has ACKed the break (or its connection dropped).
    pub fn complete_break(&self) {
        self.breaking.store(false, Ordering::SeqCst);
        self.break_complete.notify_waiters();
    }

    pub fn is_breaking(&self) -> bool {
        self.breaking.load(Ordering::SeqCst)
    }

    /// Waits for an in-flight break on this inode to complete, bounded by `timeout`. A
    /// conflicting CREATE calls this before proceeding past its grant step.
    pub async fn wait_for_break(&self, timeout: std::time::Duration) {
        if !self.is_breaking() {
            return;
        }
        let notified = self.break_complete.notified();
        tokio::select! {
            _ = notified => {}
            _ = tokio::time::sleep(timeout) => {
                log::warn!("oplock break wait timed out after {timeout:?}");
            }
        }
    }
}

impl Default for Ofile {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide registry mapping a canonical share-relative path to its `Ofile`, so every
/// Open of the same file across every connection shares one break-completion waitqueue.
#[derive(Default)]
pub struct OfileTable {
    inner: Mutex<HashMap<String, Arc<Ofile>>>,
}

impl OfileTable {
    /// Returns the `Ofile` for `key` (typically `"<share>/<path>"`), creating it on first use.
    pub fn get_or_create(&self, key: &str) -> Arc<Ofile> {
        let mut inner = self.inner.lock();
        inner
            .entry(key.to_owned())
            .or_insert_with(|| Arc::new(Ofile::new()))
            .clone()
    }
}

/// Oplock-break ACK transitions a client may request; anything else is a protocol error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakAck {
    WriteToRead,
    WriteToNone,
    ReadToNone,
}

impl BreakAck {
    pub fn resulting_level(self) -> OplockLevel {
        match self {
            BreakAck::WriteToRead => OplockLevel::LevelII,
            BreakAck::WriteToNone | BreakAck::ReadToNone => OplockLevel::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_breaks_to_level_ii_on_readonly_newcomer() {
        let target = break_target(
            OplockLevel::Batch,
            NewcomerAccess {
                writes: false,
                attribute_only: false,
            },
        );
        assert_eq!(target, Some(OplockLevel::LevelII));
    }

    #[test]
    fn batch_breaks_to_none_on_write_newcomer() {
        let target = break_target(
            OplockLevel::Exclusive,
            NewcomerAccess {
                writes: true,
                attribute_only: false,
            },
        );
        assert_eq!(target, Some(OplockLevel::None));
    }

    #[test]
    fn level_ii_survives_readonly_newcomer() {
        let target = break_target(
            OplockLevel::LevelII,
            NewcomerAccess {
                writes: false,
                attribute_only: false,
            },
        );
        assert_eq!(target, None);
    }

    #[test]
    fn attribute_only_open_never_breaks() {
        let target = break_target(
            OplockLevel::Batch,
            NewcomerAccess {
                writes: true,
                attribute_only: true,
            },
        );
        assert_eq!(target, None);
    }

    #[test]
    fn lease_write_without_read_downgrades_to_none() {
        let requested = LeaseState {
            read: false,
            write: true,
            handle: false,
        };
        assert_eq!(requested.sanitized(), LeaseState::NONE);
    }

    #[test]
    fn ofile_table_shares_one_ofile_per_key() {
        let table = OfileTable::default();
        let a = table.get_or_create("share/file.txt");
        let b = table.get_or_create("share/file.txt");
        assert!(Arc::ptr_eq(&a, &b));
        let c = table.get_or_create("share/other.txt");
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[tokio::test]
    async fn break_wait_unblocks_on_completion() {
        let ofile = std::sync::Arc::new(Ofile::new());
        ofile.begin_break(OplockLevel::LevelII);
        let waiter = {
            let ofile = ofile.clone();
            tokio::spawn(async move {
                ofile.wait_for_break(std::time::Duration::from_secs(5)).await;
            })
        };
        tokio::task::yield_now().await;
        ofile.complete_break();
        waiter.await.unwrap();
        assert!(!ofile.is_breaking());
    }
}
