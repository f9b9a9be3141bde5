//! LOCK handler: byte-range locking. A `FailImmediately` or shared-lock conflict is reported
//! synchronously as `FILE_LOCK_CONFLICT`; an exclusive waiter without `FailImmediately` instead
//! hands its element back to the dispatcher as [`LockOutcome::Pending`], which answers the
//! request with an interim `STATUS_PENDING` and retries the grant in the background against
//! [`LockTable`]'s waitqueue (see `Dispatcher::spawn_pending_lock`).

use std::collections::HashMap;

use parking_lot::Mutex;
use smb_msg::{LockFlag, LockRequest, LockResponse};
use tokio::sync::Notify;

use crate::error::{Result, ServerError};

use super::HandlerContext;

#[derive(Debug, Clone, Copy)]
struct Range {
    offset: u64,
    length: u64,
    exclusive: bool,
}

impl Range {
    fn overlaps(&self, other: &Range) -> bool {
        let end = self.offset.saturating_add(self.length);
        let other_end = other.offset.saturating_add(other.length);
        self.offset < other_end && other.offset < end
    }
}

enum Apply {
    Applied,
    Conflict,
}

/// Per-file held lock ranges, keyed by volatile file id, plus a waitqueue woken on every
/// successful unlock so a pending exclusive waiter knows when to re-check for a conflict.
#[derive(Default)]
pub struct LockTable {
    inner: Mutex<HashMap<u64, Vec<Range>>>,
    released: Notify,
}

impl LockTable {
    fn try_apply(&self, file_id: u64, flags: LockFlag, offset: u64, length: u64) -> Apply {
        let mut inner = self.inner.lock();
        let ranges = inner.entry(file_id).or_default();

        if flags.unlock() {
            ranges.retain(|r| !(r.offset == offset && r.length == length));
            drop(inner);
            self.released.notify_waiters();
            return Apply::Applied;
        }

        let candidate = Range {
            offset,
            length,
            exclusive: flags.exclusive(),
        };
        let conflicts = ranges
            .iter()
            .any(|r| r.overlaps(&candidate) && (r.exclusive || candidate.exclusive));
        if conflicts {
            return Apply::Conflict;
        }
        ranges.push(candidate);
        Apply::Applied
    }

    /// Re-attempts a previously-conflicting range. Called by the dispatcher's background
    /// task each time it wakes from [`Self::wait_for_release`].
    pub(crate) fn try_grant(&self, file_id: u64, flags: LockFlag, offset: u64, length: u64) -> bool {
        matches!(self.try_apply(file_id, flags, offset, length), Apply::Applied)
    }

    /// Resolves the next time any file's lock ranges change (an unlock, almost always).
    pub(crate) async fn wait_for_release(&self) {
        self.released.notified().await;
    }
}

fn validate(req: &LockRequest) -> Result<()> {
    for element in &req.locks {
        if element.length == 0 && !element.flags.unlock() {
            return Err(ServerError::InvalidLockRange);
        }
    }
    Ok(())
}

/// Applies every element of `req` in order. Returns `Ok(None)` once all elements are applied.
/// A single conflicting exclusive element without `FailImmediately` is surfaced as
/// `Ok(Some(pending))` so the caller can switch to the pending-wait path; any other conflict
/// (shared, or exclusive with `FailImmediately`) is `FileLockConflict` immediately.
fn apply_once(locks: &LockTable, file_id: u64, req: &LockRequest) -> Result<Option<PendingLock>> {
    for element in &req.locks {
        match locks.try_apply(file_id, element.flags, element.offset, element.length) {
            Apply::Applied => continue,
            Apply::Conflict if element.flags.exclusive() && !element.flags.fail_immediately() => {
                return Ok(Some(PendingLock {
                    file_id,
                    flags: element.flags,
                    offset: element.offset,
                    length: element.length,
                }));
            }
            Apply::Conflict => return Err(ServerError::FileLockConflict),
        }
    }
    Ok(None)
}

/// One range that conflicted without `FailImmediately`, handed to the dispatcher so it can
/// spawn the background grant-retry task and answer this request with `STATUS_PENDING` now.
#[derive(Debug, Clone, Copy)]
pub struct PendingLock {
    pub file_id: u64,
    pub flags: LockFlag,
    pub offset: u64,
    pub length: u64,
}

pub enum LockOutcome {
    Done(LockResponse),
    Pending(PendingLock),
}

pub async fn handle_lock(
    ctx: &HandlerContext<'_>,
    locks: &LockTable,
    req: &LockRequest,
) -> Result<LockOutcome> {
    ctx.session.handles.get(req.file_id.volatile)?;
    validate(req)?;

    match apply_once(locks, req.file_id.volatile, req)? {
        None => Ok(LockOutcome::Done(LockResponse::default())),
        Some(pending) => Ok(LockOutcome::Pending(pending)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared() -> LockFlag {
        LockFlag::new().with_shared(true)
    }

    fn exclusive() -> LockFlag {
        LockFlag::new().with_exclusive(true)
    }

    fn exclusive_fail_immediately() -> LockFlag {
        LockFlag::new().with_exclusive(true).with_fail_immediately(true)
    }

    fn unlock() -> LockFlag {
        LockFlag::new().with_unlock(true)
    }

    #[test]
    fn non_overlapping_shared_locks_both_apply() {
        let table = LockTable::default();
        assert!(matches!(table.try_apply(1, shared(), 0, 10), Apply::Applied));
        assert!(matches!(table.try_apply(1, shared(), 10, 10), Apply::Applied));
    }

    #[test]
    fn exclusive_with_fail_immediately_conflicts_synchronously() {
        let table = LockTable::default();
        assert!(matches!(table.try_apply(1, shared(), 0, 10), Apply::Applied));
        assert!(matches!(
            table.try_apply(1, exclusive_fail_immediately(), 5, 5),
            Apply::Conflict
        ));
    }

    #[test]
    fn unlock_then_grant_clears_the_conflict_and_wakes_the_waitqueue() {
        let table = LockTable::default();
        assert!(matches!(table.try_apply(1, shared(), 0, 10), Apply::Applied));
        assert!(!table.try_grant(1, exclusive(), 5, 5));

        assert!(matches!(table.try_apply(1, unlock(), 0, 10), Apply::Applied));
        assert!(table.try_grant(1, exclusive(), 5, 5));
    }

    #[tokio::test]
    async fn wait_for_release_resolves_after_an_unlock() {
        let table = std::sync::Arc::new(LockTable::default());
        table.try_apply(1, shared(), 0, 10);

        let waiter = tokio::spawn({
            let table = table.clone();
            async move { table.wait_for_release().await }
        });
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        table.try_apply(1, unlock(), 0, 10);
        waiter.await.unwrap();
    }
}
