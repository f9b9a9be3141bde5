//! Per-connection volatile-ID allocation and the process-wide persistent-ID table backing
//! durable handles.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{Result, ServerError};
use crate::oplock::Ofile;

/// Sentinel meaning "use the last handle opened by this compound request".
pub const LAST_HANDLE: u64 = 0xFFFF_FFFF_FFFF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId {
    pub persistent: u64,
    pub volatile: u64,
}

/// One successful CREATE's worth of server-side state.
pub struct Open {
    pub id: FileId,
    pub path: String,
    pub is_directory: bool,
    pub delete_on_close: Mutex<bool>,
    pub is_durable: bool,
    pub ofile: Arc<Ofile>,
    pub dir_cursor: Mutex<Option<DirCursor>>,
}

/// Embedded directory-enumeration cursor state (per §3's Directory cursor).
#[derive(Default)]
pub struct DirCursor {
    pub staged: Vec<String>,
    pub next_index: usize,
    pub search_over: bool,
    pub pattern: Option<String>,
}

/// Per-connection table mapping volatile IDs to [`Open`]s. Accessed only from the owning
/// connection's worker tasks, so a single mutex suffices (per §5's lock design).
#[derive(Default)]
pub struct HandleTable {
    inner: Mutex<HandleTableInner>,
}

#[derive(Default)]
struct HandleTableInner {
    opens: HashMap<u64, Arc<Open>>,
    next_volatile: u64,
}

impl HandleTable {
    pub fn insert(&self, persistent: u64, path: String, is_directory: bool, ofile: Arc<Ofile>, is_durable: bool) -> Arc<Open> {
        let mut inner = self.inner.lock();
        let volatile = inner.next_volatile;
        inner.next_volatile += 1;
        let open = Arc::new(Open {
            id: FileId { persistent, volatile },
            path,
            is_directory,
            delete_on_close: Mutex::new(false),
            is_durable,
            ofile,
            dir_cursor: Mutex::new(None),
        });
        inner.opens.insert(volatile, open.clone());
        open
    }

    pub fn get(&self, volatile: u64) -> Result<Arc<Open>> {
        self.inner
            .lock()
            .opens
            .get(&volatile)
            .cloned()
            .ok_or(ServerError::FileClosed)
    }

    pub fn remove(&self, volatile: u64) -> Result<Arc<Open>> {
        self.inner
            .lock()
            .opens
            .remove(&volatile)
            .ok_or(ServerError::FileClosed)
    }

    /// All non-durable opens, for connection teardown; durable ones are handed to
    /// [`DurableTable`] instead by the caller.
    pub fn drain(&self) -> Vec<Arc<Open>> {
        self.inner.lock().opens.drain().map(|(_, v)| v).collect()
    }
}

/// Process-wide table of persistent IDs, surviving a connection's teardown until reclaimed.
#[derive(Default)]
pub struct DurableTable {
    next_persistent: AtomicU64,
    entries: Mutex<HashMap<u64, Arc<Open>>>,
}

impl DurableTable {
    pub fn allocate_persistent(&self) -> u64 {
        self.next_persistent.fetch_add(1, Ordering::Relaxed)
    }

    pub fn park(&self, open: Arc<Open>) {
        self.entries.lock().insert(open.id.persistent, open);
    }

    /// Reclaims a durable open by persistent id, as a `DHnC` reconnect does.
    pub fn reclaim(&self, persistent: u64) -> Option<Arc<Open>> {
        self.entries.lock().remove(&persistent)
    }

    pub fn evict(&self, persistent: u64) {
        self.entries.lock().remove(&persistent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oplock::Ofile;

    #[test]
    fn allocates_distinct_volatile_ids() {
        let table = HandleTable::default();
        let ofile = Arc::new(Ofile::new());
        let a = table.insert(1, "a.txt".into(), false, ofile.clone(), false);
        let b = table.insert(2, "b.txt".into(), false, ofile, false);
        assert_ne!(a.id.volatile, b.id.volatile);
    }

    #[test]
    fn unknown_handle_is_file_closed() {
        let table = HandleTable::default();
        assert!(matches!(table.get(42), Err(ServerError::FileClosed)));
    }

    #[test]
    fn teardown_drains_all_non_durable_opens() {
        let table = HandleTable::default();
        let ofile = Arc::new(Ofile::new());
        table.insert(1, "a.txt".into(), false, ofile.clone(), false);
        table.insert(2, "b.txt".into(), false, ofile, false);
        assert_eq!(table.drain().len(), 2);
        assert_eq!(table.drain().len(), 0);
    }
}
