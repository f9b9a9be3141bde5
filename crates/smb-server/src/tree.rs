//! Share/tree-connect state (component E's TreeConnect leg): `Tcon` allocation, the
//! `IPC$` reservation, and share-attribute bits surfaced in the TreeConnect response.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

/// TreeId 1 is reserved for `IPC$` by convention in this server, matching the data model's
/// note that it's never reused for a disk share.
pub const IPC_TREE_ID: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareType {
    Disk,
    Pipe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShareFlags {
    pub read_only: bool,
    pub encrypt_data: bool,
}

/// A configured share, independent of any particular connection.
#[derive(Debug, Clone)]
pub struct Share {
    pub name: String,
    pub share_type: ShareType,
    pub local_path: String,
    pub flags: ShareFlags,
}

/// One TreeConnect's worth of state, scoped to a single session.
pub struct Tcon {
    pub tree_id: u32,
    pub share: Share,
}

/// Per-session table of connected trees.
#[derive(Default)]
pub struct TreeTable {
    inner: Mutex<HashMap<u32, std::sync::Arc<Tcon>>>,
    next_tree_id: AtomicU32,
}

impl TreeTable {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            next_tree_id: AtomicU32::new(IPC_TREE_ID + 1),
        }
    }

    pub fn connect(&self, share: Share) -> std::sync::Arc<Tcon> {
        let tree_id = if share.share_type == ShareType::Pipe && share.name.eq_ignore_ascii_case("IPC$") {
            IPC_TREE_ID
        } else {
            self.next_tree_id.fetch_add(1, Ordering::Relaxed)
        };
        let tcon = std::sync::Arc::new(Tcon { tree_id, share });
        self.inner.lock().insert(tree_id, tcon.clone());
        tcon
    }

    pub fn get(&self, tree_id: u32) -> Option<std::sync::Arc<Tcon>> {
        self.inner.lock().get(&tree_id).cloned()
    }

    pub fn disconnect(&self, tree_id: u32) -> Option<std::sync::Arc<Tcon>> {
        self.inner.lock().remove(&tree_id)
    }
}
