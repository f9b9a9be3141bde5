//! Per-command handlers (component G). Each module implements one command group's
//! contract against a [`HandlerContext`] bundling the session/tree/backend collaborators a
//! handler needs; [`crate::dispatcher`] matches on [`smb_msg::RequestContent`] and calls in.

mod cancel;
mod close;
mod create;
mod echo;
mod file;
mod info;
mod ioctl;
mod lock;
mod notify;
mod oplock_break;
mod query_dir;
mod tree_connect;

pub use cancel::handle_cancel;
pub use close::handle_close;
pub use create::handle_create;
pub use echo::handle_echo;
pub use file::{handle_flush, handle_read, handle_write};
pub use info::{handle_query_info, handle_set_info};
pub use ioctl::handle_ioctl;
pub use lock::{handle_lock, LockOutcome, LockTable, PendingLock};
pub use notify::handle_change_notify;
pub use oplock_break::handle_oplock_break_ack;
pub use query_dir::handle_query_directory;
pub use tree_connect::{handle_tree_connect, handle_tree_disconnect};

use std::sync::Arc;

use crate::backend::FilesystemBackend;
use crate::buffer_pool::BufferPools;
use crate::handle_table::DurableTable;
use crate::oplock::OfileTable;
use crate::pipe::PipeHandler;
use crate::registry::UserShareRegistry;
use crate::session::{Connection, Session};
use crate::tree::Tcon;

/// Everything a handler needs beyond its own request payload. `tcon` is `None` for the
/// commands that run before TreeConnect (Negotiate, SessionSetup, Logoff). Cancellation and
/// the LOCK pending-wait both live on `Dispatcher` directly (`self.pending`/`self.locks`)
/// rather than here, since they're driven by the dispatcher's own background tasks, not by a
/// handler acting within a single request/response turn.
pub struct HandlerContext<'a> {
    pub connection: &'a Connection,
    pub session: &'a Session,
    pub tcon: Option<Arc<Tcon>>,
    pub backend: &'a dyn FilesystemBackend,
    pub registry: &'a dyn UserShareRegistry,
    pub pipe_handler: &'a dyn PipeHandler,
    pub durable_handles: &'a DurableTable,
    pub buffers: &'a BufferPools,
    pub ofiles: &'a OfileTable,
}

impl<'a> HandlerContext<'a> {
    pub fn require_tcon(&self) -> crate::Result<&Arc<Tcon>> {
        self.tcon.as_ref().ok_or(crate::ServerError::NetworkNameDeleted)
    }
}
