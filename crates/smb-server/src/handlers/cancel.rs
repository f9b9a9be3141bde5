//! CANCEL handler. Per MS-SMB2 2.2.30 the server sends no response to this request; it
//! just wakes the pending handler (if any) blocked on the named `MessageId` so it can
//! return `STATUS_CANCELLED` to its own caller.
//!
//! Takes the pending-request table directly rather than a [`super::HandlerContext`]: unlike
//! every other command, CANCEL can arrive before a session is fully established and needs
//! nothing from the session/tree/backend beyond the ids already on the header.

use crate::session::PendingRequests;

pub fn handle_cancel(pending: &PendingRequests, session_id: u64, target_message_id: u64) {
    pending.cancel(session_id, target_message_id);
}
