//! Server-side connection/session/phase state machine (component E): dialect negotiation,
//! two-leg NTLM SessionSetup, and TreeConnect validation against the user/share registry.
//!
//! At most one session exists per connection: `Connection::session` is a single
//! `tokio::sync::Mutex`-guarded slot, and a second `SessionSetup` on an already-established
//! session is rejected rather than silently replacing it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::RngCore;
use smb_dtyp::Guid;
use smb_msg::{Dialect, NegotiateCapabilities, SessionFlags};
use tokio::sync::Mutex as AsyncMutex;

use crate::error::{Result, ServerError};
use crate::handle_table::{DurableTable, HandleTable};
use crate::ntlm::{self, NtHashCipher};
use crate::registry::UserShareRegistry;
use crate::tree::TreeTable;

/// Which leg of NTLM SessionSetup a session is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingNegotiateMessage,
    AwaitingAuthenticateMessage,
    Established,
}

pub struct Session {
    pub session_id: u64,
    pub phase: AsyncMutex<SessionPhase>,
    pub user_name: AsyncMutex<Option<String>>,
    pub server_challenge: [u8; 8],
    pub session_key: AsyncMutex<Option<[u8; 16]>>,
    pub handles: HandleTable,
    pub trees: TreeTable,
}

impl Session {
    fn new(session_id: u64, server_challenge: [u8; 8]) -> Self {
        Self {
            session_id,
            phase: AsyncMutex::new(SessionPhase::AwaitingNegotiateMessage),
            user_name: AsyncMutex::new(None),
            server_challenge,
            session_key: AsyncMutex::new(None),
            handles: HandleTable::default(),
            trees: TreeTable::new(),
        }
    }
}

/// One accepted TCP connection's worth of state: the negotiated dialect, at most one
/// session, and the durable-handle table it shares with the rest of the process.
pub struct Connection {
    pub guid: Guid,
    pub dialect: AsyncMutex<Option<Dialect>>,
    pub client_capabilities: AsyncMutex<NegotiateCapabilities>,
    session: AsyncMutex<Option<Arc<Session>>>,
    pub durable_handles: Arc<DurableTable>,
    next_session_id: AtomicU64,
}

impl Connection {
    pub fn new(durable_handles: Arc<DurableTable>) -> Self {
        Self {
            guid: Guid::generate(),
            dialect: AsyncMutex::new(None),
            client_capabilities: AsyncMutex::new(NegotiateCapabilities::new()),
            session: AsyncMutex::new(None),
            durable_handles,
            next_session_id: AtomicU64::new(1),
        }
    }

    /// Selects the highest dialect this server and the client both support. 3.1.1 is
    /// excluded: negotiating it obligates the response to carry negotiate contexts this
    /// server doesn't yet produce, so the ceiling is 3.0.2 until that's implemented.
    pub fn negotiate_dialect(&self, offered: &[Dialect]) -> Result<Dialect> {
        const SUPPORTED: [Dialect; 4] = [
            Dialect::Smb0202,
            Dialect::Smb021,
            Dialect::Smb030,
            Dialect::Smb0302,
        ];
        SUPPORTED
            .iter()
            .rev()
            .find(|d| offered.contains(d))
            .copied()
            .ok_or(ServerError::DialectNotSupported)
    }

    /// Begins a new session, rejecting the request outright if one is already established
    /// on this connection (bind/multi-session is out of scope).
    pub async fn begin_session(&self) -> Result<Arc<Session>> {
        let mut slot = self.session.lock().await;
        if slot.is_some() {
            return Err(ServerError::InvalidParameter("session already established"));
        }
        let session_id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        let mut challenge = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut challenge);
        let session = Arc::new(Session::new(session_id, challenge));
        *slot = Some(session.clone());
        Ok(session)
    }

    pub async fn session(&self) -> Option<Arc<Session>> {
        self.session.lock().await.clone()
    }

    pub async fn logoff(&self) {
        *self.session.lock().await = None;
    }
}

/// Verifies a client's AUTHENTICATE_MESSAGE against a user record from the registry and,
/// on success, returns the session key and the resolved [`SessionFlags`].
pub async fn verify_authenticate(
    registry: &dyn UserShareRegistry,
    cipher: Option<&dyn NtHashCipher>,
    server_challenge: &[u8; 8],
    fields: &ntlm::AuthenticateFields,
) -> Result<([u8; 16], SessionFlags)> {
    let user = registry
        .find_user(&fields.user_name, &fields.domain_name)
        .ok_or(ServerError::LogonFailure)?;

    if ntlm::verify_ntlmv2(
        &user.nt_hash,
        &fields.user_name,
        &fields.domain_name,
        server_challenge,
        &fields.nt_challenge_response,
    ) {
        let key = ntlm::ntlmv2_key(&user.nt_hash, &fields.user_name, &fields.domain_name);
        let (proof, blob) = fields.nt_challenge_response.split_at(16.min(fields.nt_challenge_response.len()));
        let _ = proof;
        let session_key = ntlm::session_key_v2(&key, blob);
        return Ok((session_key, SessionFlags::new()));
    }

    if let Some(cipher) = cipher {
        if ntlm::verify_ntlmv1(cipher, &user.nt_hash, server_challenge, &fields.nt_challenge_response) {
            return Ok((user.nt_hash, SessionFlags::new()));
        }
    }

    Err(ServerError::LogonFailure)
}

/// Tracks in-flight requests by `(session_id, message_id)` for `SMB2_CANCEL` lookup, per
/// the compound/cancel design note. Also backs LOGOFF's request-drain suspension point: a
/// LOGOFF waits on [`Self::drain`] so it doesn't tear a session down out from under a LOCK
/// still suspended on this table's waitqueue.
#[derive(Default)]
pub struct PendingRequests {
    inner: std::sync::Mutex<HashMap<(u64, u64), tokio::sync::oneshot::Sender<()>>>,
    drained: tokio::sync::Notify,
}

impl PendingRequests {
    pub fn register(&self, session_id: u64, message_id: u64) -> tokio::sync::oneshot::Receiver<()> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.inner.lock().unwrap().insert((session_id, message_id), tx);
        rx
    }

    pub fn complete(&self, session_id: u64, message_id: u64) {
        self.inner.lock().unwrap().remove(&(session_id, message_id));
        self.drained.notify_waiters();
    }

    /// `SMB2_CANCEL` carries the message id to cancel; firing its sender wakes the handler.
    pub fn cancel(&self, session_id: u64, message_id: u64) {
        if let Some(tx) = self.inner.lock().unwrap().remove(&(session_id, message_id)) {
            let _ = tx.send(());
        }
        self.drained.notify_waiters();
    }

    fn has_pending(&self, session_id: u64) -> bool {
        self.inner.lock().unwrap().keys().any(|(s, _)| *s == session_id)
    }

    /// Blocks until no request tracked for `session_id` remains (granted, errored, or
    /// cancelled). LOGOFF calls this before clearing the session slot.
    pub async fn drain(&self, session_id: u64) {
        loop {
            let notified = self.drained.notified();
            if !self.has_pending(session_id) {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negotiates_highest_common_dialect_below_311() {
        let conn = Connection::new(Arc::new(DurableTable::default()));
        let dialect = conn
            .negotiate_dialect(&[Dialect::Smb0202, Dialect::Smb030, Dialect::Smb0311])
            .unwrap();
        assert_eq!(dialect, Dialect::Smb030);
    }

    #[test]
    fn rejects_dialect_set_with_no_overlap() {
        let conn = Connection::new(Arc::new(DurableTable::default()));
        assert!(matches!(
            conn.negotiate_dialect(&[Dialect::Smb0302]),
            Err(ServerError::DialectNotSupported)
        ));
    }

    #[tokio::test]
    async fn second_session_setup_on_same_connection_is_rejected() {
        let conn = Connection::new(Arc::new(DurableTable::default()));
        conn.begin_session().await.unwrap();
        assert!(matches!(
            conn.begin_session().await,
            Err(ServerError::InvalidParameter(_))
        ));
    }

    #[tokio::test]
    async fn logoff_clears_the_session_slot() {
        let conn = Connection::new(Arc::new(DurableTable::default()));
        conn.begin_session().await.unwrap();
        conn.logoff().await;
        assert!(conn.session().await.is_none());
        assert!(conn.begin_session().await.is_ok());
    }

    #[tokio::test]
    async fn drain_returns_immediately_with_nothing_pending() {
        let pending = PendingRequests::default();
        pending.drain(1).await;
    }

    #[tokio::test]
    async fn drain_waits_for_completion_then_returns() {
        let pending = Arc::new(PendingRequests::default());
        let _rx = pending.register(1, 42);

        let waiter = tokio::spawn({
            let pending = pending.clone();
            async move { pending.drain(1).await }
        });
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        pending.complete(1, 42);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn cancel_wakes_the_registered_receiver() {
        let pending = PendingRequests::default();
        let rx = pending.register(7, 9);
        pending.cancel(7, 9);
        assert!(rx.await.is_ok());
    }
}
