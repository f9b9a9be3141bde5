//! Command dispatcher (component F): turns one NetBIOS-framed PDU into a dispatch over
//! [`RequestContent`]/[`Command`], walks compound chains, grants credits, and hands
//! per-file-object commands to [`crate::handlers`]. Negotiate/SessionSetup/Logoff are
//! session-lifecycle concerns (component E) and are resolved here directly against
//! [`Session`]/[`Connection`] rather than through a `handlers::` module, since nothing else
//! needs to call them mid-chain the way CREATE or QUERY_INFO do.

use std::io::Cursor;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use binrw::{BinRead, BinWrite};
use smb_dtyp::binrw_util::filetime::FileTime;
use smb_msg::{
    Command, ErrorResponse, GlobalCapabilities, Header, HeaderFlags, LockResponse, LogoffResponse,
    NegotiateDialect, NegotiateRequest, NegotiateResponse, NegotiateSecurityMode, PlainRequest,
    PlainResponse, Request, RequestContent, ResponseContent, SessionFlags, SessionSetupRequest,
    SessionSetupResponse, Status,
};
use tokio::sync::Mutex as AsyncMutex;

use crate::backend::FilesystemBackend;
use crate::buffer_pool::BufferPools;
use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::handle_table::{DurableTable, LAST_HANDLE};
use crate::handlers::{self, HandlerContext, LockTable};
use crate::ntlm::{NtHashCipher, NtlmMessageCodec};
use crate::oplock::OfileTable;
use crate::pipe::PipeHandler;
use crate::registry::UserShareRegistry;
use crate::session::{Connection, PendingRequests, Session, SessionPhase};
use crate::tree::Tcon;

/// Per-connection state shared by every request task spawned for that connection. One
/// instance is created per accepted socket (see `crate::server::run`).
pub struct Dispatcher {
    pub connection: Connection,
    ofiles: OfileTable,
    pending: PendingRequests,
    locks: LockTable,
    buffers: BufferPools,
    backend: Arc<dyn FilesystemBackend>,
    registry: Arc<dyn UserShareRegistry>,
    pipe_handler: Arc<dyn PipeHandler>,
    ntlm_codec: Arc<dyn NtlmMessageCodec>,
    ntlmv1_cipher: Option<Arc<dyn NtHashCipher>>,
    server_name: String,
    server_guid: smb_dtyp::Guid,
    server_start_time: SystemTime,
    max_credits: u16,
    credits_granted: AtomicU16,
    /// Serializes frame writes; requests may complete out of order once compounding and
    /// per-request concurrency are in play.
    writer: AsyncMutex<smb_transport::NetBiosFrameWriter>,
}

impl Dispatcher {
    pub fn new(
        config: &ServerConfig,
        durable_handles: Arc<DurableTable>,
        writer: smb_transport::NetBiosFrameWriter,
    ) -> Self {
        Self {
            connection: Connection::new(durable_handles),
            ofiles: OfileTable::default(),
            pending: PendingRequests::default(),
            locks: LockTable::default(),
            buffers: BufferPools::default(),
            backend: config.backend.clone(),
            registry: config.registry.clone(),
            pipe_handler: config.pipe_handler.clone(),
            ntlm_codec: config.ntlm_codec.clone(),
            ntlmv1_cipher: config.ntlmv1_cipher.clone(),
            server_name: config.server_name.clone(),
            server_guid: smb_dtyp::Guid::generate(),
            server_start_time: SystemTime::now(),
            max_credits: config.max_credits,
            credits_granted: AtomicU16::new(0),
            writer: AsyncMutex::new(writer),
        }
    }

    /// Parses one NetBIOS frame (a compound chain of one or more PDUs sharing the frame)
    /// and writes its response chain back. Malformed framing drops the connection;
    /// per-command errors become that sub-request's `ErrorResponse` only. `SMB2_CANCEL`
    /// produces no response PDU at all (MS-SMB2 2.2.30) and is handled inline rather than
    /// through [`Self::dispatch_one`].
    pub async fn dispatch_frame(self: &Arc<Self>, frame: Vec<u8>) -> Result<()> {
        let request = Request::read_le(&mut Cursor::new(&frame))
            .map_err(|e| ServerError::ParseError(e.to_string()))?;
        let Request::Plain(first) = request else {
            return Err(ServerError::NotSupported);
        };

        let mut responses = Vec::new();
        let mut carried_file_id: Option<smb_msg::FileId> = None;
        let mut next = Some(first);
        let mut offset = 0usize;

        while let Some(plain) = next.take() {
            let header = plain.header.clone();
            let related = header.flags.related_operations();

            if let RequestContent::Cancel(_) = &plain.content {
                handlers::handle_cancel(&self.pending, header.session_id, header.message_id);
            } else {
                let charge = self.charge_for(&plain.content);
                let (response_content, status, file_id_out) = self
                    .dispatch_one(
                        &header,
                        plain.content,
                        related.then_some(carried_file_id).flatten(),
                    )
                    .await;
                if let Some(id) = file_id_out {
                    carried_file_id = Some(id);
                }
                let granted = self.grant_credits(header.command, header.credit_request, charge, status);
                // An interim STATUS_PENDING response is sent as an async header (MS-SMB2
                // 2.2.1.1); the eventual completion reuses the same AsyncId, see
                // `Self::send_completion`.
                let mut resp_header = header.clone();
                if matches!(status, Status::Pending) {
                    resp_header.to_async(header.message_id);
                }
                responses.push(self.build_response(&resp_header, status, granted, response_content));
            }

            if header.next_command == 0 {
                break;
            }
            let start = offset + header.next_command as usize;
            if start >= frame.len() {
                break;
            }
            offset = start;
            match PlainRequest::read_le(&mut Cursor::new(&frame[start..])) {
                Ok(p) => next = Some(p),
                Err(_) => break,
            }
        }

        self.write_responses(&responses).await
    }

    async fn dispatch_one(
        self: &Arc<Self>,
        header: &Header,
        content: RequestContent,
        carried_file_id: Option<smb_msg::FileId>,
    ) -> (ResponseContent, Status, Option<smb_msg::FileId>) {
        let command = header.command;
        match self.dispatch_inner(header, content, carried_file_id).await {
            Ok(triple) => triple,
            Err(err) => {
                log::warn!("{command} failed: {err}");
                (
                    ResponseContent::Error(ErrorResponse {
                        error_data: Vec::new(),
                    }),
                    err.to_status(),
                    None,
                )
            }
        }
    }

    /// Resolves `session_id`/`tree_id` from the header, builds a [`HandlerContext`], and
    /// calls the matching handler. Returns the file id a CREATE allocated, if any, so the
    /// caller can thread it to a `RELATED_OPERATIONS` sub-request, and the status to place
    /// in the header — almost always `Success`, except NTLM's first SessionSetup leg, which
    /// carries a real response body alongside `STATUS_MORE_PROCESSING_REQUIRED`.
    async fn dispatch_inner(
        self: &Arc<Self>,
        header: &Header,
        content: RequestContent,
        carried_file_id: Option<smb_msg::FileId>,
    ) -> Result<(ResponseContent, Status, Option<smb_msg::FileId>)> {
        match content {
            RequestContent::Negotiate(req) => {
                let resp = self.negotiate(&req).await?;
                Ok((resp.into(), Status::Success, None))
            }
            RequestContent::SessionSetup(req) => match self.session_setup(header, &req).await {
                Ok(resp) => Ok((resp.into(), Status::Success, None)),
                Err(ServerError::MoreProcessingRequired(challenge)) => {
                    let resp = SessionSetupResponse {
                        session_flags: SessionFlags::new(),
                        buffer: challenge,
                    };
                    Ok((resp.into(), Status::MoreProcessingRequired, None))
                }
                Err(e) => Err(e),
            },
            RequestContent::Logoff(_req) => {
                // Request-drain suspension point: don't clear the session slot while a LOCK
                // on it is still suspended waiting on `self.locks`'s waitqueue.
                if let Some(session) = self.connection.session().await {
                    self.pending.drain(session.session_id).await;
                }
                self.connection.logoff().await;
                Ok((LogoffResponse::default().into(), Status::Success, None))
            }
            other => {
                let session = self
                    .connection
                    .session()
                    .await
                    .filter(|s| s.session_id == header.session_id)
                    .ok_or(ServerError::UserSessionDeleted)?;
                let tcon = header.tree_id.and_then(|id| session.trees.get(id));
                let resolved = substitute_last_handle(other, carried_file_id)?;
                self.dispatch_command(header, &session, tcon, resolved).await
            }
        }
    }

    async fn dispatch_command(
        self: &Arc<Self>,
        header: &Header,
        session: &Arc<Session>,
        tcon: Option<Arc<Tcon>>,
        content: RequestContent,
    ) -> Result<(ResponseContent, Status, Option<smb_msg::FileId>)> {
        let ctx = HandlerContext {
            connection: &self.connection,
            session: session.as_ref(),
            tcon,
            backend: self.backend.as_ref(),
            registry: self.registry.as_ref(),
            pipe_handler: self.pipe_handler.as_ref(),
            durable_handles: self.connection.durable_handles.as_ref(),
            buffers: &self.buffers,
            ofiles: &self.ofiles,
        };

        use RequestContent::*;
        Ok(match content {
            TreeConnect(req) => {
                let (_tcon, resp) = handlers::handle_tree_connect(&ctx, &req).await?;
                (resp.into(), Status::Success, None)
            }
            TreeDisconnect(req) => (
                handlers::handle_tree_disconnect(&ctx, &req).await?.into(),
                Status::Success,
                None,
            ),
            Create(req) => {
                let resp = handlers::handle_create(&ctx, &req).await?;
                let id = resp.file_id;
                (resp.into(), Status::Success, Some(id))
            }
            Close(req) => (handlers::handle_close(&ctx, &req).await?.into(), Status::Success, None),
            Read(req) => (handlers::handle_read(&ctx, &req).await?.into(), Status::Success, None),
            Write(req) => {
                let data = req.buffer.clone();
                (
                    handlers::handle_write(&ctx, &req, &data).await?.into(),
                    Status::Success,
                    None,
                )
            }
            Flush(req) => (handlers::handle_flush(&ctx, &req).await?.into(), Status::Success, None),
            Lock(req) => match handlers::handle_lock(&ctx, &self.locks, &req).await? {
                handlers::LockOutcome::Done(resp) => (resp.into(), Status::Success, None),
                handlers::LockOutcome::Pending(pending) => {
                    self.spawn_pending_lock(header.clone(), pending);
                    (ResponseContent::Lock(LockResponse::default()), Status::Pending, None)
                }
            },
            QueryInfo(req) => (
                handlers::handle_query_info(&ctx, &req).await?.into(),
                Status::Success,
                None,
            ),
            SetInfo(req) => (handlers::handle_set_info(&ctx, &req).await?.into(), Status::Success, None),
            QueryDirectory(req) => (
                handlers::handle_query_directory(&ctx, &req).await?.into(),
                Status::Success,
                None,
            ),
            Ioctl(req) => (handlers::handle_ioctl(&ctx, &req).await?.into(), Status::Success, None),
            ChangeNotify(req) => (
                handlers::handle_change_notify(&ctx, &req).await?.into(),
                Status::Success,
                None,
            ),
            Echo(req) => (handlers::handle_echo(&req).await?.into(), Status::Success, None),
            OplockBreakAck(req) => (
                ResponseContent::OplockBreak(handlers::handle_oplock_break_ack(&ctx, &req).await?),
                Status::Success,
                None,
            ),
            LeaseBreakAck(_req) => return Err(ServerError::NotSupported),
            Cancel(_) | Negotiate(_) | SessionSetup(_) | Logoff(_) => {
                unreachable!("handled in dispatch_frame/dispatch_inner")
            }
        })
    }

    /// Answers a non-`FailImmediately` exclusive LOCK that conflicted with `STATUS_PENDING`
    /// now (the caller already builds that response from this call's absence of a result) and
    /// retries the grant in the background: each time [`handlers::LockTable`]'s waitqueue
    /// wakes, it re-attempts the element, sending the real final response — `STATUS_OK` once
    /// granted, nothing at all if `SMB2_CANCEL` fires this MessageId's entry in `self.pending`
    /// first (MS-SMB2 3.3.4.25: a cancelled pending request gets no further response).
    fn spawn_pending_lock(self: &Arc<Self>, header: Header, pending: handlers::PendingLock) {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            let mut cancelled = dispatcher.pending.register(header.session_id, header.message_id);
            loop {
                tokio::select! {
                    _ = dispatcher.locks.wait_for_release() => {}
                    _ = &mut cancelled => {
                        return;
                    }
                }
                if dispatcher
                    .locks
                    .try_grant(pending.file_id, pending.flags, pending.offset, pending.length)
                {
                    break;
                }
            }
            dispatcher.pending.complete(header.session_id, header.message_id);
            dispatcher
                .send_completion(&header, Status::Success, ResponseContent::Lock(LockResponse::default()))
                .await;
        });
    }

    /// Sends a single response frame outside the normal per-frame response batch: the final
    /// grant for a LOCK previously answered with an interim `STATUS_PENDING`. Per MS-SMB2
    /// 2.2.1.1, a completion response carries `AsyncId` (reusing the original `MessageId`,
    /// mirroring `smb_msg::Header`'s own async-header test fixture) instead of `TreeId`.
    async fn send_completion(&self, header: &Header, status: Status, content: ResponseContent) {
        let mut async_header = header.clone();
        async_header.to_async(header.message_id);
        let granted = self.grant_credits(async_header.command, 0, 1, status);
        let response = self.build_response(&async_header, status, granted, content);
        if let Err(err) = self.write_responses(std::slice::from_ref(&response)).await {
            log::warn!("failed to send async lock completion: {err}");
        }
    }

    async fn negotiate(&self, req: &NegotiateRequest) -> Result<NegotiateResponse> {
        let dialect = self.connection.negotiate_dialect(&req.dialects)?;
        *self.connection.dialect.lock().await = Some(dialect);

        let dialect_revision = match dialect {
            smb_msg::Dialect::Smb0202 => NegotiateDialect::Smb0202,
            smb_msg::Dialect::Smb021 => NegotiateDialect::Smb021,
            smb_msg::Dialect::Smb030 => NegotiateDialect::Smb030,
            smb_msg::Dialect::Smb0302 => NegotiateDialect::Smb0302,
            smb_msg::Dialect::Smb0311 => NegotiateDialect::Smb0311,
        };

        Ok(NegotiateResponse {
            security_mode: NegotiateSecurityMode::new().with_signing_enabled(true),
            dialect_revision,
            server_guid: self.server_guid,
            capabilities: GlobalCapabilities::new().with_large_mtu(true),
            max_transact_size: crate::buffer_pool::LARGE_BUFFER_SIZE as u32,
            max_read_size: crate::buffer_pool::LARGE_BUFFER_SIZE as u32,
            max_write_size: crate::buffer_pool::LARGE_BUFFER_SIZE as u32,
            system_time: FileTime::now(),
            server_start_time: system_time_to_filetime(self.server_start_time),
            buffer: Vec::new(),
            negotiate_context_list: None,
        })
    }

    /// The two-leg NTLM flow. The first leg (no existing session, or a session awaiting its
    /// NEGOTIATE_MESSAGE) begins/advances the session and returns
    /// `Err(ServerError::MoreProcessingRequired(challenge))` so [`Self::dispatch_inner`] can
    /// send the challenge blob back tagged `STATUS_MORE_PROCESSING_REQUIRED` — that leg isn't
    /// a failure, it just can't return a normal `Ok(SessionSetupResponse)` from here because
    /// the caller needs the non-success status alongside a real body. The second leg verifies
    /// the AUTHENTICATE_MESSAGE and establishes the session.
    async fn session_setup(
        &self,
        header: &Header,
        req: &SessionSetupRequest,
    ) -> Result<SessionSetupResponse> {
        let session = if header.session_id == 0 {
            self.connection.begin_session().await?
        } else {
            self.connection
                .session()
                .await
                .filter(|s| s.session_id == header.session_id)
                .ok_or(ServerError::UserSessionDeleted)?
        };
        *self.connection.client_capabilities.lock().await = req.capabilities;

        let mut phase = session.phase.lock().await;
        match *phase {
            SessionPhase::AwaitingNegotiateMessage => {
                let challenge = self
                    .ntlm_codec
                    .build_challenge(session.server_challenge, &self.server_name);
                *phase = SessionPhase::AwaitingAuthenticateMessage;
                Err(ServerError::MoreProcessingRequired(challenge))
            }
            SessionPhase::AwaitingAuthenticateMessage => {
                let fields = self
                    .ntlm_codec
                    .parse_authenticate(&req.buffer)
                    .ok_or(ServerError::LogonFailure)?;
                let (session_key, flags) = crate::session::verify_authenticate(
                    self.registry.as_ref(),
                    self.ntlmv1_cipher.as_deref(),
                    &session.server_challenge,
                    &fields,
                )
                .await?;
                *session.user_name.lock().await = Some(fields.user_name);
                *session.session_key.lock().await = Some(session_key);
                *phase = SessionPhase::Established;
                Ok(SessionSetupResponse {
                    session_flags: flags,
                    buffer: Vec::new(),
                })
            }
            SessionPhase::Established => Err(ServerError::InvalidParameter("session already established")),
        }
    }

    /// SMB3 large-I/O charge formula: `ceil(max(request payload, expected response)/64KiB)`,
    /// minimum 1.
    fn charge_for(&self, content: &RequestContent) -> u16 {
        const UNIT: u32 = 64 * 1024;
        let size = content.req_payload_size().max(content.expected_resp_size());
        (size.div_ceil(UNIT)).clamp(1, u16::MAX as u32) as u16
    }

    /// Grants credits per §4.F: Negotiate grants only the charge; SessionSetup grants the
    /// charge plus up to 32 only once established; every other command grants the charge
    /// plus `min(requested-1, 32)`. The running total is capped at `max_credits`.
    fn grant_credits(&self, command: Command, requested: u16, charge: u16, status: Status) -> u16 {
        let bonus = match command {
            Command::Negotiate => 0,
            Command::SessionSetup => {
                if matches!(status, Status::Success) {
                    32
                } else {
                    0
                }
            }
            _ => requested.saturating_sub(1).min(32),
        };
        let current = self.credits_granted.load(Ordering::Relaxed);
        let grant = (charge + bonus).min(self.max_credits.saturating_sub(current));
        self.credits_granted.fetch_add(grant, Ordering::Relaxed);
        grant.max(1)
    }

    fn build_response(
        &self,
        req_header: &Header,
        status: Status,
        credit_grant: u16,
        content: ResponseContent,
    ) -> PlainResponse {
        let flags = HeaderFlags::new()
            .with_server_to_redir(true)
            .with_async_command(req_header.flags.async_command());
        PlainResponse {
            header: Header {
                credit_charge: req_header.credit_charge,
                status: status as u32,
                command: req_header.command,
                credit_request: credit_grant,
                flags,
                next_command: 0,
                message_id: req_header.message_id,
                tree_id: req_header.tree_id,
                async_id: req_header.async_id,
                session_id: req_header.session_id,
                signature: 0,
            },
            content,
        }
    }

    async fn write_responses(&self, responses: &[PlainResponse]) -> Result<()> {
        if responses.is_empty() {
            return Ok(());
        }
        let mut bytes = Vec::new();
        for (index, response) in responses.iter().enumerate() {
            let mut cursor = Cursor::new(Vec::new());
            response
                .write_le(&mut cursor)
                .map_err(|e| ServerError::ParseError(e.to_string()))?;
            let mut body = cursor.into_inner();
            if index + 1 < responses.len() {
                while body.len() % 8 != 0 {
                    body.push(0);
                }
            }
            bytes.extend_from_slice(&body);
        }
        let mut writer = self.writer.lock().await;
        writer.write_frame(&[&bytes]).await?;
        Ok(())
    }
}

/// Swaps the `LAST_HANDLE` sentinel file id (`0xFFFFFFFFFFFFFFFF` on both fields, per
/// MS-SMB2 3.3.5.2.11) in a `RELATED_OPERATIONS` sub-request for the prior CREATE's id.
fn substitute_last_handle(
    content: RequestContent,
    carried: Option<smb_msg::FileId>,
) -> Result<RequestContent> {
    fn is_sentinel(id: smb_msg::FileId) -> bool {
        id.persistent == LAST_HANDLE && id.volatile == LAST_HANDLE
    }
    macro_rules! resolve {
        ($variant:ident, $req:ident) => {{
            let mut req = $req;
            if is_sentinel(req.file_id) {
                req.file_id = carried.ok_or(ServerError::InvalidParameter(
                    "RELATED_OPERATIONS with no carried file id",
                ))?;
            }
            Ok(RequestContent::$variant(req))
        }};
    }
    match content {
        RequestContent::Close(req) => resolve!(Close, req),
        RequestContent::Read(req) => resolve!(Read, req),
        RequestContent::Write(req) => resolve!(Write, req),
        RequestContent::Flush(req) => resolve!(Flush, req),
        RequestContent::Lock(req) => resolve!(Lock, req),
        RequestContent::QueryInfo(req) => resolve!(QueryInfo, req),
        RequestContent::SetInfo(req) => resolve!(SetInfo, req),
        RequestContent::QueryDirectory(req) => resolve!(QueryDirectory, req),
        RequestContent::Ioctl(req) => resolve!(Ioctl, req),
        RequestContent::ChangeNotify(req) => resolve!(ChangeNotify, req),
        other => Ok(other),
    }
}

fn system_time_to_filetime(time: SystemTime) -> FileTime {
    time::OffsetDateTime::from(time).into()
}
