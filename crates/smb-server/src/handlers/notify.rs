//! CHANGE_NOTIFY handler. This server doesn't watch the backend for filesystem events, so a
//! notify request is acknowledged immediately with an empty change list rather than left
//! pending until something happens to watch.

use smb_msg::{ChangeNotifyRequest, ChangeNotifyResponse};

use crate::error::Result;

use super::HandlerContext;

pub async fn handle_change_notify(
    ctx: &HandlerContext<'_>,
    req: &ChangeNotifyRequest,
) -> Result<ChangeNotifyResponse> {
    ctx.session.handles.get(req.file_id.volatile)?;
    Ok(ChangeNotifyResponse {
        buffer: Default::default(),
    })
}
