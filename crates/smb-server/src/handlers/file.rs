//! READ/WRITE/FLUSH handlers.

use smb_msg::{FlushRequest, FlushResponse, ReadRequest, ReadResponse, WriteRequest, WriteResponse};

use crate::error::{Result, ServerError};

use super::HandlerContext;

pub async fn handle_read(ctx: &HandlerContext<'_>, req: &ReadRequest) -> Result<ReadResponse> {
    let tcon = ctx.require_tcon()?;
    let open = ctx.session.handles.get(req.file_id.volatile)?;
    if open.is_directory {
        return Err(ServerError::FileIsADirectory);
    }
    let root = std::path::Path::new(&tcon.share.local_path);
    let data = ctx.backend.read(root, &open.path, req.offset, req.length as usize)?;
    if (data.len() as u32) < req.minimum_count {
        return Err(ServerError::UnexpectedIoError(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "short read below MinimumCount",
        )));
    }
    Ok(ReadResponse { buffer: data })
}

/// `data` is the write payload, sliced by the dispatcher from the raw frame at the
/// request's data offset (WRITE carries its payload out-of-band from the `binrw`-decoded
/// fixed body, per MS-SMB2 2.2.21's zero-copy layout).
pub async fn handle_write(
    ctx: &HandlerContext<'_>,
    req: &WriteRequest,
    data: &[u8],
) -> Result<WriteResponse> {
    let tcon = ctx.require_tcon()?;
    let open = ctx.session.handles.get(req.file_id.volatile)?;
    if open.is_directory {
        return Err(ServerError::FileIsADirectory);
    }
    let root = std::path::Path::new(&tcon.share.local_path);
    let written = ctx.backend.write(root, &open.path, req.offset, data)?;
    Ok(WriteResponse { count: written })
}

pub async fn handle_flush(ctx: &HandlerContext<'_>, req: &FlushRequest) -> Result<FlushResponse> {
    let tcon = ctx.require_tcon()?;
    let open = ctx.session.handles.get(req.file_id.volatile)?;
    let root = std::path::Path::new(&tcon.share.local_path);
    ctx.backend.fsync(root, &open.path)?;
    Ok(FlushResponse::default())
}
