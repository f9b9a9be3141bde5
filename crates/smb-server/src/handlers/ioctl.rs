//! IOCTL handler: `FSCTL_PIPE_TRANSCEIVE` is the only control code this server answers for
//! real (component F, relaying DCE/RPC over a named pipe to a [`PipeHandler`]). Every other
//! FSCTL/IOCTL code — copychunk, resiliency, validate-negotiate-info, and the rest of the
//! MS-FSCC catalog `smb-msg` knows how to parse — answers `STATUS_NOT_SUPPORTED`.

use binrw::{BinRead, BinWrite};
use smb_msg::{IoctlReqData, IoctlRequest, IoctlResponse};
use smb_rpc::{PacketType, RpcHeader};

use crate::error::{Result, ServerError};

use super::HandlerContext;

pub async fn handle_ioctl(ctx: &HandlerContext<'_>, req: &IoctlRequest) -> Result<IoctlResponse> {
    let IoctlReqData::FsctlPipeTransceive(payload) = &req.buffer else {
        return Err(ServerError::NotSupported);
    };

    let open = ctx.session.handles.get(req.file_id.volatile)?;
    if !ctx.pipe_handler.accepts(&open.path) {
        return Err(ServerError::NotSupported);
    }

    let bytes: &[u8] = payload;
    let mut cursor = std::io::Cursor::new(bytes);
    let header = RpcHeader::read_le(&mut cursor)
        .map_err(|_| ServerError::InvalidParameter("malformed RPC PDU"))?;
    let body = &bytes[cursor.position() as usize..];

    let response_body = ctx.pipe_handler.process_rpc(&header, body)?;
    let frag_length = (RpcHeader::SIZE + response_body.len()) as u16;
    let response_header = RpcHeader::new(PacketType::Response, header.call_id, frag_length);

    let mut out = std::io::Cursor::new(Vec::with_capacity(frag_length as usize));
    response_header
        .write_le(&mut out)
        .expect("in-memory write cannot fail");
    std::io::Write::write_all(&mut out, &response_body).expect("in-memory write cannot fail");

    Ok(IoctlResponse {
        ctl_code: req.ctl_code,
        file_id: req.file_id,
        in_buffer: Vec::new(),
        out_buffer: out.into_inner(),
    })
}
