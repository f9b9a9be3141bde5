//! CLOSE handler: removes the handle-table entry and, if `postquery_attrib` is set,
//! reports the file's final attributes in the response (SMB2_CLOSE_FLAG_POSTQUERY_ATTRIB).

use smb_msg::{CloseFlags, CloseRequest, CloseResponse};

use crate::error::Result;

use super::HandlerContext;

pub async fn handle_close(ctx: &HandlerContext<'_>, req: &CloseRequest) -> Result<CloseResponse> {
    let tcon = ctx.require_tcon()?;
    let open = ctx.session.handles.remove(req.file_id.volatile)?;

    if *open.delete_on_close.lock() {
        let root = std::path::Path::new(&tcon.share.local_path);
        if open.is_directory {
            ctx.backend.rmdir(root, &open.path)?;
        } else {
            ctx.backend.unlink(root, &open.path)?;
        }
    }

    let stat = if !open.is_directory {
        let root = std::path::Path::new(&tcon.share.local_path);
        ctx.backend.stat(root, &open.path).ok()
    } else {
        None
    };

    Ok(match stat {
        Some(stat) => CloseResponse {
            flags: CloseFlags::new().with_postquery_attrib(true),
            creation_time: smb_dtyp::binrw_util::filetime::FileTime::now(),
            last_access_time: smb_dtyp::binrw_util::filetime::FileTime::now(),
            last_write_time: smb_dtyp::binrw_util::filetime::FileTime::now(),
            change_time: smb_dtyp::binrw_util::filetime::FileTime::now(),
            allocation_size: stat.size,
            endof_file: stat.size,
            file_attributes: smb_fscc::FileAttributes::new(),
        },
        None => CloseResponse {
            flags: CloseFlags::new(),
            creation_time: smb_dtyp::binrw_util::filetime::FileTime::NO_CHANGE,
            last_access_time: smb_dtyp::binrw_util::filetime::FileTime::NO_CHANGE,
            last_write_time: smb_dtyp::binrw_util::filetime::FileTime::NO_CHANGE,
            change_time: smb_dtyp::binrw_util::filetime::FileTime::NO_CHANGE,
            allocation_size: 0,
            endof_file: 0,
            file_attributes: smb_fscc::FileAttributes::new(),
        },
    })
}
