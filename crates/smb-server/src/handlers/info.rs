//! QUERY_INFO / SET_INFO handlers. Only the file-information classes a plain file server
//! needs day to day are wired up; everything else (security descriptors, quotas, EAs,
//! filesystem-level classes) answers `STATUS_NOT_SUPPORTED`.

use smb_dtyp::binrw_util::filetime::FileTime;
use smb_fscc::{
    FileAttributes, FileBasicInformation, FileStandardInformation, SetFileInfo, SetFileInfoClass,
};
use smb_msg::{
    GetInfoRequestData, QueryFileInfoClass, QueryInfoClass, QueryInfoRequest, QueryInfoResponse,
    SetInfoClass, SetInfoRequest, SetInfoResponse,
};

use crate::error::{Result, ServerError};

use super::HandlerContext;

fn file_attributes(stat: &crate::backend::FileStat) -> FileAttributes {
    FileAttributes::new()
        .with_directory(stat.is_directory)
        .with_readonly(stat.readonly)
}

fn filetime(time: std::time::SystemTime) -> FileTime {
    time::OffsetDateTime::from(time).into()
}

pub async fn handle_query_info(
    ctx: &HandlerContext<'_>,
    req: &QueryInfoRequest,
) -> Result<QueryInfoResponse> {
    let class = match req.info_class {
        QueryInfoClass::File(class) => class,
        _ => return Err(ServerError::NotSupported),
    };
    if !matches!(req.data, GetInfoRequestData::None(())) {
        return Err(ServerError::NotSupported);
    }

    let tcon = ctx.require_tcon()?;
    let open = ctx.session.handles.get(req.file_id.volatile)?;
    let root = std::path::Path::new(&tcon.share.local_path);
    let stat = ctx.backend.stat(root, &open.path)?;

    let bytes = match class {
        QueryFileInfoClass::BasicInformation => {
            let info = FileBasicInformation {
                creation_time: filetime(stat.created),
                last_access_time: filetime(stat.modified),
                last_write_time: filetime(stat.modified),
                change_time: filetime(stat.modified),
                file_attributes: file_attributes(&stat),
            };
            write_le(&info)
        }
        QueryFileInfoClass::StandardInformation => {
            let info = FileStandardInformation {
                allocation_size: stat.size,
                end_of_file: stat.size,
                number_of_links: 1,
                delete_pending: false.into(),
                directory: stat.is_directory.into(),
            };
            write_le(&info)
        }
        _ => return Err(ServerError::NotSupported),
    };

    if (req.output_buffer_length as usize) < bytes.len() {
        return Err(ServerError::BufferOverflow);
    }
    Ok(QueryInfoResponse::new(bytes))
}

pub async fn handle_set_info(
    ctx: &HandlerContext<'_>,
    req: &SetInfoRequest,
) -> Result<SetInfoResponse> {
    let SetInfoClass::File(class) = req.info_class else {
        return Err(ServerError::NotSupported);
    };
    let smb_msg::SetInfoData::File(raw) = &req.data else {
        return Err(ServerError::NotSupported);
    };

    let tcon = ctx.require_tcon()?;
    let open = ctx.session.handles.get(req.file_id.volatile)?;
    let root = std::path::Path::new(&tcon.share.local_path);

    let parsed = raw
        .parse(class)
        .map_err(|_| ServerError::InvalidParameter("malformed set-info payload"))?;

    match parsed {
        SetFileInfo::DispositionInformation(info) => {
            *open.delete_on_close.lock() = info.delete_pending.into();
        }
        SetFileInfo::EndOfFileInformation(info) => {
            ctx.backend.truncate(root, &open.path, info.end_of_file)?;
        }
        SetFileInfo::RenameInformation(info) => {
            let to: String = (&info.file_name)
                .try_into()
                .map_err(|_| ServerError::InvalidParameter("rename target"))?;
            ctx.backend.rename(root, &open.path, &to)?;
        }
        _ => return Err(ServerError::NotSupported),
    }

    Ok(SetInfoResponse::default())
}

fn write_le<T>(value: &T) -> Vec<u8>
where
    for<'a> T: binrw::BinWrite<Args<'a> = ()>,
{
    let mut cursor = std::io::Cursor::new(Vec::new());
    value.write_le(&mut cursor).expect("in-memory write cannot fail");
    cursor.into_inner()
}
