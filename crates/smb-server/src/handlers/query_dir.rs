//! QUERY_DIRECTORY handler: directory enumeration against the embedded [`DirCursor`],
//! staged on the first call (or on restart) and drained a page at a time.
//!
//! Only `FileIdBothDirectoryInformation` is produced; other classes answer
//! `STATUS_NOT_SUPPORTED` rather than guessing at a client's willingness to accept a
//! different layout.

use smb_dtyp::binrw_util::fixed_string::FixedWideString;
use smb_fscc::{FileAttributes, FileIdBothDirectoryInformation, QueryDirectoryInfoClass};
use smb_msg::{QueryDirectoryRequest, QueryDirectoryResponse};

use crate::backend::DirEntry;
use crate::error::{Result, ServerError};
use crate::handle_table::DirCursor;

use super::HandlerContext;

fn wildcard_match(pattern: &str, name: &str) -> bool {
    fn inner(pattern: &[u8], name: &[u8]) -> bool {
        match (pattern.first(), name.first()) {
            (None, None) => true,
            (Some(b'*'), _) => {
                inner(&pattern[1..], name) || (!name.is_empty() && inner(pattern, &name[1..]))
            }
            (Some(b'?'), Some(_)) => inner(&pattern[1..], &name[1..]),
            (Some(p), Some(n)) if p.to_ascii_uppercase() == n.to_ascii_uppercase() => {
                inner(&pattern[1..], &name[1..])
            }
            _ => false,
        }
    }
    inner(pattern.as_bytes(), name.as_bytes())
}

fn stage(entries: Vec<DirEntry>, pattern: &str) -> Vec<DirEntry> {
    if pattern.is_empty() || pattern == "*" {
        return entries;
    }
    entries
        .into_iter()
        .filter(|e| wildcard_match(pattern, &e.name))
        .collect()
}

pub async fn handle_query_directory(
    ctx: &HandlerContext<'_>,
    req: &QueryDirectoryRequest,
) -> Result<QueryDirectoryResponse> {
    if !matches!(
        req.file_information_class,
        QueryDirectoryInfoClass::IdBothDirectoryInformation
    ) {
        return Err(ServerError::NotSupported);
    }

    let tcon = ctx.require_tcon()?;
    let open = ctx.session.handles.get(req.file_id.volatile)?;
    if !open.is_directory {
        return Err(ServerError::InvalidParameter("query directory on a non-directory handle"));
    }

    let root = std::path::Path::new(&tcon.share.local_path);
    let pattern: String = (&req.file_name).try_into().unwrap_or_default();
    let restart = req.flags.restart_scans() || req.flags.reopen();

    let mut cursor_slot = open.dir_cursor.lock();
    if cursor_slot.is_none() || restart {
        let entries = ctx.backend.readdir(root, &open.path)?;
        let staged: Vec<String> = stage(entries, &pattern).into_iter().map(|e| e.name).collect();
        *cursor_slot = Some(DirCursor {
            staged,
            next_index: 0,
            search_over: false,
            pattern: Some(pattern.clone()),
        });
    }
    let cursor = cursor_slot.as_mut().expect("just populated above");

    if cursor.search_over || cursor.next_index >= cursor.staged.len() {
        cursor.search_over = true;
        return Err(ServerError::NoMoreFiles);
    }

    let take = if req.flags.return_single_entry() { 1 } else { cursor.staged.len() - cursor.next_index };
    let batch: Vec<String> = cursor.staged[cursor.next_index..cursor.next_index + take].to_vec();
    cursor.next_index += batch.len();
    if cursor.next_index >= cursor.staged.len() {
        cursor.search_over = true;
    }
    drop(cursor_slot);

    let mut entries = Vec::with_capacity(batch.len());
    for (index, name) in batch.into_iter().enumerate() {
        let stat = ctx.backend.stat(root, &format!("{}/{name}", open.path))?;
        let short = crate::shortname::generate(&name);
        let short_str = std::str::from_utf8(&short).unwrap_or_default().trim_end();
        entries.push(FileIdBothDirectoryInformation {
            file_index: index as u32,
            creation_time: time::OffsetDateTime::from(stat.created).into(),
            last_access_time: time::OffsetDateTime::from(stat.modified).into(),
            last_write_time: time::OffsetDateTime::from(stat.modified).into(),
            change_time: time::OffsetDateTime::from(stat.modified).into(),
            end_of_file: stat.size,
            allocation_size: stat.size,
            file_attributes: FileAttributes::new().with_directory(stat.is_directory),
            ea_size: Some(0),
            reparse_tag: None,
            short_name_length: short_str.len() as u8,
            short_name: FixedWideString::<12>::from(short_str),
            file_id: 0,
            file_name: name.as_str().into(),
        });
    }

    Ok(QueryDirectoryResponse {
        output_buffer: write_entries(entries),
    })
}

fn write_entries(entries: Vec<FileIdBothDirectoryInformation>) -> Vec<u8> {
    use binrw::BinWrite;
    use smb_fscc::ChainedItemList;
    let list: ChainedItemList<FileIdBothDirectoryInformation, 8> = entries.into();
    let mut cursor = std::io::Cursor::new(Vec::new());
    list.write_le(&mut cursor).expect("in-memory write cannot fail");
    cursor.into_inner()
}
