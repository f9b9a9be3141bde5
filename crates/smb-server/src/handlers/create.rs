//! CREATE handler: opens or creates a file/directory, allocates a handle-table entry, and
//! applies the oplock grant/break policy against any existing holder on the same path.

use std::time::SystemTime;

use smb_dtyp::binrw_util::filetime::FileTime;
use smb_msg::{
    CreateAction, CreateDisposition, CreateRequest, CreateResponse, CreateResponseFlags,
    FileAttributes, OplockLevel as WireOplockLevel,
};

use crate::error::{Result, ServerError};
use crate::oplock::{break_target, NewcomerAccess, OplockLevel};

use super::HandlerContext;

fn to_wire_level(level: OplockLevel) -> WireOplockLevel {
    match level {
        OplockLevel::None => WireOplockLevel::None,
        OplockLevel::LevelII => WireOplockLevel::II,
        OplockLevel::Exclusive | OplockLevel::Batch => WireOplockLevel::Exclusive,
    }
}

fn from_wire_level(level: WireOplockLevel) -> OplockLevel {
    match level {
        WireOplockLevel::None => OplockLevel::None,
        WireOplockLevel::II => OplockLevel::LevelII,
        WireOplockLevel::Exclusive => OplockLevel::Exclusive,
    }
}

pub async fn handle_create(ctx: &HandlerContext<'_>, req: &CreateRequest) -> Result<CreateResponse> {
    let tcon = ctx.require_tcon()?;
    let path: String = (&req.name)
        .try_into()
        .map_err(|_| ServerError::InvalidParameter("create name"))?;

    let root = std::path::Path::new(&tcon.share.local_path);
    let exists = ctx.backend.stat(root, &path).is_ok();
    let wants_directory = req.create_options.directory_file();

    let create_action = match req.create_disposition {
        CreateDisposition::Open if exists => CreateAction::Opened,
        CreateDisposition::Open => return Err(ServerError::ObjectNameNotFound),
        CreateDisposition::Create if exists => {
            return Err(ServerError::InvalidParameter("file exists"));
        }
        CreateDisposition::Create => {
            ctx.backend.create(root, &path, wants_directory)?;
            CreateAction::Created
        }
        CreateDisposition::OpenIf if exists => CreateAction::Opened,
        CreateDisposition::OpenIf => {
            ctx.backend.create(root, &path, wants_directory)?;
            CreateAction::Created
        }
        CreateDisposition::Overwrite if exists => {
            ctx.backend.truncate(root, &path, 0)?;
            CreateAction::Superseded
        }
        CreateDisposition::Overwrite => return Err(ServerError::ObjectNameNotFound),
        CreateDisposition::OverwriteIf if exists => {
            ctx.backend.truncate(root, &path, 0)?;
            CreateAction::Superseded
        }
        CreateDisposition::OverwriteIf => {
            ctx.backend.create(root, &path, wants_directory)?;
            CreateAction::Created
        }
        CreateDisposition::Supersede => {
            if exists {
                ctx.backend.unlink(root, &path).ok();
            }
            ctx.backend.create(root, &path, wants_directory)?;
            CreateAction::Superseded
        }
    };

    let stat = ctx.backend.stat(root, &path)?;

    let ofile_key = format!("{}/{}", tcon.share.name, path);
    let ofile = ctx.ofiles.get_or_create(&ofile_key);

    let access = &req.desired_access;
    let newcomer = NewcomerAccess {
        writes: access.write_data() || access.append_data() || access.generic_write() || access.generic_all(),
        attribute_only: !access.read_data()
            && !access.write_data()
            && !access.execute()
            && !access.generic_read()
            && !access.generic_write()
            && !access.generic_all(),
    };
    let existing_level = ofile.current_level();
    if let Some(target) = break_target(existing_level, newcomer) {
        ofile.begin_break(target);
        ofile.wait_for_break(std::time::Duration::from_secs(30)).await;
    }

    let requested = from_wire_level(req.requested_oplock_level);
    let granted = requested.min(ofile.current_level().max(requested));
    ofile.grant(granted);

    let persistent = ctx.durable_handles.allocate_persistent();
    let open = ctx
        .session
        .handles
        .insert(persistent, path, stat.is_directory, ofile, false);

    let now = system_time_to_filetime(SystemTime::now());
    Ok(CreateResponse {
        oplock_level: to_wire_level(granted),
        flags: CreateResponseFlags::new(),
        create_action,
        creation_time: system_time_to_filetime(stat.created),
        last_access_time: now,
        last_write_time: system_time_to_filetime(stat.modified),
        change_time: system_time_to_filetime(stat.modified),
        allocation_size: stat.size,
        endof_file: stat.size,
        file_attributes: if stat.is_directory {
            FileAttributes::new().with_directory(true)
        } else {
            FileAttributes::new()
        },
        file_id: smb_msg::FileId {
            persistent: open.id.persistent,
            volatile: open.id.volatile,
        },
        create_contexts: Default::default(),
    })
}

fn system_time_to_filetime(time: SystemTime) -> FileTime {
    time::OffsetDateTime::from(time).into()
}
