//! TREE_CONNECT / TREE_DISCONNECT handlers: resolves a UNC share path against the
//! [`UserShareRegistry`] and allocates a [`Tcon`] in the session's [`TreeTable`].

use std::sync::Arc;

use smb_msg::{
    ShareFlags as WireShareFlags, ShareType as WireShareType, TreeCapabilities,
    TreeConnectRequest, TreeConnectResponse, TreeDisconnectRequest, TreeDisconnectResponse,
};

use crate::error::{Result, ServerError};
use crate::tree::{Share, ShareType, Tcon};

use super::HandlerContext;

fn share_name(unc_path: &str) -> &str {
    unc_path.rsplit('\\').next().unwrap_or(unc_path)
}

fn ipc_share() -> Share {
    Share {
        name: "IPC$".to_owned(),
        share_type: ShareType::Pipe,
        local_path: String::new(),
        flags: Default::default(),
    }
}

pub async fn handle_tree_connect(
    ctx: &HandlerContext<'_>,
    req: &TreeConnectRequest,
) -> Result<(Arc<Tcon>, TreeConnectResponse)> {
    let path: String = (&req.buffer).try_into().map_err(|_| ServerError::InvalidParameter("tree connect path"))?;
    let name = share_name(&path);

    let share = if name.eq_ignore_ascii_case("IPC$") {
        ipc_share()
    } else {
        ctx.registry.find_share(name).ok_or(ServerError::BadNetworkName)?
    };

    let (wire_type, maximal_access) = match share.share_type {
        ShareType::Disk => (WireShareType::Disk, 0x001f_01ff),
        ShareType::Pipe => (WireShareType::Pipe, 0x0012_0089),
    };

    let tcon = ctx.session.trees.connect(share.clone());
    let response = TreeConnectResponse {
        share_type: wire_type,
        share_flags: WireShareFlags::new().with_encrypt_data(share.flags.encrypt_data),
        capabilities: TreeCapabilities::new(),
        maximal_access,
    };
    Ok((tcon, response))
}

pub async fn handle_tree_disconnect(
    ctx: &HandlerContext<'_>,
    _req: &TreeDisconnectRequest,
) -> Result<TreeDisconnectResponse> {
    let tcon = ctx.require_tcon()?;
    ctx.session
        .trees
        .disconnect(tcon.tree_id)
        .ok_or(ServerError::NetworkNameDeleted)?;
    Ok(TreeDisconnectResponse::default())
}
