//! Oplock/lease break acknowledgment handler: the client's downgrade response completes the
//! break wait a conflicting CREATE is blocked on (component D's waitqueue).

use smb_msg::{LeaseBreakAckResponse, OplockBreakAck, OplockBreakResponse};
use smb_msg::OplockLevel as WireOplockLevel;

use crate::error::{Result, ServerError};
use crate::oplock::{BreakAck, OplockLevel};

use super::HandlerContext;

fn ack_from_levels(held: OplockLevel, acked: WireOplockLevel) -> Result<BreakAck> {
    match (held, acked) {
        (OplockLevel::Exclusive | OplockLevel::Batch, WireOplockLevel::II) => Ok(BreakAck::WriteToRead),
        (OplockLevel::Exclusive | OplockLevel::Batch, WireOplockLevel::None) => Ok(BreakAck::WriteToNone),
        (OplockLevel::LevelII, WireOplockLevel::None) => Ok(BreakAck::ReadToNone),
        _ => Err(ServerError::InvalidOplockProtocol),
    }
}

pub async fn handle_oplock_break_ack(
    ctx: &HandlerContext<'_>,
    req: &OplockBreakAck,
) -> Result<OplockBreakResponse> {
    let open = ctx.session.handles.get(req.file_id().volatile)?;
    if !open.ofile.is_breaking() {
        return Err(ServerError::InvalidDeviceState);
    }
    let acked_level = req.oplock_level().ok_or(ServerError::InvalidOplockProtocol)?;
    let held = open.ofile.current_level();
    let ack = ack_from_levels(held, acked_level)?;
    let resulting = ack.resulting_level();
    open.ofile.grant(resulting);
    open.ofile.complete_break();

    let wire_level = match resulting {
        OplockLevel::None => WireOplockLevel::None,
        OplockLevel::LevelII => WireOplockLevel::II,
        OplockLevel::Exclusive | OplockLevel::Batch => WireOplockLevel::Exclusive,
    };
    Ok(OplockBreakResponse::new(wire_level, req.file_id()))
}

/// Lease break ack doesn't carry a `FileId`; the lease key alone identifies the `Ofile`
/// via whichever open last recorded it, so this only completes the break wait.
pub async fn handle_lease_break_ack(
    ofile: &crate::oplock::Ofile,
    req: &LeaseBreakAckResponse,
) -> Result<LeaseBreakAckResponse> {
    if !ofile.is_breaking() {
        return Err(ServerError::InvalidDeviceState);
    }
    ofile.complete_break();
    Ok(LeaseBreakAckResponse::new(req.lease_key(), req.lease_state()))
}
