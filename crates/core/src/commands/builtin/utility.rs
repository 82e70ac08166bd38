use crate::commands::error::{ActionResultExt, CommandResult, PreconditionFailed};
use crate::commands::ExecutionContext;

pub(super) fn exec_kill(ctx: &mut ExecutionContext<'_>) -> CommandResult<()> {
    let player = ctx.caller()?;
    let host = ctx.plugin().host();
    if !host.has_alive_pawn(player.slot) {
        return Err(PreconditionFailed::NoAlivePawn.into());
    }
    host.commit_suicide(player.slot).action("commit suicide")
}
