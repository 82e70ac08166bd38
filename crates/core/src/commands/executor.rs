use crate::commands::{
    context::ExecutionContext,
    error::{CommandError, CommandResult, InternalError},
    node::CommandNode,
    registry::CommandRegistry,
    CommandSender,
};
use crate::plugin::WeaponPaints;
use std::panic::{self, AssertUnwindSafe};
use tracing::{error, trace, warn};

impl CommandRegistry {
    /// Runs `command_line` if it names a registered command. Returns whether
    /// a command matched.
    ///
    /// Nothing a command does escapes this call: errors and panics are logged
    /// and swallowed so a broken handler cannot take the server down.
    pub fn execute(&self, plugin: &WeaponPaints, sender: CommandSender, command_line: &str) -> bool {
        let Some(name) = Self::command_name(command_line) else {
            return false;
        };
        let Some(node) = self.get(name) else {
            return false;
        };

        let mut ctx = ExecutionContext::new(plugin, sender);
        let result = panic::catch_unwind(AssertUnwindSafe(|| Self::execute_impl(&mut ctx, node)))
            .unwrap_or_else(|_| {
                Err(InternalError::Panicked {
                    name: node.name.clone(),
                }
                .into())
            });

        match result {
            Ok(()) => {}
            Err(CommandError::Precondition(reason)) => {
                trace!("Ignoring {} from {:?}: {}", name, sender, reason);
            }
            Err(err @ CommandError::Action { .. }) => {
                warn!("Command {} from {:?} did not finish: {:#}", name, sender, anyhow::Error::from(err));
            }
            Err(CommandError::Internal(err)) => {
                error!("Command {} from {:?}: {}", name, sender, err);
            }
        }
        true
    }

    fn execute_impl(ctx: &mut ExecutionContext<'_>, node: &CommandNode) -> CommandResult<()> {
        let Some(executor) = node.executor else {
            return Err(CommandError::internal(format!(
                "command `{}` was registered without an executor",
                node.name
            )));
        };

        if node.requires_valid_player {
            ctx.caller()?;
        }

        executor(ctx)
    }
}
