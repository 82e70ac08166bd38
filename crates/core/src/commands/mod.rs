mod builtin;
mod context;
mod error;
mod executor;
mod node;
mod registry;

use crate::player::PlayerSlot;

pub use builtin::{register_commands, PIN_DELAY_MS};
pub use context::ExecutionContext;
pub use error::{
    ActionResultExt, CommandError, CommandResult, InternalError, PreconditionFailed,
};
pub use node::{CommandNode, Executor};
pub use registry::CommandRegistry;

/// Prefix the host puts in front of every plugin command name.
pub const COMMAND_PREFIX: &str = "css_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSender {
    Player(PlayerSlot),
    Console,
}
