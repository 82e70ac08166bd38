mod skins;
mod utility;

use crate::commands::{
    node::{CommandNode, Executor},
    registry::CommandRegistry,
};
use crate::config::PluginConfig;
use tracing::debug;

pub use skins::PIN_DELAY_MS;

/// Registers every built-in command under the aliases configured for it.
pub fn register_commands(registry: &mut CommandRegistry, config: &PluginConfig) {
    register_aliases(
        registry,
        &config.command_stattrak,
        "Stattrak toggle",
        skins::exec_stattrak,
    );
    register_aliases(registry, &config.command_skin, "Skins info", skins::exec_info);
    register_aliases(
        registry,
        &config.command_refresh,
        "Skins refresh",
        skins::exec_refresh,
    );

    if config.command_kill_enabled {
        register_aliases(
            registry,
            &config.command_kill,
            "kill yourself",
            utility::exec_kill,
        );
    }
}

fn register_aliases(
    registry: &mut CommandRegistry,
    aliases: &[String],
    description: &str,
    executor: Executor,
) {
    let mut aliases = aliases
        .iter()
        .map(|alias| alias.trim())
        .filter(|alias| !alias.is_empty());
    let Some(name) = aliases.next() else {
        debug!("No aliases configured for \"{}\", skipping", description);
        return;
    };

    let command = aliases
        .fold(CommandNode::literal(name), |command, alias| command.alias(alias))
        .description(description)
        .require_valid_player()
        .executes(executor);
    registry.register(command);
}
