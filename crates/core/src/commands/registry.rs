use super::{node::CommandNode, COMMAND_PREFIX};
use tracing::warn;

pub struct CommandRegistry {
    commands: Vec<CommandNode>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn register(&mut self, command: CommandNode) {
        let taken = std::iter::once(&command.name)
            .chain(&command.aliases)
            .find(|name| self.get(name).is_some());
        if let Some(name) = taken {
            warn!(
                "Command name {}{} is registered twice, the first registration wins",
                COMMAND_PREFIX, name
            );
        }
        self.commands.push(command);
    }

    pub fn get(&self, name: &str) -> Option<&CommandNode> {
        self.commands.iter().find(|command| command.matches(name))
    }

    pub fn commands(&self) -> &[CommandNode] {
        &self.commands
    }

    /// Every name the host has to register, prefixed.
    pub fn host_command_names(&self) -> Vec<String> {
        self.commands
            .iter()
            .flat_map(|command| std::iter::once(&command.name).chain(&command.aliases))
            .map(|name| format!("{}{}", COMMAND_PREFIX, name))
            .collect()
    }

    /// Extracts the command name from `css_name`, or the chat forms `!name`
    /// and `/name`. Anything else is not a command.
    pub(super) fn command_name(command_line: &str) -> Option<&str> {
        let word = command_line.split_whitespace().next()?;
        let name = match word.get(..COMMAND_PREFIX.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(COMMAND_PREFIX) => {
                &word[COMMAND_PREFIX.len()..]
            }
            _ => word.strip_prefix(['!', '/'])?,
        };
        (!name.is_empty()).then_some(name)
    }
}
