use super::CommandSender;
use crate::commands::error::{CommandResult, PreconditionFailed};
use crate::player::{PlayerSlot, PlayerSnapshot};
use crate::plugin::WeaponPaints;
use std::fmt::Display;
use tracing::info;
use weaponpaints_text::{strip_colors, ChatLine};

pub struct ExecutionContext<'a> {
    plugin: &'a WeaponPaints,
    sender: CommandSender,
}

impl<'a> ExecutionContext<'a> {
    pub(super) fn new(plugin: &'a WeaponPaints, sender: CommandSender) -> Self {
        Self { plugin, sender }
    }

    pub fn plugin(&self) -> &'a WeaponPaints {
        self.plugin
    }

    pub fn slot(&self) -> CommandResult<PlayerSlot> {
        match self.sender {
            CommandSender::Player(slot) => Ok(slot),
            CommandSender::Console => Err(PreconditionFailed::PlayerOnly.into()),
        }
    }

    /// The sender, if it is a valid, connected, non-bot player with a session id.
    pub fn caller(&self) -> CommandResult<PlayerSnapshot> {
        let slot = self.slot()?;
        self.plugin
            .host()
            .player(slot)
            .filter(PlayerSnapshot::is_valid_human)
            .ok_or_else(|| PreconditionFailed::InvalidPlayer.into())
    }

    pub fn require(&self, enabled: bool, feature: &'static str) -> CommandResult<()> {
        if !enabled {
            return Err(PreconditionFailed::Disabled(feature).into());
        }
        Ok(())
    }

    /// Sends the localized message `key` to the sender. Returns whether
    /// anything was sent; unconfigured messages are skipped.
    pub fn reply(&self, key: &str, args: &[&dyn Display]) -> bool {
        let host = self.plugin.host();
        match self.sender {
            CommandSender::Player(slot) => {
                let language = host.player(slot).and_then(|player| player.language);
                let Some(message) = self.plugin.localizer().get(language.as_deref(), key, args)
                else {
                    return false;
                };
                let line = ChatLine::new(&self.plugin.config().chat_prefix, message);
                host.print_to_chat(slot, &line.encode());
            }
            CommandSender::Console => {
                let Some(message) = self.plugin.localizer().get(None, key, args) else {
                    return false;
                };
                info!("{}", strip_colors(&message));
            }
        }
        true
    }
}
