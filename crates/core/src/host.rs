//! The parts of the game server the plugin talks to.

use crate::player::{PlayerSlot, PlayerSnapshot};
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Entry points into the game server. Every cosmetic action can fail on its
/// own and is re-applied on the next refresh, so none of them are fatal.
pub trait GameHost: Send + Sync {
    /// Looks up the client in `slot`, `None` if the slot is empty. Hosts may
    /// already return `None` while raising the disconnect event.
    fn player(&self, slot: PlayerSlot) -> Option<PlayerSnapshot>;

    /// Item definition index of the weapon the player is currently holding.
    fn active_weapon(&self, slot: PlayerSlot) -> Option<u16>;

    fn give_gloves(&self, slot: PlayerSlot) -> Result<()>;
    fn refresh_weapons(&self, slot: PlayerSlot) -> Result<()>;
    fn give_agent(&self, slot: PlayerSlot) -> Result<()>;
    fn give_music_kit(&self, slot: PlayerSlot) -> Result<()>;
    fn give_pin(&self, slot: PlayerSlot) -> Result<()>;

    fn has_alive_pawn(&self, slot: PlayerSlot) -> bool;
    fn commit_suicide(&self, slot: PlayerSlot) -> Result<()>;

    /// Sends an already encoded chat line to one player.
    fn print_to_chat(&self, slot: PlayerSlot, message: &str);
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
