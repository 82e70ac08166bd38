use serde::{Deserialize, Serialize};
use std::fmt;

/// The per-connection slot the server assigns to a client. Slots are reused
/// as soon as a client disconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerSlot(pub u8);

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A 64-bit steam community id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SteamId(pub u64);

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a player for as long as they stay connected. The slot alone is
/// not enough because a new client can take over a slot right after the
/// previous one left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerIdentity {
    pub slot: PlayerSlot,
    pub steam_id: SteamId,
}

/// What the host knows about a connected client at the time of the call.
#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub slot: PlayerSlot,
    /// The session id, only assigned once the client is fully connected.
    pub user_id: Option<u16>,
    pub steam_id: SteamId,
    pub name: String,
    /// Remote address as reported by the engine, usually `ip:port`.
    pub ip_address: Option<String>,
    pub is_bot: bool,
    pub is_valid: bool,
    pub language: Option<String>,
}

impl PlayerSnapshot {
    pub fn identity(&self) -> PlayerIdentity {
        PlayerIdentity {
            slot: self.slot,
            steam_id: self.steam_id,
        }
    }

    pub fn is_valid_human(&self) -> bool {
        self.is_valid && self.user_id.is_some() && !self.is_bot
    }

    pub fn info(&self) -> PlayerInfo {
        PlayerInfo {
            user_id: self.user_id,
            slot: self.slot,
            steam_id: self.steam_id,
            name: self.name.clone(),
            ip_address: self.ip_address.as_deref().map(strip_port),
        }
    }
}

/// Snapshot handed over to the sync task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerInfo {
    pub user_id: Option<u16>,
    pub slot: PlayerSlot,
    pub steam_id: SteamId,
    pub name: String,
    pub ip_address: Option<String>,
}

fn strip_port(address: &str) -> String {
    match address.split_once(':') {
        Some((host, _)) => host.to_string(),
        None => address.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> PlayerSnapshot {
        PlayerSnapshot {
            slot: PlayerSlot(3),
            user_id: Some(12),
            steam_id: SteamId(76561198000000001),
            name: "zywoo".to_string(),
            ip_address: Some("10.0.0.4:27005".to_string()),
            is_bot: false,
            is_valid: true,
            language: None,
        }
    }

    #[test]
    fn info_strips_port() {
        let info = snapshot().info();
        assert_eq!(info.ip_address.as_deref(), Some("10.0.0.4"));
        assert_eq!(info.slot, PlayerSlot(3));
        assert_eq!(info.user_id, Some(12));
    }

    #[test]
    fn bots_and_half_connected_clients_are_not_valid() {
        let mut player = snapshot();
        assert!(player.is_valid_human());
        player.user_id = None;
        assert!(!player.is_valid_human());
        player.user_id = Some(1);
        player.is_bot = true;
        assert!(!player.is_valid_human());
    }
}
