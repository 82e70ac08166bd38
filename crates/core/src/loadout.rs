use crate::player::SteamId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cosmetic state of a single weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponInfo {
    pub paint: i32,
    pub seed: i32,
    pub wear: f32,
    pub stattrak: bool,
    pub stattrak_count: i32,
    pub nametag: Option<String>,
}

impl Default for WeaponInfo {
    fn default() -> Self {
        WeaponInfo {
            paint: 0,
            seed: 0,
            wear: 0.000001,
            stattrak: false,
            stattrak_count: 0,
            nametag: None,
        }
    }
}

/// Everything a player picked on the website.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerLoadout {
    /// Keyed by item definition index.
    pub weapons: FxHashMap<u16, WeaponInfo>,
    pub knife: Option<String>,
    pub gloves: Option<u16>,
    pub agent_ct: Option<String>,
    pub agent_t: Option<String>,
    pub music: Option<u16>,
    pub pin: Option<u16>,
}

#[derive(Debug, Default)]
pub struct LoadoutStore {
    players: RwLock<FxHashMap<SteamId, PlayerLoadout>>,
}

impl LoadoutStore {
    pub fn new() -> LoadoutStore {
        Default::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, FxHashMap<SteamId, PlayerLoadout>> {
        self.players.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FxHashMap<SteamId, PlayerLoadout>> {
        self.players.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn replace(&self, steam_id: SteamId, loadout: PlayerLoadout) {
        self.write().insert(steam_id, loadout);
    }

    pub fn get(&self, steam_id: SteamId) -> Option<PlayerLoadout> {
        self.read().get(&steam_id).cloned()
    }

    pub fn weapon(&self, steam_id: SteamId, def_index: u16) -> Option<WeaponInfo> {
        self.read()
            .get(&steam_id)
            .and_then(|loadout| loadout.weapons.get(&def_index))
            .cloned()
    }

    /// Flips the StatTrak flag of a weapon in place and returns the new value,
    /// or `None` if the player has no record for that weapon.
    pub fn toggle_stattrak(&self, steam_id: SteamId, def_index: u16) -> Option<bool> {
        let mut players = self.write();
        let weapon = players.get_mut(&steam_id)?.weapons.get_mut(&def_index)?;
        weapon.stattrak = !weapon.stattrak;
        Some(weapon.stattrak)
    }

    pub fn remove(&self, steam_id: SteamId) -> Option<PlayerLoadout> {
        self.write().remove(&steam_id)
    }
}
