#![allow(dead_code)]

use anyhow::{bail, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rustc_hash::FxHashMap;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use weaponpaints_core::config::PluginConfig;
use weaponpaints_core::host::{Clock, GameHost};
use weaponpaints_core::loadout::{PlayerLoadout, WeaponInfo};
use weaponpaints_core::localization::Localizer;
use weaponpaints_core::player::{PlayerInfo, PlayerSlot, PlayerSnapshot, SteamId};
use weaponpaints_core::plugin::WeaponPaints;
use weaponpaints_core::sync::{BoxFuture, LoadoutSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Gloves,
    Weapons,
    Agent,
    MusicKit,
    Pin,
    Suicide,
}

#[derive(Default)]
pub struct TestHost {
    players: Mutex<HashMap<PlayerSlot, PlayerSnapshot>>,
    weapons: Mutex<HashMap<PlayerSlot, u16>>,
    dead: Mutex<HashSet<PlayerSlot>>,
    failing: Mutex<HashSet<Action>>,
    panicking: Mutex<HashSet<Action>>,
    actions: Mutex<Vec<(PlayerSlot, Action)>>,
    chat: Mutex<Vec<(PlayerSlot, String)>>,
}

impl TestHost {
    pub fn join(&self, slot: u8, steam_id: u64) -> PlayerSlot {
        let slot = PlayerSlot(slot);
        self.players.lock().unwrap().insert(
            slot,
            PlayerSnapshot {
                slot,
                user_id: Some(u16::from(slot.0) + 100),
                steam_id: SteamId(steam_id),
                name: format!("player{}", slot.0),
                ip_address: Some("192.168.1.20:27005".to_string()),
                is_bot: false,
                is_valid: true,
                language: None,
            },
        );
        slot
    }

    pub fn update(&self, slot: PlayerSlot, f: impl FnOnce(&mut PlayerSnapshot)) {
        f(self.players.lock().unwrap().get_mut(&slot).unwrap());
    }

    pub fn leave(&self, slot: PlayerSlot) {
        self.players.lock().unwrap().remove(&slot);
    }

    pub fn hold(&self, slot: PlayerSlot, def_index: u16) {
        self.weapons.lock().unwrap().insert(slot, def_index);
    }

    pub fn kill(&self, slot: PlayerSlot) {
        self.dead.lock().unwrap().insert(slot);
    }

    pub fn fail(&self, action: Action) {
        self.failing.lock().unwrap().insert(action);
    }

    pub fn panic_on(&self, action: Action) {
        self.panicking.lock().unwrap().insert(action);
    }

    pub fn actions(&self) -> Vec<(PlayerSlot, Action)> {
        self.actions.lock().unwrap().clone()
    }

    pub fn actions_of(&self, slot: PlayerSlot) -> Vec<Action> {
        self.actions()
            .into_iter()
            .filter(|(s, _)| *s == slot)
            .map(|(_, action)| action)
            .collect()
    }

    pub fn chat(&self) -> Vec<(PlayerSlot, String)> {
        self.chat.lock().unwrap().clone()
    }

    pub fn chat_of(&self, slot: PlayerSlot) -> Vec<String> {
        self.chat()
            .into_iter()
            .filter(|(s, _)| *s == slot)
            .map(|(_, message)| message.trim().to_string())
            .collect()
    }

    fn record(&self, slot: PlayerSlot, action: Action) -> Result<()> {
        if self.panicking.lock().unwrap().contains(&action) {
            panic!("{:?} exploded", action);
        }
        if self.failing.lock().unwrap().contains(&action) {
            bail!("{:?} failed", action);
        }
        self.actions.lock().unwrap().push((slot, action));
        Ok(())
    }
}

impl GameHost for TestHost {
    fn player(&self, slot: PlayerSlot) -> Option<PlayerSnapshot> {
        self.players.lock().unwrap().get(&slot).cloned()
    }

    fn active_weapon(&self, slot: PlayerSlot) -> Option<u16> {
        self.weapons.lock().unwrap().get(&slot).copied()
    }

    fn give_gloves(&self, slot: PlayerSlot) -> Result<()> {
        self.record(slot, Action::Gloves)
    }

    fn refresh_weapons(&self, slot: PlayerSlot) -> Result<()> {
        self.record(slot, Action::Weapons)
    }

    fn give_agent(&self, slot: PlayerSlot) -> Result<()> {
        self.record(slot, Action::Agent)
    }

    fn give_music_kit(&self, slot: PlayerSlot) -> Result<()> {
        self.record(slot, Action::MusicKit)
    }

    fn give_pin(&self, slot: PlayerSlot) -> Result<()> {
        self.record(slot, Action::Pin)
    }

    fn has_alive_pawn(&self, slot: PlayerSlot) -> bool {
        self.player(slot).is_some() && !self.dead.lock().unwrap().contains(&slot)
    }

    fn commit_suicide(&self, slot: PlayerSlot) -> Result<()> {
        self.record(slot, Action::Suicide)
    }

    fn print_to_chat(&self, slot: PlayerSlot, message: &str) {
        self.chat.lock().unwrap().push((slot, message.to_string()));
    }
}

pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new() -> ManualClock {
        ManualClock(Mutex::new(Utc.timestamp_opt(1_700_000_000, 0).unwrap()))
    }

    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(Duration::seconds(secs));
    }

    pub fn advance_ms(&self, ms: i64) {
        self.advance(Duration::milliseconds(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Counts fetches and always returns the same loadout.
#[derive(Default)]
pub struct CountingSource {
    pub fetched: AtomicUsize,
    pub loadout: PlayerLoadout,
    pub last_info: Mutex<Option<PlayerInfo>>,
}

impl CountingSource {
    pub fn fetched(&self) -> usize {
        self.fetched.load(Ordering::SeqCst)
    }

    /// Waits for the background task to reach `count` fetches.
    pub fn wait_for(&self, count: usize) -> bool {
        for _ in 0..200 {
            if self.fetched() >= count {
                return true;
            }
            thread::sleep(std::time::Duration::from_millis(10));
        }
        false
    }
}

impl LoadoutSource for CountingSource {
    fn fetch(&self, player: PlayerInfo) -> BoxFuture<'_, Result<PlayerLoadout>> {
        Box::pin(async move {
            *self.last_info.lock().unwrap() = Some(player);
            self.fetched.fetch_add(1, Ordering::SeqCst);
            Ok(self.loadout.clone())
        })
    }
}

pub const AK47: u16 = 7;
pub const DEAGLE: u16 = 1;

pub fn messages() -> Localizer {
    let en: FxHashMap<String, String> = [
        ("wp_command_refresh_done", "Refreshing weapon paints."),
        ("wp_command_cooldown", "Try again in {0}s."),
        ("wp_info_website", "Visit {0}"),
        ("wp_info_refresh", "Type !wp to refresh"),
        ("wp_info_glove", "glove info"),
        ("wp_info_agent", "agent info"),
        ("wp_info_music", "music info"),
        ("wp_info_pin", "pin info"),
        ("wp_info_knife", "knife info"),
        ("wp_stattrak_action", "StatTrak toggled."),
    ]
    .into_iter()
    .map(|(key, message)| (key.to_string(), message.to_string()))
    .collect();
    Localizer::from_tables("en", [("en".to_string(), en)])
}

pub fn test_config() -> PluginConfig {
    PluginConfig {
        chat_prefix: String::new(),
        cmd_refresh_cooldown_seconds: 5,
        website: "skins.example.com".to_string(),
        ..Default::default()
    }
}

pub struct TestServer {
    pub host: Arc<TestHost>,
    pub clock: Arc<ManualClock>,
    pub plugin: WeaponPaints,
}

impl TestServer {
    pub fn new() -> TestServer {
        TestServer::with_config(test_config())
    }

    pub fn with_config(config: PluginConfig) -> TestServer {
        TestServer::build(config, messages(), None)
    }

    pub fn with_sync(source: Arc<CountingSource>) -> TestServer {
        TestServer::build(test_config(), messages(), Some(source))
    }

    pub fn build(
        config: PluginConfig,
        localizer: Localizer,
        source: Option<Arc<CountingSource>>,
    ) -> TestServer {
        let host = Arc::new(TestHost::default());
        let clock = Arc::new(ManualClock::new());
        let mut plugin =
            WeaponPaints::new(config, host.clone(), clock.clone(), localizer).unwrap();
        if let Some(source) = source {
            plugin = plugin.with_sync(source);
        }
        TestServer {
            host,
            clock,
            plugin,
        }
    }

    pub fn say(&self, slot: PlayerSlot, line: &str) -> bool {
        self.plugin.on_client_command(slot, line)
    }

    /// Advances the clock and runs one server tick.
    pub fn tick_after_ms(&self, ms: i64) {
        self.clock.advance_ms(ms);
        self.plugin.on_tick();
    }

    pub fn give_weapon(&self, steam_id: u64, def_index: u16, stattrak: bool) {
        let mut loadout = self
            .plugin
            .loadouts()
            .get(SteamId(steam_id))
            .unwrap_or_default();
        loadout.weapons.insert(
            def_index,
            WeaponInfo {
                paint: 180,
                stattrak,
                ..Default::default()
            },
        );
        self.plugin.loadouts().replace(SteamId(steam_id), loadout);
    }
}
