use crate::commands::{self, CommandRegistry, CommandSender};
use crate::config::PluginConfig;
use crate::cooldown::CooldownStore;
use crate::host::{Clock, GameHost, SystemClock};
use crate::loadout::LoadoutStore;
use crate::localization::Localizer;
use crate::player::PlayerSlot;
use crate::sync::{HttpLoadoutSource, LoadoutSource, WeaponSync};
use crate::timers::{DeferredAction, Timers};
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::{self, Runtime};
use tracing::{debug, info, warn};

/// The plugin state. The host forwards its events to the `on_*` methods,
/// all from the server thread.
pub struct WeaponPaints {
    config: PluginConfig,
    host: Arc<dyn GameHost>,
    clock: Arc<dyn Clock>,
    localizer: Localizer,
    registry: CommandRegistry,
    cooldowns: CooldownStore,
    loadouts: Arc<LoadoutStore>,
    timers: Timers,
    /// Closed while the server changes maps.
    commands_allowed: AtomicBool,
    sync: Option<WeaponSync>,
    async_rt: Runtime,
}

impl WeaponPaints {
    pub fn new(
        config: PluginConfig,
        host: Arc<dyn GameHost>,
        clock: Arc<dyn Clock>,
        localizer: Localizer,
    ) -> Result<WeaponPaints> {
        let mut registry = CommandRegistry::new();
        commands::register_commands(&mut registry, &config);

        let async_rt = runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("weaponpaints-sync")
            .enable_all()
            .build()
            .context("failed to start the sync runtime")?;

        Ok(WeaponPaints {
            config,
            host,
            clock,
            localizer,
            registry,
            cooldowns: CooldownStore::new(),
            loadouts: Arc::new(LoadoutStore::new()),
            timers: Timers::new(),
            commands_allowed: AtomicBool::new(true),
            sync: None,
            async_rt,
        })
    }

    /// Sets up everything from `config`: language files from disk, the system
    /// clock and, if a `[sync]` table is present, the website api.
    pub fn from_config(config: PluginConfig, host: Arc<dyn GameHost>) -> Result<WeaponPaints> {
        let localizer = Localizer::load(&config.language_dir, &config.default_language)?;
        let sync_source = match &config.sync {
            Some(sync) => Some(HttpLoadoutSource::new(sync)?),
            None => None,
        };

        let mut plugin = WeaponPaints::new(config, host, Arc::new(SystemClock), localizer)?;
        if let Some(source) = sync_source {
            plugin = plugin.with_sync(Arc::new(source));
        }
        Ok(plugin)
    }

    pub fn with_sync(mut self, source: Arc<dyn LoadoutSource>) -> WeaponPaints {
        self.sync = Some(WeaponSync::new(
            self.async_rt.handle().clone(),
            source,
            Arc::clone(&self.loadouts),
        ));
        self
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn host(&self) -> &dyn GameHost {
        self.host.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn cooldowns(&self) -> &CooldownStore {
        &self.cooldowns
    }

    pub fn loadouts(&self) -> &LoadoutStore {
        &self.loadouts
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn sync(&self) -> Option<&WeaponSync> {
        self.sync.as_ref()
    }

    pub fn commands_allowed(&self) -> bool {
        self.commands_allowed.load(Ordering::Acquire)
    }

    /// Command names for the host to bind to [`WeaponPaints::on_client_command`].
    pub fn command_names(&self) -> Vec<String> {
        self.registry.host_command_names()
    }

    pub fn on_client_command(&self, slot: PlayerSlot, command_line: &str) -> bool {
        self.registry
            .execute(self, CommandSender::Player(slot), command_line)
    }

    pub fn on_console_command(&self, command_line: &str) -> bool {
        self.registry
            .execute(self, CommandSender::Console, command_line)
    }

    pub fn on_tick(&self) {
        for action in self.timers.run_due(self.clock.now()) {
            self.run_deferred(action);
        }
    }

    fn run_deferred(&self, action: DeferredAction) {
        match action {
            DeferredAction::GivePin(identity) => {
                let still_here = self
                    .host
                    .player(identity.slot)
                    .is_some_and(|player| player.is_valid_human() && player.identity() == identity);
                if !still_here {
                    debug!("{} left before their pin was applied", identity.steam_id);
                    return;
                }
                if let Err(err) = self.host.give_pin(identity.slot) {
                    warn!("Failed to give pin to {}: {:#}", identity.steam_id, err);
                }
            }
        }
    }

    pub fn on_map_start(&self) {
        self.commands_allowed.store(true, Ordering::Release);
        info!("Map started, commands enabled");
    }

    pub fn on_map_end(&self) {
        self.commands_allowed.store(false, Ordering::Release);
        self.timers.clear();
        info!("Map ended, commands suspended");
    }

    /// Drops everything kept for the client in `slot`. Works whether or not
    /// the host still reports the client: loadouts are only fetched by an
    /// admitted refresh, which always leaves a cooldown entry behind.
    pub fn on_player_disconnect(&self, slot: PlayerSlot) {
        if let Some(player) = self.host.player(slot) {
            self.loadouts.remove(player.steam_id);
        }
        for identity in self.cooldowns.clear_slot(slot) {
            self.loadouts.remove(identity.steam_id);
        }
    }
}
