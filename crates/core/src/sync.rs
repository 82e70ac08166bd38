use crate::config::SyncConfig;
use crate::loadout::{LoadoutStore, PlayerLoadout};
use crate::player::PlayerInfo;
use anyhow::Result;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Somewhere player loadouts can be fetched from.
pub trait LoadoutSource: Send + Sync {
    fn fetch(&self, player: PlayerInfo) -> BoxFuture<'_, Result<PlayerLoadout>>;
}

/// Fetches loadouts from the website's http api.
pub struct HttpLoadoutSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpLoadoutSource {
    pub fn new(config: &SyncConfig) -> Result<HttpLoadoutSource> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(HttpLoadoutSource {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

impl LoadoutSource for HttpLoadoutSource {
    fn fetch(&self, player: PlayerInfo) -> BoxFuture<'_, Result<PlayerLoadout>> {
        Box::pin(async move {
            let url = format!("{}/players/{}", self.base_url, player.steam_id);
            let mut request = self.client.get(url);
            if let Some(api_key) = &self.api_key {
                request = request.bearer_auth(api_key);
            }
            let loadout = request
                .send()
                .await?
                .error_for_status()?
                .json::<PlayerLoadout>()
                .await?;
            Ok(loadout)
        })
    }
}

/// Pulls player loadouts in the background and stores them for the refresh
/// and stattrak commands.
pub struct WeaponSync {
    runtime: Handle,
    source: Arc<dyn LoadoutSource>,
    loadouts: Arc<LoadoutStore>,
}

impl WeaponSync {
    pub fn new(
        runtime: Handle,
        source: Arc<dyn LoadoutSource>,
        loadouts: Arc<LoadoutStore>,
    ) -> WeaponSync {
        WeaponSync {
            runtime,
            source,
            loadouts,
        }
    }

    /// Starts fetching the loadout of `player` and returns right away. Errors
    /// are only logged; callers are not expected to wait on the handle.
    pub fn spawn_player_data(&self, player: PlayerInfo) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        let loadouts = Arc::clone(&self.loadouts);
        self.runtime.spawn(async move {
            let steam_id = player.steam_id;
            let name = player.name.clone();
            match source.fetch(player).await {
                Ok(loadout) => {
                    debug!(
                        "Synced {} weapons for {} ({})",
                        loadout.weapons.len(),
                        name,
                        steam_id
                    );
                    loadouts.replace(steam_id, loadout);
                }
                Err(err) => warn!("Failed to sync loadout of {} ({}): {:#}", name, steam_id, err),
            }
        })
    }
}
