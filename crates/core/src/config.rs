use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use toml_edit::{value, Array, DocumentMut};

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, doc: &mut DocumentMut);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, doc: &mut DocumentMut) {
                    doc.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String, i64, bool);

impl ConfigSerializeDefault for Vec<String> {
    fn fix_config(self, name: &str, doc: &mut DocumentMut) {
        doc.entry(name)
            .or_insert_with(|| value(self.into_iter().collect::<Array>()));
    }
}

impl<T> ConfigSerializeDefault for Option<T> {
    fn fix_config(self, _: &str, _: &mut DocumentMut) {
        assert!(self.is_none(), "`Some` as default is unimplemented");
    }
}

macro_rules! gen_config {
    (
        $( $name:ident: $type:ty = $default:expr ),*
    ) => {
        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct PluginConfig {
            $(
                pub $name: $type,
            )*
        }

        impl Default for PluginConfig {
            fn default() -> Self {
                PluginConfig {
                    $(
                        $name: $default,
                    )*
                }
            }
        }

        impl PluginConfig {
            /// Loads the config file, adding any missing keys with their default
            /// value and writing the patched file back.
            pub fn load(config_file: impl AsRef<Path>) -> Result<PluginConfig> {
                let config_file = config_file.as_ref();
                let str = fs::read_to_string(config_file).unwrap_or_default();
                let mut doc = str
                    .parse::<DocumentMut>()
                    .with_context(|| format!("{} is not valid toml", config_file.display()))?;

                $(
                    <$type as ConfigSerializeDefault>::fix_config($default, stringify!($name), &mut doc);
                )*

                let patched = doc.to_string();
                if str != patched {
                    fs::write(config_file, &patched).with_context(|| {
                        format!("failed to write defaults to {}", config_file.display())
                    })?;
                }

                toml::from_str(&patched)
                    .with_context(|| format!("failed to read {}", config_file.display()))
            }
        }
    };
}

gen_config! {
    website: String = "example.com/skins".to_string(),
    chat_prefix: String = "{GREEN}[WeaponPaints]{DEFAULT}".to_string(),
    default_language: String = "en".to_string(),
    language_dir: String = "lang".to_string(),
    cmd_refresh_cooldown_seconds: i64 = 3,
    skin_enabled: bool = true,
    glove_enabled: bool = true,
    agent_enabled: bool = true,
    music_enabled: bool = true,
    pins_enabled: bool = true,
    knife_enabled: bool = true,
    command_wp_enabled: bool = true,
    command_kill_enabled: bool = true,
    command_stattrak: Vec<String> = vec!["stattrak".to_string(), "st".to_string()],
    command_skin: Vec<String> = vec!["ws".to_string()],
    command_refresh: Vec<String> = vec!["wp".to_string()],
    command_kill: Vec<String> = vec!["kill".to_string()],
    sync: Option<SyncConfig> = None
}

impl PluginConfig {
    pub fn refresh_cooldown(&self) -> Duration {
        Duration::seconds(
            self.cmd_refresh_cooldown_seconds
                .clamp(0, i64::from(u32::MAX)),
        )
    }
}

/// Where player loadouts are fetched from. Without this table the refresh
/// command only re-applies what is already cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_sync_timeout")]
    pub timeout_seconds: u64,
}

fn default_sync_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_config(name: &str) -> std::path::PathBuf {
        let path = env::temp_dir().join(format!("wp_config_{}_{}.toml", name, std::process::id()));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn missing_file_is_filled_with_defaults() {
        let path = temp_config("defaults");
        let config = PluginConfig::load(&path).unwrap();
        assert_eq!(config.cmd_refresh_cooldown_seconds, 3);
        assert_eq!(config.command_refresh, vec!["wp".to_string()]);
        assert!(config.sync.is_none());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("command_stattrak"));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn existing_values_and_comments_are_kept() {
        let path = temp_config("existing");
        fs::write(
            &path,
            "# my server\ncmd_refresh_cooldown_seconds = 10\n\n[sync]\nurl = \"http://localhost:8080\"\n",
        )
        .unwrap();

        let config = PluginConfig::load(&path).unwrap();
        assert_eq!(config.cmd_refresh_cooldown_seconds, 10);
        let sync = config.sync.unwrap();
        assert_eq!(sync.url, "http://localhost:8080");
        assert_eq!(sync.timeout_seconds, 10);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# my server"));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn negative_cooldown_is_clamped() {
        let config = PluginConfig {
            cmd_refresh_cooldown_seconds: -5,
            ..Default::default()
        };
        assert_eq!(config.refresh_cooldown(), Duration::zero());
    }
}
