use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use rustc_hash::FxHashMap;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use weaponpaints_text::colorize;

static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\d+)\}").unwrap());

type Table = FxHashMap<String, String>;

/// Message templates per locale, loaded from `<locale>.json` files.
#[derive(Debug, Default)]
pub struct Localizer {
    default_language: String,
    tables: FxHashMap<String, Table>,
}

impl Localizer {
    pub fn from_tables(
        default_language: impl Into<String>,
        tables: impl IntoIterator<Item = (String, Table)>,
    ) -> Localizer {
        Localizer {
            default_language: default_language.into(),
            tables: tables.into_iter().collect(),
        }
    }

    /// Loads every json file in `dir`. A missing directory is not an error,
    /// every message simply resolves to nothing.
    pub fn load(dir: impl AsRef<Path>, default_language: &str) -> Result<Localizer> {
        let dir = dir.as_ref();
        let mut localizer = Localizer {
            default_language: default_language.to_string(),
            tables: FxHashMap::default(),
        };
        if !dir.is_dir() {
            warn!("Language directory {} not found, messages are disabled", dir.display());
            return Ok(localizer);
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(locale) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let data = fs::read_to_string(&path)?;
            let table: Table = serde_json::from_str(&data)
                .with_context(|| format!("invalid language file {}", path.display()))?;
            debug!("Loaded {} messages for locale {}", table.len(), locale);
            localizer.tables.insert(locale.to_string(), table);
        }

        if !localizer.tables.contains_key(default_language) {
            warn!("No language file for default locale {}", default_language);
        }
        Ok(localizer)
    }

    fn template(&self, locale: Option<&str>, key: &str) -> Option<&str> {
        let lookup = |locale: &str| {
            self.tables
                .get(locale)
                .and_then(|table| table.get(key))
                .map(String::as_str)
        };

        locale
            .and_then(|locale| {
                lookup(locale).or_else(|| {
                    let (language, _) = locale.split_once(['-', '_'])?;
                    lookup(language)
                })
            })
            .or_else(|| lookup(&self.default_language))
    }

    /// Resolves `key` for `locale`, turns its color tags into control
    /// characters and fills in the positional `{n}` placeholders. Arguments
    /// are inserted verbatim. Returns `None` when the message is missing or
    /// empty, which means nothing should be sent.
    pub fn get(&self, locale: Option<&str>, key: &str, args: &[&dyn Display]) -> Option<String> {
        let template = self.template(locale, key)?;
        if template.is_empty() {
            return None;
        }

        let template = colorize(template);
        let message = PLACEHOLDER_REGEX.replace_all(&template, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| args.get(i))
                .map_or_else(|| caps[0].to_string(), |arg| arg.to_string())
        });
        Some(message.into_owned())
    }
}
