use crate::lyrics::{CatalogEntry, StaticCatalog};
use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod defaults;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub genius: GeniusConfig,
    pub catalog: CatalogConfig,
    pub bot: BotConfig,
    pub translate: TranslateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeniusConfig {
    /// Site origin, e.g. "https://genius.com".
    pub base_url: String,
    /// Timeout for search requests and song page fetches.
    pub search_timeout_secs: u64,
    /// Timeout for the catalog page existence check.
    pub verify_timeout_secs: u64,
    pub results_per_page: u32,
    pub user_agent: String,
    pub accept_language: String,
}

/// Known song pages tried when live search fails. Regional entries are matched first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub regional: Vec<CatalogEntry>,
    pub international: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Longest single reply, in characters.
    pub max_message_len: usize,
    /// Pause between parts of a split reply.
    pub part_delay_ms: u64,
    /// Translate lyrics into this language (e.g. "ru") before replying.
    pub translate_to: Option<String>,
    pub translate_from: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    pub google_url: String,
    pub mymemory_url: String,
    pub timeout_secs: u64,
}

impl Default for GeniusConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::GENIUS_BASE_URL.to_string(),
            search_timeout_secs: 10,
            verify_timeout_secs: 5,
            results_per_page: 5,
            user_agent: defaults::BROWSER_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9,ru;q=0.8".to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            regional: defaults::regional_catalog(),
            international: defaults::international_catalog(),
        }
    }
}

impl CatalogConfig {
    pub fn build(&self) -> StaticCatalog {
        StaticCatalog::from_groups(&self.regional, &self.international)
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            max_message_len: 4000,
            part_delay_ms: 300,
            translate_to: None,
            translate_from: "en".to_string(),
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            google_url: defaults::GOOGLE_TRANSLATE_URL.to_string(),
            mymemory_url: defaults::MYMEMORY_URL.to_string(),
            timeout_secs: 5,
        }
    }
}

pub fn save(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    write_config(cfg, &path)
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from("dev", "lyricsbot", "lyricsbot")
        .context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        let cfg = defaults::defaults();
        write_config(&cfg, &path).context("write default config")?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

fn write_config(cfg: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}
