pub mod sources;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bestiary_core::browser::BrowserOptions;
use bestiary_core::catalog::CatalogClientSettings;
use bestiary_core::favorites::FavoritesStore;

pub const DEFAULT_CATALOG_URL: &str = "http://localhost:3000";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub favorites: FavoritesConfig,
    pub search: SearchConfig,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn client_settings(&self) -> CatalogClientSettings {
        CatalogClientSettings {
            base_url: self.catalog.base_url.clone(),
            page_size: self.catalog.page_size,
            timeout: self.catalog.request_timeout,
            remote_status_filter: self.catalog.remote_status_filter,
        }
    }

    pub fn favorites_store(&self) -> Arc<FavoritesStore> {
        Arc::new(FavoritesStore::open_dir(&self.favorites.dir))
    }

    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            search_debounce: self.search.debounce,
            ..BrowserOptions::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub base_url: String,
    pub page_size: u32,
    pub request_timeout: Duration,
    pub remote_status_filter: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            remote_status_filter: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesConfig {
    pub dir: PathBuf,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            dir: default_favorites_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub debounce: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        }
    }
}

/// Source that produced the file layer of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    Explicit(PathBuf),
    EnvPath(PathBuf),
    File(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ConfigSource::Default => None,
            ConfigSource::Explicit(path)
            | ConfigSource::EnvPath(path)
            | ConfigSource::File(path) => Some(path),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub source: ConfigSource,
    pub env_file_loaded: bool,
    /// Environment variables that overrode file or default values.
    pub env_overrides: Vec<&'static str>,
}

/// Platform data directory, or `.bestiary` in the working directory when
/// the platform has none.
pub fn default_favorites_dir() -> PathBuf {
    directories::ProjectDirs::from("rs", "bestiary", "bestiary")
        .map(|dirs| dirs.data_dir().join("favorites"))
        .unwrap_or_else(|| PathBuf::from(".bestiary"))
}
