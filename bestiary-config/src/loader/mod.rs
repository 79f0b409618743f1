//! Layered configuration: defaults, then a TOML/JSON file, then `.env`
//! and process environment, then explicit overrides from the caller.

pub mod error;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::models::sources::FileConfig;
use crate::models::{
    CatalogConfig, Config, ConfigMetadata, ConfigSource, FavoritesConfig, MAX_PAGE_SIZE,
    SearchConfig,
};
use crate::util::{env_value, parse_bool, parse_duration};
use error::ConfigLoadError;

pub const ENV_CONFIG_PATH: &str = "BESTIARY_CONFIG";
pub const ENV_CATALOG_URL: &str = "BESTIARY_CATALOG_URL";
pub const ENV_PAGE_SIZE: &str = "BESTIARY_PAGE_SIZE";
pub const ENV_REQUEST_TIMEOUT: &str = "BESTIARY_REQUEST_TIMEOUT";
pub const ENV_REMOTE_STATUS_FILTER: &str = "BESTIARY_REMOTE_STATUS_FILTER";
pub const ENV_FAVORITES_DIR: &str = "BESTIARY_FAVORITES_DIR";
pub const ENV_SEARCH_DEBOUNCE_MS: &str = "BESTIARY_SEARCH_DEBOUNCE_MS";

/// Values supplied directly by the caller, typically CLI flags. They win
/// over every other layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub catalog_url: Option<String>,
    pub page_size: Option<u32>,
    pub remote_status_filter: Option<bool>,
    pub favorites_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
    base_dir: PathBuf,
    env: Option<HashMap<String, String>>,
    overrides: ConfigOverrides,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_file: Some(PathBuf::from(".env")),
            base_dir: PathBuf::from("."),
            env: None,
            overrides: ConfigOverrides::default(),
        }
    }

    /// Use this file instead of `$BESTIARY_CONFIG` or the default candidates.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// `.env` file to read, relative to the base directory. `None` disables
    /// it.
    pub fn with_env_file(mut self, path: Option<PathBuf>) -> Self {
        self.env_file = path;
        self
    }

    /// Directory that relative paths and default candidates resolve against.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Replace the process environment with a fixed snapshot.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (env, env_file_loaded) = self.environment()?;
        let (file, source) = self.file_layer(&env)?;

        let mut metadata = ConfigMetadata {
            source,
            env_file_loaded,
            env_overrides: Vec::new(),
        };
        let mut warnings = Vec::new();

        let catalog = self.catalog(&file, &env, &mut metadata, &mut warnings)?;

        let favorites_dir = match (
            &self.overrides.favorites_dir,
            env_value(&env, ENV_FAVORITES_DIR),
        ) {
            (Some(dir), _) => dir.clone(),
            (None, Some(dir)) => {
                metadata.env_overrides.push(ENV_FAVORITES_DIR);
                PathBuf::from(dir)
            }
            (None, None) => match &file.favorites.dir {
                Some(dir) => self.resolve(dir),
                None => FavoritesConfig::default().dir,
            },
        };

        let debounce_ms = match env_value(&env, ENV_SEARCH_DEBOUNCE_MS) {
            Some(raw) => {
                metadata.env_overrides.push(ENV_SEARCH_DEBOUNCE_MS);
                raw.parse::<u64>().map_err(|err| {
                    ConfigLoadError::invalid(ENV_SEARCH_DEBOUNCE_MS, raw, err.to_string())
                })?
            }
            None => file
                .search
                .debounce_ms
                .unwrap_or(SearchConfig::default().debounce.as_millis() as u64),
        };

        for warning in &warnings {
            warn!("{warning}");
        }
        info!(
            source = ?metadata.source,
            catalog_url = %catalog.base_url,
            page_size = catalog.page_size,
            "configuration loaded"
        );

        Ok(ConfigLoad {
            config: Config {
                catalog,
                favorites: FavoritesConfig { dir: favorites_dir },
                search: SearchConfig {
                    debounce: Duration::from_millis(debounce_ms),
                },
                metadata,
            },
            warnings,
        })
    }

    fn catalog(
        &self,
        file: &FileConfig,
        env: &HashMap<String, String>,
        metadata: &mut ConfigMetadata,
        warnings: &mut Vec<String>,
    ) -> Result<CatalogConfig, ConfigLoadError> {
        let defaults = CatalogConfig::default();

        let base_url = match (&self.overrides.catalog_url, env_value(env, ENV_CATALOG_URL)) {
            (Some(url), _) => url.clone(),
            (None, Some(url)) => {
                metadata.env_overrides.push(ENV_CATALOG_URL);
                url.to_string()
            }
            (None, None) => file.catalog.base_url.clone().unwrap_or(defaults.base_url),
        };

        let requested_page_size = match (self.overrides.page_size, env_value(env, ENV_PAGE_SIZE)) {
            (Some(size), _) => i64::from(size),
            (None, Some(raw)) => {
                metadata.env_overrides.push(ENV_PAGE_SIZE);
                raw.parse::<i64>().map_err(|err| {
                    ConfigLoadError::invalid(ENV_PAGE_SIZE, raw, err.to_string())
                })?
            }
            (None, None) => file
                .catalog
                .page_size
                .unwrap_or(i64::from(defaults.page_size)),
        };
        let page_size = requested_page_size.clamp(1, i64::from(MAX_PAGE_SIZE)) as u32;
        if i64::from(page_size) != requested_page_size {
            warnings.push(format!(
                "page size {requested_page_size} is outside 1..={MAX_PAGE_SIZE}; using {page_size}"
            ));
        }

        let request_timeout = match env_value(env, ENV_REQUEST_TIMEOUT) {
            Some(raw) => {
                metadata.env_overrides.push(ENV_REQUEST_TIMEOUT);
                parse_duration(raw)
                    .map_err(|reason| ConfigLoadError::invalid(ENV_REQUEST_TIMEOUT, raw, reason))?
            }
            None => match &file.catalog.request_timeout {
                Some(raw) => parse_duration(raw).map_err(|reason| {
                    ConfigLoadError::invalid("catalog.request_timeout", raw.as_str(), reason)
                })?,
                None => defaults.request_timeout,
            },
        };
        if request_timeout.is_zero() {
            return Err(ConfigLoadError::invalid(
                "catalog.request_timeout",
                "0s",
                "timeout must be positive",
            ));
        }

        let remote_status_filter = match (
            self.overrides.remote_status_filter,
            env_value(env, ENV_REMOTE_STATUS_FILTER),
        ) {
            (Some(flag), _) => flag,
            (None, Some(raw)) => {
                metadata.env_overrides.push(ENV_REMOTE_STATUS_FILTER);
                parse_bool(raw).ok_or_else(|| {
                    ConfigLoadError::invalid(
                        ENV_REMOTE_STATUS_FILTER,
                        raw,
                        "expected one of 1/true/yes/on or 0/false/no/off",
                    )
                })?
            }
            (None, None) => file
                .catalog
                .remote_status_filter
                .unwrap_or(defaults.remote_status_filter),
        };

        Ok(CatalogConfig {
            base_url,
            page_size,
            request_timeout,
            remote_status_filter,
        })
    }

    /// Process environment (or the injected snapshot) with `.env` entries
    /// filling in anything not already set.
    fn environment(&self) -> Result<(HashMap<String, String>, bool), ConfigLoadError> {
        let mut env = match &self.env {
            Some(env) => env.clone(),
            None => std::env::vars().collect(),
        };

        let Some(env_file) = &self.env_file else {
            return Ok((env, false));
        };
        let path = self.resolve(env_file);
        match dotenvy::from_path_iter(&path) {
            Ok(entries) => {
                for entry in entries {
                    let (key, value) = entry?;
                    env.entry(key).or_insert(value);
                }
                debug!(path = %path.display(), "loaded env file");
                Ok((env, true))
            }
            Err(err) if err.not_found() => Ok((env, false)),
            Err(err) => Err(err.into()),
        }
    }

    fn file_layer(
        &self,
        env: &HashMap<String, String>,
    ) -> Result<(FileConfig, ConfigSource), ConfigLoadError> {
        let source = if let Some(path) = &self.config_path {
            ConfigSource::Explicit(self.resolve(path))
        } else if let Some(raw) = env_value(env, ENV_CONFIG_PATH) {
            ConfigSource::EnvPath(self.resolve(Path::new(raw)))
        } else if let Some(path) = FileConfig::find_default_file(&self.base_dir) {
            ConfigSource::File(path)
        } else {
            return Ok((FileConfig::default(), ConfigSource::Default));
        };

        let Some(path) = source.path() else {
            return Ok((FileConfig::default(), source));
        };
        if !path.is_file() {
            return Err(ConfigLoadError::MissingFile { path: path.clone() });
        }
        let file = FileConfig::load_from_file(path).map_err(|source| ConfigLoadError::File {
            path: path.clone(),
            source,
        })?;
        Ok((file, source))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}
