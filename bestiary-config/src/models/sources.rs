use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Raw configuration as defined in a TOML (or JSON) file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub catalog: FileCatalogConfig,
    #[serde(default)]
    pub favorites: FileFavoritesConfig,
    #[serde(default)]
    pub search: FileSearchConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileCatalogConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    /// Humantime string, e.g. `"30s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_status_filter: Option<bool>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileFavoritesConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileSearchConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
}

impl FileConfig {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents).map_err(|err| {
                anyhow!("invalid config {}: {err}", path.display())
            }),
            Some("toml") => toml::from_str(&contents).map_err(|err| {
                anyhow!("invalid config {}: {err}", path.display())
            }),
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(contents: &str, origin: &str) -> anyhow::Result<Self> {
        // Try TOML first, then JSON for convenience.
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    /// First existing default candidate under `base_dir`.
    pub fn find_default_file(base_dir: &Path) -> Option<PathBuf> {
        const CANDIDATES: &[&str] = &["bestiary.toml", "config/bestiary.toml"];

        CANDIDATES
            .iter()
            .map(|candidate| base_dir.join(candidate))
            .find(|path| path.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toml_sections() {
        let parsed = FileConfig::parse_from_str(
            r#"
                [catalog]
                base_url = "http://catalog.local:3000"
                page_size = 40
                request_timeout = "10s"

                [search]
                debounce_ms = 250
            "#,
            "inline",
        )
        .unwrap();
        assert_eq!(parsed.catalog.base_url.as_deref(), Some("http://catalog.local:3000"));
        assert_eq!(parsed.catalog.page_size, Some(40));
        assert_eq!(parsed.search.debounce_ms, Some(250));
        assert_eq!(parsed.favorites.dir, None);
    }

    #[test]
    fn falls_back_to_json() {
        let parsed =
            FileConfig::parse_from_str(r#"{"catalog": {"remote_status_filter": true}}"#, "inline")
                .unwrap();
        assert_eq!(parsed.catalog.remote_status_filter, Some(true));
    }

    #[test]
    fn reports_both_parse_errors() {
        let err = FileConfig::parse_from_str("[catalog", "broken.conf").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("broken.conf"));
        assert!(message.contains("json error"));
    }
}
