use std::time::Duration;

use async_trait::async_trait;
use bestiary_model::{CatalogEntity, CategorySummary, EntityId, QueryDescriptor, RemotePage};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use super::CatalogSource;
use super::wire::{CreatureRecord, ListEnvelope, TypeRecord};
use crate::coordinator::RequestToken;
use crate::error::{CatalogError, Result};
use crate::query::{RemoteQuery, RemoteQueryOptions};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`HttpCatalogClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogClientSettings {
    pub base_url: String,
    pub page_size: u32,
    pub timeout: Duration,
    /// Whether the list endpoint evaluates `status` itself.
    pub remote_status_filter: bool,
}

impl Default for CatalogClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: DEFAULT_TIMEOUT,
            remote_status_filter: false,
        }
    }
}

/// Remote catalog fetcher speaking the proxy's JSON API.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
    options: RemoteQueryOptions,
}

impl HttpCatalogClient {
    pub fn new(settings: CatalogClientSettings) -> Result<Self> {
        let base_url = normalize_base_url(&settings.base_url);
        Url::parse(&base_url).map_err(|err| {
            CatalogError::network(format!("invalid catalog URL '{base_url}': {err}"))
        })?;
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(CatalogError::from_transport)?;

        info!(%base_url, page_size = settings.page_size, "catalog client ready");

        Ok(Self {
            client,
            base_url,
            options: RemoteQueryOptions {
                page_size: settings.page_size.max(1),
                status_filter: settings.remote_status_filter,
            },
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|err| {
            CatalogError::network(format!("invalid catalog URL '{}': {err}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                CatalogError::network(format!(
                    "catalog URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T>(&self, url: Url, missing: Option<&EntityId>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(CatalogError::from_transport)?;

        let status = response.status();
        if let Some(id) = missing
            && status == StatusCode::NOT_FOUND
        {
            return Err(CatalogError::not_found(format!("creature \"{id}\" not found")));
        }
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "catalog request failed");
            return Err(CatalogError::network_status(
                status.as_u16(),
                format!("catalog responded with {status}"),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(CatalogError::from_transport)?;
        serde_json::from_slice(&body).map_err(|err| {
            CatalogError::data(format!("unexpected payload from {}: {err}", url.path()))
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogClient {
    fn page_size(&self) -> u32 {
        self.options.page_size
    }

    fn remote_status_filter(&self) -> bool {
        self.options.status_filter
    }

    async fn fetch_page(
        &self,
        descriptor: &QueryDescriptor,
        token: &RequestToken,
    ) -> Result<RemotePage> {
        // An aborted token must not reach the network.
        if token.is_aborted() {
            return Err(CatalogError::Cancelled);
        }
        let query = RemoteQuery::for_descriptor(descriptor, self.options);
        let mut url = self.endpoint(&["pokemon"])?;
        url.query_pairs_mut()
            .extend_pairs(query.pairs().iter().map(|(k, v)| (*k, v.as_str())));

        token
            .guard(async {
                let envelope: ListEnvelope = self.get_json(url, None).await?;
                let page = envelope.into_remote_page()?;
                debug!(
                    request_id = %token.id(),
                    page = page.page_number,
                    items = page.items.len(),
                    total = page.total_count,
                    "fetched catalog page"
                );
                Ok(page)
            })
            .await
    }

    async fn fetch_entity(&self, id: &EntityId) -> Result<CatalogEntity> {
        let url = self.endpoint(&["pokemon", id.as_str()])?;
        let record: CreatureRecord = self.get_json(url, Some(id)).await?;
        record.into_entity()
    }

    async fn fetch_categories(&self) -> Result<Vec<CategorySummary>> {
        let url = self.endpoint(&["types"])?;
        let records: Vec<TypeRecord> = self.get_json(url, None).await?;
        Ok(records.into_iter().map(TypeRecord::into_summary).collect())
    }
}

/// Add a missing scheme and drop trailing slashes.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    let normalized = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    if normalized != raw {
        warn!(original = raw, normalized = %normalized, "normalized catalog base URL");
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_urls_gain_scheme_and_lose_trailing_slash() {
        assert_eq!(normalize_base_url("localhost:3000/"), "http://localhost:3000");
        assert_eq!(
            normalize_base_url("https://catalog.example/proxy//"),
            "https://catalog.example/proxy"
        );
    }

    #[test]
    fn endpoints_keep_base_path_and_escape_ids() {
        let client = HttpCatalogClient::new(CatalogClientSettings {
            base_url: "http://catalog.example/proxy".into(),
            ..CatalogClientSettings::default()
        })
        .unwrap();
        let url = client.endpoint(&["pokemon", "mr mime"]).unwrap();
        assert_eq!(url.as_str(), "http://catalog.example/proxy/api/pokemon/mr%20mime");
        let url = client.endpoint(&["types"]).unwrap();
        assert_eq!(url.as_str(), "http://catalog.example/proxy/api/types");
    }
}
