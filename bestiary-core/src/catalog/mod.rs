//! Remote catalog access.
//!
//! [`CatalogSource`] is the seam between the engine and the remote. The HTTP
//! implementation lives in [`http`]; tests substitute scripted sources.

pub mod http;
pub(crate) mod wire;

use std::fmt::Debug;

use async_trait::async_trait;
use bestiary_model::{CatalogEntity, CategorySummary, EntityId, QueryDescriptor, RemotePage};
use futures::future::join_all;
use tracing::debug;

use crate::coordinator::RequestToken;
use crate::error::Result;
use crate::favorites::FavoriteSet;

pub use http::{CatalogClientSettings, HttpCatalogClient, normalize_base_url};

#[async_trait]
pub trait CatalogSource: Send + Sync + Debug {
    /// Fixed number of records requested per page.
    fn page_size(&self) -> u32;

    /// Whether the remote evaluates the status facet itself.
    fn remote_status_filter(&self) -> bool {
        false
    }

    /// Fetch one page for `descriptor`. Must not start, and must resolve to
    /// `Cancelled`, when `token` is already aborted.
    async fn fetch_page(
        &self,
        descriptor: &QueryDescriptor,
        token: &RequestToken,
    ) -> Result<RemotePage>;

    /// Fetch a single entity. A missing entity is a `DataFetch` error
    /// carrying `NOT_FOUND`.
    async fn fetch_entity(&self, id: &EntityId) -> Result<CatalogEntity>;

    async fn fetch_categories(&self) -> Result<Vec<CategorySummary>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(Box<CatalogEntity>),
    NotFound(EntityId),
}

impl LookupOutcome {
    pub fn into_entity(self) -> Option<CatalogEntity> {
        match self {
            LookupOutcome::Found(entity) => Some(*entity),
            LookupOutcome::NotFound(_) => None,
        }
    }
}

/// Single-entity lookup where "not found" is an outcome, not an error.
pub async fn lookup_entity(source: &dyn CatalogSource, id: &EntityId) -> Result<LookupOutcome> {
    match source.fetch_entity(id).await {
        Ok(entity) => Ok(LookupOutcome::Found(Box::new(entity))),
        Err(err) if err.is_not_found() => Ok(LookupOutcome::NotFound(id.clone())),
        Err(err) => Err(err),
    }
}

/// Fetch every favorite concurrently, in favorites order. Ids the remote no
/// longer knows are skipped; any other failure fails the whole load.
pub async fn load_favorite_entities(
    source: &dyn CatalogSource,
    favorites: &FavoriteSet,
) -> Result<Vec<CatalogEntity>> {
    let lookups = favorites.iter().map(|id| lookup_entity(source, id));
    let mut entities = Vec::with_capacity(favorites.len());
    for outcome in join_all(lookups).await {
        match outcome? {
            LookupOutcome::Found(entity) => entities.push(*entity),
            LookupOutcome::NotFound(id) => {
                debug!(%id, "favorite no longer in catalog, skipping");
            }
        }
    }
    Ok(entities)
}
