//! Catalog query and result reconciliation engine.
//!
//! Raw UI parameters are normalized into a [`QueryDescriptor`], fetched
//! through a [`CatalogSource`], reconciled against the local favorites set
//! and published through a per-stream coordinator that drops stale results.
#![allow(missing_docs)]

pub mod browser;
pub mod catalog;
pub mod coordinator;
pub mod debounce;
pub mod error;
pub mod favorites;
pub mod pagination;
pub mod prelude;
pub mod query;
pub mod reconcile;

pub use bestiary_model as model;
pub use bestiary_model::{
    CatalogEntity, CategorySummary, EntityId, EntityStatus, FilterKey, QueryDescriptor,
    RawQueryParams, ReconciledPage, RemotePage, SortKey, SortOrder, UiCategory,
};

pub use browser::{BrowserOptions, CatalogBrowser, ViewState};
pub use catalog::{
    CatalogClientSettings, CatalogSource, HttpCatalogClient, LookupOutcome,
    load_favorite_entities, lookup_entity,
};
pub use coordinator::{QueryStream, RequestId, RequestToken, Settlement, StreamState};
pub use debounce::DebouncedQueryEmitter;
pub use error::{CatalogError, ErrorCode, ErrorPresentation, Result};
pub use favorites::{
    FAVORITES_KEY, FavoriteSet, FavoritesChanged, FavoritesError, FavoritesStorage,
    FavoritesStore, JsonFileStorage, MemoryStorage, StorageError,
};
pub use pagination::{PageSlot, RangeSummary, visible_pages};
pub use query::normalize;
pub use reconcile::Reconciler;
