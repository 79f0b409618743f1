//! Core data model definitions shared across Bestiary crates.
#![allow(missing_docs)]

pub mod entity;
pub mod error;
pub mod filter_types;
pub mod ids;
pub mod page;
pub mod prelude;
pub mod query;

pub use entity::{BaseStats, CatalogEntity, CategorySummary};
pub use error::{ModelError, Result as ModelResult};
pub use filter_types::{
    EntityStatus, INACTIVE_SCORE_THRESHOLD, PENDING_SCORE_THRESHOLD, SortKey,
    SortOrder, UiCategory,
};
pub use ids::EntityId;
pub use page::{ReconciledPage, RemotePage};
pub use query::{FilterKey, QueryDescriptor, RawQueryParams};
