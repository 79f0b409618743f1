//! Convenience re-exports for crates building on the model.

pub use crate::entity::{BaseStats, CatalogEntity, CategorySummary};
pub use crate::error::{ModelError, Result as ModelResult};
pub use crate::filter_types::{EntityStatus, SortKey, SortOrder, UiCategory};
pub use crate::ids::EntityId;
pub use crate::page::{ReconciledPage, RemotePage};
pub use crate::query::{FilterKey, QueryDescriptor, RawQueryParams};
