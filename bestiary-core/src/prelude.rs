//! Common imports for front ends built on the engine.

pub use crate::browser::{BrowserOptions, CatalogBrowser, ViewState};
pub use crate::catalog::{CatalogSource, HttpCatalogClient, LookupOutcome, lookup_entity};
pub use crate::coordinator::{QueryStream, RequestToken, Settlement};
pub use crate::error::{CatalogError, ErrorPresentation};
pub use crate::favorites::{FavoriteSet, FavoritesStore};
pub use crate::query::normalize;
pub use bestiary_model::prelude::*;
