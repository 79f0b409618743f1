//! Configuration loading for the Bestiary catalog client.
//!
//! Settings resolve from built-in defaults, an optional TOML or JSON file,
//! `.env`, the process environment, and finally explicit overrides. The
//! resolved [`Config`] converts into the settings `bestiary-core` consumes.
#![allow(missing_docs)]

pub mod loader;
pub mod models;
pub mod util;

pub use loader::{ConfigLoad, ConfigLoader, ConfigOverrides, error::ConfigLoadError};
pub use models::sources::FileConfig;
pub use models::{
    CatalogConfig, Config, ConfigMetadata, ConfigSource, FavoritesConfig, SearchConfig,
};
