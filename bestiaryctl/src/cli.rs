use std::path::PathBuf;

use bestiary_config::ConfigOverrides;
use bestiary_core::{FilterKey, RawQueryParams};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "bestiaryctl",
    version,
    about = "Browse the creature catalog and manage local favorites"
)]
pub struct Cli {
    /// Config file (TOML or JSON). Defaults to $BESTIARY_CONFIG or ./bestiary.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Catalog base URL, e.g. http://localhost:3000
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Records requested per page (1-100)
    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    /// Directory holding the favorites file
    #[arg(long, global = true)]
    pub favorites_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            catalog_url: self.server.clone(),
            page_size: self.page_size,
            remote_status_filter: None,
            favorites_dir: self.favorites_dir.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List one page of the catalog
    List(ListArgs),
    /// Show a single creature by id
    Show {
        id: String,
    },
    /// List categories with their population
    Categories,
    /// Manage local favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Free-text search
    #[arg(short, long)]
    pub query: Option<String>,
    /// Category name, e.g. Fire ("all" for any)
    #[arg(long)]
    pub category: Option<String>,
    /// active, inactive or pending
    #[arg(long)]
    pub status: Option<String>,
    /// name, date or category
    #[arg(long)]
    pub sort: Option<String>,
    /// asc or desc
    #[arg(long)]
    pub order: Option<String>,
    #[arg(long)]
    pub page: Option<String>,
    /// Only show favorites on the fetched page
    #[arg(long)]
    pub favorites: bool,
}

impl ListArgs {
    /// Flags map one-to-one onto the UI parameter surface; normalization
    /// happens in the engine.
    pub fn to_params(&self) -> RawQueryParams {
        let mut params = RawQueryParams::new();
        let flags = [
            (FilterKey::Query, &self.query),
            (FilterKey::Category, &self.category),
            (FilterKey::Status, &self.status),
            (FilterKey::Sort, &self.sort),
            (FilterKey::Order, &self.order),
            (FilterKey::Page, &self.page),
        ];
        for (key, value) in flags {
            if let Some(value) = value {
                params.set(key, value.as_str());
            }
        }
        if self.favorites {
            params.set(FilterKey::Favorites, "true");
        }
        params
    }
}

#[derive(Subcommand, Debug)]
pub enum FavoritesAction {
    /// Print favorite ids
    List {
        /// Fetch each favorite from the catalog and print details
        #[arg(long)]
        resolve: bool,
    },
    /// Mark a creature as favorite
    Add { id: String },
    /// Unmark a creature
    Remove { id: String },
    /// Flip favorite membership and print the result
    Toggle { id: String },
    /// Remove every favorite
    Clear,
}
