mod cli;
mod output;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use bestiary_config::{Config, ConfigLoader};
use bestiary_core::prelude::*;
use bestiary_core::{BrowserOptions, CatalogSource, load_favorite_entities};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command, FavoritesAction, ListArgs};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,bestiary_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut loader = ConfigLoader::new().with_overrides(cli.overrides());
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load().context("failed to load configuration")?.config;

    match cli.command {
        Command::List(args) => list(&config, args).await,
        Command::Show { id } => show(&config, &id).await,
        Command::Categories => {
            let client = client(&config)?;
            let categories = client
                .fetch_categories()
                .await
                .map_err(|err| report(&err))?;
            print!("{}", output::categories(&categories));
            Ok(ExitCode::SUCCESS)
        }
        Command::Favorites { action } => favorites(&config, action).await,
    }
}

fn client(config: &Config) -> Result<HttpCatalogClient> {
    HttpCatalogClient::new(config.client_settings()).context("failed to create catalog client")
}

fn parse_id(raw: &str) -> Result<EntityId> {
    EntityId::new(raw).with_context(|| format!("invalid creature id '{raw}'"))
}

/// Print the user-facing rendering of `err` and turn it into an exit error.
fn report(err: &CatalogError) -> anyhow::Error {
    eprint!("{}", output::failure(&err.presentation()));
    anyhow::anyhow!(err.clone())
}

async fn list(config: &Config, args: ListArgs) -> Result<ExitCode> {
    let source: Arc<dyn CatalogSource> = Arc::new(client(config)?);
    let favorites = config.favorites_store();
    let page_size = source.page_size();
    let browser = CatalogBrowser::new(
        source,
        Arc::clone(&favorites),
        BrowserOptions {
            initial_params: args.to_params(),
            ..config.browser_options()
        },
    );

    match browser.load().await {
        Settlement::Published(Ok(page)) => {
            let current = favorites.get_all();
            print!(
                "{}",
                output::page(&page, page_size, |entity| current.contains(&entity.id))
            );
            Ok(ExitCode::SUCCESS)
        }
        Settlement::Published(Err(err)) => Err(report(&err)),
        Settlement::Discarded => Ok(ExitCode::FAILURE),
    }
}

async fn show(config: &Config, raw_id: &str) -> Result<ExitCode> {
    let id = parse_id(raw_id)?;
    let client = client(config)?;
    match lookup_entity(&client, &id).await.map_err(|err| report(&err))? {
        LookupOutcome::Found(entity) => {
            let favorite = config.favorites_store().contains(&entity.id);
            print!("{}", output::entity_detail(&entity, favorite));
            Ok(ExitCode::SUCCESS)
        }
        LookupOutcome::NotFound(id) => {
            eprintln!("No creature with id {id} exists in the catalog.");
            Ok(ExitCode::from(2))
        }
    }
}

async fn favorites(config: &Config, action: FavoritesAction) -> Result<ExitCode> {
    let store = config.favorites_store();
    match action {
        FavoritesAction::List { resolve: false } => {
            for id in &store.get_all() {
                println!("{id}");
            }
        }
        FavoritesAction::List { resolve: true } => {
            let client = client(config)?;
            let entities = load_favorite_entities(&client, &store.get_all())
                .await
                .map_err(|err| report(&err))?;
            for entity in &entities {
                println!("{}", output::entity_row(entity, true));
            }
        }
        FavoritesAction::Add { id } => {
            store.add(parse_id(&id)?)?;
            println!("Added {id} ({} favorites)", store.count());
        }
        FavoritesAction::Remove { id } => {
            store.remove(&parse_id(&id)?)?;
            println!("Removed {id} ({} favorites)", store.count());
        }
        FavoritesAction::Toggle { id } => {
            let now_favorite = store.toggle(parse_id(&id)?)?;
            let verb = if now_favorite { "is now" } else { "is no longer" };
            println!("{id} {verb} a favorite");
        }
        FavoritesAction::Clear => {
            store.clear()?;
            println!("Cleared favorites");
        }
    }
    Ok(ExitCode::SUCCESS)
}
