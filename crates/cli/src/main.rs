//! `pokedex-cli` -- text front end for the Pokédex catalog.
//!
//! ```text
//! pokedex-cli list [LOCATION]     e.g. list '?query=pikachu&type=electric'
//! pokedex-cli detail <ID|NAME>
//! pokedex-cli favorite <ID>
//! pokedex-cli types
//! pokedex-cli browse [LOCATION]   interactive session on stdin
//! ```
//!
//! # Environment variables
//!
//! | Variable                 | Default                     | Description                       |
//! |--------------------------|-----------------------------|-----------------------------------|
//! | `POKEAPI_BASE_URL`       | `https://pokeapi.co/api/v2` | Remote API root                   |
//! | `POKEAPI_TIMEOUT_SECS`   | `10`                        | Per-request timeout               |
//! | `POKEDEX_PAGE_SIZE`      | `20`                        | Entries per page                  |
//! | `POKEDEX_FAVORITES_PATH` | `pokemon-favorites.json`    | Favorites file                    |
//! | `POKEDEX_DEBOUNCE_MS`    | `800`                       | Search input delay in `browse`    |
//!
//! Rendered outcomes (including error and empty states) exit 0; usage
//! errors exit 2.

mod browse;
mod config;
mod error;
mod render;

use std::sync::Arc;

use pokedex_core::favorites::{FavoritesStore, JsonFileStorage};
use pokedex_core::location::{FilterLocation, MemoryHistory};
use pokedex_core::types::{entry_id, EntryId};
use pokedex_core::view::ErrorState;
use pokedex_pokeapi::api::PokeApi;
use pokedex_pokeapi::catalog::{Catalog, Completion};

use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::CliConfig;
use crate::error::CliError;

const USAGE: &str = "usage: pokedex-cli \
    <list [LOCATION] | detail <ID|NAME> | favorite <ID> | types | browse [LOCATION]>";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List(String),
    Detail(String),
    Favorite(EntryId),
    Types,
    Browse(String),
}

impl Command {
    fn parse(args: &[String]) -> Result<Self, CliError> {
        let usage = || CliError::Usage(USAGE.to_string());
        let (name, rest) = args.split_first().ok_or_else(usage)?;
        let location = || rest.first().cloned().unwrap_or_default();

        match (name.as_str(), rest.len()) {
            ("list", 0 | 1) => Ok(Self::List(location())),
            ("browse", 0 | 1) => Ok(Self::Browse(location())),
            ("detail", 1) => Ok(Self::Detail(rest[0].clone())),
            ("favorite", 1) => {
                let raw: i64 = rest[0]
                    .parse()
                    .map_err(|_| CliError::Usage(format!("Not an id: {}", rest[0])))?;
                let id = entry_id(raw).map_err(|e| CliError::Usage(e.to_string()))?;
                Ok(Self::Favorite(id))
            }
            ("types", 0) => Ok(Self::Types),
            _ => Err(usage()),
        }
    }

    fn location(&self) -> &str {
        match self {
            Self::List(location) | Self::Browse(location) => location,
            Self::Detail(_) | Self::Favorite(_) | Self::Types => "",
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pokedex_cli=info,pokedex_pokeapi=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(2);
    });

    let config = CliConfig::from_env();
    tracing::debug!(
        base_url = %config.gateway.base_url,
        page_size = config.page_size,
        favorites = %config.favorites_path.display(),
        "Starting pokedex-cli",
    );

    if let Err(e) = run(command, config).await {
        tracing::error!(error = %e, "pokedex-cli failed");
        std::process::exit(1);
    }
}

async fn run(command: Command, config: CliConfig) -> Result<(), CliError> {
    let api = PokeApi::new(&config.gateway)?;
    let favorites = FavoritesStore::load(JsonFileStorage::new(&config.favorites_path));
    let location = FilterLocation::new(MemoryHistory::new(command.location()));
    let mut catalog = Catalog::new(Arc::new(api), location, favorites, config.page_size);

    match command {
        Command::List(_) => {
            if catalog.refresh().await == Completion::Applied {
                if let Some(view) = catalog.view() {
                    print!("{}", render::view(view, catalog.favorites(), catalog.page_size()));
                }
            }
        }
        Command::Detail(key) => match catalog.detail(&key).await {
            Ok(entry) => {
                let favorite = catalog.favorites().contains(entry.id);
                print!("{}", render::detail(&entry, favorite));
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Detail lookup failed");
                print!("{}", render::error(&ErrorState::detail_failed()));
            }
        },
        Command::Favorite(id) => {
            let now = catalog.toggle_favorite(id);
            let ids: Vec<String> =
                catalog.favorites().ids().iter().map(ToString::to_string).collect();
            println!("{} {id}", if now { "Added" } else { "Removed" });
            println!("Favorites: [{}]", ids.join(", "));
        }
        Command::Types => match catalog.type_names().await {
            Ok(names) => {
                for name in names {
                    println!("{name}");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Type list unavailable");
                print!("{}", render::error(&ErrorState::list_failed()));
            }
        },
        Command::Browse(_) => {
            let input = BufReader::new(tokio::io::stdin());
            browse::run(&mut catalog, input, &mut std::io::stdout(), config.debounce).await?
        }
    }

    catalog.shutdown();
    Ok(())
}
