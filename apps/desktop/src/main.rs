use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    filter_products, CatalogLoader, CatalogState, FavoritesSet, FixtureProductSource,
    HttpProductSource, ProductDraft, ProductManager, ProductSource, FETCH_FAILED_MESSAGE,
};
use shared::domain::{Product, ProductId};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Browse the product catalog")]
struct Args {
    /// Catalog backend base URL.
    #[arg(long)]
    server_url: Option<String>,
    /// Path of the product list, relative to the server URL.
    #[arg(long)]
    endpoint: Option<String>,
    /// Request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Serve the built-in sample catalog instead of calling the backend.
    #[arg(long)]
    offline: bool,
    /// Retries issued after a failed load before giving up.
    #[arg(long, default_value_t = 0)]
    retries: u32,
    /// Settings file; defaults to `catalog.toml` when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List products grouped by category.
    List,
    /// Case-insensitive search over names and descriptions.
    Search { term: String },
    /// Show one product by id.
    Show { id: i64 },
    /// Mark products as interesting and print the resulting list.
    Favorites {
        #[arg(long)]
        add: Vec<i64>,
        #[arg(long)]
        remove: Vec<i64>,
    },
    /// Edit an in-memory copy of the catalog.
    Admin {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        remove: Vec<i64>,
        #[arg(long)]
        add_name: Option<String>,
        #[arg(long, default_value_t = 0.0)]
        add_price: f64,
        #[arg(long, default_value = "")]
        add_category: String,
        #[arg(long, default_value = "")]
        add_description: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let source = build_source(&args)?;
    let products = load_catalog(source, args.retries).await?;

    match args.command {
        Command::List => {
            print!("{}", render::category_groups(&client_core::group_by_category(&products)));
        }
        Command::Search { term } => {
            print!("{}", render::product_list(&filter_products(&products, &term)));
        }
        Command::Show { id } => {
            let Some(product) = client_core::find_by_id(&products, ProductId(id)) else {
                bail!("product {id} not found");
            };
            print!("{}", render::product_detail(product));
        }
        Command::Favorites { add, remove } => {
            let favorites = FavoritesSet::new();
            for id in add {
                match client_core::find_by_id(&products, ProductId(id)) {
                    Some(product) => {
                        favorites.add(product);
                    }
                    None => warn!(product_id = id, "cannot favorite unknown product"),
                }
            }
            for id in remove {
                favorites.remove_id(ProductId(id));
            }
            print!("{}", render::product_list(&favorites.snapshot()));
        }
        Command::Admin {
            search,
            remove,
            add_name,
            add_price,
            add_category,
            add_description,
        } => {
            let manager = ProductManager::new(products);
            for id in remove {
                if !manager.remove_product(ProductId(id)) {
                    warn!(product_id = id, "cannot remove unknown product");
                }
            }
            if let Some(name) = add_name {
                let created = manager
                    .add_product(ProductDraft {
                        name,
                        description: add_description,
                        price: add_price,
                        category: add_category,
                    })
                    .context("rejected new product")?;
                info!(product_id = %created.id, "added {}", created.name);
            }
            if let Some(term) = search {
                manager.set_search_term(term);
            }
            print!("{}", render::product_list(&manager.filtered_products()));
        }
    }

    Ok(())
}

fn build_source(args: &Args) -> Result<Arc<dyn ProductSource>> {
    if args.offline {
        return Ok(Arc::new(FixtureProductSource));
    }

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(v) = &args.server_url {
        settings.api_url = v.clone();
    }
    if let Some(v) = &args.endpoint {
        settings.endpoint = v.clone();
    }
    if let Some(v) = args.timeout_secs {
        settings.timeout_secs = v;
    }

    let source = HttpProductSource::new(&settings.source_config())
        .with_context(|| format!("invalid catalog backend '{}'", settings.api_url))?;
    info!(url = %source.products_url(), "using catalog backend");
    Ok(Arc::new(source))
}

async fn load_catalog(source: Arc<dyn ProductSource>, retries: u32) -> Result<Vec<Product>> {
    let loader = CatalogLoader::spawn(source);
    let mut state = loader.wait_settled().await;

    let mut remaining = retries;
    while state == CatalogState::Error && remaining > 0 {
        remaining -= 1;
        warn!(remaining, "catalog load failed; retrying");
        loader.retry();
        state = loader.wait_settled().await;
    }

    match state {
        CatalogState::Success(products) => Ok(products),
        CatalogState::Error | CatalogState::Loading => bail!(FETCH_FAILED_MESSAGE),
    }
}
