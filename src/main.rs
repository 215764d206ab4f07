mod cli;

use catalog_ingest::{
    config::{self, Config},
    ingest::Ingestor,
    tmdb::CatalogClient,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

async fn run_ingest(config: Config) -> Result<()> {
    let store = catalog_ingest_store::open(&config.store.uri, &config.store.database)
        .await
        .context("Failed to open document store")?;
    let client = CatalogClient::new(&config.tmdb)?;

    let ingestor = Ingestor::new(&client, store.as_ref());
    let report = ingestor.run(config.ingest.on_error).await?;

    if !report.is_success() {
        for (category, err) in &report.failures {
            tracing::error!("{} failed: {}", category, err);
        }
        anyhow::bail!(
            "{} of {} categories failed",
            report.failures.len(),
            report.failures.len() + report.completed.len()
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "catalog_ingest=debug,catalog_ingest_store=debug".to_string()
        } else {
            "catalog_ingest=info,catalog_ingest_store=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let config = config::load_config_or_default(cli.config.as_deref())?;

            // One thread: every fetch and insert completes before the next
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            rt.block_on(run_ingest(config))
        }
        Commands::Validate => validate_config(cli.config.as_deref()),
        Commands::Version => {
            println!("catalog-ingest {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => println!("Validating config: {:?}", p),
        None => println!("No config file specified, searching default locations"),
    }

    let config = config::load_config_or_default(path)?;
    println!("✓ Configuration is valid");
    println!("  API: {}", config.tmdb.base_url);
    println!("  API key: {}", config::mask_key(&config.tmdb.api_key));
    println!("  Store: {}", config.store.uri);
    println!("  Database: {}", config.store.database);
    println!("  On error: {:?}", config.ingest.on_error);

    Ok(())
}
