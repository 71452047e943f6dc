//! athena-query - run SQL against AWS Athena and print normalized results.

mod cli;

use athena_query::catalog::{CatalogBrowser, Listing, TableReport};
use athena_query::config::{AthenaConfig, Config, Overrides};
use athena_query::engine::{self, QueryEngine, ScriptedEngine};
use athena_query::error::{AthenaError, Result};
use athena_query::logging;
use athena_query::query::QueryExecutor;
use cli::{Cli, Command};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    logging::init_stderr_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            std::process::exit(2);
        }
    }
}

/// Runs the selected subcommand and returns the process exit code.
async fn run(cli: Cli) -> Result<i32> {
    let config = resolve_config(&cli)?;
    for warning in config.warnings() {
        warn!("{}", warning);
    }
    info!("Athena settings: {}", config.display_string());

    let engine: Box<dyn QueryEngine> = if cli.mock {
        info!("Using scripted in-memory engine");
        Box::new(ScriptedEngine::new())
    } else {
        engine::connect(&config).await?
    };

    let browser = CatalogBrowser::new(engine.as_ref(), &config);
    match &cli.command {
        Command::Query { .. } => run_query(&cli, engine.as_ref(), &config).await,
        Command::Catalogs => print_listing(browser.list_catalogs().await.into()),
        Command::Databases { catalog } => {
            print_listing(browser.list_databases(catalog.as_deref()).await.into())
        }
        Command::Tables { database, catalog } => print_listing(
            browser
                .list_tables(database, catalog.as_deref())
                .await
                .into(),
        ),
        Command::Table {
            database,
            table,
            catalog,
        } => {
            let result = browser
                .get_table_metadata(table, database, catalog.as_deref())
                .await;
            let catalog = browser.resolve_catalog(catalog.as_deref());
            let report = TableReport::from_result(table, database, catalog, result);
            print_json(&report)?;
            Ok(exit_code(report.is_ok()))
        }
    }
}

/// Executes the `query` subcommand. Ctrl-C abandons the query and asks the
/// engine to stop it.
async fn run_query(cli: &Cli, engine: &dyn QueryEngine, config: &AthenaConfig) -> Result<i32> {
    let request = cli
        .to_query_request()
        .ok_or_else(|| AthenaError::internal("not a query command"))?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; abandoning query");
            on_interrupt.cancel();
        }
    });

    let results = QueryExecutor::new(engine, config)
        .execute_with_cancel(&request, &cancel)
        .await;
    print_json(&results)?;
    Ok(exit_code(results.is_success()))
}

/// Builds the configuration with precedence: CLI flag, environment,
/// config file, built-in default.
fn resolve_config(cli: &Cli) -> Result<AthenaConfig> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());

    let overrides = Overrides {
        region: cli.region.clone(),
        cancel_on_timeout: cli.cancel_on_timeout(),
    };
    Config::resolve(&config_path, |key| std::env::var(key).ok(), &overrides)
}

fn print_listing(listing: Listing) -> Result<i32> {
    print_json(&listing)?;
    Ok(exit_code(listing.is_ok()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AthenaError::internal(format!("Failed to serialize output: {e}")))?;
    println!("{json}");
    Ok(())
}

fn exit_code(success: bool) -> i32 {
    if success {
        0
    } else {
        1
    }
}
