//! Command-line argument parsing for athena-query.

use athena_query::config::Config;
use athena_query::query::QueryRequest;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Run SQL against AWS Athena and print normalized JSON results.
#[derive(Parser, Debug)]
#[command(name = "athena-query")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true, value_name = "PATH", env = "ATHENA_QUERY_CONFIG")]
    pub config: Option<PathBuf>,

    /// AWS region (overrides AWS_REGION and the config file)
    #[arg(long, global = true, value_name = "REGION")]
    pub region: Option<String>,

    /// Use the in-memory scripted engine instead of Athena
    #[arg(long, global = true)]
    pub mock: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Execute a query and wait for its results
    Query {
        /// SQL query to execute
        sql: String,

        /// Database to run against
        #[arg(short = 'd', long)]
        database: Option<String>,

        /// Data catalog
        #[arg(long)]
        catalog: Option<String>,

        /// S3 location for query output
        #[arg(long, value_name = "S3_URI")]
        output_location: Option<String>,

        /// Workgroup to run under
        #[arg(short = 'w', long)]
        workgroup: Option<String>,

        /// Maximum number of rows to return (1-1000)
        #[arg(long, default_value_t = 100)]
        max_results: u32,

        /// Maximum time to wait for completion, in seconds (1-3600)
        #[arg(long, default_value_t = 300)]
        max_wait_seconds: u64,

        /// Stop the remote execution if the wait times out
        #[arg(long)]
        cancel_on_timeout: bool,
    },

    /// List data catalogs
    Catalogs,

    /// List databases in a catalog
    Databases {
        #[arg(long)]
        catalog: Option<String>,
    },

    /// List tables in a database
    Tables {
        database: String,
        #[arg(long)]
        catalog: Option<String>,
    },

    /// Describe a table
    Table {
        database: String,
        table: String,
        #[arg(long)]
        catalog: Option<String>,
    },
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Builds the query request for the `query` subcommand.
    pub fn to_query_request(&self) -> Option<QueryRequest> {
        let Command::Query {
            sql,
            database,
            catalog,
            output_location,
            workgroup,
            max_results,
            max_wait_seconds,
            ..
        } = &self.command
        else {
            return None;
        };

        Some(QueryRequest {
            query: sql.clone(),
            database: database.clone(),
            catalog: catalog.clone(),
            output_location: output_location.clone(),
            workgroup: workgroup.clone(),
            max_results: *max_results,
            max_wait_seconds: *max_wait_seconds,
        })
    }

    /// Returns true if `--cancel-on-timeout` was given.
    pub fn cancel_on_timeout(&self) -> bool {
        matches!(
            self.command,
            Command::Query {
                cancel_on_timeout: true,
                ..
            }
        )
    }
}
