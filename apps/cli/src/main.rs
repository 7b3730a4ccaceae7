//! ipehr-aql - run AQL queries over a directory of openEHR documents

use anyhow::Context;
use clap::{Parser, Subcommand};
use ipehr_cli::commands::{self, QueryOverrides};
use ipehr_cli::config::Config;
use ipehr_cli::logging;
use ipehr_cli::request::QueryRequest;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ipehr-aql", version, about = "Run AQL queries over openEHR documents")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a parsed query and print the result set as JSON
    Query {
        /// Directory of canonical JSON documents
        #[arg(long)]
        documents: PathBuf,

        /// Query syntax tree or query request (JSON)
        #[arg(long)]
        query: PathBuf,

        /// Maximum number of rows
        #[arg(long)]
        fetch: Option<usize>,

        /// Number of leading rows to skip
        #[arg(long)]
        offset: Option<usize>,

        /// Execution deadline in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the generic tree of one document as JSON
    Tree {
        /// Canonical JSON document
        document: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    let _logging_guard =
        logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    let output = match cli.command {
        Command::Query {
            documents,
            query,
            fetch,
            offset,
            timeout_ms,
            pretty,
        } => {
            let request = QueryRequest::from_path(&query)?;
            let overrides = QueryOverrides {
                fetch,
                offset,
                timeout_ms,
            };
            let result = commands::run_query(&config, &documents, &request, &overrides)?;
            to_json(&result, pretty)?
        }
        Command::Tree { document } => {
            let tree = commands::document_tree(&document)?;
            to_json(&tree, true)?
        }
    };

    println!("{output}");
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize output")
}
