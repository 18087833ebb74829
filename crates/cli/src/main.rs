//! Searchbridge CLI
//!
//! Offline tooling over a catalog file. Shows exactly what an index facade
//! would send to its backends without contacting any of them.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SEARCHBRIDGE_CATALOG` | - | Catalog file (JSON array of index definitions) |
//! | `SEARCHBRIDGE_LOG_LEVEL` | warn | Log level |
//!
//! # Example
//!
//! ```text
//! searchbridge --catalog catalog.json --index comments compile --query "rust" --options options.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info};

use searchbridge::types::OneOrMany;
use searchbridge::{Catalog, CreateOptions, Document, IndexFacade, SearchOptions};

/// Command line configuration.
#[derive(Debug, Parser)]
#[command(name = "searchbridge")]
#[command(about = "Encode documents and compile search requests against a catalog")]
struct Cli {
    /// Catalog file.
    #[arg(long, env = "SEARCHBRIDGE_CATALOG")]
    catalog: PathBuf,

    /// Index name.
    #[arg(long)]
    index: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "SEARCHBRIDGE_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Encode documents to the backend write format.
    Encode {
        /// JSON file holding one document or an array of documents.
        documents: PathBuf,

        /// Language tag overriding the index default.
        #[arg(long)]
        lang: Option<String>,
    },

    /// Compile a search request.
    Compile {
        /// Free-text query.
        #[arg(long, default_value = "")]
        query: String,

        /// JSON file holding the search options.
        #[arg(long)]
        options: Option<PathBuf>,
    },

    /// Compile a more-like-this request.
    MoreLikeThis {
        /// Reference text.
        #[arg(long)]
        text: String,

        /// JSON file holding the search options.
        #[arg(long)]
        options: Option<PathBuf>,
    },
}

/// Initializes the tracing subscriber; logs go to stderr.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("searchbridge={level},searchbridge_cli={level}")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let catalog = Catalog::from_json(&raw)?;
    info!(catalog = %path.display(), indexes = catalog.len(), "Loaded catalog");
    Ok(catalog)
}

fn load_options(path: Option<&Path>) -> anyhow::Result<SearchOptions> {
    let Some(path) = path else {
        return Ok(SearchOptions::default());
    };
    SearchOptions::from_value(read_json(path)?)
        .with_context(|| format!("invalid search options in {}", path.display()))
}

/// Runs a command against a facade and returns the JSON to print.
fn execute(facade: &IndexFacade, command: &Command) -> anyhow::Result<Value> {
    match command {
        Command::Encode { documents, lang } => {
            let documents: OneOrMany<Document> = serde_json::from_value(read_json(documents)?)
                .context("documents must be an object or an array of objects")?;
            let options = CreateOptions { lang: lang.clone() };
            let encoded = facade.encode_documents(documents, &options);
            debug!(documents = encoded.len(), "Encoded documents");
            Ok(serde_json::to_value(encoded)?)
        }
        Command::Compile { query, options } => {
            let options = load_options(options.as_deref())?;
            let request = facade.search_request(query, &options)?;
            Ok(request.to_value())
        }
        Command::MoreLikeThis { text, options } => {
            let options = load_options(options.as_deref())?;
            Ok(facade.more_like_this_request(text, &options).to_value())
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<Value> {
    let catalog = load_catalog(&cli.catalog)?;
    let facade = catalog.index(&cli.index)?;
    execute(facade, &cli.command)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let output = run(&cli)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
