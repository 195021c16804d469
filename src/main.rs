//! Interactive prompt for storing and searching text snippets

use anyhow::{Context, Result};
use clap::Parser;
use snipstore::persistence::PersistentClient;
use snipstore::{CommandLoop, Config, DistanceMetric, EmbedderKind, SnippetStore};
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snipstore")]
#[command(about = "Store text snippets and find similar ones", long_about = None)]
struct Cli {
    /// Directory holding the collections
    #[arg(long, default_value = snipstore::config::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Collection to read and write
    #[arg(long, default_value = snipstore::config::DEFAULT_COLLECTION)]
    collection: String,

    /// Number of matches shown per query
    #[arg(long, default_value_t = snipstore::snippets::DEFAULT_RESULTS, value_parser = parse_results)]
    results: usize,

    /// Distance metric used when the collection is created
    #[arg(long, value_enum, default_value_t = DistanceMetric::L2)]
    metric: DistanceMetric,

    /// Write a snapshot after this many logged inserts
    #[arg(long, default_value_t = 1000)]
    checkpoint_interval: usize,

    /// Embedding model for documents and queries
    #[arg(long, value_enum, default_value_t = EmbedderKind::Minilm)]
    embedder: EmbedderKind,

    /// Log debug diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Extra arguments are accepted and ignored
    #[arg(hide = true)]
    ignored: Vec<String>,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            data_dir: cli.data_dir,
            collection: cli.collection,
            results: cli.results,
            metric: cli.metric,
            checkpoint_interval: cli.checkpoint_interval,
            embedder: cli.embedder,
        }
    }
}

fn parse_results(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Diagnostics go to stderr; stdout carries the interactive protocol.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if !cli.ignored.is_empty() {
        debug!(args = ?cli.ignored, "ignoring extra arguments");
    }
    let config = Config::from(cli);

    let embedder = config
        .embedder
        .build(config.model_cache_dir())
        .context("failed to load embedding model")?;
    let client =
        PersistentClient::with_embedder(&config.data_dir, embedder, config.collection_config())
            .with_context(|| {
                format!("failed to open data directory {}", config.data_dir.display())
            })?;
    let collection = client
        .get_or_create_collection(&config.collection)
        .with_context(|| format!("failed to open collection {}", config.collection))?;
    info!(
        collection = collection.name(),
        path = %collection.path().display(),
        documents = collection.count(),
        "collection ready"
    );
    let mut store = SnippetStore::new(collection);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut repl = CommandLoop::new(&mut store, stdin.lock(), stdout.lock(), config.results);
    repl.run()
}
