//! Redis Language Server
//!
//! Serves completion and script execution for Redis command scripts over
//! stdio.
//!
//! # Usage
//!
//! ```bash
//! # Serve the editor protocol
//! redis-lsp --address localhost:6379 --db-cache
//! ```

use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

use redis_lsp::cli::CliInterface;
use redis_lsp::config::{Config, LogLevel, LoggingConfig};
use redis_lsp::connection::{ConnectionManager, NameCache, StoreClient};
use redis_lsp::error::Result;
use redis_lsp::server::{self, Services};

/// Application entry point
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Handle subcommands or serve the editor protocol
async fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli.config().logging)?;

    if cli.handle_subcommand().await? {
        return Ok(());
    }

    let config = cli.config();
    let manager = Arc::new(ConnectionManager::new(&config.connection)?);
    info!(url = %manager.display_url(), "starting server");

    let cache = load_name_cache(config, manager.as_ref()).await;
    let services = Services::new(config, manager, cache);

    server::serve_stdio(services).await;
    info!("stopping server");

    Ok(())
}

/// Preload user and key names when the cache is enabled.
///
/// A store that cannot be reached leaves the cache empty.
async fn load_name_cache(config: &Config, client: &dyn StoreClient) -> NameCache {
    if !config.cache.enabled {
        return NameCache::default();
    }

    match NameCache::load(client, config.cache.scan_count).await {
        Ok(cache) => cache,
        Err(e) => {
            warn!(error = %e, "could not preload names, completing commands only");
            NameCache::default()
        }
    }
}

/// Initialize logging system
///
/// stdout carries the protocol, so logs go to stderr and optionally to a file.
/// `RUST_LOG`, when set, overrides the configured level.
fn initialize_logging(config: &LoggingConfig) -> Result<()> {
    let writer = match &config.file_path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(io::stderr.and(Mutex::new(file)))
        }
        None => BoxMakeWriter::new(io::stderr),
    };

    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(log_filter(config.level, env.as_deref()))
        .with_target(false)
        .with_ansi(config.file_path.is_none())
        .with_writer(writer);

    if config.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }

    Ok(())
}

/// Filter from `RUST_LOG` style directives, or the configured level alone
fn log_filter(level: LogLevel, directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level.to_tracing_level()).into())
        .parse_lossy(directives.unwrap_or_default())
}
