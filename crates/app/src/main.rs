use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use app::config::Config;
use app::http::{AppState, create_router};
use services::{AppServices, Clock, FeedItem};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFeed,
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFeed => write!(f, "ingest requires a feed file"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app serve  [--db <sqlite_url>]");
    eprintln!("  app ingest <feed.json> [--db <sqlite_url>]");
    eprintln!("  app purge  [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PARROT_BIND_ADDRESS, PARROT_DB_URL, PARROT_MAX_RETRY, PARROT_CONFIRM_INTERVAL,");
    eprintln!("  PARROT_RECENCY_DAYS, PARROT_MAX_WORDS, PARROT_RETENTION_DAYS, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Serve,
    Ingest { feed: PathBuf },
    Purge,
}

#[derive(Debug)]
struct Args {
    command: Command,
    db_url: Option<String>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut command = None;
        let mut feed = None;
        let mut db_url = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(value);
                }
                "--help" | "-h" => return Ok(None),
                "serve" | "ingest" | "purge" if command.is_none() => command = Some(arg),
                other if other.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ if command.as_deref() == Some("ingest") && feed.is_none() => {
                    feed = Some(PathBuf::from(arg));
                }
                _ if command.is_none() => return Err(ArgsError::UnknownCommand(arg)),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let command = match command.as_deref() {
            None | Some("serve") => Command::Serve,
            Some("ingest") => Command::Ingest {
                feed: feed.ok_or(ArgsError::MissingFeed)?,
            },
            Some(_) => Command::Purge,
        };
        Ok(Some(Self { command, db_url }))
    }
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("sqlite::memory:") || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }
    let path = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    format!("sqlite://{path}")
}

/// Creates the database file and its parent directory so the first
/// connection does not fail on a fresh checkout.
fn prepare_sqlite_file(db_url: &str) -> anyhow::Result<()> {
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        anyhow::bail!(ArgsError::InvalidDbUrl {
            raw: db_url.to_string()
        });
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}

async fn serve(config: &Config, services: &AppServices) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        turns: services.turns(),
    });
    let app = create_router(state);

    info!(bind_address = %config.bind_address, "Starting fulfillment server...");
    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server has shut down.");
    Ok(())
}

async fn ingest(services: &AppServices, feed: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(feed)
        .with_context(|| format!("Failed to read feed file {}", feed.display()))?;
    let items: Vec<FeedItem> =
        serde_json::from_str(&raw).context("Feed file is not a JSON list of items")?;
    let report = services.ingest().ingest(&items).await?;
    info!(stored = report.stored, skipped = report.skipped, "Feed ingested.");
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(db_url) = args.db_url {
        config.database_url = db_url;
    }
    config.database_url = normalize_sqlite_url(&config.database_url);

    prepare_sqlite_file(&config.database_url)?;
    let services = AppServices::new_sqlite(
        &config.database_url,
        Clock::default(),
        config.settings.clone(),
    )
    .await
    .context("Failed to open article storage")?;
    info!(database_url = %config.database_url, "Storage ready.");

    match &args.command {
        Command::Serve => serve(&config, &services).await,
        Command::Ingest { feed } => ingest(&services, feed).await,
        Command::Purge => {
            let removed = services.ingest().purge(config.retention).await?;
            info!(removed, "Purge finished.");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            std::process::exit(2);
        }
    };

    run(args).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<Args>, ArgsError> {
        Args::parse(args.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn defaults_to_serve() {
        let args = parse(&[]).unwrap().unwrap();
        assert_eq!(args.command, Command::Serve);
        assert_eq!(args.db_url, None);
    }

    #[test]
    fn ingest_takes_feed_and_db() {
        let args = parse(&["ingest", "feed.json", "--db", "sqlite://x.db"])
            .unwrap()
            .unwrap();
        assert_eq!(
            args.command,
            Command::Ingest {
                feed: PathBuf::from("feed.json")
            }
        );
        assert_eq!(args.db_url.as_deref(), Some("sqlite://x.db"));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(matches!(parse(&["ingest"]), Err(ArgsError::MissingFeed)));
        assert!(matches!(parse(&["launch"]), Err(ArgsError::UnknownCommand(_))));
        assert!(matches!(parse(&["purge", "--verbose"]), Err(ArgsError::UnknownArg(_))));
        assert!(matches!(parse(&["serve", "--db"]), Err(ArgsError::MissingValue { .. })));
        assert!(parse(&["--help"]).unwrap().is_none());
    }

    #[test]
    fn sqlite_urls_are_normalized() {
        assert_eq!(normalize_sqlite_url("parrot.sqlite3"), "sqlite://parrot.sqlite3");
        assert_eq!(normalize_sqlite_url("sqlite:data/p.db"), "sqlite://data/p.db");
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
    }
}
