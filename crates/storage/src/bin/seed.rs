use std::fmt;

use chrono::{DateTime, Duration, Utc};
use parrot_core::model::{Article, ArticleId};
use storage::repository::Storage;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    articles: u32,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidArticles { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidArticles { raw } => write!(f, "invalid --articles value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("PARROT_DB_URL").unwrap_or_else(|_| "sqlite://parrot.sqlite3".into());
        let mut articles = std::env::var("PARROT_SEED_ARTICLES")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(4);
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--articles" => {
                    let value = require_value(&mut args, "--articles")?;
                    articles = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidArticles { raw: value.clone() })?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            articles,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite://parrot.sqlite3)");
    eprintln!("  --articles <n>            Number of demo articles to upsert (default: 4)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  PARROT_DB_URL, PARROT_SEED_ARTICLES");
}

const SAMPLES: &[(&str, &str, &[&str])] = &[
    (
        "Markets open higher",
        "Reuters",
        &[
            "Stocks rose on Monday morning.",
            "Investors welcomed the latest jobs report.",
            "Oil prices were little changed.",
        ],
    ),
    (
        "A new bridge for the city",
        "BBC",
        &[
            "The city council approved a new bridge.",
            "Construction will begin in the spring.",
        ],
    ),
    (
        "Rain expected this weekend",
        "The Guardian",
        &[
            "Forecasters expect heavy rain on Saturday.",
            "Sunday should be dry and mild.",
        ],
    ),
    (
        "Library extends opening hours",
        "NPR",
        &[
            "The central library will stay open until nine.",
            "Students asked for more evening study space.",
            "The change starts in June.",
        ],
    ),
];

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);

    for i in 0..args.articles {
        let idx = (i as usize) % SAMPLES.len();
        let (title, source, sentences) = SAMPLES[idx];
        let article = Article::new(
            ArticleId::new(format!("seed-{}", i + 1)),
            title,
            sentences.iter().map(|s| (*s).to_owned()).collect(),
            source,
            now - Duration::hours(i64::from(i) * 3 + 1),
        )?;
        storage.articles.upsert_article(&article).await?;
    }

    println!("Seeded {} articles into {}", args.articles, args.db_url);

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
