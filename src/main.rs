//! daybook CLI - Command line interface for daybook_db
//!
//! Records and queries per-key time series in a single JSON store file.

use chrono::FixedOffset;
use clap::{Parser, Subcommand};
use daybook_db::{Config, Entry, FileStore, Log, TimeSeriesStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "An append-only, day-aware time-series store")]
#[command(version)]
struct Cli {
    /// Path to the config file (default: ~/.config/daybook/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the store file (overrides the config)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// UTC offset in minutes that defines calendar days (overrides the config)
    #[arg(long, allow_hyphen_values = true)]
    utc_offset: Option<i32>,

    /// Output format (json or text)
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Append a value under a key
    Insert {
        /// The key
        key: String,
        /// The value (JSON; anything else is stored as a string)
        value: String,
        /// What the value is about (default: now)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show the full history of a key
    All {
        /// The key
        key: String,
    },

    /// Show entries dated between two dates
    Range {
        /// The key
        key: String,
        /// First date (its whole day is included)
        begin: String,
        /// Last date (its whole day is included)
        end: String,
    },

    /// Show the last entry of each day between two dates
    Snapshot {
        /// The key
        key: String,
        /// First date
        begin: String,
        /// Last date
        end: String,
    },

    /// Show the most recently inserted value of a key
    Latest {
        /// The key
        key: String,
    },

    /// Show the most recently inserted value dated on a given day
    On {
        /// The key
        key: String,
        /// The day
        date: String,
    },

    /// Delete the full history of a key
    Remove {
        /// The key
        key: String,
    },

    /// List all keys
    Keys,

    /// Delete every key
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(&config_path)?;
    if let Some(store) = &cli.store {
        config.store_path = store.clone();
    }
    if let Some(offset) = cli.utc_offset {
        config.utc_offset_minutes = offset;
    }

    let db = open_db(&config).await?;
    let calendar = db.calendar();

    match cli.command {
        Commands::Insert { key, value, date } => {
            let value = parse_value(&value);
            let recorded_at = match date {
                Some(date) => {
                    let date = calendar.parse(&date)?;
                    db.insert(&key, &value, &date).await?
                }
                None => db.insert_now(&key, &value).await?,
            };
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "key": key,
                    "recorded_at": recorded_at
                }),
            );
        }

        Commands::All { key } => {
            let log: Log<serde_json::Value> = db.read_all(&key).await?;
            output(&cli.format, &entries_json(&db, log.entries())?);
        }

        Commands::Range { key, begin, end } => {
            let begin = calendar.parse(&begin)?;
            let end = calendar.parse(&end)?;
            let log: Log<serde_json::Value> = db.read_range(&key, &begin, &end).await?;
            output(&cli.format, &entries_json(&db, log.entries())?);
        }

        Commands::Snapshot { key, begin, end } => {
            let begin = calendar.parse(&begin)?;
            let end = calendar.parse(&end)?;
            let snapshot: Vec<Entry<serde_json::Value>> =
                db.daily_snapshot(&key, &begin, &end).await?;
            output(&cli.format, &entries_json(&db, &snapshot)?);
        }

        Commands::Latest { key } => {
            let value: Option<serde_json::Value> = db.latest(&key).await?;
            output(
                &cli.format,
                &serde_json::json!({
                    "key": key,
                    "value": value
                }),
            );
        }

        Commands::On { key, date } => {
            let date = calendar.parse(&date)?;
            let value: Option<serde_json::Value> = db.latest_on_date(&key, &date).await?;
            output(
                &cli.format,
                &serde_json::json!({
                    "key": key,
                    "date": date.date_naive().to_string(),
                    "value": value
                }),
            );
        }

        Commands::Remove { key } => {
            db.remove(&key).await?;
            output(
                &cli.format,
                &serde_json::json!({
                    "status": "ok",
                    "key": key
                }),
            );
        }

        Commands::Keys => {
            let keys = db.list_keys().await?;
            output(&cli.format, &serde_json::json!(keys));
        }

        Commands::Clear => {
            db.clear().await?;
            output(&cli.format, &serde_json::json!({ "status": "ok" }));
        }
    }

    Ok(())
}

async fn open_db(config: &Config) -> anyhow::Result<TimeSeriesStore<FileStore, FixedOffset>> {
    let store = FileStore::open(&config.store_path).await?;
    Ok(TimeSeriesStore::with_time_zone(store, config.zone()?))
}

/// JSON if it parses, otherwise the raw text as a string
fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

fn entries_json(
    db: &TimeSeriesStore<FileStore, FixedOffset>,
    entries: &[Entry<serde_json::Value>],
) -> anyhow::Result<serde_json::Value> {
    let calendar = db.calendar();
    let rendered = entries
        .iter()
        .map(|entry| {
            Ok(serde_json::json!({
                "recorded_at": calendar.at(entry.recorded_at)?.to_rfc3339(),
                "effective_date": calendar.at(entry.effective_date)?.to_rfc3339(),
                "value": entry.value
            }))
        })
        .collect::<daybook_db::Result<Vec<_>>>()?;
    Ok(serde_json::Value::Array(rendered))
}

fn output(format: &OutputFormat, value: &serde_json::Value) {
    match format {
        OutputFormat::Json => {
            println!("{}", value);
        }
        OutputFormat::Text => match serde_json::to_string_pretty(value) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", value),
        },
    }
}
