//! viberyte: search venue and event catalog exports from the command line.

mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::Config;
use output::Status;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use viberyte_search::{
    parse_events, parse_venues, suggested_keywords_with_limit, Event, KeywordCategory, KeywordEntry, SearchEngine,
    Venue,
};
use viberyte_telemetry::{init_logging, stats, SearchTimer};

#[derive(Parser)]
#[command(name = "viberyte")]
#[command(about = "Keyword search over Viberyte venue and event catalogs")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to .viberyte.toml if present)
    #[arg(short, long, global = true, env = "VIBERYTE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print search statistics to stderr when done
    #[arg(long, global = true)]
    stats: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Search venues and events
    Search {
        /// Free-text query, e.g. "rooftop romantic"
        query: String,

        /// JSON file with venue records
        #[arg(long)]
        venues: PathBuf,

        /// JSON file with event records
        #[arg(long)]
        events: Option<PathBuf>,

        /// City to search in (defaults to the configured city)
        #[arg(long)]
        city: Option<String>,

        /// Show relevance scores
        #[arg(long)]
        explain: bool,

        /// Maximum venues and events to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Autocomplete a partial query
    Suggest {
        /// Partial query
        partial: String,

        /// Maximum suggestions (defaults to the configured limit)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// List the keyword dictionary
    Keywords {
        /// Only show one category (vibe, music, cuisine, event, category)
        #[arg(long)]
        category: Option<KeywordCategory>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Status::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "viberyte=debug,viberyte_search=debug,viberyte_telemetry=debug".to_string();
    }
    let _log_guard = init_logging(&logging)?;
    tracing::debug!(config = ?config.path, city = %config.default_city, "Configuration loaded");

    let dictionary = config.dictionary()?;
    let engine = SearchEngine::new(&dictionary);

    match cli.command {
        Commands::Search {
            query,
            venues,
            events,
            city,
            explain,
            limit,
        } => {
            let venues = load_venues(&venues)?;
            let events = match events {
                Some(path) => load_events(&path)?,
                None => Vec::new(),
            };
            let city = city.unwrap_or_else(|| config.default_city.clone());

            let timer = SearchTimer::start();
            let mut ranked = engine.rank(&query, &venues, &events, &city);
            timer.finish(ranked.mode.as_str(), ranked.venues.len());

            if let Some(limit) = limit {
                ranked.venues.truncate(limit);
                ranked.events.truncate(limit);
            }

            match cli.format {
                OutputFormat::Json if explain => println!("{}", serde_json::to_string_pretty(&ranked)?),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ranked.into_result())?),
                OutputFormat::Text => output::print_ranked(&ranked, &dictionary, &query, &city, explain),
            }
        }

        Commands::Suggest { partial, limit } => {
            let limit = limit.unwrap_or(config.suggestion_limit);
            let suggestions = suggested_keywords_with_limit(&dictionary, &partial, limit);

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string(&suggestions)?),
                OutputFormat::Text => output::print_suggestions(&suggestions),
            }
        }

        Commands::Keywords { category } => {
            let entries = dictionary
                .iter()
                .filter(|(_, rule)| category.is_none_or(|wanted| rule.category == wanted));

            match cli.format {
                OutputFormat::Json => {
                    let entries: Vec<KeywordEntry> = entries
                        .map(|(keyword, rule)| KeywordEntry {
                            keyword: keyword.to_string(),
                            field: rule.field,
                            value: rule.value.clone(),
                            category: rule.category,
                            weight: rule.weight,
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                }
                OutputFormat::Text => output::print_keywords(entries),
            }
        }
    }

    if cli.stats {
        eprintln!("{}", serde_json::to_string_pretty(&stats().snapshot())?);
    }

    Ok(())
}

fn load_venues(path: &Path) -> Result<Vec<Venue>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read venues file {}", path.display()))?;
    parse_venues(&content).with_context(|| format!("Failed to load venues from {}", path.display()))
}

fn load_events(path: &Path) -> Result<Vec<Event>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read events file {}", path.display()))?;
    parse_events(&content).with_context(|| format!("Failed to load events from {}", path.display()))
}
