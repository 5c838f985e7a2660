//! Catalog search front end.
//!
//! Command-line front end for the search page: filter the publication
//! catalog by text, category and year range, in single-query or interactive
//! REPL mode, with table or JSON output.
//!
//! # Examples
//!
//! Title or author search:
//! ```bash
//! search --query "bone density"
//! ```
//!
//! JSON output with filters, reading a local export:
//! ```bash
//! search --data-file publications.json --category "Plant Biology" --year-from 2020 --format json
//! ```
//!
//! Interactive mode:
//! ```bash
//! search --interactive
//! ```

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use bioscience_catalog::{
    config::DashboardConfig,
    dashboard::{Dashboard, DataOrigin, SearchState},
    models::PublicationRecord,
    query::{parse_year_bound, RawQuery},
    store::{ConfiguredStore, RecordStore},
    views::{search_cards, SearchCard, PLACEHOLDER},
};
use clap::{Parser, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How results are printed
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Human-friendly table
    Table,
    /// Machine-readable JSON (search cards)
    Json,
}

/// Search CLI for the bioscience publication catalog
#[derive(Parser, Debug)]
#[command(
    name = "search",
    version,
    about = "Search NASA bioscience publications by keyword, category and year",
    long_about = "Filter the publication catalog by title/author text, category and year range. \
                  When the record store cannot be reached, built-in sample data is searched instead.

EXAMPLES:
  Single query:
    search --query \"bone density\"

  Filters with JSON output:
    search --category \"Plant Biology\" --year-from 2020 --format json

  Local export instead of the hosted store:
    search --data-file publications.json --query Chen

  Interactive mode:
    search --interactive"
)]
struct Args {
    /// Text matched against titles and author names (case-insensitive)
    #[arg(long, short = 'q', value_name = "TEXT", conflicts_with = "interactive")]
    query: Option<String>,

    /// Exact category filter (e.g. "Human Physiology")
    #[arg(long, value_name = "CATEGORY")]
    category: Option<String>,

    /// Only publications from this year onwards (inclusive)
    #[arg(long, value_name = "YEAR")]
    year_from: Option<String>,

    /// Only publications up to this year (inclusive)
    #[arg(long, value_name = "YEAR")]
    year_to: Option<String>,

    /// Mission filter (accepted, not yet applied)
    #[arg(long, value_name = "MISSION")]
    mission: Option<String>,

    /// Show at most N results
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Start an interactive prompt
    #[arg(long, short = 'i')]
    interactive: bool,

    /// Configuration file
    #[arg(long, env = "BIOSCIENCE_CATALOG_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read publications from a local JSON export instead of the hosted store
    #[arg(long, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    log_level: String,
}

impl Args {
    fn raw_query(&self) -> RawQuery {
        RawQuery {
            text: self.query.clone().unwrap_or_default(),
            category: self.category.clone().unwrap_or_default(),
            year_from: self.year_from.clone().unwrap_or_default(),
            year_to: self.year_to.clone().unwrap_or_default(),
            mission: self.mission.clone().unwrap_or_default(),
        }
    }
}

/// Setup logging with the specified level
fn setup_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();
}

/// Shorten to at most `max` characters, marking the cut with "..."
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Render result cards as a table
fn format_results_table(cards: &[SearchCard]) -> String {
    if cards.is_empty() {
        return "No results found. Try adjusting your search terms or filters.".to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Authors").add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new("Category").add_attribute(Attribute::Bold),
        Cell::new("Mission").add_attribute(Attribute::Bold),
    ]);

    for (idx, card) in cards.iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(truncate_chars(&card.title, 60)),
            Cell::new(truncate_chars(&card.authors, 40)),
            Cell::new(&card.year),
            Cell::new(&card.category).fg(Color::Cyan),
            Cell::new(card.mission.as_deref().unwrap_or(PLACEHOLDER)),
        ]);
    }

    table.to_string()
}

/// Serialize cards for scripting
fn format_results_json(cards: &[SearchCard]) -> Result<String> {
    serde_json::to_string_pretty(cards).with_context(|| "Failed to serialize results to JSON")
}

/// Print every field of one result
fn display_result_detail(record: &PublicationRecord, rank: usize) {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| PLACEHOLDER.to_string());

    println!("\n{}", "═".repeat(80));
    println!("Result #{}", rank);
    println!("Id: {}", record.id);
    println!("Title: {}", record.title);
    println!("Authors: {}", record.authors_display());
    println!(
        "Year: {}",
        record.year.map(|y| y.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string())
    );
    println!("Category: {}", record.category_label());
    println!("Mission: {}", field(&record.mission));
    println!("PI: {}", field(&record.pi));
    println!("Affiliation: {}", field(&record.affiliation));
    println!("Status: {}", field(&record.status));
    println!("DOI: {}", field(&record.doi));
    if !record.keywords.is_empty() {
        println!("Keywords: {}", record.keywords.join(", "));
    }
    if let Some(url) = &record.source_url {
        println!("Source: {}", url);
    }
    if let Some(text) = &record.abstract_text {
        println!("\nAbstract:\n{}", text);
    }
    println!("{}", "═".repeat(80));
}

fn report_origin(origin: Option<&DataOrigin>) {
    if let Some(DataOrigin::Fallback { reason }) = origin {
        eprintln!("Record store unavailable ({}); showing sample data.", reason);
    }
}

/// Print the current results in the chosen format
fn print_results(
    state: &SearchState,
    limit: Option<usize>,
    format: &OutputFormat,
    elapsed: f64,
) -> Result<()> {
    let shown = limit.unwrap_or(state.results.len()).min(state.results.len());
    let cards = search_cards(&state.results[..shown]);

    match format {
        OutputFormat::Table => {
            println!("{}", format_results_table(&cards));
            println!(
                "\nSearch Results ({} found, {} shown) in {:.2}s",
                state.results.len(),
                shown,
                elapsed
            );
            report_origin(state.origin.as_ref());
        }
        OutputFormat::Json => {
            println!("{}", format_results_json(&cards)?);
        }
    }
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  <text>              - Search titles and authors");
    println!("  /all                - Search with no text (filters still apply)");
    println!("  /category NAME      - Filter by category");
    println!("  /category clear     - Clear category filter");
    println!("  /year FROM TO       - Filter by year range (either may be '-')");
    println!("  /year clear         - Clear year filter");
    println!("  /mission NAME|clear - Set mission filter (not applied yet)");
    println!("  /format table|json  - Choose output format");
    println!("  /detail N           - Show full details for result N");
    println!("  /help               - Show this help");
    println!("  Ctrl+D or Ctrl+C    - Exit");
}

/// Prompt loop: plain input sets the search text, `/` commands adjust filters
async fn run_interactive<S: RecordStore>(
    dashboard: Dashboard<S>,
    mut state: SearchState,
    limit: Option<usize>,
    mut format: OutputFormat,
) -> Result<()> {
    println!("Interactive Publication Search");
    print_help();
    println!();

    let mut rl = DefaultEditor::new().with_context(|| "Failed to create readline editor")?;

    loop {
        match rl.readline("Search> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                rl.add_history_entry(line).ok(); // History is best-effort

                if !line.starts_with('/') {
                    state.query.text = line.to_string();
                } else {
                    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
                    let rest = rest.trim();
                    match command {
                        "/help" => {
                            print_help();
                            continue;
                        }
                        "/all" => state.query.text.clear(),
                        "/category" if rest.is_empty() => {
                            eprintln!("Usage: /category NAME  or  /category clear");
                            continue;
                        }
                        "/category" => {
                            state.query.category = clearable(rest);
                            println!("Category filter: {}", display_filter(&state.query.category));
                            continue;
                        }
                        "/mission" if rest.is_empty() => {
                            eprintln!("Usage: /mission NAME  or  /mission clear");
                            continue;
                        }
                        "/mission" => {
                            state.query.mission = clearable(rest);
                            println!(
                                "Mission filter: {} (not applied to results)",
                                display_filter(&state.query.mission)
                            );
                            continue;
                        }
                        "/year" => {
                            let parts: Vec<&str> = rest.split_whitespace().collect();
                            match parts.as_slice() {
                                ["clear"] => {
                                    state.query.year_from.clear();
                                    state.query.year_to.clear();
                                    println!("Cleared year filter");
                                }
                                [from, to] => {
                                    let from = if *from == "-" { "" } else { *from };
                                    let to = if *to == "-" { "" } else { *to };
                                    match year_range_error(from, to) {
                                        Some(message) => eprintln!("{}", message),
                                        None => {
                                            state.query.year_from = from.to_string();
                                            state.query.year_to = to.to_string();
                                            println!(
                                                "Year filter: {} - {}",
                                                display_filter(from),
                                                display_filter(to)
                                            );
                                        }
                                    }
                                }
                                _ => eprintln!("Usage: /year FROM TO  or  /year clear"),
                            }
                            continue;
                        }
                        "/format" => {
                            match rest {
                                "table" => format = OutputFormat::Table,
                                "json" => format = OutputFormat::Json,
                                _ => eprintln!("Unknown format, expected table or json"),
                            }
                            continue;
                        }
                        "/detail" => {
                            match rest.parse::<usize>() {
                                Ok(rank) if rank > 0 && rank <= state.results.len() => {
                                    display_result_detail(&state.results[rank - 1], rank);
                                }
                                Ok(rank) if rank > state.results.len() => {
                                    eprintln!(
                                        "Result {} out of range (last search had {} results)",
                                        rank,
                                        state.results.len()
                                    );
                                }
                                _ => eprintln!("Usage: /detail N (N counts from 1)"),
                            }
                            continue;
                        }
                        _ => {
                            eprintln!(
                                "Unknown command: {}. Type /help for available commands.",
                                command
                            );
                            continue;
                        }
                    }
                }

                let start = Instant::now();
                dashboard.run_search(&mut state).await;
                let elapsed = start.elapsed().as_secs_f64();
                if let Err(e) = print_results(&state, limit, &format, elapsed) {
                    eprintln!("Error formatting results: {}", e);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                error!("Error reading input: {}", err);
                break;
            }
        }
    }

    Ok(())
}

/// `clear` empties a filter, anything else sets it.
fn clearable(argument: &str) -> String {
    if argument == "clear" {
        String::new()
    } else {
        argument.to_string()
    }
}

fn display_filter(value: &str) -> &str {
    if value.is_empty() {
        "any"
    } else {
        value
    }
}

/// Reject year ranges whose bounds are both numeric but inverted.
fn year_range_error(from: &str, to: &str) -> Option<String> {
    match (parse_year_bound(from), parse_year_bound(to)) {
        (Some(start), Some(end)) if start > end => Some(format!(
            "Year range is inverted: {} comes after {}",
            start, end
        )),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args.log_level);
    debug!("CLI arguments: {:?}", args);

    if let Some(message) = year_range_error(
        args.year_from.as_deref().unwrap_or(""),
        args.year_to.as_deref().unwrap_or(""),
    ) {
        anyhow::bail!(message);
    }

    let config = DashboardConfig::load(args.config.as_deref())
        .with_context(|| "Failed to load configuration")?;
    let store = ConfiguredStore::from_config(&config.store, args.data_file.clone())
        .with_context(|| "Failed to set up record store")?;
    info!("Using record store: {}", store.name());

    let dashboard = Dashboard::new(store, config);
    let state = SearchState::new(args.raw_query());

    if args.interactive {
        run_interactive(dashboard, state, args.limit, args.format).await?;
    } else {
        let mut state = state;
        let start = Instant::now();
        dashboard.run_search(&mut state).await;
        print_results(&state, args.limit, &args.format, start.elapsed().as_secs_f64())?;
    }

    Ok(())
}
