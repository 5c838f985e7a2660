//! Insights binary entry point.
//!
//! Prints the insights report, the import summary, or a single project
//! with its related projects.
//!
//! # Examples
//!
//! ```bash
//! insights
//! insights --view import-summary --format json
//! insights --view project --id 1
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use bioscience_catalog::{
    config::DashboardConfig,
    dashboard::{Dashboard, DataOrigin},
    insights::{ImportSummary, InsightsReport},
    store::{ConfiguredStore, RecordStore},
    views::{search_cards, InsightsPanel, ProjectDetail, PLACEHOLDER},
};
use clap::{Parser, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, ValueEnum)]
enum View {
    /// Category breakdown, yearly trend, top keywords and research trends
    Report,
    /// Record counts and data-quality summary of the loaded collection
    ImportSummary,
    /// One project and related projects (requires --id)
    Project,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

/// Insights over the bioscience publication catalog
#[derive(Parser, Debug)]
#[command(
    name = "insights",
    version,
    about = "Aggregate statistics and project details for NASA bioscience publications"
)]
struct Args {
    /// Which view to print
    #[arg(long, value_enum, default_value = "report")]
    view: View,

    /// Project id for the project view
    #[arg(long, value_name = "ID")]
    id: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

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

/// Setup logging with the specified level
fn setup_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();
}

fn header_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

fn report_origin(origin: &DataOrigin) {
    if let DataOrigin::Fallback { reason } = origin {
        eprintln!("Record store unavailable ({}); showing sample data.", reason);
    }
}

fn format_report_table(report: &InsightsReport) -> String {
    let panel = InsightsPanel::from(report);
    let mut out = format!(
        "Total publications: {}\nResearch categories: {}\nYears of data: {}\n",
        panel.total_publications, panel.category_total, panel.years_of_data
    );

    let mut categories = header_table(&["Category", "Publications"]);
    for (label, count) in panel.category_chart.labels.iter().zip(&panel.category_chart.data) {
        categories.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    out.push_str(&format!("\n{}\n", categories));

    let mut years = header_table(&["Year", "Publications"]);
    for (year, count) in panel.trend_chart.labels.iter().zip(&panel.trend_chart.data) {
        years.add_row(vec![Cell::new(year), Cell::new(count)]);
    }
    out.push_str(&format!("\n{}\n", years));

    let mut keywords = header_table(&["#", "Keyword"]);
    for (idx, keyword) in panel.top_keywords.iter().enumerate() {
        keywords.add_row(vec![Cell::new(idx + 1), Cell::new(keyword)]);
    }
    out.push_str(&format!("\n{}\n", keywords));

    out.push_str(&format!(
        "\nGrowing: {}\nStable: {}\nEmerging: {}",
        panel.trends.growing.join(", "),
        panel.trends.stable.join(", "),
        panel.trends.emerging.join(", ")
    ));
    out
}

fn format_summary_table(summary: &ImportSummary) -> String {
    let mut out = format!(
        "Total records: {}\nMissing year: {}\nDuplicate ids: {}\n",
        summary.total_records, summary.missing_year, summary.duplicate_ids
    );

    let mut categories = header_table(&["Category", "Records"]);
    for (label, count) in &summary.category_counts {
        categories.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    out.push_str(&format!("\n{}\n", categories));

    let mut sample = header_table(&["Id", "Title", "Year", "Category"]);
    for card in search_cards(&summary.sample_records) {
        sample.add_row(vec![
            Cell::new(card.id),
            Cell::new(card.title),
            Cell::new(card.year),
            Cell::new(card.category),
        ]);
    }
    out.push_str(&format!("\nSample records:\n{}", sample));
    out
}

fn format_project_table(detail: &ProjectDetail) -> String {
    let record = &detail.record;
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| PLACEHOLDER.to_string());

    let mut info = header_table(&["Field", "Value"]);
    info.add_row(vec![Cell::new("Title"), Cell::new(&record.title)]);
    info.add_row(vec![Cell::new("Authors"), Cell::new(record.authors_display())]);
    info.add_row(vec![
        Cell::new("Year"),
        Cell::new(record.year.map(|y| y.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string())),
    ]);
    info.add_row(vec![Cell::new("Category"), Cell::new(record.category_label())]);
    info.add_row(vec![Cell::new("Mission"), Cell::new(field(&record.mission))]);
    info.add_row(vec![Cell::new("PI"), Cell::new(field(&record.pi))]);
    info.add_row(vec![Cell::new("Affiliation"), Cell::new(field(&record.affiliation))]);
    info.add_row(vec![Cell::new("Status"), Cell::new(field(&record.status))]);
    info.add_row(vec![Cell::new("DOI"), Cell::new(field(&record.doi))]);
    info.add_row(vec![Cell::new("Source"), Cell::new(field(&record.source_url))]);
    info.add_row(vec![Cell::new("Keywords"), Cell::new(record.keywords.join(", "))]);

    let mut out = format!("{}\n", info);
    if let Some(text) = &record.abstract_text {
        out.push_str(&format!("\nAbstract:\n{}\n", text));
    }

    if detail.related.is_empty() {
        out.push_str("\nNo related projects.");
    } else {
        let mut related = header_table(&["Title", "Year", "Link"]);
        for card in &detail.related {
            related.add_row(vec![
                Cell::new(&card.title),
                Cell::new(&card.year),
                Cell::new(&card.detail_link),
            ]);
        }
        out.push_str(&format!("\nRelated projects:\n{}", related));
    }
    out
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args.log_level);
    debug!("CLI arguments: {:?}", args);

    if matches!(args.view, View::Project) && args.id.is_none() {
        anyhow::bail!("The project view requires --id");
    }

    let config = DashboardConfig::load(args.config.as_deref())
        .with_context(|| "Failed to load configuration")?;
    let store = ConfiguredStore::from_config(&config.store, args.data_file.clone())
        .with_context(|| "Failed to set up record store")?;
    info!("Using record store: {}", store.name());

    let dashboard = Dashboard::new(store, config);

    match args.view {
        View::Report => {
            let loaded = dashboard.load_insights().await;
            match args.format {
                OutputFormat::Table => {
                    println!("{}", format_report_table(&loaded.data));
                    report_origin(&loaded.origin);
                }
                OutputFormat::Json => {
                    let panel = InsightsPanel::from(&loaded.data);
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&panel)
                            .with_context(|| "Failed to serialize insights")?
                    );
                }
            }
        }
        View::ImportSummary => {
            let loaded = dashboard.load_import_summary().await;
            match args.format {
                OutputFormat::Table => {
                    println!("{}", format_summary_table(&loaded.data));
                    report_origin(&loaded.origin);
                }
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&loaded.data)
                            .with_context(|| "Failed to serialize import summary")?
                    );
                }
            }
        }
        View::Project => {
            let view = dashboard.load_project(args.id.as_deref()).await;
            let Some(detail) = view.detail() else {
                anyhow::bail!("Project not found: no project id given");
            };
            match args.format {
                OutputFormat::Table => {
                    println!("{}", format_project_table(&detail));
                    report_origin(&view.origin);
                }
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&detail)
                            .with_context(|| "Failed to serialize project")?
                    );
                }
            }
        }
    }

    Ok(())
}
