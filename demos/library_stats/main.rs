//! Print a "Top N" table for a library document, optionally filtered by a query string
//!
//! ```text
//! cargo run --example library_stats -- library.json --page top-manufacturers \
//!     --query "deviceType=light" --limit 20
//! ```

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use powerdash::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Power profile library statistics
#[derive(Parser, Debug)]
#[command(name = "library_stats")]
#[command(about, long_about = None)]
struct Cli {
    /// Library JSON document (as served by the /library endpoint)
    library: PathBuf,

    /// Dashboard configuration (YAML); built-in layout when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Statistics page slug
    #[arg(short, long, default_value = "top-manufacturers")]
    page: String,

    /// Grid query string applied before aggregating
    #[arg(short, long, default_value = "")]
    query: String,

    /// Number of rows to show
    #[arg(short, long)]
    limit: Option<usize>,

    /// Also print profiles over time at this granularity
    #[arg(long)]
    timeline: Option<Granularity>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

impl From<Granularity> for TimePeriod {
    fn from(g: Granularity) -> Self {
        match g {
            Granularity::Day => TimePeriod::Day,
            Granularity::Week => TimePeriod::Week,
            Granularity::Month => TimePeriod::Month,
            Granularity::Year => TimePeriod::Year,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DashboardConfig::from_yaml_file(path)?,
        None => DashboardConfig::default_config(),
    };

    let json = std::fs::read_to_string(&cli.library)
        .with_context(|| format!("reading {}", cli.library.display()))?;
    let records = LibraryDocument::from_json_str(&json)?.records()?;

    let view = LibraryView::open(
        FilterSynchronizer::new(config.filter_params.clone()),
        MemoryLocation::new(&cli.query),
        MemoryFilterSlot::new(),
    );
    let filtered: Vec<Record> = view
        .filters()
        .apply(&records, &config.match_modes())
        .into_iter()
        .cloned()
        .collect();
    tracing::info!(
        total = records.len(),
        matching = filtered.len(),
        "Applied grid filters"
    );

    let page = config
        .statistic(&cli.page)
        .ok_or_else(|| anyhow!("unknown statistics page '{}'", cli.page))?;
    let table = page.view(&filtered, cli.limit.unwrap_or(config.default_limit));

    println!("{}\n", table.title);
    println!("{:>4}  {:<40} {:>6} {:>8}", "Rank", table.name_column_label, "Count", "Share");
    for row in &table.rows {
        println!(
            "{:>4}  {:<40} {:>6} {:>8}",
            row.rank, row.name, row.count, row.percentage_label
        );
    }
    println!(
        "\nShowing {} of {} values, based on {} power profiles.",
        table.rows.len(),
        table.aggregations_count,
        table.total_records
    );
    if let Some(first) = table.rows.first() {
        println!("Drill down: ?{}", page.drilldown_query(&first.name));
    }

    if let Some(granularity) = cli.timeline {
        let dates = dates_from_records(&filtered, &FieldPath::key("createdAt"));
        let today = chrono::Utc::now().date_naive();
        println!();
        for point in profiles_over_time(&dates, granularity.into(), today) {
            println!("{:<12} {}", point.date, point.count);
        }
    }

    Ok(())
}
