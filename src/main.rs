//! CLI entry point for the NCR air quality tool.
//!
//! Provides subcommands for summarising pollutant readings, exporting yearly
//! averages, reporting policy impact, browsing the policy catalog, and
//! running the simulated live AQI indicator.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ncr_aqi::analyzers::impact::{
    POLICY_MILESTONES, effectiveness_scores, overall_change, percent_change_from_baseline,
};
use ncr_aqi::analyzers::types::POLLUTANTS;
use ncr_aqi::{
    config::Config,
    dashboard::{Dashboard, DashboardState},
    fetch::BasicClient,
    live::run_ticker,
    output::{print_json, print_pretty, write_yearly_csv},
    policies::{Ministry, PolicyFilter, catalog, group_by_year},
};
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ncr_aqi")]
#[command(about = "Delhi-NCR air quality aggregates and policy catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Load readings and log yearly averages per pollutant
    Summary {
        /// Path or URL of the readings CSV (defaults to NCR_AQI_SOURCE)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,
    },
    /// Export aggregated averages to a file
    Export {
        /// Path or URL of the readings CSV (defaults to NCR_AQI_SOURCE)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// File to write (defaults to NCR_AQI_EXPORT_PATH)
        #[arg(short, long)]
        output: Option<String>,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
    /// Report change in pollutant levels against a baseline year
    Impact {
        /// Path or URL of the readings CSV (defaults to NCR_AQI_SOURCE)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        #[arg(short, long, default_value_t = 2020)]
        baseline: i32,
    },
    /// List policies from the catalog
    Policies {
        #[arg(short, long)]
        year: Option<i32>,

        /// central, state or caqm
        #[arg(short, long)]
        ministry: Option<Ministry>,

        /// Pollutant label, e.g. PM2.5
        #[arg(short, long)]
        pollutant: Option<String>,

        /// Targeted source substring, e.g. vehicular
        #[arg(long)]
        source: Option<String>,

        /// Free-text search over all policy fields
        #[arg(short, long)]
        search: Option<String>,

        /// Print matching policies as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run the simulated live AQI indicator
    Live {
        /// Number of readings to emit
        #[arg(short = 'n', long, default_value_t = 5)]
        ticks: usize,

        /// Seconds between readings (defaults to NCR_AQI_LIVE_INTERVAL_SECS)
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = Config::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&config.log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&config.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ncr_aqi.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { source } => {
            let state = load(&config, source).await;
            summarize(&state);
        }
        Commands::Export {
            source,
            output,
            format,
        } => {
            let state = load(&config, source).await;
            let output = output.unwrap_or_else(|| config.export_path.clone());
            match format {
                ExportFormat::Csv => write_yearly_csv(&output, &state.aggregates, &POLLUTANTS)?,
                ExportFormat::Json => {
                    let json = serde_json::to_string_pretty(&state.aggregates)?;
                    std::fs::write(&output, json)
                        .with_context(|| format!("Failed to write {output}"))?;
                }
            }
            info!(path = %output, fallback = state.origin.is_fallback(), "Export written");
        }
        Commands::Impact { source, baseline } => {
            let state = load(&config, source).await;
            report_impact(&state, baseline);
        }
        Commands::Policies {
            year,
            ministry,
            pollutant,
            source,
            search,
            json,
        } => {
            let filter = PolicyFilter {
                year,
                ministry,
                pollutant,
                source,
                search,
            };
            let matches = filter.apply(catalog());

            if json {
                print_json(&matches)?;
            } else {
                for (year, policies) in group_by_year(&matches) {
                    info!(year, count = policies.len(), "Policies");
                    for policy in policies {
                        info!(
                            id = policy.id,
                            month = policy.month,
                            ministry = %policy.ministry,
                            agency = policy.agency,
                            pollutants = %policy.pollutants_affected.join(", "),
                            "{}",
                            policy.name
                        );
                    }
                }
            }
            info!(matched = matches.len(), total = catalog().len(), "Policy search complete");
        }
        Commands::Live { ticks, interval } => {
            let every = interval
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(config.live_interval);
            info!(ticks, interval_secs = every.as_secs(), "Starting live AQI indicator");
            run_ticker(every, ticks, |reading| {
                info!(
                    aqi = reading.aqi,
                    category = %reading.category,
                    timestamp = %reading.timestamp,
                    "Live AQI"
                );
            })
            .await;
        }
    }

    Ok(())
}

/// Loads the dashboard from the CLI-provided source or the configured one.
async fn load(config: &Config, source: Option<String>) -> DashboardState {
    let source = source.unwrap_or_else(|| config.source.clone());
    let state = Dashboard::load(&BasicClient::new(), &source).await;
    if state.origin.is_fallback() {
        warn!(source = %source, "Showing fallback dataset");
    }
    state
}

fn summarize(state: &DashboardState) {
    info!(
        origin = ?state.origin,
        years = state.aggregates.yearly_averages().len(),
        months = state.aggregates.monthly_data().len(),
        "Dashboard loaded"
    );
    print_pretty(&state.aggregates);

    for year in state.visible_years() {
        let row: Vec<String> = POLLUTANTS
            .iter()
            .map(|gas| match state.aggregates.yearly(year, gas) {
                Some(v) => format!("{gas}={v:.2}"),
                None => format!("{gas}=-"),
            })
            .collect();
        info!(year, "{}", row.join(" "));
    }
}

fn report_impact(state: &DashboardState, baseline: i32) {
    let yearly = state.aggregates.yearly_averages();

    let changes = percent_change_from_baseline(yearly, baseline);
    if changes.is_empty() {
        warn!(baseline, "No data for baseline year");
    }
    for (year, gases) in &changes {
        for (gas, pct) in gases {
            info!(year, gas = %gas, change = %format!("{pct:+.2}%"), "Change from {}", baseline);
        }
    }

    for gas in POLLUTANTS {
        if let Some(change) = overall_change(yearly, gas) {
            info!(
                gas,
                first_year = change.first_year,
                first = %format!("{:.2}", change.first_value),
                last_year = change.last_year,
                last = %format!("{:.2}", change.last_value),
                change = %format!("{:+.2}%", change.percent),
                improvement = change.is_improvement(),
                "Overall change"
            );
        }
    }

    for (year, score) in effectiveness_scores(yearly, &POLLUTANTS) {
        info!(year, score = %format!("{score:.2}"), "Policy effectiveness score");
    }

    for (date, milestone) in POLICY_MILESTONES {
        info!(date, milestone, "Policy milestone");
    }

    let related = state.relevant_policies();
    info!(count = related.len(), "Policies affecting selected pollutants");
}
