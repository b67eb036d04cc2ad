//! CLI entry point for the plant metrics dashboard.
//!
//! Loads a snapshot of plants, incidents, maintenance records and reports
//! from the REST backend or a JSON fixture, aggregates it, and writes the
//! dashboard outputs. Also exposes the crawler decision of the SEO responder.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use plant_metrics::analyzers::analyzer::{DashboardOutputs, analyze, log_audit};
use plant_metrics::analyzers::{audit_snapshot, bucket_last_week, metrics_for_plant};
use plant_metrics::config::{API_URL_VAR, BackendConfig, is_backend_url};
use plant_metrics::crawler::{CrawlerResponder, CrawlerResponse};
use plant_metrics::infra::backend::client::RestBackendClient;
use plant_metrics::model::parse_timestamp;
use plant_metrics::output::{print_json, print_pretty};
use plant_metrics::services::fixture::FixtureSource;
use plant_metrics::services::maintenance_api::MaintenanceApi;
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "plant_metrics")]
#[command(about = "Operations dashboard metrics for managed plants", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate the full dashboard and write the requested outputs
    Dashboard {
        /// Snapshot JSON file or backend base URL (defaults to PLANT_METRICS_API_URL)
        #[arg(short, long, value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// Write the dashboard JSON to this file
        #[arg(long)]
        json: Option<String>,

        /// Export the per-plant metrics report as CSV to this file
        #[arg(long)]
        csv: Option<String>,

        /// Append the per-plant rows of this run to a history CSV
        #[arg(long)]
        history: Option<String>,

        /// Optional: S3 bucket to publish the dashboard and report to
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Optional: Gzip compress the CSV report before uploading to S3
        #[arg(long, default_value_t = false)]
        gzip: bool,

        /// Evaluate as of this timestamp instead of now
        #[arg(long, value_name = "TIMESTAMP")]
        at: Option<String>,
    },
    /// Show the metrics of a single plant
    Plant {
        /// Plant id
        plant_id: String,

        #[arg(short, long, value_name = "FILE_OR_URL")]
        source: Option<String>,

        #[arg(long, value_name = "TIMESTAMP")]
        at: Option<String>,
    },
    /// Show the last seven days of incidents by weekday and state
    Weekly {
        #[arg(short, long, value_name = "FILE_OR_URL")]
        source: Option<String>,

        #[arg(long, value_name = "TIMESTAMP")]
        at: Option<String>,
    },
    /// Show what the SEO responder would send for a request
    CrawlerCheck {
        /// Responder config JSON (canonical base, pages, extra crawlers)
        #[arg(short, long)]
        config: String,

        /// Requested path
        #[arg(short, long, default_value = "/")]
        path: String,

        /// User-Agent header of the request
        #[arg(short, long)]
        user_agent: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/plant_metrics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("plant_metrics.log"));

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
        Commands::Dashboard {
            source,
            json,
            csv,
            history,
            s3_bucket,
            gzip,
            at,
        } => {
            let now = resolve_now(at.as_deref())?;
            let api = open_source(source.as_deref())?;
            let outputs = DashboardOutputs {
                json_path: json,
                csv_path: csv,
                history_path: history,
                s3_bucket: s3_bucket.filter(|b| !b.is_empty()),
                gzip,
            };
            if outputs.s3_bucket.is_none() {
                info!("S3 bucket not specified, skipping upload");
            }

            let summary = analyze(api.as_ref(), &outputs, now).await?;
            for metrics in &summary.plants {
                info!(
                    plant_id = %metrics.plant_id,
                    plant_name = metrics.plant_name.as_deref().unwrap_or(""),
                    status = %metrics.status,
                    active_incidents = metrics.active_incidents,
                    resolution_rate = metrics.resolution_rate,
                    compliance_rate = metrics.compliance_rate,
                    activity_level = metrics.activity_level,
                    "Plant"
                );
            }
        }
        Commands::Plant {
            plant_id,
            source,
            at,
        } => {
            let now = resolve_now(at.as_deref())?;
            let snapshot = open_source(source.as_deref())?.load_snapshot().await?;

            let metrics = metrics_for_plant(&snapshot, &plant_id, now)
                .with_context(|| format!("plant '{plant_id}' not found in snapshot"))?;

            print_pretty(&metrics);
            print_json(&metrics)?;
        }
        Commands::Weekly { source, at } => {
            let now = resolve_now(at.as_deref())?;
            let snapshot = open_source(source.as_deref())?.load_snapshot().await?;

            log_audit(&audit_snapshot(&snapshot));
            let histogram = bucket_last_week(&snapshot.incidents, now);
            print_json(&histogram)?;
        }
        Commands::CrawlerCheck {
            config,
            path,
            user_agent,
        } => {
            let responder = CrawlerResponder::from_config_file(&config)?;
            match responder.respond(user_agent.as_deref(), &path) {
                CrawlerResponse::Prerendered(html) => {
                    info!(path = %path, bytes = html.len(), "Crawler: serving pre-rendered page");
                }
                CrawlerResponse::Redirect(location) => {
                    info!(path = %path, location = %location, "Redirecting to canonical page");
                }
            }
        }
    }

    Ok(())
}

/// Picks the snapshot source: a URL means the REST backend, anything else a
/// fixture file. Without `--source` the backend URL comes from the environment.
#[tracing::instrument]
fn open_source(source: Option<&str>) -> Result<Box<dyn MaintenanceApi>> {
    let config = BackendConfig::from_env();

    let source = match source {
        Some(s) => s.to_string(),
        None => config
            .base_url
            .clone()
            .ok_or_else(|| anyhow!("no --source given and {API_URL_VAR} is not set"))?,
    };

    if is_backend_url(&source) {
        info!(base_url = %source, "Using REST backend");
        Ok(Box::new(RestBackendClient::new(&source, config.http_client()?)))
    } else {
        info!(path = %source, "Using snapshot file");
        Ok(Box::new(FixtureSource::from_json_file(&source)?))
    }
}

fn resolve_now(at: Option<&str>) -> Result<DateTime<Utc>> {
    match at {
        None => Ok(Utc::now()),
        Some(raw) => parse_timestamp(raw).with_context(|| format!("unrecognized timestamp '{raw}'")),
    }
}
