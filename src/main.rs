use crate::config::{AppConfig, SourceMode};
use crate::domain::{load_measurements, Registry};
use crate::export::{display_columns, write_csv, write_xlsx};
use crate::query::Predicates;
use crate::report::build_report;
use crate::responses::error_to_response;
use crate::router::handle;
use crate::state::AppState;
use crate::table::RawTable;
use crate::telemetry::TrackerClient;
use anyhow::{bail, Context};
use astra::Server;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod domain;
mod errors;
mod export;
mod identity;
mod query;
mod reconcile;
mod report;
mod responses;
mod router;
mod state;
mod status;
mod table;
mod telemetry;

#[cfg(test)]
mod tests;

#[derive(Debug, Parser)]
#[command(name = "fleet-monitor", version, about = "Fleet registry and telemetry reconciliation")]
struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the report and export endpoints.
    Serve {
        #[arg(long, env = "FLEET_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,

        #[arg(long, env = "FLEET_WORKERS", default_value_t = 8)]
        workers: usize,
    },
    /// Run one pass and write the result.
    Report {
        #[arg(long, value_enum, default_value = "json")]
        format: ReportFormat,

        /// Defaults to stdout (not allowed for xlsx).
        #[arg(long)]
        output: Option<PathBuf>,

        /// `field=value`; repeat for more values or fields.
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Csv,
    Xlsx,
    Json,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let state = build_state(&cli.config)?;

    match cli.command {
        Command::Serve { bind, workers } => serve(state, bind, workers),
        Command::Report {
            format,
            output,
            filters,
        } => report(&state, format, output, filters),
    }
}

fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let registry = match &config.registry {
        Some(path) => {
            let raw = RawTable::from_path(path)?;
            Registry::load(&raw)?
        }
        None => {
            warn!("no registry configured; starting with an empty one");
            Registry::default()
        }
    };

    let profile = config.profile();
    let delimiter = config.delimiter()?;

    let state = match config.source {
        SourceMode::Feed => {
            let tracker = config.tracker()?;
            let client = TrackerClient::new(&tracker).context("building tracker client")?;
            AppState::with_feed(registry, Box::new(client), config.cache_ttl(), profile)
        }
        SourceMode::Sheet => {
            let measurements = match &config.measurements {
                Some(path) => Some(load_measurements(&RawTable::from_path(path)?)?),
                None => None,
            };
            AppState::with_sheet(registry, measurements, profile, Utc::now())
        }
    };

    Ok(state.with_delimiter(delimiter))
}

fn serve(state: AppState, addr: SocketAddr, workers: usize) -> anyhow::Result<()> {
    info!(%addr, workers, profile = state.profile().name, "starting server");

    let server = Server::bind(&addr).max_workers(workers);

    server
        .serve(move |req, _info| match handle(req, &state) {
            Ok(resp) => resp,
            Err(err) => error_to_response(err),
        })
        .context("server ended with error")?;

    info!("server shut down cleanly");
    Ok(())
}

fn report(
    state: &AppState,
    format: ReportFormat,
    output: Option<PathBuf>,
    filters: Vec<(String, String)>,
) -> anyhow::Result<()> {
    if format == ReportFormat::Xlsx && output.is_none() {
        bail!("--output is required for xlsx");
    }

    let predicates = Predicates::from_pairs(filters)?;
    let pass = state.run_pass(Utc::now())?;
    let columns = display_columns(state.profile());

    let bytes = match format {
        ReportFormat::Json => {
            serde_json::to_vec_pretty(&build_report(&pass, &predicates, state.profile()))?
        }
        ReportFormat::Csv => write_csv(&pass.select(&predicates), &columns, state.delimiter).into_bytes(),
        ReportFormat::Xlsx => write_xlsx(&pass.select(&predicates), &columns)?,
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), bytes = bytes.len(), "report written");
        }
        None => std::io::stdout().write_all(&bytes)?,
    }

    Ok(())
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected field=value, got {s:?}"))
}
