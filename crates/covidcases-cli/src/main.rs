//! covidcases - UK COVID-19 case data on the command line.
//!
//! Loads regional or local-authority case figures (from the local cache when
//! it is fresh, from the coronavirus dashboard API otherwise), builds a
//! date-indexed table and prints, plots or exports it as GeoJSON.

mod cli;
mod output;
mod plot;

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use covidcases_core::{
    load_feature_collection, merge_into_features, ApiClient, CacheManager, CaseKind, CaseTable,
    Config,
};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

/// Directory for an additional daily log file, when set
const ENV_LOG_DIR: &str = "COVIDCASES_LOG_DIR";

/// Initialize the tracing subscriber for logging
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::env::var(ENV_LOG_DIR) {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "covidcases.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn load_config(cli: &Cli) -> Config {
    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    }
    .with_env(|key| std::env::var(key).ok());

    if let Some(ref dir) = cli.cache_dir {
        config.cache_dir = Some(dir.clone());
    }
    if let Some(ref dir) = cli.geojson_dir {
        config.geojson_dir = Some(dir.clone());
    }
    config
}

fn plot_title(cli: &Cli) -> String {
    let kind = match cli.case_kind() {
        CaseKind::Cumulative => "Cumulative cases",
        CaseKind::Delta => "New cases",
    };
    let mut title = format!("{} by {}", kind, cli.area_kind());
    if let Some(window) = cli.pipeline().rolling_window {
        title.push_str(&format!(", {}-day average", window));
    }
    if cli.normalise {
        title.push_str(", normalised");
    }
    title
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing();

    let config = load_config(&cli);
    let cache_dir = config.cache_dir()?;
    debug!(?cache_dir, "Cache directory configured");

    let cache = CacheManager::new(cache_dir)
        .context("Failed to create cache directory")?
        .with_stale_after(config.stale_after());
    let api = ApiClient::with_base_url(config.api_base_url())?;

    let area = cli.area_kind();
    let snapshot = cache
        .load(area, cli.offline, &api)
        .await
        .with_context(|| format!("Could not load {} case data", area.label()))?;
    if let Some(notice) = output::origin_notice(&snapshot, area.label()) {
        eprintln!("{}", notice);
    }
    info!(
        area = area.label(),
        records = snapshot.response.data.len(),
        age = %snapshot.age_display(),
        "Case data loaded"
    );

    let table = CaseTable::from_records(&snapshot.response.data, cli.case_kind());

    let mut stdout = io::stdout().lock();
    if cli.should_list() {
        output::write_area_names(&table, &mut stdout)?;
    }

    let table = cli.pipeline().apply(table)?;

    if cli.plot {
        drop(stdout);
        plot::show(&table, &plot_title(&cli))?;
    } else if let Some(ref target) = cli.json {
        let path = config.geojson_dir().join(area.geojson_file_name());
        let collection = load_feature_collection(&path)?;
        let merged = merge_into_features(&table, collection, area, cli.case_kind());
        output::export_geojson(&merged, target.as_deref(), &mut stdout)?;
    } else if !cli.list {
        output::write_table(&table, &mut stdout)?;
    }

    Ok(())
}
