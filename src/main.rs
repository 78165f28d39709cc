//! fieldmap - headless replay driver for the map camera and marker controller
//!
//! This is the binary entry point. The controller itself lives in the
//! `fieldmap-app` crate.

mod headless;

use std::path::PathBuf;

use clap::Parser;
use fieldmap_app::config::{init_config_dir, load_settings};
use fieldmap_core::logging;
use tracing::{error, info};

use headless::ReplayOptions;

/// Replay a scenario of location, gesture, readiness and push events
/// through the map controller and print what it does as NDJSON
#[derive(Parser, Debug)]
#[command(name = "fieldmap")]
#[command(about = "Headless replay driver for the field map controller", long_about = None)]
struct Args {
    /// Scenario file (NDJSON, one event per line)
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Map-data response served by the initial fetch
    #[arg(long, value_name = "FILE")]
    map_data: Option<PathBuf>,

    /// Make the initial fetch fail with this message instead
    #[arg(long, value_name = "MESSAGE", conflicts_with = "map_data")]
    fetch_error: Option<String>,

    /// Simulated latency of the initial fetch
    #[arg(long, value_name = "MS", default_value_t = 0)]
    fetch_delay_ms: u64,

    /// Directory containing `.fieldmap/config.toml` (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    config: Option<PathBuf>,

    /// Write a commented default config before loading it
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init()?;

    let args = Args::parse();

    let config_base = args
        .config
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    if args.init_config {
        init_config_dir(&config_base)?;
    }
    let settings = load_settings(&config_base);
    info!("Config base: {}", config_base.display());

    let options = ReplayOptions {
        map_data: args.map_data,
        fetch_error: args.fetch_error,
        fetch_delay_ms: args.fetch_delay_ms,
    };

    let result = headless::run_headless(&args.scenario, settings, options).await;
    if let Err(ref e) = result {
        error!("Replay failed: {:?}", e);
        headless::HeadlessEvent::error(e.to_string(), e.is_fatal()).emit();
    }

    info!("fieldmap exiting");
    Ok(result?)
}
