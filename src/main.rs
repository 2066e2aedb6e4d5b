//! ==============================================================================
//! main.rs - sensor-to-text entry point
//! ==============================================================================
//!
//! purpose:
//!     reads the config, then runs the two halves of the bridge side by side
//!     until the sensor stream fails or the process is interrupted.
//!
//! architecture:
//!
//!     ┌───────────────────────────────────────────────────────────────┐
//!     │                      sensor-to-text                           │
//!     │  ┌──────────────────┐                 ┌────────────────────┐  │
//!     │  │ stream ingester  │                 │ display scheduler  │  │
//!     │  │ (sensor chunks)  │                 │ (sleep/wake cycle) │  │
//!     │  └────────┬─────────┘                 └─────────┬──────────┘  │
//!     │           │ update_many                snapshot │             │
//!     │           └──────────────┐        ┌─────────────┘             │
//!     │                     ┌────┴────────┴────┐                      │
//!     │                     │   sensor cache   │ <- cache.rs          │
//!     │                     └──────────────────┘                      │
//!     └───────────────────────────────────────────────────────────────┘
//!              ▲ https stream                        │ REST
//!        ┌─────┴──────┐                        ┌─────▼──────┐
//!        │   sensor   │                        │  display   │
//!        └────────────┘                        └────────────┘
//!
//! failure model:
//!     - config cannot be loaded:           exit before anything starts
//!     - sensor unreachable / stream ends:  exit, there is no reconnect
//!     - one display call fails:            logged inside the scheduler
//!
//! ==============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use sensor_to_text::config::DEFAULT_CONFIG_PATH;
use sensor_to_text::shutdown::interrupted;
use sensor_to_text::{
    AppConfig, DisplayClient, DisplayScheduler, Ingester, RotationEntry, SensorCache,
    SensorStream, Timing,
};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Overrides [logging] level (RUST_LOG still wins)
    #[arg(long)]
    log_level: Option<String>,

    /// Load and print the configuration, then exit
    #[arg(long)]
    check_config: bool,
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // step 1: load configuration
    let config = AppConfig::load(&args.config)
        .with_context(|| format!("cannot start without {}", args.config.display()))?;
    init_logging(args.log_level.as_deref().unwrap_or(&config.logging.level));
    info!("sensor-to-text {}", env!("CARGO_PKG_VERSION"));
    config.log_summary();
    if args.check_config {
        return Ok(());
    }

    // step 2: the one shared cache, all slots empty
    let cache = SensorCache::new();

    // step 3: display rotation in background
    let client = DisplayClient::new(&config.display).context("failed to build display client")?;
    let scheduler = DisplayScheduler::new(
        cache.clone(),
        client,
        RotationEntry::from_config(&config.metrics),
        Timing::from(&config.rotation),
    );
    let display_task = tokio::spawn(scheduler.run());

    // step 4: sensor stream in the foreground
    let ingester = Ingester::new(cache, config.sensor.max_line_bytes)
        .show_sensor_data(config.logging.show_sensor_data);

    let result = tokio::select! {
        res = async {
            let stream = SensorStream::connect(&config.sensor).await?;
            info!("reading sensor data from {}", stream.url());
            Err::<(), _>(ingester.run(stream).await)
        } => res,
        _ = interrupted(tokio::signal::ctrl_c()) => Ok(()),
    };

    display_task.abort();
    result.context("sensor stream failed")
}
