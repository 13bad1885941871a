//! Heliostat: Main Entry Point
//!
//! Hexagonal architecture with a fixed-order control cycle.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  RpiPlatform / NoHardware   HttpTransport   SystemClock        │
//! │  (Platform)                 (Transport)     (ClockPort)        │
//! │  LogEventSink (EventSink)                                      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │                 Station (pure logic)                   │    │
//! │  │  SunPredictor · PanelActuator · SensorFleet            │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::fs::OpenOptions;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use log::{info, warn};

use heliostat::adapters::http::HttpTransport;
use heliostat::adapters::log_sink::LogEventSink;
use heliostat::adapters::time::SystemClock;
use heliostat::app::service::Station;
use heliostat::config::StationConfig;

fn init_logging() -> Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening log file {path}"))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init().context("installing logger")?;
    Ok(())
}

#[cfg(feature = "rpi")]
fn platform(config: &StationConfig) -> heliostat::adapters::hardware::RpiPlatform {
    heliostat::adapters::hardware::RpiPlatform::new(config)
}

#[cfg(not(feature = "rpi"))]
fn platform(_config: &StationConfig) -> heliostat::adapters::hardware::NoHardware {
    heliostat::adapters::hardware::NoHardware
}

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    init_logging()?;
    info!("Heliostat v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration (env, or defaults) ───────────────────
    let config = match StationConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            warn!("Configuration rejected ({}), running with defaults", e);
            StationConfig::default()
        }
    };

    // ── 3. Adapters ───────────────────────────────────────────
    let transport = HttpTransport::from_config(&config).context("building HTTP client")?;
    let mut sink = LogEventSink::new();
    let mut platform = platform(&config);

    // ── 4. Shutdown signal ────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || {
            running.store(false, Ordering::Relaxed);
        })
        .context("installing SIGINT/SIGTERM handler")?;
    }

    // ── 5. Run ────────────────────────────────────────────────
    let clock = SystemClock::with_shutdown(Arc::clone(&running));
    let mut station = Station::start(config, &mut platform, clock, transport, &mut sink);
    station.run(&mut sink, || running.load(Ordering::Relaxed));

    // Dropping the station releases the stepper (STEP low, ENABLE high).
    drop(station);
    info!("Shutdown complete");
    Ok(())
}
