//! Sports-betting arbitrage scanner entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use oddsarb::api::{create_router, AppState, DashboardSink};
use oddsarb::config::Config;
use oddsarb::metrics;
use oddsarb::notify::{ConsoleSink, FanoutSink, LogSink, NotificationSink, WebhookSink};
use oddsarb::odds::{FileOddsSource, OddsApiClient, OddsSource};
use oddsarb::scanner::{run_cycle, run_loop};
use oddsarb::utils::shutdown_signal;

/// Two-way sports-betting arbitrage scanner.
#[derive(Parser, Debug)]
#[command(name = "oddsarb")]
#[command(about = "Scan bookmaker odds for two-way arbitrage opportunities")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the odds feed and serve the dashboard API (default).
    Run {
        /// HTTP server port for the dashboard API.
        #[arg(short, long)]
        port: Option<u16>,

        /// Seconds between scans.
        #[arg(short, long)]
        interval: Option<u64>,

        /// Sport/league key to scan.
        #[arg(long)]
        sport: Option<String>,
    },

    /// Run a single scan and print the results.
    ScanOnce {
        /// Sport/league key to scan.
        #[arg(long)]
        sport: Option<String>,
    },

    /// Replay a saved snapshot through the detector.
    ScanFile {
        /// Path to a JSON snapshot.
        path: PathBuf,

        /// Print opportunities as JSON instead of the dashboard view.
        #[arg(long)]
        json: bool,
    },

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("oddsarb=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let (plain_layer, json_layer) = if args.json_logs {
        (None, Some(fmt::layer().json()))
    } else {
        (Some(fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(plain_layer)
        .with(json_layer)
        .with(filter)
        .init();

    match args.command {
        Some(Command::Run {
            port,
            interval,
            sport,
        }) => cmd_run(port, interval, sport).await,
        Some(Command::ScanOnce { sport }) => cmd_scan_once(sport).await,
        Some(Command::ScanFile { path, json }) => cmd_scan_file(path, json).await,
        Some(Command::CheckConfig) => cmd_check_config().await,
        None => cmd_run(None, None, None).await,
    }
}

/// Load and validate configuration, applying a sport override.
fn load_config(sport: Option<String>) -> anyhow::Result<Config> {
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(sport) = sport {
        config.sport = sport;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    Ok(config)
}

/// Build the alert sink when alerts are enabled and a webhook is configured.
fn alert_sink(config: &Config) -> anyhow::Result<Option<Arc<dyn NotificationSink>>> {
    match (&config.alert_webhook_url, config.alerts_enabled) {
        (Some(url), true) => {
            let sink = WebhookSink::new(url.clone(), Duration::from_millis(config.http_timeout_ms))?;
            Ok(Some(Arc::new(sink)))
        }
        (None, true) => {
            warn!("Alerts enabled but ALERT_WEBHOOK_URL is not set; alerts disabled");
            Ok(None)
        }
        _ => Ok(None),
    }
}

/// Poll the feed and serve the dashboard API.
async fn cmd_run(
    port_override: Option<u16>,
    interval_override: Option<u64>,
    sport: Option<String>,
) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = load_config(sport)?;

    if let Some(port) = port_override {
        config.port = port;
    }
    if let Some(interval) = interval_override.filter(|i| *i > 0) {
        config.poll_interval_secs = interval;
    }

    info!("Configuration loaded successfully");
    info!("Sport: {}", config.sport);
    info!("Regions: {}", config.regions);
    info!("Poll interval: {}s", config.poll_interval_secs);
    info!("Alerts: {}", if config.alerts_active() { "ENABLED" } else { "DISABLED" });

    let mut app_state = AppState::new(config.sport.clone());
    if config.metrics_enabled {
        match metrics::install_recorder() {
            Ok(handle) => app_state = app_state.with_metrics(handle),
            Err(e) => warn!("{}", e),
        }
    }

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    let router = create_router(app_state.clone());
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    let client = OddsApiClient::new(&config)?;

    let mut sink = FanoutSink::new()
        .with(Arc::new(LogSink))
        .with(Arc::new(DashboardSink::new(app_state)));
    if let Some(alerts) = alert_sink(&config)? {
        sink = sink.with(alerts);
    }

    info!("========================================");
    info!("ODDS ARBITRAGE SCANNER STARTED");
    info!("========================================");

    let cycles = run_loop(
        &client,
        &sink,
        Duration::from_secs(config.poll_interval_secs),
        shutdown_signal(),
    )
    .await;

    info!("Scanner stopped after {} cycles", cycles);

    if let Err(e) = server_handle.await? {
        error!("HTTP server error: {}", e);
    }

    Ok(())
}

/// Run a single scan against the live feed.
async fn cmd_scan_once(sport: Option<String>) -> anyhow::Result<()> {
    let config = load_config(sport)?;
    let client = OddsApiClient::new(&config)?;

    let mut sink = FanoutSink::new().with(Arc::new(ConsoleSink));
    if let Some(alerts) = alert_sink(&config)? {
        sink = sink.with(alerts);
    }

    let report = run_cycle(&client, &sink).await;
    info!(
        matches = report.matches,
        opportunities = report.opportunities,
        "Scan finished"
    );

    Ok(())
}

/// Replay a saved snapshot.
async fn cmd_scan_file(path: PathBuf, json: bool) -> anyhow::Result<()> {
    let source = FileOddsSource::new(path);

    if json {
        let snapshot = source.fetch().await?;
        let opportunities = oddsarb::detect(&snapshot);
        println!("{}", serde_json::to_string_pretty(&opportunities)?);
        return Ok(());
    }

    let report = run_cycle(&source, &ConsoleSink).await;
    if !report.fetched {
        return Err(anyhow::anyhow!(
            "could not read snapshot from {}",
            source.path().display()
        ));
    }

    Ok(())
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("ODDS ARBITRAGE SCANNER - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Feed URL: {}", config.odds_api_url);
    println!("  Sport: {}", config.sport);
    println!("  Regions: {}", config.regions);
    println!("  Markets: {}", config.markets);
    println!("  Odds Format: {}", config.odds_format);
    println!("  Poll Interval: {}s", config.poll_interval_secs);
    println!(
        "  Alerts: {}",
        match (&config.alert_webhook_url, config.alerts_enabled) {
            (Some(url), true) => format!("Enabled ({})", url),
            (None, true) => "Enabled, but ALERT_WEBHOOK_URL is missing".to_string(),
            _ => "Disabled".to_string(),
        }
    );
    println!("  Dashboard Port: {}", config.port);
    println!("  Metrics: {}", if config.metrics_enabled { "Enabled" } else { "Disabled" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}
