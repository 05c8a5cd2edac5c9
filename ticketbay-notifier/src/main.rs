//! ticketbay-notifier - watch Ticketbay resale listings and push NGL alerts
//!
//! Long-running foreground process. Each option can also come from the
//! environment or from `$XDG_CONFIG_HOME/ticketbay-notifier/config.toml`;
//! a missing NGL username is asked for once on startup.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Logs: $XDG_STATE_HOME/ticketbay-notifier/ (~/.local/state/ticketbay-notifier/)
//! - Config: $XDG_CONFIG_HOME/ticketbay-notifier/config.toml

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use ticketbay_notifier_core::listing::{ListingFetcher, ListingParser};
use ticketbay_notifier_core::relay::RelayClient;
use ticketbay_notifier_core::{Config, ConfigOverrides, Monitor, ShutdownSignal};

#[derive(Parser)]
#[command(name = "ticketbay-notifier")]
#[command(about = "Watch Ticketbay resale listings and send NGL alerts for new tickets")]
#[command(version)]
struct Args {
    /// Seconds between checks (jittered by a few seconds)
    #[arg(long, env = "CHECK_INTERVAL")]
    interval: Option<f64>,

    /// Maximum listing pages scanned per check
    #[arg(long, env = "MAX_PAGES")]
    max_pages: Option<u32>,

    /// File recording already-alerted ticket ids
    #[arg(long, env = "SEEN_IDS_PATH")]
    seen_ids_path: Option<PathBuf>,

    /// NGL account receiving the alerts
    #[arg(long, env = "NGL_USERNAME")]
    username: Option<String>,
}

impl Args {
    fn into_overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            interval_secs: self.interval,
            max_pages: self.max_pages,
            seen_ids_path: self.seen_ids_path,
            username: self.username,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    let mut config = Config::load().context("failed to load configuration")?;
    config.apply(args.into_overrides());

    if config.relay.username().is_err() {
        config.relay.username = Some(prompt_username().context("failed to read NGL username")?);
    }
    config.validate().context("invalid configuration")?;

    let _log_guard = ticketbay_notifier_core::logging::init(&config.logging)
        .context("failed to initialize logging")?;

    tracing::info!(
        interval_secs = config.monitor.interval_secs,
        max_pages = config.monitor.max_pages,
        product_id = config.listing.product_id,
        "ticketbay-notifier starting"
    );

    let fetcher =
        ListingFetcher::new(config.listing.clone()).context("failed to create listing fetcher")?;
    let relay = RelayClient::new(&config.relay, &config.listing.user_agent)
        .context("failed to create relay client")?;
    let parser = ListingParser::new(&config.listing.base_url);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create runtime")?;

    // Set up signal handler for graceful shutdown
    let shutdown = ShutdownSignal::new();
    let handle = shutdown.clone();
    ctrlc::set_handler(move || {
        if handle.is_triggered() {
            eprintln!("\nForced exit, identity store not saved");
            std::process::exit(130);
        }
        eprintln!("\nShutting down... (Ctrl+C again to force)");
        handle.trigger();
    })
    .context("failed to set Ctrl+C handler")?;

    let mut monitor = Monitor::new(config.monitor.clone(), fetcher, relay, parser, shutdown);
    runtime.block_on(monitor.run());

    Ok(())
}

/// Ask for the NGL username on stdin
fn prompt_username() -> Result<String> {
    print!("NGL 사용자명: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let username = line.trim();
    if username.is_empty() {
        bail!("an NGL username is required (set NGL_USERNAME or pass --username)");
    }
    Ok(username.to_string())
}
