//! # ticketbay-notifier-core
//!
//! Core library for ticketbay-notifier - a resale ticket monitor that polls
//! the Ticketbay listing pages and pushes an NGL alert for every new offer.
//!
//! This library provides:
//! - Listing page fetching and tolerant record parsing
//! - A persistent identity store so each ticket is alerted once
//! - The NGL relay client
//! - The polling monitor loop
//! - Configuration management and logging infrastructure
//!
//! ## Data flow
//!
//! Monitor -> ListingFetcher (per page) -> ListingParser (per record)
//! -> IdentityStore dedup -> RelayClient (new tickets only) -> IdentityStore save
//!
//! ## Example
//!
//! ```rust,no_run
//! use ticketbay_notifier_core::listing::{ListingFetcher, ListingParser};
//! use ticketbay_notifier_core::relay::RelayClient;
//! use ticketbay_notifier_core::{Config, Monitor, ShutdownSignal};
//!
//! # async fn run() -> ticketbay_notifier_core::Result<()> {
//! let config = Config::load()?;
//! config.validate()?;
//!
//! let fetcher = ListingFetcher::new(config.listing.clone())?;
//! let relay = RelayClient::new(&config.relay, &config.listing.user_agent)?;
//! let parser = ListingParser::new(&config.listing.base_url);
//!
//! let shutdown = ShutdownSignal::new();
//! let mut monitor = Monitor::new(config.monitor.clone(), fetcher, relay, parser, shutdown);
//! monitor.run().await;
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use config::{Config, ConfigOverrides};
pub use error::{Error, Result};
pub use monitor::{CycleReport, Monitor, MonitorStats};
pub use shutdown::ShutdownSignal;
pub use store::IdentityStore;
pub use types::*;

// Public modules
pub mod config;
pub mod error;
pub mod listing;
pub mod logging;
pub mod monitor;
pub mod relay;
pub mod shutdown;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;
