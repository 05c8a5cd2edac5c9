//! Polling loop: fetch pages, alert on unseen tickets, persist, sleep.
//!
//! ```text
//! STARTING -> CYCLING <-> SLEEPING -> ... -> STOPPED
//! ```
//!
//! - A cycle walks pages `0..max_pages` in order and stops at the first page
//!   with no listings (whether the page was empty or the fetch failed).
//! - The shutdown signal is checked before every page fetch and every alert;
//!   a request already in flight is allowed to finish.
//! - A ticket id is recorded as seen as soon as an alert was *attempted*;
//!   a failed relay call is not retried on later cycles.
//! - The store is saved after any cycle that found new ids, after the very
//!   first cycle of a fresh store, and once more on shutdown.
//! - No per-cycle error stops the loop. Only the shutdown signal does.

use std::time::Duration;

use rand::Rng;

use crate::config::MonitorConfig;
use crate::listing::{ListingParser, ListingSource};
use crate::relay::AlertSink;
use crate::shutdown::ShutdownSignal;
use crate::store::IdentityStore;

/// Lower bound on the pause between cycles
const MIN_SLEEP_SECS: f64 = 1.0;

/// Counters accumulated over the monitor's lifetime
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MonitorStats {
    pub cycles: u64,
    pub pages_fetched: u64,
    pub fetch_failures: u64,
    pub alerts_sent: u64,
    pub alerts_failed: u64,
}

/// What a single cycle did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub pages_fetched: u32,
    pub new_ids: usize,
    /// Whether a store save was attempted at the end of the cycle
    pub saved: bool,
    /// Cycle was cut short by the shutdown signal
    pub interrupted: bool,
}

/// Drives the fetch/dedup/alert cycle over a listing source and an alert sink
pub struct Monitor<L, A> {
    source: L,
    sink: A,
    parser: ListingParser,
    store: IdentityStore,
    settings: MonitorConfig,
    shutdown: ShutdownSignal,
    /// A fresh store is written after the first cycle even if nothing was found
    save_pending: bool,
    stats: MonitorStats,
}

impl<L: ListingSource, A: AlertSink> Monitor<L, A> {
    /// Load the identity store and prepare the loop
    pub fn new(
        settings: MonitorConfig,
        source: L,
        sink: A,
        parser: ListingParser,
        shutdown: ShutdownSignal,
    ) -> Self {
        let store = IdentityStore::load(&settings.seen_ids_path);
        tracing::info!(
            seen = store.len(),
            path = %store.path().display(),
            "Monitoring started"
        );

        Self {
            source,
            sink,
            parser,
            save_pending: store.is_first_run(),
            store,
            settings,
            shutdown,
            stats: MonitorStats::default(),
        }
    }

    /// Run cycles until the shutdown signal fires, then save the store one last time.
    pub async fn run(&mut self) -> MonitorStats {
        let shutdown = self.shutdown.clone();
        while !shutdown.is_triggered() {
            let report = self.run_cycle().await;
            tracing::debug!(
                pages = report.pages_fetched,
                new_ids = report.new_ids,
                saved = report.saved,
                interrupted = report.interrupted,
                "Cycle complete"
            );
            if report.interrupted {
                break;
            }

            let pause = self.next_sleep();
            tracing::info!("Next check in {:.1}s", pause.as_secs_f64());

            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                _ = shutdown.wait() => break,
            }
        }

        self.stop();
        self.stats.clone()
    }

    /// One pass over the listing pages.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        'pages: for page in 0..self.settings.max_pages {
            if self.shutdown.is_triggered() {
                report.interrupted = true;
                break;
            }

            let fetch = self.source.fetch_page(page).await;
            report.pages_fetched += 1;
            self.stats.pages_fetched += 1;
            if fetch.is_failure() {
                self.stats.fetch_failures += 1;
            }

            let listings = fetch.into_listings();
            if listings.is_empty() {
                break;
            }

            for raw in &listings {
                if self.shutdown.is_triggered() {
                    report.interrupted = true;
                    break 'pages;
                }

                let item = self.parser.parse(raw);
                let Some(id) = item.id.clone() else {
                    continue;
                };
                if self.store.contains(&id) {
                    continue;
                }

                match self.sink.send(&item).await {
                    Ok(()) => self.stats.alerts_sent += 1,
                    Err(_) => self.stats.alerts_failed += 1,
                }
                self.store.insert(id);
                report.new_ids += 1;
            }
        }

        if report.new_ids > 0 || self.save_pending {
            self.store.save();
            self.save_pending = false;
            report.saved = true;
        }

        self.stats.cycles += 1;
        report
    }

    /// Pause before the next cycle, jittered around the configured interval
    pub fn next_sleep(&self) -> Duration {
        let jitter = self.settings.jitter_secs;
        let offset = if jitter > 0.0 {
            rand::rng().random_range(-jitter..=jitter)
        } else {
            0.0
        };
        sleep_duration(self.settings.interval_secs, offset)
    }

    fn stop(&mut self) {
        self.store.save();
        tracing::info!(
            cycles = self.stats.cycles,
            pages_fetched = self.stats.pages_fetched,
            fetch_failures = self.stats.fetch_failures,
            alerts_sent = self.stats.alerts_sent,
            alerts_failed = self.stats.alerts_failed,
            seen = self.store.len(),
            "Monitoring stopped"
        );
    }

    pub fn store(&self) -> &IdentityStore {
        &self.store
    }

    pub fn stats(&self) -> &MonitorStats {
        &self.stats
    }
}

/// `max(1s, interval + offset)`
pub fn sleep_duration(interval_secs: f64, offset_secs: f64) -> Duration {
    let secs = interval_secs + offset_secs;
    if secs.is_finite() && secs > MIN_SLEEP_SECS {
        Duration::from_secs_f64(secs)
    } else {
        Duration::from_secs_f64(MIN_SLEEP_SECS)
    }
}
