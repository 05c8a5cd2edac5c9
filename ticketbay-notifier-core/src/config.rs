//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/ticketbay-notifier/config.toml`
//! and then overlaid with the command-line/environment options resolved by
//! the binary (see [`ConfigOverrides`]).
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/ticketbay-notifier/` (~/.config/ticketbay-notifier/)
//! - State/Logs: `$XDG_STATE_HOME/ticketbay-notifier/` (~/.local/state/ticketbay-notifier/)
//!
//! The identity store path is not an XDG path: it defaults to `seen_ids.pkl`
//! in the working directory so existing deployments keep their state file.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "ticketbay-notifier";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Polling cadence and identity store location
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Upstream listing endpoint
    #[serde(default)]
    pub listing: ListingConfig,

    /// Notification relay
    #[serde(default)]
    pub relay: RelayConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Monitor loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    /// Base seconds between cycles
    #[serde(default = "default_interval_secs")]
    pub interval_secs: f64,

    /// Random jitter applied to the interval, in seconds (±)
    #[serde(default = "default_jitter_secs")]
    pub jitter_secs: f64,

    /// Maximum listing pages scanned per cycle
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Identity store file
    #[serde(default = "default_seen_ids_path")]
    pub seen_ids_path: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            jitter_secs: default_jitter_secs(),
            max_pages: default_max_pages(),
            seen_ids_path: default_seen_ids_path(),
        }
    }
}

fn default_interval_secs() -> f64 {
    60.0
}

fn default_jitter_secs() -> f64 {
    5.0
}

fn default_max_pages() -> u32 {
    5
}

fn default_seen_ids_path() -> PathBuf {
    PathBuf::from("seen_ids.pkl")
}

/// Upstream listing endpoint configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ListingConfig {
    /// Site root, without trailing slash
    #[serde(default = "default_listing_base_url")]
    pub base_url: String,

    /// Product (category) whose resale list is monitored
    #[serde(default = "default_product_id")]
    pub product_id: u64,

    /// `sale_quantity` filter
    #[serde(default = "default_sale_quantity")]
    pub sale_quantity: u32,

    /// `is_together` filter (seats sold together)
    #[serde(default = "default_together")]
    pub together: bool,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent sent to the listing site and the relay
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            base_url: default_listing_base_url(),
            product_id: default_product_id(),
            sale_quantity: default_sale_quantity(),
            together: default_together(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_listing_base_url() -> String {
    "https://www.ticketbay.co.kr".to_string()
}

fn default_product_id() -> u64 {
    5703
}

fn default_sale_quantity() -> u32 {
    4
}

fn default_together() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "ticketbay-notifier/1.0".to_string()
}

/// NGL relay configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    /// Submission endpoint
    #[serde(default = "default_relay_endpoint")]
    pub endpoint: String,

    /// Origin the `Origin`/`Referer` headers are derived from
    #[serde(default = "default_relay_origin")]
    pub origin: String,

    /// Relay account receiving the alerts
    pub username: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_relay_endpoint(),
            origin: default_relay_origin(),
            username: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_relay_endpoint() -> String {
    "https://ngl.link/api/submit".to_string()
}

fn default_relay_origin() -> String {
    "https://ngl.link".to_string()
}

impl RelayConfig {
    /// The configured username, or a config error if it is unset/blank
    pub fn username(&self) -> Result<&str> {
        match self.username.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(Error::Config("relay.username is required".to_string())),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// Values resolved from CLI flags / environment variables.
///
/// Any `Some` field replaces the corresponding file value.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub interval_secs: Option<f64>,
    pub max_pages: Option<u32>,
    pub seen_ids_path: Option<PathBuf>,
    pub username: Option<String>,
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Overlay CLI/environment values on top of the file configuration
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(interval) = overrides.interval_secs {
            self.monitor.interval_secs = interval;
        }
        if let Some(max_pages) = overrides.max_pages {
            self.monitor.max_pages = max_pages;
        }
        if let Some(path) = overrides.seen_ids_path {
            self.monitor.seen_ids_path = path;
        }
        if let Some(username) = overrides.username {
            self.relay.username = Some(username);
        }
    }

    /// Validate a fully resolved configuration
    pub fn validate(&self) -> Result<()> {
        let interval = self.monitor.interval_secs;
        if !interval.is_finite() || interval < 0.0 {
            return Err(Error::Config(format!(
                "monitor.interval_secs must be a non-negative number, got {}",
                interval
            )));
        }
        let jitter = self.monitor.jitter_secs;
        if !jitter.is_finite() || jitter < 0.0 {
            return Err(Error::Config(format!(
                "monitor.jitter_secs must be a non-negative number, got {}",
                jitter
            )));
        }
        if self.listing.timeout_secs == 0 || self.relay.timeout_secs == 0 {
            return Err(Error::Config("timeouts must be at least 1 second".to_string()));
        }
        self.relay.username()?;
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/ticketbay-notifier/config.toml`
    pub fn config_path() -> PathBuf {
        xdg_config_home().join(APP_DIR).join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/ticketbay-notifier/`
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join(APP_DIR)
    }

    /// Ensure XDG base directory environment variables are set.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
