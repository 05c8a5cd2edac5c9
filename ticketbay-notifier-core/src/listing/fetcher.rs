//! HTTP fetcher for the resale list pages

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use scraper::{Html, Selector};
use serde_json::Value;

use crate::config::ListingConfig;
use crate::error::{Error, Result};
use crate::types::RawListing;

use super::PageFetch;

const NEXT_DATA_SELECTOR: &str = "script#__NEXT_DATA__";
const LISTINGS_POINTER: &str = "/props/pageProps/listServer/content";

/// Fetches resale list pages for one product
pub struct ListingFetcher {
    config: ListingConfig,
    http_client: reqwest::Client,
    base_url: String,
}

impl ListingFetcher {
    pub fn new(config: ListingConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/html"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::Config(format!("invalid listing.user_agent: {}", e)))?,
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            base_url,
        })
    }

    /// URL of `page` of the resale list, starting from `date`
    pub fn listing_url(&self, page: u32, date: NaiveDate) -> String {
        format!(
            "{}/product/{}/list/0?start_perform_date={}&sale_quantity={}&is_together={}&page={}",
            self.base_url,
            self.config.product_id,
            date.format("%Y-%m-%d"),
            self.config.sale_quantity,
            if self.config.together { "YES" } else { "NO" },
            page
        )
    }

    /// Fetch one page of listings for today onward.
    ///
    /// Never returns an error: failures are logged and reported as
    /// [`PageFetch::Failed`].
    pub async fn fetch(&self, page: u32) -> PageFetch {
        let today = chrono::Local::now().date_naive();
        let url = self.listing_url(page, today);

        let body = match self.get_text(&url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(page, error = %e, "Failed to fetch ticket listings");
                return PageFetch::Failed(e);
            }
        };

        match extract_listings(&body) {
            Ok(listings) if listings.is_empty() => {
                tracing::info!(page, "No tickets on page or page shape changed");
                PageFetch::Empty
            }
            Ok(listings) => {
                tracing::debug!(page, count = listings.len(), "Fetched ticket listings");
                PageFetch::Listings(listings)
            }
            Err(e) => {
                tracing::error!(page, error = %e, "Failed to extract listings payload");
                PageFetch::Failed(e)
            }
        }
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("listing page returned {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("failed to read response body: {}", e)))
    }
}

/// Pull the listing array out of a rendered list page.
///
/// Errors when the `__NEXT_DATA__` script is missing or is not JSON. A
/// payload without the `props.pageProps.listServer.content` path yields an
/// empty list.
pub fn extract_listings(html: &str) -> Result<Vec<RawListing>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(NEXT_DATA_SELECTOR)
        .map_err(|e| Error::Parse(format!("invalid selector: {}", e)))?;

    let script_text: String = document
        .select(&selector)
        .next()
        .map(|element| element.text().collect())
        .unwrap_or_default();

    if script_text.trim().is_empty() {
        return Err(Error::Parse("__NEXT_DATA__ script not found".to_string()));
    }

    let mut data: Value = serde_json::from_str(&script_text)
        .map_err(|e| Error::Parse(format!("invalid __NEXT_DATA__ JSON: {}", e)))?;

    match data.pointer_mut(LISTINGS_POINTER).map(Value::take) {
        Some(Value::Array(listings)) => Ok(listings),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(other) => {
            tracing::warn!(kind = %json_kind(&other), "Listing content is not an array");
            Ok(Vec::new())
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
