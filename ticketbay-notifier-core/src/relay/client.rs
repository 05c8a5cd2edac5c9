//! HTTP client for the NGL submit endpoint
//!
//! The endpoint expects the same form post the NGL web page makes,
//! including browser-style `Origin`/`Referer` headers pointing at the
//! recipient's profile page.

use std::time::Duration;

use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, HOST, ORIGIN, REFERER, USER_AGENT,
};
use uuid::Uuid;

use crate::config::RelayConfig;
use crate::error::{Error, Result};
use crate::types::TicketItem;

use super::message::format_alert;

/// Longest slice of a relay error body kept in the returned error
const MAX_ERROR_BODY_CHARS: usize = 200;

/// HTTP client for the NGL relay
pub struct RelayClient {
    http_client: reqwest::Client,
    endpoint: String,
    username: String,
}

impl RelayClient {
    /// Create a relay client.
    ///
    /// Returns an error if the username is missing or a header value is invalid.
    pub fn new(config: &RelayConfig, user_agent: &str) -> Result<Self> {
        let username = config.username()?.to_string();
        let origin = config.origin.trim_end_matches('/');

        let mut headers = HeaderMap::new();
        if let Some(host) = host_of(origin) {
            headers.insert(HOST, header_value(host, "relay.origin")?);
        }
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded; charset=UTF-8"),
        );
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
        headers.insert(USER_AGENT, header_value(user_agent, "listing.user_agent")?);
        headers.insert(ORIGIN, header_value(origin, "relay.origin")?);
        headers.insert(
            REFERER,
            header_value(&format!("{}/{}", origin, username), "relay.username")?,
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            username,
        })
    }

    /// Submit one alert, tagged with a fresh device id.
    ///
    /// Success and failure are both logged; the error is returned so the
    /// caller can count it.
    pub async fn send_alert(&self, item: &TicketItem) -> Result<()> {
        let ticket_id = item.id.as_ref().map(|id| id.as_str()).unwrap_or("-");

        match self.submit(&format_alert(item)).await {
            Ok(()) => {
                tracing::info!(
                    ticket_id,
                    link = item.link.as_deref().unwrap_or("-"),
                    "NGL alert sent"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(ticket_id, error = %e, "NGL alert failed");
                Err(e)
            }
        }
    }

    async fn submit(&self, question: &str) -> Result<()> {
        let device_id = Uuid::new_v4().to_string();
        let form = [
            ("username", self.username.as_str()),
            ("question", question),
            ("deviceId", device_id.as_str()),
            ("gameSlug", ""),
            ("referrer", ""),
        ];

        let response = self
            .http_client
            .post(&self.endpoint)
            .form(&form[..])
            .send()
            .await
            .map_err(|e| Error::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            Err(Error::Transport(format!(
                "relay error ({}): {}",
                status,
                truncate_body(error_text.trim())
            )))
        }
    }
}

/// Cap an error body at [`MAX_ERROR_BODY_CHARS`] characters
fn truncate_body(text: &str) -> String {
    match text.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

fn header_value(value: &str, field: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| Error::Config(format!("invalid {}: {}", field, e)))
}

/// `https://ngl.link` -> `ngl.link`
fn host_of(origin: &str) -> Option<&str> {
    let rest = origin.split_once("://").map_or(origin, |(_, rest)| rest);
    let host = rest.split('/').next()?;
    (!host.is_empty()).then_some(host)
}
