//! NGL relay alerts
//!
//! Each new ticket is delivered as an anonymous NGL question to the
//! configured account. Delivery is best effort: one attempt, no retry,
//! and the caller treats the ticket as handled either way.
//!
//! ## Usage
//!
//! ```toml
//! [relay]
//! username = "your-ngl-username"
//! ```

mod client;
mod message;

pub use client::RelayClient;
pub use message::format_alert;

use crate::error::Result;
use crate::types::TicketItem;

/// Destination for ticket alerts.
#[allow(async_fn_in_trait)]
pub trait AlertSink {
    /// Deliver one alert. Errors are reported, not retried.
    async fn send(&self, item: &TicketItem) -> Result<()>;
}

impl AlertSink for RelayClient {
    async fn send(&self, item: &TicketItem) -> Result<()> {
        self.send_alert(item).await
    }
}

impl<T: AlertSink> AlertSink for &T {
    async fn send(&self, item: &TicketItem) -> Result<()> {
        (**self).send(item).await
    }
}
