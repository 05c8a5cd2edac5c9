//! Core domain types for ticketbay-notifier
//!
//! | Term | Definition |
//! |------|------------|
//! | **Raw listing** | One upstream record from the resale list payload (schema owned by the site) |
//! | **TicketItem** | Normalized, notification-ready form of a raw listing |
//! | **TicketId** | Stable identity of a listing; the only thing retained after alerting |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A raw listing record exactly as it appears in the upstream payload.
pub type RawListing = Value;

/// Stable identifier of a resale listing.
///
/// The upstream payload uses numbers today but strings are accepted too;
/// both normalize to the same textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Extract an id from a JSON value.
    ///
    /// Null, `false`, `0` and the empty string are treated as "no id".
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(Self(n.to_string())),
            Value::Bool(true) => Some(Self("true".to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A normalized ticket offer.
///
/// Everything except `id` is descriptive and may be missing when the
/// upstream record lacks the field.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketItem {
    pub id: Option<TicketId>,
    pub perform_name: Option<String>,
    /// Performance time as sent upstream, with the `T` separator replaced by a space
    pub perform_at: String,
    /// Floor, area, row and grade joined by spaces (absent parts omitted)
    pub seat_info: String,
    pub price: Option<serde_json::Number>,
    pub link: Option<String>,
}
