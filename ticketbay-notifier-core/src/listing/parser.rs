//! Normalizes raw listing records into [`TicketItem`]s.
//!
//! The record schema belongs to the listing site and changes without notice,
//! so parsing is total: a missing or oddly typed field becomes `None` or an
//! empty string instead of an error.

use serde_json::{Number, Value};

use crate::types::{RawListing, TicketId, TicketItem};

/// Builds [`TicketItem`]s, synthesizing links against the listing site root
#[derive(Debug, Clone)]
pub struct ListingParser {
    base_url: String,
}

impl ListingParser {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn parse(&self, raw: &RawListing) -> TicketItem {
        let perform_at = raw
            .get("perform_date")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .replace('T', " ");

        let seat_info = seat_info(
            text_field(raw, "floor"),
            text_field(raw, "area"),
            text_field(raw, "seat_number"),
            text_field(raw, "grade"),
        );

        let link = text_field(raw, "category_id")
            .map(|category_id| format!("{}/product/{}/list/0", self.base_url, category_id));

        TicketItem {
            id: raw.get("id").and_then(TicketId::from_value),
            perform_name: text_field(raw, "depth2_name"),
            perform_at,
            seat_info,
            price: raw.get("price").and_then(price_field),
            link,
        }
    }
}

/// Join the present seat parts, e.g. `3F A구역 12열 R`
fn seat_info(
    floor: Option<String>,
    area: Option<String>,
    row: Option<String>,
    grade: Option<String>,
) -> String {
    [
        floor,
        area.map(|area| format!("{}구역", area)),
        row.map(|row| format!("{}열", row)),
        grade,
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
}

/// Non-empty string or non-zero number, rendered as text.
///
/// Whitespace-only strings count as present and are kept verbatim.
fn text_field(raw: &RawListing, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn price_field(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parser() -> ListingParser {
        ListingParser::new("https://www.ticketbay.co.kr/")
    }

    #[test]
    fn test_parse_full_record() {
        let raw = json!({
            "id": 9876543,
            "depth2_name": "잠실 콘서트",
            "perform_date": "2026-11-01T19:00:00",
            "floor": "3F",
            "area": "A",
            "seat_number": "12",
            "grade": "R",
            "addinfo": "연석",
            "price": 150000,
            "category_id": 5703
        });

        let item = parser().parse(&raw);

        assert_eq!(item.id, Some(TicketId::new("9876543")));
        assert_eq!(item.perform_name.as_deref(), Some("잠실 콘서트"));
        assert_eq!(item.perform_at, "2026-11-01 19:00:00");
        assert_eq!(item.seat_info, "3F A구역 12열 R");
        assert_eq!(item.price, Some(Number::from(150000)));
        assert_eq!(
            item.link.as_deref(),
            Some("https://www.ticketbay.co.kr/product/5703/list/0")
        );
    }

    #[test]
    fn test_seat_info_omits_absent_parts() {
        let raw = json!({ "floor": null, "area": null, "seat_number": "5", "grade": null });
        assert_eq!(parser().parse(&raw).seat_info, "5열");

        let raw = json!({ "area": "", "seat_number": 7, "grade": "VIP" });
        assert_eq!(parser().parse(&raw).seat_info, "7열 VIP");
    }

    #[test]
    fn test_whitespace_seat_parts_are_kept() {
        let raw = json!({ "floor": " ", "seat_number": "5", "grade": "" });
        assert_eq!(parser().parse(&raw).seat_info, "  5열");

        let raw = json!({ "depth2_name": " " });
        assert_eq!(parser().parse(&raw).perform_name.as_deref(), Some(" "));
    }

    #[test]
    fn test_parse_empty_record() {
        let item = parser().parse(&json!({}));

        assert_eq!(item.id, None);
        assert_eq!(item.perform_name, None);
        assert_eq!(item.perform_at, "");
        assert_eq!(item.seat_info, "");
        assert_eq!(item.price, None);
        assert_eq!(item.link, None);
    }

    #[test]
    fn test_price_from_string() {
        let raw = json!({ "price": "120,000" });
        assert_eq!(parser().parse(&raw).price, Some(Number::from(120000)));

        let raw = json!({ "price": "call me" });
        assert_eq!(parser().parse(&raw).price, None);
    }

    #[test]
    fn test_link_ignores_source_link_fields() {
        let raw = json!({ "category_id": "777", "link": "https://elsewhere.example/x" });
        assert_eq!(
            parser().parse(&raw).link.as_deref(),
            Some("https://www.ticketbay.co.kr/product/777/list/0")
        );
    }
}
