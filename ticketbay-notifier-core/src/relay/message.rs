//! Alert text shown to the operator

use crate::types::TicketItem;

const MISSING: &str = "-";

/// Render the four-line alert for a ticket
pub fn format_alert(item: &TicketItem) -> String {
    let price = item
        .price
        .as_ref()
        .map(|p| p.to_string())
        .unwrap_or_else(|| MISSING.to_string());

    format!(
        "🎫 공연: {}\n⏰ 일시: {}\n💺 좌석: {}\n💰 가격: {}원\n",
        item.perform_name.as_deref().unwrap_or(MISSING),
        or_missing(&item.perform_at),
        or_missing(&item.seat_info),
        price
    )
}

fn or_missing(value: &str) -> &str {
    if value.is_empty() {
        MISSING
    } else {
        value
    }
}
