//! Display formatting for list cells.

use chrono::{DateTime, Utc};
use rollcall_core::Money;

/// Currency symbol shown for member balances.
pub const RUPEE: &str = "₹";

/// Currency symbol shown for user balances.
pub const DOLLAR: &str = "$";

/// Format a balance with two decimals, e.g. `₹10.00`.
#[must_use]
pub fn money(amount: Money, symbol: &str) -> String {
    format!("{symbol}{amount}")
}

/// Format a timestamp as a calendar date.
#[must_use]
pub fn date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Last six characters of a storage id, as shown on list cards.
#[must_use]
pub fn short_id(id: &str) -> &str {
    let skip = id.chars().count().saturating_sub(6);
    id.char_indices()
        .nth(skip)
        .and_then(|(i, _)| id.get(i..))
        .unwrap_or(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_money() {
        assert_eq!(money(Money::from_major(10), RUPEE), "₹10.00");
        assert_eq!(money(Money::parse("2.5").unwrap(), DOLLAR), "$2.50");
    }

    #[test]
    fn test_date() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 0).unwrap();
        assert_eq!(date(&at), "2024-03-09");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("65f1c0ffee123456"), "123456");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id(""), "");
        assert_eq!(short_id("ñañañañ"), "añañañ");
    }
}
