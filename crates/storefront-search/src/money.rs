//! Currency metadata and amount formatting.
//!
//! Storefront prices are whole units of the listing currency. Labels show
//! them with a symbol prefix and comma thousands separators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    NGN,
    USD,
    EUR,
    GBP,
    GHS,
    KES,
}

impl Currency {
    /// Get the currency code (e.g., "NGN").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::NGN => "NGN",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::GHS => "GHS",
            Currency::KES => "KES",
        }
    }

    /// Get the currency symbol (e.g., "₦").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::NGN => "\u{20a6}",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::GHS => "GH\u{20b5}",
            Currency::KES => "KSh",
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "NGN" => Some(Currency::NGN),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "GHS" => Some(Currency::GHS),
            "KES" => Some(Currency::KES),
            _ => None,
        }
    }

    /// Format a whole amount with this currency's symbol (e.g., "₦15,000").
    pub fn display(&self, amount: u64) -> String {
        format!("{}{}", self.symbol(), group_thousands(amount))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Insert comma separators every three digits.
///
/// ```
/// use storefront_search::money::group_thousands;
/// assert_eq!(group_thousands(1234567), "1,234,567");
/// ```
pub fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Parse a display amount such as "₦10,000.50" or "NGN 2,500" into whole units.
///
/// Leading currency symbols or codes are skipped, thousands separators are
/// removed and any fractional part is dropped. Returns `None` when no digits
/// remain.
pub fn parse_amount(text: &str) -> Option<u64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let body = &text[start..];
    let whole = body.split('.').next().unwrap_or(body);
    let digits: String = whole.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
