//! Price text parsing and drop detection.
//!
//! Price texts are free-form strings such as `"10.99 USD"`. The magnitude is
//! the first decimal numeral in the text; comma decimal marks and currency
//! conventions are not interpreted.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

static NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("numeral pattern is valid"));

/// Extract the first contiguous decimal numeral from `text`.
///
/// Returns `None` when the text contains no digits, or when the numeral
/// exceeds [`Decimal::MAX`] (about 7.9e28). Such texts are treated like any
/// other unparsable price and never trigger an alert.
///
/// ```
/// use pricewatch::domain::parse_price;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_price("10.99 USD"), Some(Decimal::new(1099, 2)));
/// assert_eq!(parse_price("USD"), None);
/// ```
#[must_use]
pub fn parse_price(text: &str) -> Option<Decimal> {
    let numeral = NUMERAL.find(text)?;
    Decimal::from_str(numeral.as_str()).ok()
}

/// The non-numeric part of a price text, whitespace-normalized.
///
/// `"10.99 USD"` gives `"USD"`, `"€ 1,299.00"` gives `"€"`. Empty when the
/// text carries no unit.
#[must_use]
pub fn price_unit(text: &str) -> String {
    text.split_whitespace()
        .map(|token| {
            token
                .chars()
                .filter(|c| !c.is_ascii_digit() && *c != '.' && *c != ',')
                .collect::<String>()
        })
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A detected price decrease between two consecutive observations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceDrop {
    /// Raw text of the new observation.
    pub current: String,
    /// Raw text of the previous observation.
    pub previous: String,
    pub current_amount: Decimal,
    pub previous_amount: Decimal,
}

/// Result of comparing a new price text with the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// The new magnitude is strictly lower.
    Drop(PriceDrop),
    /// Equal or higher.
    NoDrop,
    /// At least one side has no numeral.
    Unparsable,
    /// Both sides carry a unit and the units differ.
    UnitChanged { previous: String, current: String },
}

/// Compare the previous and current price texts.
#[must_use]
pub fn compare(previous: &str, current: &str) -> Comparison {
    let (Some(previous_amount), Some(current_amount)) = (parse_price(previous), parse_price(current))
    else {
        return Comparison::Unparsable;
    };

    let previous_unit = price_unit(previous);
    let current_unit = price_unit(current);
    if !previous_unit.is_empty() && !current_unit.is_empty() && previous_unit != current_unit {
        return Comparison::UnitChanged {
            previous: previous_unit,
            current: current_unit,
        };
    }

    if current_amount < previous_amount {
        Comparison::Drop(PriceDrop {
            current: current.to_string(),
            previous: previous.to_string(),
            current_amount,
            previous_amount,
        })
    } else {
        Comparison::NoDrop
    }
}
