//! Currency rendering for locale-formatted amounts (`1.234,50`).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;

pub const EURO: &str = "€";

/// Outcome of formatting a raw cell as money.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Money {
    /// Blank input.
    Empty,
    /// Parsed and rendered as `"<symbol> 1234,50"`.
    Formatted(String),
    /// Already carried the currency symbol; passed through.
    PreFormatted(String),
    /// Not a number; the trimmed original.
    Unparsed(String),
}

impl Money {
    pub fn as_str(&self) -> &str {
        match self {
            Money::Empty => "",
            Money::Formatted(s) | Money::PreFormatted(s) | Money::Unparsed(s) => s.as_str(),
        }
    }

    pub fn is_formatted(&self) -> bool {
        matches!(self, Money::Formatted(_))
    }

    pub fn into_string(self) -> String {
        match self {
            Money::Empty => String::new(),
            Money::Formatted(s) | Money::PreFormatted(s) | Money::Unparsed(s) => s,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format `raw` as euros.
pub fn format_currency(raw: &str) -> Money {
    format_currency_with(raw, EURO)
}

/// Format `raw` as an amount in `symbol`.
///
/// `.` is read as a thousands separator and `,` as the decimal separator.
/// Output always has two decimals and a `,` separator.
pub fn format_currency_with(raw: &str, symbol: &str) -> Money {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Money::Empty;
    }
    if !symbol.is_empty() && trimmed.contains(symbol) {
        return Money::PreFormatted(trimmed.to_string());
    }
    match parse_locale_number(trimmed) {
        Some(value) => Money::Formatted(format!("{} {}", symbol, format_decimal(value))),
        None => Money::Unparsed(trimmed.to_string()),
    }
}

fn parse_locale_number(s: &str) -> Option<f64> {
    // only the first comma becomes the decimal point
    let canonical = s.replace('.', "").replacen(',', ".", 1);
    if canonical.is_empty() {
        return Some(0.0);
    }
    canonical.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Two decimals, ties away from zero on the exact binary value, `,` separator.
/// The sign is kept only for values below zero, so `-0` renders unsigned.
fn format_decimal(value: f64) -> String {
    let magnitude = match Decimal::from_f64_retain(value.abs()) {
        Some(d) => format!(
            "{:.2}",
            d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        None => format!("{:.2}", value.abs()),
    };
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}", sign, magnitude.replace('.', ","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_comma() {
        assert_eq!(format_currency("1234,50").as_str(), "€ 1234,50");
        assert_eq!(format_currency("3,5"), Money::Formatted("€ 3,50".into()));
    }

    #[test]
    fn test_thousands_separator_is_stripped() {
        assert_eq!(format_currency("1.234,5").as_str(), "€ 1234,50");
        assert_eq!(format_currency("1.000.000").as_str(), "€ 1000000,00");
    }

    #[test]
    fn test_already_formatted_passes_through() {
        assert_eq!(format_currency("€10"), Money::PreFormatted("€10".into()));
        assert_eq!(format_currency("  € 2,00 ").as_str(), "€ 2,00");
    }

    #[test]
    fn test_unparseable_falls_back_to_original() {
        assert_eq!(format_currency(" abc "), Money::Unparsed("abc".into()));
        assert_eq!(format_currency("1,2,3").as_str(), "1,2,3");
        assert_eq!(format_currency("inf").as_str(), "inf");
        assert_eq!(format_currency("-").as_str(), "-");
        assert!(!format_currency("abc").is_formatted());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format_currency(""), Money::Empty);
        assert_eq!(format_currency("   ").to_string(), "");
    }

    #[test]
    fn test_integers_and_negatives() {
        assert_eq!(format_currency("7").as_str(), "€ 7,00");
        assert_eq!(format_currency("-2,5").as_str(), "€ -2,50");
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(format_currency("0,125").as_str(), "€ 0,13");
        assert_eq!(format_currency("2,625").as_str(), "€ 2,63");
        assert_eq!(format_currency("-1,125").as_str(), "€ -1,13");
    }

    #[test]
    fn test_negative_zero_and_bare_dots() {
        assert_eq!(format_currency("-0").as_str(), "€ 0,00");
        assert_eq!(format_currency("-0,00").as_str(), "€ 0,00");
        assert_eq!(format_currency("."), Money::Formatted("€ 0,00".into()));
        assert_eq!(format_currency("-0,001").as_str(), "€ -0,00");
    }

    #[test]
    fn test_custom_symbol() {
        assert_eq!(format_currency_with("4,2", "CHF").as_str(), "CHF 4,20");
        assert_eq!(
            format_currency_with("CHF 4", "CHF"),
            Money::PreFormatted("CHF 4".into())
        );
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_value(format_currency("1,5")).unwrap();
        assert_eq!(json["kind"], "formatted");
        assert_eq!(json["text"], "€ 1,50");
    }
}
