//! Price string parsing.
//!
//! Prices arrive as currency-prefixed strings such as `"$18,731.76"`. The
//! separators are taken from an explicit [`PriceFormat`] instead of the
//! process locale.

use crate::error::ReportError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// How prices are written in the sales data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFormat {
    /// Symbol stripped from either end of the price, e.g. `$`.
    pub currency_symbol: String,
    /// Character separating the integer and fractional parts.
    pub decimal_separator: char,
    /// Digit grouping separator removed before parsing; empty for none.
    pub thousands_separator: String,
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            decimal_separator: '.',
            thousands_separator: ",".to_string(),
        }
    }
}

impl From<&crate::config::PriceConfig> for PriceFormat {
    fn from(config: &crate::config::PriceConfig) -> Self {
        Self {
            currency_symbol: config.currency_symbol.clone(),
            decimal_separator: config.decimal_separator,
            thousands_separator: config.thousands_separator.clone(),
        }
    }
}

/// Parse a price string into an exact decimal.
pub fn parse_price(text: &str, format: &PriceFormat) -> Result<Decimal, ReportError> {
    let invalid = |reason: String| ReportError::Format {
        origin: format!("price {:?}", text),
        reason,
    };

    let mut number = text.trim();
    if !format.currency_symbol.is_empty() {
        number = number
            .trim_start_matches(format.currency_symbol.as_str())
            .trim_end_matches(format.currency_symbol.as_str())
            .trim();
    }

    if number.is_empty() {
        return Err(invalid("no digits after removing the currency symbol".to_string()));
    }

    let mut normalized = if format.thousands_separator.is_empty() {
        number.to_string()
    } else {
        number.replace(format.thousands_separator.as_str(), "")
    };
    if format.decimal_separator != '.' {
        if normalized.contains('.') {
            return Err(invalid(format!(
                "unexpected '.' with decimal separator '{}'",
                format.decimal_separator
            )));
        }
        normalized = normalized.replace(format.decimal_separator, ".");
    }

    Decimal::from_str(&normalized).map_err(|err| invalid(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain_dollar_price() {
        let format = PriceFormat::default();
        assert_eq!(parse_price("$18731.76", &format).unwrap(), dec("18731.76"));
        assert_eq!(parse_price("$100", &format).unwrap(), dec("100"));
    }

    #[test]
    fn test_parse_grouped_price() {
        let format = PriceFormat::default();
        assert_eq!(parse_price("$1,234,567.89", &format).unwrap(), dec("1234567.89"));
    }

    #[test]
    fn test_parse_european_price() {
        let format = PriceFormat {
            currency_symbol: "€".to_string(),
            decimal_separator: ',',
            thousands_separator: ".".to_string(),
        };
        assert_eq!(parse_price("€1.234,50", &format).unwrap(), dec("1234.50"));
        assert_eq!(parse_price("1.234,50 €", &format).unwrap(), dec("1234.50"));
    }

    #[test]
    fn test_parse_without_separators() {
        let format = PriceFormat {
            currency_symbol: String::new(),
            decimal_separator: '.',
            thousands_separator: String::new(),
        };
        assert_eq!(parse_price("42.5", &format).unwrap(), dec("42.5"));
        assert!(parse_price("4,250", &format).is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let format = PriceFormat::default();
        assert!(matches!(
            parse_price("$", &format),
            Err(ReportError::Format { .. })
        ));
        assert!(matches!(
            parse_price("$12.3.4", &format),
            Err(ReportError::Format { .. })
        ));
        assert!(matches!(
            parse_price("free", &format),
            Err(ReportError::Format { .. })
        ));
    }
}
