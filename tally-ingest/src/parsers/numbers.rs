//! Amount/balance recovery from a cleaned narrative.
//!
//! The first numeric token is the amount, the second the running balance.
//! Further numeric tokens stay in the description. A row with more than two
//! figures (e.g. a street number) will misassign; that is a property of the
//! source layout, not something this stage tries to guess around.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;
use tally_core::to_money;
use tally_core::transaction::MONEY_SCALE;

static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]{1,2})?$").expect("numeric token pattern"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedNumbers {
    /// Comma-stripped text of the first numeric token
    pub amount: Option<String>,
    /// Comma-stripped text of the second numeric token
    pub balance: Option<String>,
    /// Every other token, original order, single-spaced
    pub remaining: String,
}

/// Comma-stripped form of `token` if it reads as a signed number with at most two decimals.
pub fn numeric_token(token: &str) -> Option<String> {
    let stripped = token.replace(',', "");
    NUMERIC_TOKEN.is_match(&stripped).then_some(stripped)
}

pub fn extract_numbers(text: &str) -> ExtractedNumbers {
    let mut amount = None;
    let mut balance = None;
    let mut remaining = Vec::new();

    for token in text.split_whitespace() {
        if balance.is_none() {
            if let Some(number) = numeric_token(token) {
                if amount.is_none() {
                    amount = Some(number);
                } else {
                    balance = Some(number);
                }
                continue;
            }
        }
        remaining.push(token);
    }

    ExtractedNumbers {
        amount,
        balance,
        remaining: remaining.join(" "),
    }
}

/// Parse a figure, ignoring thousands separators. None if it does not fit a
/// decimal with two fraction digits.
pub fn to_decimal(s: &str) -> Option<Decimal> {
    let value = Decimal::from_str(&s.replace(',', "")).ok()?;
    let money = to_money(value);
    (money.scale() == MONEY_SCALE).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_then_balance() {
        let n = extract_numbers("PURCHASE 123.45 678.90");
        assert_eq!(n.amount.as_deref(), Some("123.45"));
        assert_eq!(n.balance.as_deref(), Some("678.90"));
        assert_eq!(n.remaining, "PURCHASE");
    }

    #[test]
    fn test_single_number() {
        let n = extract_numbers("FEE 50.00");
        assert_eq!(n.amount.as_deref(), Some("50.00"));
        assert_eq!(n.balance, None);
        assert_eq!(n.remaining, "FEE");
    }

    #[test]
    fn test_no_numbers() {
        let n = extract_numbers("OPENING BALANCE");
        assert_eq!(n, ExtractedNumbers {
            amount: None,
            balance: None,
            remaining: "OPENING BALANCE".to_string(),
        });
    }

    #[test]
    fn test_third_number_stays_in_description() {
        let n = extract_numbers("SHOP 10.00 20.00 42 MAIN ST");
        assert_eq!(n.amount.as_deref(), Some("10.00"));
        assert_eq!(n.balance.as_deref(), Some("20.00"));
        assert_eq!(n.remaining, "SHOP 42 MAIN ST");
    }

    #[test]
    fn test_address_digits_are_taken_first() {
        // known limitation: leading digits in the narrative win
        let n = extract_numbers("12 HIGH STREET 99.99 1000.00");
        assert_eq!(n.amount.as_deref(), Some("12"));
        assert_eq!(n.balance.as_deref(), Some("99.99"));
        assert_eq!(n.remaining, "HIGH STREET 1000.00");
    }

    #[test]
    fn test_comma_stripping() {
        assert_eq!(numeric_token("1,234.56").as_deref(), Some("1234.56"));
        assert_eq!(to_decimal("1,234.56"), Decimal::from_str("1234.56").ok());
    }

    #[test]
    fn test_numeric_token_shapes() {
        assert!(numeric_token("-15.00").is_some());
        assert!(numeric_token("7").is_some());
        assert!(numeric_token("7.5").is_some());
        assert!(numeric_token("7.555").is_none());
        assert!(numeric_token("+7").is_none());
        assert!(numeric_token(".50").is_none());
        assert!(numeric_token("R100").is_none());
        assert!(numeric_token(",").is_none());
    }

    #[test]
    fn test_non_ascii_digits_stay_in_description() {
        assert!(numeric_token("١٢").is_none());
        let n = extract_numbers("SHOP ١٢ 5.00");
        assert_eq!(n.amount.as_deref(), Some("5.00"));
        assert_eq!(n.remaining, "SHOP ١٢");
    }

    #[test]
    fn test_to_decimal_needs_room_for_cents() {
        assert_eq!(to_decimal(&"9".repeat(28)), None);
        assert_eq!(to_decimal(&"9".repeat(27)), None);
        let fits = to_decimal(&"9".repeat(26)).unwrap();
        assert_eq!(to_money(fits).scale(), 2);
    }

    #[test]
    fn test_to_decimal_overflow_is_none() {
        assert_eq!(to_decimal(&"9".repeat(40)), None);
    }
}
