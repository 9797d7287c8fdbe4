//! Narrative cleanup for the text that follows the leading date.
//!
//! Steps, in order: layout timestamps, boilerplate phrases, embedded value
//! dates, whitespace. Phrase and timestamp removal must run before the date
//! pattern and before whitespace is collapsed.

use tally_core::StatementRules;

/// Clean a raw narrative. Steps repeat until the text stops changing, so the
/// result is a fixed point: sanitizing it again is a no-op.
pub fn sanitize(text: &str, rules: &StatementRules) -> String {
    let mut current = sanitize_pass(text, rules);
    loop {
        let next = sanitize_pass(&current, rules);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn sanitize_pass(text: &str, rules: &StatementRules) -> String {
    let mut out = rules.timestamp.replace_all(text, "").into_owned();

    for phrase in &rules.excluded_phrases {
        if out.contains(phrase.as_str()) {
            out = out.replace(phrase.as_str(), "");
        }
    }

    let out = rules.embedded_date.replace_all(&out, "");
    collapse_whitespace(&out)
}

/// Single spaces between words, nothing at either end.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(s: &str) -> String {
        sanitize(s, &StatementRules::default())
    }

    #[test]
    fn test_removes_timestamps() {
        assert_eq!(clean("17H11:01 GROCERY STORE"), "GROCERY STORE");
        assert_eq!(clean("ATM 08H05:59 WITHDRAWAL"), "ATM WITHDRAWAL");
    }

    #[test]
    fn test_removes_excluded_phrases() {
        assert_eq!(
            clean("CHEQUE CARD PURCHASE GROCERY STORE 245.67"),
            "GROCERY STORE 245.67"
        );
        assert_eq!(clean("IB PAYMENT TO LANDLORD"), "LANDLORD");
        assert_eq!(clean("MONTHLY MANAGEMENT FEE"), "");
    }

    #[test]
    fn test_phrase_match_is_case_sensitive() {
        assert_eq!(clean("cheque card purchase SHOP"), "cheque card purchase SHOP");
    }

    #[test]
    fn test_removes_embedded_dates() {
        assert_eq!(clean("TRANSFER 30 JAN SAVINGS"), "TRANSFER SAVINGS");
        // lowercase month is not a value date
        assert_eq!(clean("TRANSFER 30 jan"), "TRANSFER 30 jan");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean("  COFFEE   SHOP\t\tCENTRAL  "), "COFFEE SHOP CENTRAL");
    }

    #[test]
    fn test_keeps_figures() {
        assert_eq!(clean("FEE 50.00"), "FEE 50.00");
        assert_eq!(clean("SHOP 1,234.56 9,999.00"), "SHOP 1,234.56 9,999.00");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "17H11:01 CHEQUE CARD PURCHASE GROCERY STORE 245.67 1,500.00",
            "MAGTAPE CREDIT SALARY 12  JAN 3000.00",
            "PENSION12 FEB OUTSTANDING CARD AUTHORISATION",
            "OPENING BALANCE",
            "",
        ];
        for input in inputs {
            let once = clean(input);
            assert_eq!(clean(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_whitespace_exposed_date_is_removed() {
        // "12  JAN" only becomes a date once whitespace is collapsed
        assert_eq!(clean("SALARY 12  JAN"), "SALARY");
    }
}
