//! Statement dates: "DD MON" strings resolved against a year context.
//!
//! Rows only carry day and month, so the year has to come from the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Month number for an English three-letter abbreviation (any case).
pub fn month_from_abbrev(s: &str) -> Option<u32> {
    let month = match s.to_ascii_uppercase().as_str() {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        _ => return None,
    };
    Some(month)
}

/// Split "30 JAN" into (day, month) without validating the day against the month.
pub fn parse_day_month_parts(s: &str) -> Option<(u32, u32)> {
    let parts: Vec<_> = s.split_whitespace().collect();
    if parts.len() != 2 {
        return None;
    }
    let day_str = parts[0];
    if day_str.len() > 2 || !day_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let day: u32 = day_str.parse().ok()?;
    let month = month_from_abbrev(parts[1])?;
    Some((day, month))
}

/// Parse "30 JAN" in the given year.
pub fn parse_day_month(s: &str, year: i32) -> Option<NaiveDate> {
    let (day, month) = parse_day_month_parts(s)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Year assumed for the "DD MON" dates of one batch.
///
/// With a closing month set, months after it are attributed to the previous
/// year, so a statement closing in January keeps its December rows in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearContext {
    pub year: i32,
    pub closing_month: Option<u32>,
}

impl YearContext {
    /// Every row belongs to `year`.
    pub fn single(year: i32) -> Self {
        Self {
            year,
            closing_month: None,
        }
    }

    /// Statement closes in `closing_month` of `year`. Returns None for a month outside 1..=12.
    pub fn closing(year: i32, closing_month: u32) -> Option<Self> {
        if !(1..=12).contains(&closing_month) {
            return None;
        }
        Some(Self {
            year,
            closing_month: Some(closing_month),
        })
    }

    pub fn year_for_month(&self, month: u32) -> i32 {
        match self.closing_month {
            Some(closing) if month > closing => self.year - 1,
            _ => self.year,
        }
    }

    /// Resolve a "DD MON" string to a calendar date.
    pub fn resolve(&self, s: &str) -> Option<NaiveDate> {
        let (day, month) = parse_day_month_parts(s)?;
        NaiveDate::from_ymd_opt(self.year_for_month(month), month, day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day_month() {
        assert_eq!(
            parse_day_month("30 JAN", 2024),
            NaiveDate::from_ymd_opt(2024, 1, 30)
        );
        assert_eq!(
            parse_day_month("1 dec", 2023),
            NaiveDate::from_ymd_opt(2023, 12, 1)
        );
    }

    #[test]
    fn test_rejects_bad_dates() {
        assert_eq!(parse_day_month("31 FEB", 2024), None);
        assert_eq!(parse_day_month("29 FEB", 2023), None);
        assert_eq!(parse_day_month("30 JANUARY", 2024), None);
        assert_eq!(parse_day_month("XX JAN", 2024), None);
        assert_eq!(parse_day_month("30", 2024), None);
    }

    #[test]
    fn test_single_year_context() {
        let ctx = YearContext::single(2024);
        assert_eq!(ctx.resolve("15 DEC"), NaiveDate::from_ymd_opt(2024, 12, 15));
        assert_eq!(ctx.resolve("02 JAN"), NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn test_closing_month_rolls_back_later_months() {
        let ctx = YearContext::closing(2024, 1).unwrap();
        assert_eq!(ctx.resolve("15 DEC"), NaiveDate::from_ymd_opt(2023, 12, 15));
        assert_eq!(ctx.resolve("02 JAN"), NaiveDate::from_ymd_opt(2024, 1, 2));
        assert!(ctx.resolve("02 JAN") > ctx.resolve("15 DEC"));
    }

    #[test]
    fn test_closing_month_out_of_range() {
        assert!(YearContext::closing(2024, 0).is_none());
        assert!(YearContext::closing(2024, 13).is_none());
    }
}
