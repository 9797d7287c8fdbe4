//! Row parser for composite date cells.
//!
//! Expected Date cell shape (no reliable delimiter between the parts):
//!   30 JAN17H11:01 CHEQUE CARD PURCHASE GROCERY STORE 245.67 1,500.00
//!   ^^ ^^^ date    ^ narrative .................... ^ amount ^ balance

use rust_decimal::Decimal;
use tally_core::{StatementRules, Transaction};
use thiserror::Error;
use tracing::{debug, warn};

use crate::parsers::numbers::{extract_numbers, to_decimal};
use crate::parsers::sanitize::sanitize;
use crate::types::RawRow;

/// Why a row contributes nothing to the batch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowDiscard {
    #[error("statement opening balance header")]
    OpeningBalance,

    #[error("row has no '{column}' column")]
    MissingDateColumn { column: String },

    #[error("date cell has {found} token(s), expected at least 3")]
    InsufficientTokens { found: usize },
}

/// A transaction plus the repairs made while reading it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub transaction: Transaction,
    /// Figures that looked numeric but failed to parse (0, 1 or 2)
    pub numeric_fallbacks: usize,
    /// Narrative was empty after cleaning; column description or placeholder used
    pub description_fallback: bool,
}

pub fn parse_row(row: &RawRow, rules: &StatementRules) -> Result<ParsedRow, RowDiscard> {
    let cell = row
        .get(&rules.date_column)
        .ok_or_else(|| RowDiscard::MissingDateColumn {
            column: rules.date_column.clone(),
        })?;

    if rules.is_opening_balance(cell) {
        return Err(RowDiscard::OpeningBalance);
    }

    let (date, rest) = split_date_cell(cell, rules)?;
    let narrative = sanitize(&rest, rules);
    let numbers = extract_numbers(&narrative);
    debug!(
        %date,
        raw_amount = ?numbers.amount,
        raw_balance = ?numbers.balance,
        "extracted figures"
    );

    let mut numeric_fallbacks = 0;
    let amount = read_figure(numbers.amount.as_deref(), "amount", &date, &mut numeric_fallbacks);
    let balance = read_figure(numbers.balance.as_deref(), "balance", &date, &mut numeric_fallbacks);

    let description_fallback = numbers.remaining.is_empty();
    let description = if description_fallback {
        row.non_blank(&rules.description_column)
            .unwrap_or(rules.description_placeholder.as_str())
            .to_string()
    } else {
        numbers.remaining
    };

    let transaction = Transaction::new(date, description, amount, balance);
    debug!(
        date = %transaction.date,
        amount = %transaction.amount,
        balance = %transaction.balance,
        "parsed row"
    );

    Ok(ParsedRow {
        transaction,
        numeric_fallbacks,
        description_fallback,
    })
}

/// Split a date cell into its "DD MON" prefix and the remaining text.
fn split_date_cell(cell: &str, rules: &StatementRules) -> Result<(String, String), RowDiscard> {
    let parts: Vec<&str> = cell.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(RowDiscard::InsufficientTokens { found: parts.len() });
    }

    let (month, glued) = split_month(parts[1], rules);
    let mut rest = Vec::with_capacity(parts.len() - 1);
    if !glued.is_empty() {
        rest.push(glued);
    }
    rest.extend_from_slice(&parts[2..]);

    Ok((format!("{} {}", parts[0], month), rest.join(" ")))
}

/// "JAN17H11:01" -> ("JAN", "17H11:01"). Only a tail starting with a layout
/// timestamp is split off; "JAN2024" or "JANUARY" stay whole and fail date resolution.
fn split_month<'a>(token: &'a str, rules: &StatementRules) -> (&'a str, &'a str) {
    match token.get(..3) {
        Some(head)
            if token.len() > 3
                && head.chars().all(|c| c.is_ascii_alphabetic())
                && rules.timestamp.find(&token[3..]).is_some_and(|m| m.start() == 0) =>
        {
            (head, &token[3..])
        }
        _ => (token, ""),
    }
}

fn read_figure(raw: Option<&str>, field: &str, date: &str, fallbacks: &mut usize) -> Decimal {
    let Some(raw) = raw else {
        return Decimal::ZERO;
    };
    match to_decimal(raw) {
        Some(value) => value,
        None => {
            warn!(%date, field, raw, "unreadable figure, using 0.00");
            *fallbacks += 1;
            Decimal::ZERO
        }
    }
}
