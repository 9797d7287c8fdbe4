//! Per-batch counters for rows that were dropped or repaired.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDiagnostics {
    /// Rows handed to the row parser
    pub rows_seen: usize,
    /// Header rows carrying the opening balance
    pub opening_balance_rows: usize,
    /// Rows without a Date cell or with too few tokens in it
    pub malformed_rows: usize,
    /// Rows whose "DD MON" could not be placed on the calendar
    pub undated_rows: usize,
    /// Amount/balance tokens that looked numeric but did not parse
    pub numeric_fallbacks: usize,
    /// Rows whose narrative was empty after cleaning
    pub description_fallbacks: usize,
}

impl BatchDiagnostics {
    pub fn discarded(&self) -> usize {
        self.opening_balance_rows + self.malformed_rows + self.undated_rows
    }

    pub fn kept(&self) -> usize {
        self.rows_seen.saturating_sub(self.discarded())
    }

    /// No malformed or undated rows and no numeric repairs.
    /// Opening-balance headers are expected and don't count against this.
    pub fn is_clean(&self) -> bool {
        self.malformed_rows == 0 && self.undated_rows == 0 && self.numeric_fallbacks == 0
    }
}

impl fmt::Display for BatchDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows={} kept={} discarded={} (opening={}, malformed={}, undated={}) numeric_fallbacks={} description_fallbacks={}",
            self.rows_seen,
            self.kept(),
            self.discarded(),
            self.opening_balance_rows,
            self.malformed_rows,
            self.undated_rows,
            self.numeric_fallbacks,
            self.description_fallbacks,
        )
    }
}
