//! Batch assembly: every row of every table -> one ordered, audited batch.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::{BatchDiagnostics, StatementRules, Transaction, TransactionBatch, YearContext};
use tracing::{debug, info, warn};

use crate::audit::AuditLog;
use crate::parsers::{parse_row, RowDiscard};
use crate::types::Table;

/// Runs the row parser over extracted tables and orders the survivors
#[derive(Debug, Clone)]
pub struct BatchAssembler {
    rules: StatementRules,
    years: YearContext,
}

impl BatchAssembler {
    pub fn new(years: YearContext) -> Self {
        Self::with_rules(StatementRules::default(), years)
    }

    pub fn with_rules(rules: StatementRules, years: YearContext) -> Self {
        Self { rules, years }
    }

    /// Parse, filter and sort without touching the audit log.
    ///
    /// Most recent first; rows sharing a date keep their input order.
    pub fn collect(&self, tables: &[Table]) -> TransactionBatch {
        let mut diagnostics = BatchDiagnostics::default();
        let mut dated: Vec<(NaiveDate, Transaction)> = Vec::new();

        for (table_idx, table) in tables.iter().enumerate() {
            for (row_idx, row) in table.iter().enumerate() {
                diagnostics.rows_seen += 1;

                let parsed = match parse_row(row, &self.rules) {
                    Ok(parsed) => parsed,
                    Err(RowDiscard::OpeningBalance) => {
                        debug!(table = table_idx, row = row_idx, "skipping opening balance header");
                        diagnostics.opening_balance_rows += 1;
                        continue;
                    }
                    Err(reason) => {
                        warn!(table = table_idx, row = row_idx, %reason, "discarding malformed row");
                        diagnostics.malformed_rows += 1;
                        continue;
                    }
                };

                let Some(date) = self.years.resolve(&parsed.transaction.date) else {
                    warn!(
                        table = table_idx,
                        row = row_idx,
                        date = %parsed.transaction.date,
                        "discarding row with unrecognised date"
                    );
                    diagnostics.undated_rows += 1;
                    continue;
                };

                diagnostics.numeric_fallbacks += parsed.numeric_fallbacks;
                if parsed.description_fallback {
                    diagnostics.description_fallbacks += 1;
                }
                dated.push((date, parsed.transaction));
            }
        }

        // Vec::sort_by is stable
        dated.sort_by(|a, b| b.0.cmp(&a.0));

        let batch = TransactionBatch {
            transactions: dated.into_iter().map(|(_, txn)| txn).collect(),
            diagnostics,
        };
        info!(
            tables = tables.len(),
            transactions = batch.len(),
            %diagnostics,
            "assembled batch"
        );
        batch
    }

    /// Collect the batch, hand it to the audit log, then return it.
    /// An audit failure is the only error.
    pub fn assemble(&self, tables: &[Table], audit: &mut dyn AuditLog) -> Result<TransactionBatch> {
        let batch = self.collect(tables);
        audit.append(&batch).context("appending batch to audit log")?;
        Ok(batch)
    }
}
