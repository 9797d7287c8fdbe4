//! Append-only audit trail of processed batches.
//!
//! Entry layout (one per batch):
//!   ### Log Date: 2024-02-01 09:30:00
//!   - **Date:** 30 JAN **Description:** GROCERY STORE **Amount:** 245.67 **Balance:** 1500.00
//!   <blank line>

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tally_core::TransactionBatch;
use tracing::debug;

/// Receives every assembled batch before it is returned to the caller.
/// `&mut self` keeps appends to one writer at a time.
pub trait AuditLog {
    fn append(&mut self, batch: &TransactionBatch) -> Result<()>;
}

/// Markdown log file, appended to and never read back
#[derive(Debug, Clone)]
pub struct MarkdownAuditLog {
    path: PathBuf,
}

impl MarkdownAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditLog for MarkdownAuditLog {
    fn append(&mut self, batch: &TransactionBatch) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }

        // render first so the entry lands in a single write
        let mut entry = Vec::new();
        write_entry(&mut entry, batch, Utc::now())?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        file.write_all(&entry)
            .with_context(|| format!("append {}", self.path.display()))?;

        debug!(path = %self.path.display(), transactions = batch.len(), "audit entry written");
        Ok(())
    }
}

/// Write one audit entry stamped with `at` (UTC).
pub fn write_entry<W: Write>(w: &mut W, batch: &TransactionBatch, at: DateTime<Utc>) -> std::io::Result<()> {
    writeln!(w, "### Log Date: {}", at.format("%Y-%m-%d %H:%M:%S"))?;
    for txn in batch {
        writeln!(
            w,
            "- **Date:** {} **Description:** {} **Amount:** {} **Balance:** {}",
            txn.date, txn.description, txn.amount, txn.balance
        )?;
    }
    writeln!(w)
}

/// Keeps appended batches in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLog {
    pub batches: Vec<TransactionBatch>,
}

impl AuditLog for MemoryAuditLog {
    fn append(&mut self, batch: &TransactionBatch) -> Result<()> {
        self.batches.push(batch.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tally_core::Transaction;

    fn batch() -> TransactionBatch {
        TransactionBatch {
            transactions: vec![
                Transaction::new(
                    "30 JAN",
                    "GROCERY STORE",
                    Decimal::from_str("245.67").unwrap(),
                    Decimal::from(1500),
                ),
                Transaction::new("05 JAN", "FEE", Decimal::from(50), Decimal::ZERO),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_entry_format() {
        let at = Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap();
        let mut out = Vec::new();
        write_entry(&mut out, &batch(), at).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "### Log Date: 2024-02-01 09:30:00\n\
             - **Date:** 30 JAN **Description:** GROCERY STORE **Amount:** 245.67 **Balance:** 1500.00\n\
             - **Date:** 05 JAN **Description:** FEE **Amount:** 50.00 **Balance:** 0.00\n\
             \n"
        );
    }

    #[test]
    fn test_empty_batch_entry() {
        let at = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let mut out = Vec::new();
        write_entry(&mut out, &TransactionBatch::default(), at).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "### Log Date: 2024-02-01 00:00:00\n\n");
    }

    #[test]
    fn test_file_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("transaction_log.md");
        let mut log = MarkdownAuditLog::new(&path);

        log.append(&batch()).unwrap();
        log.append(&batch()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("### Log Date: ").count(), 2);
        assert_eq!(text.matches("**Description:** GROCERY STORE").count(), 2);
        assert!(text.ends_with("**Balance:** 0.00\n\n"));
    }
}
