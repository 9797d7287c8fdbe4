//! tally-ingest: turns extracted statement tables into ordered transaction batches.

pub mod assemble;
pub mod audit;
pub mod parsers;
pub mod sources;
pub mod types;

pub use assemble::BatchAssembler;
pub use audit::{AuditLog, MarkdownAuditLog, MemoryAuditLog};
pub use parsers::{extract_numbers, parse_row, sanitize, ExtractedNumbers, ParsedRow, RowDiscard};
pub use sources::{load_tables, read_csv_table, read_json_tables};
pub use types::{RawRow, Table};
