//! tally-core: domain types shared by the statement ingestion pipeline and the CLI

pub mod date;
pub mod diagnostics;
pub mod rules;
pub mod transaction;

pub use date::{parse_day_month, YearContext};
pub use diagnostics::BatchDiagnostics;
pub use rules::{RulesConfig, RulesError, StatementRules};
pub use transaction::{to_money, Transaction, TransactionBatch};
