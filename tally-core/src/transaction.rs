//! Transaction records recovered from statement rows

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::diagnostics::BatchDiagnostics;

/// Fraction digits carried by amounts and balances.
pub const MONEY_SCALE: u32 = 2;

/// One interpreted statement row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Leading "DD MON" of the row, e.g. "30 JAN"
    pub date: String,
    /// Narrative with timestamps, boilerplate and consumed figures removed
    pub description: String,
    /// First figure on the row; 0.00 when absent or unreadable
    pub amount: Decimal,
    /// Second figure on the row (running balance); 0.00 when absent or unreadable
    pub balance: Decimal,
}

impl Transaction {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: Decimal,
        balance: Decimal,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount: to_money(amount),
            balance: to_money(balance),
        }
    }
}

/// Round to two fraction digits and pin the scale, so 50 renders as "50.00".
pub fn to_money(value: Decimal) -> Decimal {
    let mut money = value.round_dp(MONEY_SCALE);
    money.rescale(MONEY_SCALE);
    money
}

/// Transactions from one uploaded document, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBatch {
    pub transactions: Vec<Transaction>,
    pub diagnostics: BatchDiagnostics,
}

impl TransactionBatch {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }
}

impl<'a> IntoIterator for &'a TransactionBatch {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}
