//! Interpretation rules for composite statement cells.
//!
//! The defaults describe the statement layout the parser was built against.
//! Every entry can be overridden from configuration to support layout variants.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date-cell marker of the header row that carries the brought-forward balance.
pub const OPENING_BALANCE_MARKER: &str = "STATEMENT OPENING BALANCE";

/// Administrative boilerplate removed from narratives (exact, case-sensitive).
pub const EXCLUDED_PHRASES: &[&str] = &[
    "CHEQUE CARD PURCHASE",
    "OUTSTANDING CARD AUTHORISATION",
    "IB TRANSFER FROM",
    "IB PAYMENT TO",
    "PENSION",
    "MONTHLY MANAGEMENT FEE",
    "MAGTAPE CREDIT",
];

/// Layout timestamps such as "17H11:01".
pub const TIMESTAMP_PATTERN: &str = r"\b\d{2}H\d{2}:\d{2}\b";

/// Value dates embedded in the narrative, such as "30 JAN".
pub const EMBEDDED_DATE_PATTERN: &str = r"\b\d{2} [A-Z]{3}\b";

pub const DESCRIPTION_PLACEHOLDER: &str = "N/A";
pub const DATE_COLUMN: &str = "Date";
pub const DESCRIPTION_COLUMN: &str = "Description";

/// Serializable form of the rules, as read from config.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub opening_balance_marker: String,
    pub excluded_phrases: Vec<String>,
    pub timestamp_pattern: String,
    pub embedded_date_pattern: String,
    pub description_placeholder: String,
    pub date_column: String,
    pub description_column: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            opening_balance_marker: OPENING_BALANCE_MARKER.to_string(),
            excluded_phrases: EXCLUDED_PHRASES.iter().map(|p| p.to_string()).collect(),
            timestamp_pattern: TIMESTAMP_PATTERN.to_string(),
            embedded_date_pattern: EMBEDDED_DATE_PATTERN.to_string(),
            description_placeholder: DESCRIPTION_PLACEHOLDER.to_string(),
            date_column: DATE_COLUMN.to_string(),
            description_column: DESCRIPTION_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("invalid {field} pattern: {source}")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("{field} must not be empty")]
    EmptyValue { field: &'static str },
}

/// Compiled rules used by the row pipeline
#[derive(Debug, Clone)]
pub struct StatementRules {
    pub opening_balance_marker: String,
    pub excluded_phrases: Vec<String>,
    pub timestamp: Regex,
    pub embedded_date: Regex,
    pub description_placeholder: String,
    pub date_column: String,
    pub description_column: String,
}

impl StatementRules {
    pub fn compile(config: &RulesConfig) -> Result<Self, RulesError> {
        non_empty("opening_balance_marker", &config.opening_balance_marker)?;
        non_empty("date_column", &config.date_column)?;
        if config.excluded_phrases.iter().any(|p| p.is_empty()) {
            return Err(RulesError::EmptyValue {
                field: "excluded_phrases entry",
            });
        }

        Ok(Self {
            opening_balance_marker: config.opening_balance_marker.clone(),
            excluded_phrases: config.excluded_phrases.clone(),
            timestamp: compile_pattern("timestamp", &config.timestamp_pattern)?,
            embedded_date: compile_pattern("embedded_date", &config.embedded_date_pattern)?,
            description_placeholder: config.description_placeholder.clone(),
            date_column: config.date_column.clone(),
            description_column: config.description_column.clone(),
        })
    }

    /// True for the statement header row that opens with the carried balance.
    pub fn is_opening_balance(&self, date_cell: &str) -> bool {
        date_cell.contains(&self.opening_balance_marker)
    }
}

impl Default for StatementRules {
    fn default() -> Self {
        Self::compile(&RulesConfig::default()).expect("built-in statement rules compile")
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<(), RulesError> {
    if value.trim().is_empty() {
        return Err(RulesError::EmptyValue { field });
    }
    Ok(())
}

fn compile_pattern(field: &'static str, pattern: &str) -> Result<Regex, RulesError> {
    non_empty(field, pattern)?;
    Regex::new(pattern).map_err(|source| RulesError::InvalidPattern { field, source })
}
