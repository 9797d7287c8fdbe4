//! Row interpretation stages: split -> sanitize -> extract figures.

pub mod numbers;
pub mod row;
pub mod sanitize;

pub use numbers::{extract_numbers, to_decimal, ExtractedNumbers};
pub use row::{parse_row, ParsedRow, RowDiscard};
pub use sanitize::sanitize;
