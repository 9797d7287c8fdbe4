//! Table sources: extracted statement tables saved as CSV or JSON.
//!
//! CSV: one table per file, first record is the header.
//! JSON: an array of tables, each an array of {column: text} objects;
//! null cells are treated as missing.

use anyhow::{bail, Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::types::{RawRow, Table};

/// Load every table from the given files, in argument order.
pub fn load_tables(paths: &[PathBuf]) -> Result<Vec<Table>> {
    let mut tables = Vec::new();
    for path in paths {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => tables.push(read_csv_table(path)?),
            Some("json") => tables.extend(read_json_tables(path)?),
            _ => bail!(
                "unsupported table file {} (expected .csv or .json)",
                path.display()
            ),
        }
    }
    Ok(tables)
}

pub fn read_csv_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let table = csv_table_from_reader(file).with_context(|| format!("parsing {}", path.display()))?;
    debug!(path = %path.display(), rows = table.len(), "read csv table");
    Ok(table)
}

pub fn csv_table_from_reader<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(h, _)| !h.is_empty())
            .map(|(h, v)| (h.as_str(), v))
            .collect();
        rows.push(row);
    }

    Ok(tidy(rows))
}

pub fn read_json_tables(path: impl AsRef<Path>) -> Result<Vec<Table>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let tables = json_tables_from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    debug!(path = %path.display(), tables = tables.len(), "read json tables");
    Ok(tables)
}

pub fn json_tables_from_str(text: &str) -> Result<Vec<Table>> {
    let raw: Vec<Vec<BTreeMap<String, Option<String>>>> = serde_json::from_str(text)?;
    Ok(raw
        .into_iter()
        .map(|table| {
            let rows = table
                .into_iter()
                .map(|cells| {
                    cells
                        .into_iter()
                        .filter_map(|(column, text)| text.map(|t| (column, t)))
                        .collect()
                })
                .collect();
            tidy(rows)
        })
        .collect())
}

/// Drop rows that are blank throughout, then columns that are blank in every remaining row.
fn tidy(rows: Vec<RawRow>) -> Table {
    let mut rows: Table = rows.into_iter().filter(|r| !r.is_blank()).collect();

    let all_columns: BTreeSet<String> = rows
        .iter()
        .flat_map(|r| r.columns().map(str::to_string))
        .collect();
    let blank_columns: Vec<String> = all_columns
        .into_iter()
        .filter(|c| rows.iter().all(|r| r.non_blank(c).is_none()))
        .collect();

    for row in &mut rows {
        for column in &blank_columns {
            row.remove(column);
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_drops_blank_rows_and_columns() {
        let csv = "Date,Description,Unused\n\
                   30 JAN SHOP 1.00 2.00,Corner shop,\n\
                   ,,\n\
                   31 JAN CAFE 3.00 4.00,,\n";
        let table = csv_table_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].get("Date"), Some("30 JAN SHOP 1.00 2.00"));
        assert_eq!(table[0].get("Description"), Some("Corner shop"));
        assert_eq!(table[0].get("Unused"), None);
        assert_eq!(table[1].get("Description"), Some(""));
    }

    #[test]
    fn test_csv_short_records() {
        let csv = "Date,Description\n01 MAR RENT 800.00 200.00\n";
        let table = csv_table_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].get("Description"), None);
    }

    #[test]
    fn test_json_tables() {
        let json = r#"[
            [{"Date": "30 JAN SHOP 1.00 2.00", "Description": null}],
            [{"Date": "01 FEB CAFE 3.00 4.00", "Description": "Cafe"}, {"Date": ""}]
        ]"#;
        let tables = json_tables_from_str(json).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0][0].get("Description"), None);
        assert_eq!(tables[1].len(), 1);
        assert_eq!(tables[1][0].get("Description"), Some("Cafe"));
    }

    #[test]
    fn test_load_tables_rejects_unknown_extension() {
        let err = load_tables(&[PathBuf::from("statement.pdf")]).unwrap_err();
        assert!(err.to_string().contains("unsupported table file"));
    }

    #[test]
    fn test_load_tables_reads_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("page1.csv");
        let json_path = dir.path().join("page2.JSON");
        std::fs::write(&csv_path, "Date\n02 JAN A 1.00 1.00\n").unwrap();
        std::fs::write(&json_path, r#"[[{"Date": "03 JAN B 1.00 1.00"}]]"#).unwrap();

        let tables = load_tables(&[csv_path, json_path]).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0][0].get("Date"), Some("02 JAN A 1.00 1.00"));
        assert_eq!(tables[1][0].get("Date"), Some("03 JAN B 1.00 1.00"));
    }
}
