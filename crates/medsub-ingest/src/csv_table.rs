use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::ReaderBuilder;

use medsub_common::normalize_text;
use medsub_model::MedsubError;

/// Cell values treated as missing.
const MISSING_MARKERS: &[&str] = &["na", "n/a", "-", "nan", "none"];

/// A CSV file read fully into memory with the first row as headers.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    keys: Vec<String>,
}

/// Header lookup key: case, accents and separators do not matter, so
/// `"Clase Química"`, `"clase_quimica"` and `"CLASE-QUIMICA"` all agree.
pub fn header_key(raw: &str) -> String {
    normalize_text(raw).replace(' ', "_")
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn is_missing(value: &str) -> bool {
    value.is_empty() || MISSING_MARKERS.contains(&value.to_lowercase().as_str())
}

impl CsvTable {
    /// Position of a column, matched on [`header_key`].
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let key = header_key(name);
        self.keys.iter().position(|candidate| *candidate == key)
    }

    /// First column found among `names`.
    pub fn column_index_any(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| self.column_index(name))
    }

    /// Position of a required column.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| self.missing_column(name))
    }

    /// Position of a required column that may appear under several names.
    pub fn require_column_any(&self, names: &[&str]) -> Result<usize> {
        self.column_index_any(names)
            .ok_or_else(|| self.missing_column(names.first().copied().unwrap_or_default()))
    }

    fn missing_column(&self, column: &str) -> anyhow::Error {
        MedsubError::MissingColumn {
            file: self.path.display().to_string(),
            column: column.to_string(),
        }
        .into()
    }

    /// Cell text, or `None` when the cell is blank or a missing marker.
    pub fn value<'a>(&self, row: &'a [String], idx: usize) -> Option<&'a str> {
        row.get(idx)
            .map(String::as_str)
            .filter(|value| !is_missing(value))
    }

    /// Owned variant of [`Self::value`] for optional columns.
    pub fn optional(&self, row: &[String], idx: Option<usize>) -> Option<String> {
        idx.and_then(|idx| self.value(row, idx)).map(str::to_string)
    }
}

/// Reads a CSV file whose first non-blank row is the header.
///
/// Cells are trimmed and stripped of byte-order marks. Short rows are padded
/// with empty cells so every row has one value per header.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }
    let mut raw_rows = raw_rows.into_iter();
    let Some(header_row) = raw_rows.next() else {
        return Ok(CsvTable {
            path: path.to_path_buf(),
            headers: Vec::new(),
            rows: Vec::new(),
            keys: Vec::new(),
        });
    };
    let headers: Vec<String> = header_row.iter().map(|value| normalize_header(value)).collect();
    let keys = headers.iter().map(|header| header_key(header)).collect();
    let rows = raw_rows
        .map(|mut row| {
            row.resize(headers.len(), String::new());
            row
        })
        .collect();
    Ok(CsvTable {
        path: path.to_path_buf(),
        headers,
        rows,
        keys,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_keys_ignore_case_accents_and_separators() {
        assert_eq!(header_key("Clase Química"), "clase_quimica");
        assert_eq!(header_key("clase_quimica"), "clase_quimica");
        assert_eq!(header_key("\u{feff}CLASE-QUIMICA"), "clase_quimica");
    }

    #[test]
    fn missing_markers() {
        assert!(is_missing(""));
        assert!(is_missing("N/A"));
        assert!(is_missing("-"));
        assert!(!is_missing("0"));
    }
}
