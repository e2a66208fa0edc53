#![warn(clippy::all, rust_2018_idioms)]

//! Reads tabular files (delimited text or spreadsheets) into a [`Table`] of
//! named numeric columns.
//!
//! A configurable number of leading rows is skipped before the header row.
//! Cells which cannot be read as numbers are stored as `NaN`, so every column
//! of a table has the same length.

mod delimited;
mod spreadsheet;

use std::{collections::HashMap, path::Path};

use app_core::string_error::ErrorStringExt;

/// A single named column.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableFormat {
    Delimited,
    Spreadsheet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "tsv" | "txt" | "dat" => Ok(Self::Delimited),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(Self::Spreadsheet),
            "" => Err(format!("cannot determine file type of {path:?}")),
            other => Err(format!("unsupported file type '.{other}' of {path:?}")),
        }
    }
}

/// Read the file at `path`, skipping `skip_rows` rows before the header.
pub fn read_path(path: &Path, skip_rows: usize) -> Result<Table, String> {
    let table = match TableFormat::from_path(path)? {
        TableFormat::Delimited => {
            let raw = std::fs::read(path).err_to_string("could not read file")?;
            delimited::read_delimited(&String::from_utf8_lossy(&raw), skip_rows)
        }
        TableFormat::Spreadsheet => spreadsheet::read_spreadsheet(path, skip_rows),
    };
    match &table {
        Ok(table) => log::debug!(
            "read {} columns with {} rows from {:?}",
            table.num_columns(),
            table.num_rows(),
            path
        ),
        Err(err) => log::warn!("failed to read {:?}: {}", path, err),
    }
    table
}

/// Read delimited text that is already in memory.
pub fn read_delimited_str(raw: &str, skip_rows: usize) -> Result<Table, String> {
    delimited::read_delimited(raw, skip_rows)
}

impl Table {
    /// Build a table from a header row and numeric data rows. Short rows are
    /// padded with `NaN`; longer rows must have been rejected by the caller.
    pub(crate) fn from_rows(header: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        let names = unique_column_names(header);
        let mut columns: Vec<Column> = names
            .into_iter()
            .map(|name| Column {
                name,
                values: Vec::with_capacity(rows.len()),
            })
            .collect();
        for row in rows.iter() {
            for (i, col) in columns.iter_mut().enumerate() {
                col.values.push(row.get(i).copied().unwrap_or(f64::NAN));
            }
        }
        Self { columns }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|col| col.values.len()).unwrap_or(0)
    }

    /// Pair up two columns as `[x, y]` points.
    pub fn xy(&self, x: &str, y: &str) -> Option<Vec<[f64; 2]>> {
        let xs = self.column(x)?;
        let ys = self.column(y)?;
        Some(
            xs.values
                .iter()
                .zip(ys.values.iter())
                .map(|(x, y)| [*x, *y])
                .collect(),
        )
    }
}

/// Empty header cells become `Unnamed: i`, repeated names get a `.n` suffix.
fn unique_column_names(header: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(header.len());
    for (i, name) in header.into_iter().enumerate() {
        let name = if name.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            name.trim().to_owned()
        };
        let mut candidate = name.clone();
        while let Some(count) = seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{name}.{count}");
        }
        seen.insert(candidate.clone(), 0);
        names.push(candidate);
    }
    names
}

/// Parse a single cell, `NaN` if it is not a number.
pub(crate) fn parse_cell(cell: &str) -> f64 {
    cell.trim().parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            TableFormat::from_path(Path::new("a.CSV")),
            Ok(TableFormat::Delimited)
        );
        assert_eq!(
            TableFormat::from_path(Path::new("dir/b.xlsx")),
            Ok(TableFormat::Spreadsheet)
        );
        assert!(TableFormat::from_path(Path::new("c.png")).is_err());
        assert!(TableFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_unique_column_names() {
        let names = unique_column_names(vec![
            "t".into(),
            "".into(),
            "t".into(),
            " v ".into(),
            "t".into(),
        ]);
        assert_eq!(names, vec!["t", "Unnamed: 1", "t.1", "v", "t.2"]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = Table::from_rows(vec!["a".into(), "b".into()], vec![vec![1.0], vec![2.0, 3.0]]);
        let b = table.column("b").unwrap();
        assert!(b.values[0].is_nan());
        assert_eq!(b.values[1], 3.0);
        assert_eq!(table.num_rows(), 2);
    }

    #[test]
    fn test_xy_pairs_columns() {
        let table = read_delimited_str("t,v\n0,1\n1,4\n", 0).unwrap();
        assert_eq!(table.xy("t", "v"), Some(vec![[0.0, 1.0], [1.0, 4.0]]));
        assert_eq!(table.xy("t", "missing"), None);
    }

    #[test]
    fn test_read_path_csv_with_skipped_rows() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "instrument: foo").unwrap();
        writeln!(file, "date: today").unwrap();
        writeln!(file, "t,v").unwrap();
        writeln!(file, "0,1.5").unwrap();
        writeln!(file, "1,2.5").unwrap();
        drop(file);

        let table = read_path(&path, 2).unwrap();
        assert_eq!(table.column_names(), vec!["t", "v"]);
        assert_eq!(table.column("v").unwrap().values, vec![1.5, 2.5]);
    }

    #[test]
    fn test_read_path_missing_file() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let err = read_path(&dir.path().join("gone.csv"), 0).unwrap_err();
        assert!(err.starts_with("could not read file"));
    }

    #[test]
    fn test_read_path_broken_spreadsheet() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"this is not a workbook").unwrap();
        assert!(read_path(&path, 0).is_err());
    }
}
