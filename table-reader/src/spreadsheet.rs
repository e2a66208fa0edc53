use std::path::Path;

use app_core::string_error::ErrorStringExt;
use calamine::{open_workbook_auto, Data, Reader};

use crate::{parse_cell, Table};

/// Read the first worksheet of a workbook.
pub(crate) fn read_spreadsheet(path: &Path, skip_rows: usize) -> Result<Table, String> {
    let mut workbook = open_workbook_auto(path).err_to_string("unable to open spreadsheet")?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| "spreadsheet contains no worksheet".to_string())?
        .err_to_string("unable to read first worksheet")?;

    // The range starts at the first non-empty cell, while rows to skip are
    // counted from the top of the sheet.
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut rows = range.rows().skip(skip_rows.saturating_sub(first_row));

    let header: Vec<String> = match rows.next() {
        Some(cells) => cells.iter().map(header_cell).collect(),
        None => return Err(format!("no header row found after skipping {skip_rows} rows")),
    };
    let data = rows
        .map(|cells| cells.iter().map(numeric_cell).collect())
        .collect();

    Ok(Table::from_rows(header, data))
}

fn header_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn numeric_cell(cell: &Data) -> f64 {
    match cell {
        Data::Int(i) => *i as f64,
        Data::Float(f) => *f,
        Data::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Data::String(s) => parse_cell(s),
        _ => f64::NAN,
    }
}
