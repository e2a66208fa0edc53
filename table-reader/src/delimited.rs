use std::collections::HashMap;

use app_core::string_error::ErrorStringExt;

use crate::{parse_cell, Table};

const CANDIDATES: [char; 4] = [',', ';', '\t', '|'];
const SNIFF_LINES: usize = 20;

// Counts how often a potential delimiter occurs per line.
#[derive(Debug)]
struct DelimiterCounter {
    char: char,
    // How many lines contain the delimiter a certain number of times.
    row_counter: HashMap<usize, usize>,
}

impl DelimiterCounter {
    fn new(char: char) -> Self {
        Self {
            char,
            row_counter: HashMap::new(),
        }
    }

    fn count_line(&mut self, line: &str) {
        let n = line.chars().filter(|c| *c == self.char).count();
        *self.row_counter.entry(n).or_default() += 1;
    }

    // (number of lines sharing the most common non-zero count, that count)
    fn score(&self) -> (usize, usize) {
        self.row_counter
            .iter()
            .filter(|(count, _)| **count > 0)
            .map(|(count, lines)| (*lines, *count))
            .max()
            .unwrap_or((0, 0))
    }
}

/// Guess the delimiter from the first lines of the (already skipped) input.
pub(crate) fn sniff_delimiter(raw: &str) -> char {
    let mut counters: Vec<_> = CANDIDATES.iter().map(|c| DelimiterCounter::new(*c)).collect();
    for line in raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SNIFF_LINES)
    {
        for counter in counters.iter_mut() {
            counter.count_line(line);
        }
    }
    let best = counters
        .iter()
        .map(|counter| (counter.score(), counter.char))
        .filter(|((lines, _), _)| *lines > 0)
        // Ties go to the candidate listed first.
        .reduce(|best, next| if next.0 > best.0 { next } else { best });
    match best {
        Some((_, delimiter)) => delimiter,
        None => ',',
    }
}

pub(crate) fn read_delimited(raw: &str, skip_rows: usize) -> Result<Table, String> {
    // Skipping happens on raw lines, before any CSV parsing.
    let body: String = raw
        .lines()
        .skip(skip_rows)
        .fold(String::new(), |mut acc, line| {
            acc.push_str(line);
            acc.push('\n');
            acc
        });
    if body.trim().is_empty() {
        return Err(format!("no header row found after skipping {skip_rows} rows"));
    }

    let delimiter = sniff_delimiter(&body);
    log::debug!("using delimiter {:?}", delimiter);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut records = reader.records();
    let header: Vec<String> = match records.next() {
        Some(record) => record
            .err_to_string("unable to read header row")?
            .iter()
            .map(|cell| cell.to_owned())
            .collect(),
        None => return Err(format!("no header row found after skipping {skip_rows} rows")),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.err_to_string("unable to read row")?;
        if record.len() > header.len() {
            let line = record
                .position()
                .map(|pos| pos.line() as usize + skip_rows)
                .unwrap_or_default();
            return Err(format!(
                "expected {} fields in line {}, saw {}",
                header.len(),
                line,
                record.len()
            ));
        }
        rows.push(record.iter().map(parse_cell).collect());
    }

    Ok(Table::from_rows(header, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_comma() {
        assert_eq!(sniff_delimiter("t,v\n1,2\n3,4\n"), ',');
    }

    #[test]
    fn test_sniff_semicolon() {
        assert_eq!(sniff_delimiter("t;v;w\n1;2;3\n3;4;5\n"), ';');
    }

    #[test]
    fn test_sniff_tab() {
        assert_eq!(sniff_delimiter("t\tv\n1\t2\n"), '\t');
    }

    #[test]
    fn test_sniff_single_column_defaults_to_comma() {
        assert_eq!(sniff_delimiter("v\n1\n2\n"), ',');
    }

    #[test]
    fn test_read_header_and_values() {
        let table = read_delimited("t,v\n0,1\n1,2.5e1\n", 0).unwrap();
        assert_eq!(table.column_names(), vec!["t", "v"]);
        assert_eq!(table.column("t").unwrap().values, vec![0.0, 1.0]);
        assert_eq!(table.column("v").unwrap().values, vec![1.0, 25.0]);
    }

    #[test]
    fn test_non_numeric_cells_become_nan() {
        let table = read_delimited("t;label\n0;foo\n1;2\n", 0).unwrap();
        let label = &table.column("label").unwrap().values;
        assert!(label[0].is_nan());
        assert_eq!(label[1], 2.0);
    }

    #[test]
    fn test_skip_rows_before_header() {
        let raw = "# exported by device\n# second line\nt,v\n5,6\n";
        let table = read_delimited(raw, 2).unwrap();
        assert_eq!(table.column_names(), vec!["t", "v"]);
        assert_eq!(table.num_rows(), 1);
    }

    #[test]
    fn test_skipping_everything_is_an_error() {
        assert!(read_delimited("t,v\n1,2\n", 2).is_err());
        assert!(read_delimited("", 0).is_err());
    }

    #[test]
    fn test_too_many_fields_is_an_error() {
        let err = read_delimited("t,v\n1,2\n1,2,3\n", 0).unwrap_err();
        assert!(err.contains("expected 2 fields"), "{err}");
    }

    #[test]
    fn test_header_only_gives_empty_columns() {
        let table = read_delimited("t,v\n", 0).unwrap();
        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.num_rows(), 0);
    }
}
