//! Delimited numeric text tables.
//!
//! Rows are separated by newlines and fields by whitespace, commas or tabs.
//! The delimiter is picked from the first data row. Blank lines and lines
//! starting with `#` are skipped.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};

use crate::error::PlotError;

/// A rectangular table of finite numbers with the source line of every row.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericTable {
    pub path: PathBuf,
    pub columns: usize,
    pub rows: Vec<Vec<f64>>,
    pub lines: Vec<usize>,
}

impl NumericTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, idx: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[idx]).collect()
    }

    pub(crate) fn malformed(&self, row_idx: usize, reason: String) -> PlotError {
        PlotError::MalformedRow {
            path: self.path.clone(),
            line: self.lines.get(row_idx).copied().unwrap_or(0),
            reason,
        }
    }
}

fn detect_delimiter(first_row: &str) -> u8 {
    if first_row.contains(',') {
        b','
    } else if first_row.contains('\t') {
        b'\t'
    } else {
        b' '
    }
}

/// Read a numeric table, rejecting ragged rows, non-numeric and non-finite fields.
pub fn read_numeric_table<P: AsRef<Path>>(path: P) -> Result<NumericTable> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {}", path.display()))?;

    // Keep only data rows so that record i maps back to source line data_lines[i].
    let (data_lines, data): (Vec<usize>, Vec<&str>) = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .unzip();

    if data.is_empty() {
        return Err(PlotError::EmptyFile(path.to_path_buf()).into());
    }

    let delimiter = detect_delimiter(data[0]);
    let joined = data.join("\n");
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(joined.as_bytes());

    let mut rows = Vec::with_capacity(data.len());
    let mut lines = Vec::with_capacity(data.len());
    let mut columns = 0usize;

    for (record_idx, result) in reader.records().enumerate() {
        let line = data_lines.get(record_idx).copied().unwrap_or(record_idx + 1);
        let record = result
            .with_context(|| format!("Failed to read line {} of {}", line, path.display()))?;

        let fields: Vec<&str> = if delimiter == b',' {
            record.iter().collect()
        } else {
            record.iter().flat_map(str::split_whitespace).collect()
        };

        if fields.iter().all(|f| f.is_empty()) {
            return Err(PlotError::MalformedRow {
                path: path.to_path_buf(),
                line,
                reason: "row holds no values".to_string(),
            }
            .into());
        }

        let mut row = Vec::with_capacity(fields.len());
        for field in &fields {
            let value: f64 = field.parse().map_err(|_| PlotError::MalformedRow {
                path: path.to_path_buf(),
                line,
                reason: format!("'{}' is not a number", field),
            })?;
            if !value.is_finite() {
                return Err(PlotError::MalformedRow {
                    path: path.to_path_buf(),
                    line,
                    reason: format!("'{}' is not a finite number", field),
                }
                .into());
            }
            row.push(value);
        }

        if rows.is_empty() {
            columns = row.len();
        } else if row.len() != columns {
            return Err(PlotError::MalformedRow {
                path: path.to_path_buf(),
                line,
                reason: format!("expected {} columns, found {}", columns, row.len()),
            }
            .into());
        }

        rows.push(row);
        lines.push(line);
    }

    log::debug!(
        "Read {} rows x {} columns from {}",
        rows.len(),
        columns,
        path.display()
    );

    Ok(NumericTable {
        path: path.to_path_buf(),
        columns,
        rows,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn malformed_line(err: &anyhow::Error) -> usize {
        match err.downcast_ref::<PlotError>() {
            Some(PlotError::MalformedRow { line, .. }) => *line,
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_whitespace_separated_with_comments() {
        let file = write_temp("# x density\n-1.0   0.10\n\n 0.0\t0.20\n1.0e+00 3.0e-01\n");
        let table = read_numeric_table(file.path()).unwrap();
        assert_eq!(table.columns, 2);
        assert_eq!(table.len(), 3);
        assert_eq!(table.column(0), vec![-1.0, 0.0, 1.0]);
        assert_eq!(table.column(1), vec![0.1, 0.2, 0.3]);
        assert_eq!(table.lines, vec![2, 4, 5]);
    }

    #[test]
    fn test_comma_separated() {
        let file = write_temp("10, 0.5\n20, 0.25\n");
        let table = read_numeric_table(file.path()).unwrap();
        assert_eq!(table.rows, vec![vec![10.0, 0.5], vec![20.0, 0.25]]);
    }

    #[test]
    fn test_ragged_rows_rejected_with_line() {
        let file = write_temp("1 2\n3 4\n5\n");
        let err = read_numeric_table(file.path()).unwrap_err();
        assert_eq!(malformed_line(&err), 3);
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        let file = write_temp("1 2\nx 4\n");
        let err = read_numeric_table(file.path()).unwrap_err();
        assert_eq!(malformed_line(&err), 2);
        assert!(format!("{}", err).contains("'x' is not a number"));
    }

    #[test]
    fn test_nan_rejected() {
        let file = write_temp("1 nan\n");
        let err = read_numeric_table(file.path()).unwrap_err();
        assert_eq!(malformed_line(&err), 1);
    }

    #[test]
    fn test_empty_file_rejected() {
        let file = write_temp("# only a header\n\n");
        let err = read_numeric_table(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PlotError>(),
            Some(PlotError::EmptyFile(_))
        ));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = read_numeric_table("/nonexistent/flipviz/data.out").unwrap_err();
        assert!(format!("{}", err).contains("/nonexistent/flipviz/data.out"));
    }
}
