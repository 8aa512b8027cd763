use crate::error::{PostError, Result};
use crate::table::Table;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fmt::Display;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Raw string content of a CSV file, as returned by [`read_csv`].
#[derive(Debug, Clone, PartialEq)]
pub enum CsvData {
    /// One entry per requested column, in request order.
    Columns(Vec<Vec<String>>),
    /// Every record of a header-less file.
    Rows(Vec<Vec<String>>),
}

fn open_reader(path: &Path, has_headers: bool) -> Result<csv::Reader<BufReader<File>>> {
    let file = File::open(path).map_err(|e| PostError::io(path, e))?;
    Ok(ReaderBuilder::new()
        .has_headers(has_headers)
        .delimiter(b',')
        .flexible(true)
        .from_reader(BufReader::new(file)))
}

/// Reads the named columns of a header-labelled file. Values stay as the
/// strings found in the file.
pub fn read_columns(path: &Path, fields: &[&str]) -> Result<Vec<Vec<String>>> {
    let mut rdr = open_reader(path, true)?;
    let headers = rdr.headers().map_err(|e| PostError::csv(path, e))?.clone();

    let indices = fields
        .iter()
        .map(|field| {
            headers
                .iter()
                .position(|h| h == *field)
                .ok_or_else(|| PostError::MissingColumn {
                    path: path.to_path_buf(),
                    name: field.to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut data = vec![Vec::new(); fields.len()];
    for result in rdr.records() {
        let record = result.map_err(|e| PostError::csv(path, e))?;
        for (column, &index) in data.iter_mut().zip(&indices) {
            // short rows still have to yield a value per column
            let value = record.get(index).ok_or_else(|| PostError::MissingColumn {
                path: path.to_path_buf(),
                name: headers[index].to_string(),
            })?;
            column.push(value.to_string());
        }
    }
    Ok(data)
}

/// Reads a header-less file as rows of strings.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut rdr = open_reader(path, false)?;
    rdr.records()
        .map(|result| {
            result
                .map(|record: StringRecord| record.iter().map(str::to_string).collect::<Vec<_>>())
                .map_err(|e| PostError::csv(path, e))
        })
        .collect()
}

pub fn read_csv(path: &Path, fields: Option<&[&str]>) -> Result<CsvData> {
    match fields {
        Some(fields) => read_columns(path, fields).map(CsvData::Columns),
        None => read_rows(path).map(CsvData::Rows),
    }
}

/// Outcome of [`write_csv`]. Rows containing NaN are still written; their
/// indices are reported here so callers can act on them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WriteReport {
    pub rows_written: usize,
    pub nan_rows: Vec<usize>,
}

impl WriteReport {
    pub fn is_clean(&self) -> bool {
        self.nan_rows.is_empty()
    }
}

// Shortest round-trip form, always with a decimal point or exponent.
pub fn format_value(value: f64) -> String {
    format!("{:?}", value)
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| PostError::io(dir, e))
        }
        _ => Ok(()),
    }
}

/// Writes `table` row by row without a header, replacing any existing file.
pub fn write_csv(path: &Path, table: &Table) -> Result<WriteReport> {
    create_parent(path)?;
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| PostError::csv(path, e))?;

    let mut report = WriteReport::default();
    for index in 0..table.num_rows() {
        let row = table.row(index);
        if row.iter().any(|v| v.is_nan()) {
            log::warn!("NaN in row {} of {:?}: {:?}", index, path, row);
            report.nan_rows.push(index);
        }
        wtr.write_record(row.iter().map(|&v| format_value(v)))
            .map_err(|e| PostError::csv(path, e))?;
        report.rows_written += 1;
    }

    wtr.flush().map_err(|e| PostError::io(path, e))?;
    Ok(report)
}

/// Writes integer rows without a header, one row per run.
pub fn write_int_rows<T: Display>(path: &Path, rows: &[Vec<T>]) -> Result<()> {
    create_parent(path)?;
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| PostError::csv(path, e))?;
    for row in rows {
        wtr.write_record(row.iter().map(|v| v.to_string()))
            .map_err(|e| PostError::csv(path, e))?;
    }
    wtr.flush().map_err(|e| PostError::io(path, e))?;
    Ok(())
}

/// Reads a `dofs,mortar_dofs` pair from a header-less auxiliary file.
pub fn read_dof_counts(path: &Path) -> Result<(i64, i64)> {
    let parse_error = |message: String| PostError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let rows: Vec<Vec<String>> = read_rows(path)?
        .into_iter()
        .filter(|row| row.iter().any(|v| !v.trim().is_empty()))
        .collect();

    let [row] = rows.as_slice() else {
        return Err(parse_error(format!("expected one row, found {}", rows.len())));
    };
    let [dofs, mortar] = row.as_slice() else {
        return Err(parse_error(format!("expected two values, found {}", row.len())));
    };

    let parse = |value: &str| {
        value
            .trim()
            .parse::<i64>()
            .map_err(|e| parse_error(format!("'{}': {}", value, e)))
    };
    Ok((parse(dofs.as_str())?, parse(mortar.as_str())?))
}
