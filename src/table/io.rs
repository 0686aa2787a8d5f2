//! Reading and writing delimited table files.

use super::{Table, TableError};

use std::path::Path;

/// Field delimiter for `path`, picked from its extension.
pub(crate) fn delimiter_for(path: &Path) -> Result<u8, TableError> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("tsv") => Ok(b'\t'),
        Some("csv") => Ok(b','),
        _ => Err(TableError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// I/O failures inside `csv` are reported against `path`; everything else is
/// a data error.
pub(crate) fn csv_error(path: &Path, err: csv::Error) -> TableError {
    if err.is_io_error() {
        TableError::Io {
            path: path.to_path_buf(),
            source: err.into(),
        }
    } else {
        TableError::Csv(err)
    }
}

pub(crate) fn reader_for(path: &Path) -> Result<csv::Reader<std::fs::File>, TableError> {
    let delimiter = delimiter_for(path)?;
    let infile = std::fs::File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(infile))
}

/// Load a TSV or CSV file. The first line is the header; every cell is kept
/// as a string and missing cells become empty strings.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Table, TableError> {
    let path = path.as_ref();
    let mut rdr = reader_for(path)?;
    let columns: Vec<String> = rdr
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(str::to_string)
        .collect();
    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec.map_err(|e| csv_error(path, e))?;
        rows.push(rec.iter().map(str::to_string).collect());
    }
    log::debug!(
        "Loaded {} rows x {} columns from {}",
        rows.len(),
        columns.len(),
        path.display()
    );
    Table::new(columns, rows)
}

/// Write `table` as tab-separated values, header first.
pub fn write_tsv<P: AsRef<Path>>(table: &Table, path: P) -> Result<(), TableError> {
    let path = path.as_ref();
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;
    wtr.write_record(table.columns()).map_err(|e| csv_error(path, e))?;
    for row in table.rows() {
        wtr.write_record(row.values()).map_err(|e| csv_error(path, e))?;
    }
    wtr.flush().map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })
}
