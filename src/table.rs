use itertools::Itertools;
use thiserror::Error;

use std::{cmp::Ordering, collections::HashSet, path::PathBuf};

pub mod io;

pub use io::{load, write_tsv};

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed table data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Wrong file format: {}. Compatible file formats: TSV, CSV", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Duplicate column name '{0}' in header")]
    DuplicateColumn(String),

    #[error("Row {row} has {found} values but the header only has {expected} columns")]
    RowTooWide {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    #[error("Parameter table has no '{0}' column")]
    MissingParamColumn(&'static str),
}

/// An in-memory table of string cells with a fixed header.
///
/// Every row holds exactly one value per column; cells missing from the
/// source are stored as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Borrowed view of a single table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [String],
}

impl<'a> Row<'a> {
    /// Value of `column` in this row, or `None` if the table has no such column.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i].as_str())
    }

    pub fn values(&self) -> &'a [String] {
        self.values
    }
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for c in &columns {
            if !seen.insert(c.as_str()) {
                return Err(TableError::DuplicateColumn(c.clone()));
            }
        }
        let width = columns.len();
        let mut padded = Vec::with_capacity(rows.len());
        for (n, mut row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(TableError::RowTooWide {
                    row: n + 1,
                    found: row.len(),
                    expected: width,
                });
            }
            row.resize(width, String::new());
            padded.push(row);
        }
        Ok(Table {
            columns,
            rows: padded,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Cell at (`row`, `column`). `None` if either is out of range.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// New table holding the rows for which `keep` returns true, in input order.
    pub fn select<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[String]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| keep(r.as_slice()))
                .cloned()
                .collect(),
        }
    }

    fn indices<S: AsRef<str>>(&self, columns: &[S]) -> Result<Vec<usize>, TableError> {
        columns
            .iter()
            .map(|c| {
                self.column_index(c.as_ref())
                    .ok_or_else(|| TableError::ColumnNotFound(c.as_ref().to_string()))
            })
            .collect()
    }

    /// Drop rows where any of the identifier `columns` is blank.
    pub fn retain_nonblank<S: AsRef<str>>(&self, columns: &[S]) -> Result<Table, TableError> {
        let idx = self.indices(columns)?;
        Ok(self.select(|r| idx.iter().all(|&i| !r[i].is_empty())))
    }

    /// Stable sort by the given columns, compared as strings left to right.
    pub fn sorted_by<S: AsRef<str>>(&self, columns: &[S]) -> Result<Table, TableError> {
        let idx = self.indices(columns)?;
        let rows = self
            .rows
            .iter()
            .sorted_by(|a, b| {
                idx.iter()
                    .map(|&i| a[i].cmp(&b[i]))
                    .find(|o| *o != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            })
            .cloned()
            .collect();
        Ok(Table {
            columns: self.columns.clone(),
            rows,
        })
    }
}
