//! The `column:value` filter language shared by the reporting tools.
//!
//! A filter string is a comma-separated list of clauses. `column:value` keeps
//! only rows whose `column` equals `value`; `~column:value` drops them. Values
//! given for the same column are alternatives, distinct columns must all
//! match. The literal `''` stands for an empty cell:
//!
//! ```text
//! country:Brazil, country:Peru, ~division:''
//! ```

use itertools::Itertools;
use thiserror::Error;

use std::{fmt, str::FromStr};

use crate::table::Table;

const EMPTY_LITERAL: &str = "''";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Malformed filter clause '{clause}': expected 'column:value' or '~column:value'")]
    MalformedClause { clause: String },

    #[error("Filter column '{column}' not found in table")]
    ColumnNotFound { column: String },
}

/// One `column:value` unit, optionally negated with a leading `~`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub column: String,
    pub value: String,
    pub negate: bool,
}

impl FilterClause {
    /// Parse a single trimmed clause. Only the first `:` separates the column
    /// from the value.
    pub fn parse(raw: &str) -> Result<Self, FilterError> {
        let (negate, body) = match raw.strip_prefix('~') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let (column, value) = body
            .split_once(':')
            .ok_or_else(|| FilterError::MalformedClause {
                clause: raw.to_string(),
            })?;
        let value = if value == EMPTY_LITERAL { "" } else { value };
        Ok(FilterClause {
            column: column.to_string(),
            value: value.to_string(),
            negate,
        })
    }
}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.value.is_empty() {
            EMPTY_LITERAL
        } else {
            self.value.as_str()
        };
        let tilde = if self.negate { "~" } else { "" };
        write!(f, "{}{}:{}", tilde, self.column, value)
    }
}

/// A parsed filter string. Immutable once parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpression {
    clauses: Vec<FilterClause>,
}

/// A column resolved against a concrete table, with its value set.
struct Criterion<'a> {
    index: usize,
    column: &'a str,
    values: Vec<&'a str>,
}

impl<'a> Criterion<'a> {
    fn matches(&self, row: &[String]) -> bool {
        let cell = row[self.index].as_str();
        self.values.iter().any(|v| *v == cell)
    }
}

impl FilterExpression {
    pub fn parse(criteria: &str) -> Result<Self, FilterError> {
        let clauses = criteria
            .split(',')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(FilterClause::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FilterExpression { clauses })
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Accepted values per column, columns in first-seen order.
    pub fn includes(&self) -> Vec<(&str, Vec<&str>)> {
        self.grouped(false)
    }

    /// Rejected values per column, columns in first-seen order.
    pub fn excludes(&self) -> Vec<(&str, Vec<&str>)> {
        self.grouped(true)
    }

    fn grouped(&self, negate: bool) -> Vec<(&str, Vec<&str>)> {
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        for clause in self.clauses.iter().filter(|c| c.negate == negate) {
            let value = clause.value.as_str();
            match groups.iter_mut().find(|(col, _)| *col == clause.column) {
                Some((_, values)) => {
                    if !values.contains(&value) {
                        values.push(value);
                    }
                }
                None => groups.push((clause.column.as_str(), vec![value])),
            }
        }
        groups
    }

    fn resolve<'a>(
        table: &Table,
        groups: Vec<(&'a str, Vec<&'a str>)>,
    ) -> Result<Vec<Criterion<'a>>, FilterError> {
        groups
            .into_iter()
            .map(|(column, values)| {
                let index = table
                    .column_index(column)
                    .ok_or_else(|| FilterError::ColumnNotFound {
                        column: column.to_string(),
                    })?;
                Ok(Criterion {
                    index,
                    column,
                    values,
                })
            })
            .collect()
    }

    /// Rows of `table` that pass every inclusion column and no exclusion
    /// column, in their original order.
    ///
    /// Every referenced column is checked before any row is examined, so an
    /// error never comes with partial output.
    pub fn apply(&self, table: &Table) -> Result<Table, FilterError> {
        let include = Self::resolve(table, self.includes())?;
        let exclude = Self::resolve(table, self.excludes())?;

        for c in &include {
            log::info!(
                "Including only rows with '{}' = '{}'",
                c.column,
                c.values.iter().join(", ")
            );
        }
        for c in &exclude {
            log::info!(
                "Excluding all rows with '{}' = '{}'",
                c.column,
                c.values.iter().join(", ")
            );
        }

        let filtered = table.select(|row| {
            include.iter().all(|c| c.matches(row)) && !exclude.iter().any(|c| c.matches(row))
        });
        log::debug!("Filter kept {} of {} rows", filtered.len(), table.len());
        Ok(filtered)
    }
}

impl FromStr for FilterExpression {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterExpression::parse(s)
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clauses.iter().join(", "))
    }
}

/// Apply an optional filter string to `table`. An absent or blank filter
/// returns the table unchanged.
pub fn filter_table(table: &Table, criteria: Option<&str>) -> Result<Table, FilterError> {
    match criteria {
        Some(c) if !c.trim().is_empty() => {
            log::info!("Filtering rows...");
            FilterExpression::parse(c)?.apply(table)
        }
        _ => Ok(table.clone()),
    }
}
