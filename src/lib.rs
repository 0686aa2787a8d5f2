//! Row filtering for surveillance tables.
//!
//! Tables are loaded from TSV/CSV exports, narrowed with a filter string such
//! as `"country:Brazil, ~division:''"` and written back out as TSV.

pub mod filter;
pub mod params;
pub mod table;

pub use filter::{filter_table, FilterClause, FilterError, FilterExpression};
pub use params::Params;
pub use table::{Row, Table, TableError};
