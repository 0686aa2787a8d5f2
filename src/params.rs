//! Two-column `param`/`value` configuration tables.

use serde::Deserialize;

use std::path::Path;

use crate::table::{
    io::{csv_error, reader_for},
    TableError,
};

#[derive(Debug, Deserialize, Clone)]
struct ParamRecord {
    param: String,
    value: String,
}

/// Key/value settings read from a parameter table, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let mut rdr = reader_for(path)?;
        let headers = rdr.headers().map_err(|e| csv_error(path, e))?.clone();
        for required in ["param", "value"] {
            if !headers.iter().any(|h| h == required) {
                return Err(TableError::MissingParamColumn(required));
            }
        }
        let mut entries = Vec::new();
        for rec in rdr.records() {
            let mut rec = rec.map_err(|e| csv_error(path, e))?;
            // Exporters may drop the trailing tab of a blank value
            while rec.len() < headers.len() {
                rec.push_field("");
            }
            let rec: ParamRecord = rec.deserialize(Some(&headers))?;
            entries.push((rec.param, rec.value));
        }
        Ok(Params { entries })
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Params {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value for `key`. When a key is repeated the last entry wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The `filter` setting, if present and not blank.
    pub fn filter(&self) -> Option<&str> {
        self.get("filter").filter(|f| !f.trim().is_empty())
    }
}
