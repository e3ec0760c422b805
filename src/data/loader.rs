//! CSV Data Loader Module
//! Reads the clickstream CSV into a typed `EventTable` using Polars.

use crate::data::schema::{raw_schema, EventTable, EVENT_COLUMNS, NUMERIC_COLUMNS};
use polars::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Row cap used when the caller has no opinion.
pub const DEFAULT_MAX_ROWS: usize = 10_000_000;

/// Field markers read as missing values, besides the empty field.
pub const NA_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Catch-all column receiving the first field past the header width.
const EXTRA_FIELDS: &str = "__extra_fields";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unexpected header in {}: expected [{}], found [{}]", path.display(), expected.join(", "), found.join(", "))]
    SchemaMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Load at most `max_rows` events from a CSV file.
///
/// Rows with more fields than the header, or whose numeric fields do not
/// parse, are skipped. Empty fields, NA markers and NaN prices become
/// missing values and are left for the cleaner.
pub fn load_events(path: impl AsRef<Path>, max_rows: usize) -> Result<EventTable, LoadError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    check_header(path)?;

    let mut schema = raw_schema();
    schema.with_column(EXTRA_FIELDS.into(), DataType::String);

    let raw = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_schema(Some(Arc::new(schema)))
        .with_null_values(Some(NullValues::AllColumns(
            NA_VALUES.iter().map(|v| (*v).into()).collect(),
        )))
        .with_n_rows(Some(max_rows))
        .with_ignore_errors(true)
        .with_truncate_ragged_lines(true)
        .finish()?
        .collect()?;
    let loaded = raw.height();

    // EventTable::new keeps only the event columns, dropping EXTRA_FIELDS
    let df = raw
        .lazy()
        .filter(col(EXTRA_FIELDS).is_null().and(well_formed()))
        .with_columns(
            NUMERIC_COLUMNS
                .iter()
                .map(|(name, dtype)| {
                    let parsed = col(*name).cast(dtype.clone());
                    if dtype.is_float() {
                        parsed.fill_nan(lit(NULL))
                    } else {
                        parsed
                    }
                })
                .collect::<Vec<_>>(),
        )
        .collect()?;

    let skipped = loaded - df.height();
    if skipped > 0 {
        tracing::warn!(skipped, path = %path.display(), "Skipped malformed rows");
    }
    tracing::info!(rows = df.height(), max_rows, path = %path.display(), "Loaded events");

    Ok(EventTable::new(df)?)
}

/// A row is well formed when every present numeric field parses.
fn well_formed() -> Expr {
    NUMERIC_COLUMNS
        .iter()
        .fold(lit(true), |acc, (name, dtype)| {
            acc.and(
                col(*name)
                    .is_null()
                    .or(col(*name).cast(dtype.clone()).is_not_null()),
            )
        })
}

/// Compare the header row against the expected column names.
fn check_header(path: &Path) -> Result<(), LoadError> {
    let found = header_names(path)?;
    if found.iter().map(String::as_str).eq(EVENT_COLUMNS) {
        Ok(())
    } else {
        Err(LoadError::SchemaMismatch {
            path: path.to_path_buf(),
            expected: EVENT_COLUMNS.iter().map(|s| s.to_string()).collect(),
            found,
        })
    }
}

/// Column names of the header row as parsed by the CSV reader.
fn header_names(path: &Path) -> Result<Vec<String>, LoadError> {
    let metadata = fs::metadata(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.len() == 0 {
        return Ok(Vec::new());
    }

    let schema = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect_schema()?;
    Ok(schema
        .iter_names()
        .map(|name| name.trim().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_found() {
        let err = load_events("/definitely/not/here.csv", 10).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn na_markers_include_common_spellings() {
        for marker in ["nan", "NaN", "NA", "N/A", "NULL", "null", "None"] {
            assert!(NA_VALUES.contains(&marker), "{}", marker);
        }
    }
}
