//! Data Cleaner Module
//! Removes exact-duplicate rows, then rows with any missing value.

use crate::data::schema::EventTable;
use polars::prelude::*;

/// Return a cleaned copy of the table.
///
/// Duplicates are removed first (first occurrence kept, order preserved),
/// then every row that still has a missing attribute.
pub fn clean(table: &EventTable) -> PolarsResult<EventTable> {
    let df = table
        .dataframe()
        .clone()
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .drop_nulls(None)
        .collect()?;

    tracing::debug!(
        before = table.height(),
        after = df.height(),
        "Cleaned event table"
    );
    EventTable::new(df)
}

/// Number of rows that repeat an earlier row field for field.
pub fn duplicate_count(table: &EventTable) -> PolarsResult<usize> {
    let unique = table
        .dataframe()
        .clone()
        .lazy()
        .unique(None, UniqueKeepStrategy::First)
        .collect()?;
    Ok(table.height() - unique.height())
}
