//! Aggregation Module
//! Group-by counts feeding the dashboard charts.

use crate::data::schema::{EventTable, EventType, BRAND, EVENT_TYPE};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const COUNT: &str = "count";

/// Number of rows per event type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventTypeCounts {
    counts: BTreeMap<String, u64>,
}

impl EventTypeCounts {
    pub fn get(&self, event_type: &str) -> u64 {
        self.counts.get(event_type).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Display order: count descending, then label.
    pub fn ranked(&self) -> Vec<(String, u64)> {
        let mut ranked: Vec<(String, u64)> =
            self.counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }
}

impl FromIterator<(String, u64)> for EventTypeCounts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// One `(brand, count)` entry of a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandCount {
    pub brand: String,
    pub count: u64,
}

impl BrandCount {
    pub fn new(brand: impl Into<String>, count: u64) -> Self {
        Self {
            brand: brand.into(),
            count,
        }
    }
}

/// Brands ordered by count descending, ties by brand ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandRanking {
    entries: Vec<BrandCount>,
}

impl BrandRanking {
    pub fn entries(&self) -> &[BrandCount] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }
}

impl FromIterator<BrandCount> for BrandRanking {
    fn from_iter<I: IntoIterator<Item = BrandCount>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Count rows per event type. Rows without an event type are not counted.
pub fn count_by_event_type(table: &EventTable) -> PolarsResult<EventTypeCounts> {
    let grouped = table
        .dataframe()
        .clone()
        .lazy()
        .filter(col(EVENT_TYPE).is_not_null())
        .group_by([col(EVENT_TYPE)])
        .agg([len().alias(COUNT)])
        .collect()?;

    let labels = grouped.column(EVENT_TYPE)?.str()?;
    let counts = grouped.column(COUNT)?.cast(&DataType::UInt64)?;
    let counts = counts.u64()?;

    Ok(labels
        .into_iter()
        .zip(counts.into_iter())
        .filter_map(|(label, count)| Some((label?.to_string(), count?)))
        .collect())
}

/// Top `limit` brands among rows of `event_type`, skipping rows without a brand.
pub fn top_brands_by_event(
    table: &EventTable,
    event_type: EventType,
    limit: usize,
) -> PolarsResult<BrandRanking> {
    if limit == 0 {
        return Ok(BrandRanking::default());
    }

    let ranked = table
        .dataframe()
        .clone()
        .lazy()
        .filter(col(EVENT_TYPE).eq(lit(event_type.as_str())))
        .filter(col(BRAND).is_not_null())
        .group_by([col(BRAND)])
        .agg([len().alias(COUNT)])
        .sort(
            [COUNT, BRAND],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .limit(IdxSize::try_from(limit).unwrap_or(IdxSize::MAX))
        .collect()?;

    let brands = ranked.column(BRAND)?.str()?;
    let counts = ranked.column(COUNT)?.cast(&DataType::UInt64)?;
    let counts = counts.u64()?;

    Ok(brands
        .into_iter()
        .zip(counts.into_iter())
        .filter_map(|(brand, count)| Some(BrandCount::new(brand?, count?)))
        .collect())
}
