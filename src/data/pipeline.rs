//! Dashboard Pipeline
//! Load → clean → aggregate, shaped into the data the presentation layer draws.

use crate::data::aggregator::{count_by_event_type, top_brands_by_event, BrandRanking, EventTypeCounts};
use crate::data::cleaner::{clean, duplicate_count};
use crate::data::loader::{load_events, LoadError, DEFAULT_MAX_ROWS};
use crate::data::schema::{EventRecord, EventTable, EventType};
use polars::prelude::PolarsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("Aggregation failed: {0}")]
    Polars(#[from] PolarsError),
}

/// Non-fatal: an aggregation produced no groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmptyResultWarning {
    NoEvents,
    NoBrands { event_type: EventType },
}

impl fmt::Display for EmptyResultWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyResultWarning::NoEvents => write!(f, "no events left after cleaning"),
            EmptyResultWarning::NoBrands { event_type } => {
                write!(f, "no branded '{}' events", event_type)
            }
        }
    }
}

/// Parameters of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub path: PathBuf,
    pub max_rows: usize,
    pub preview_rows: usize,
    pub top_n: usize,
}

impl PipelineOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_rows: DEFAULT_MAX_ROWS,
            preview_rows: 10,
            top_n: 10,
        }
    }
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub source: Option<PathBuf>,
    pub loaded_rows: usize,
    pub duplicate_rows: usize,
    pub row_count: usize,
    pub preview: Vec<EventRecord>,
    pub event_types: EventTypeCounts,
    pub purchased: BrandRanking,
    pub viewed: BrandRanking,
    pub warnings: Vec<EmptyResultWarning>,
}

/// Run the whole pipeline against a CSV file.
pub fn run(options: &PipelineOptions) -> Result<DashboardData, PipelineError> {
    let table = load_events(&options.path, options.max_rows)?;
    let mut data = summarize(&table, options.preview_rows, options.top_n)?;
    data.source = Some(options.path.clone());
    Ok(data)
}

/// Clean and aggregate an already loaded table.
pub fn summarize(
    table: &EventTable,
    preview_rows: usize,
    top_n: usize,
) -> Result<DashboardData, PipelineError> {
    let duplicate_rows = duplicate_count(table)?;
    if duplicate_rows > 0 {
        tracing::info!(duplicate_rows, "Found duplicate rows");
    }

    let cleaned = clean(table)?;
    tracing::info!(
        loaded = table.height(),
        cleaned = cleaned.height(),
        "Cleaned events"
    );

    let event_types = count_by_event_type(&cleaned)?;
    let purchased = top_brands_by_event(&cleaned, EventType::Purchase, top_n)?;
    let viewed = top_brands_by_event(&cleaned, EventType::View, top_n)?;

    let mut warnings = Vec::new();
    if event_types.is_empty() {
        warnings.push(EmptyResultWarning::NoEvents);
    }
    if purchased.is_empty() {
        warnings.push(EmptyResultWarning::NoBrands {
            event_type: EventType::Purchase,
        });
    }
    if viewed.is_empty() {
        warnings.push(EmptyResultWarning::NoBrands {
            event_type: EventType::View,
        });
    }
    for warning in &warnings {
        tracing::warn!(%warning, "Empty aggregation");
    }

    Ok(DashboardData {
        source: None,
        loaded_rows: table.height(),
        duplicate_rows,
        row_count: cleaned.height(),
        preview: cleaned.records(preview_rows)?,
        event_types,
        purchased,
        viewed,
        warnings,
    })
}

impl DashboardData {
    pub fn source_name(&self) -> Option<String> {
        self.source
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().to_string())
    }
}
