//! Data module - CSV loading, cleaning and aggregation

pub mod aggregator;
pub mod cleaner;
pub mod loader;
pub mod pipeline;
pub mod schema;

pub use aggregator::{count_by_event_type, top_brands_by_event, BrandCount, BrandRanking, EventTypeCounts};
pub use cleaner::{clean, duplicate_count};
pub use loader::{load_events, LoadError, DEFAULT_MAX_ROWS};
pub use pipeline::{DashboardData, EmptyResultWarning, PipelineError, PipelineOptions};
pub use schema::{EventRecord, EventTable, EventType};
