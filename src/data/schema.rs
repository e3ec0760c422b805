//! Event Schema Module
//! Column names, typed polars schema and the typed `EventRecord` row.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const EVENT_TIME: &str = "event_time";
pub const EVENT_TYPE: &str = "event_type";
pub const PRODUCT_ID: &str = "product_id";
pub const CATEGORY_ID: &str = "category_id";
pub const CATEGORY_CODE: &str = "category_code";
pub const BRAND: &str = "brand";
pub const PRICE: &str = "price";
pub const USER_ID: &str = "user_id";
pub const USER_SESSION: &str = "user_session";

/// Header of the source file, in order.
pub const EVENT_COLUMNS: [&str; 9] = [
    EVENT_TIME,
    EVENT_TYPE,
    PRODUCT_ID,
    CATEGORY_ID,
    CATEGORY_CODE,
    BRAND,
    PRICE,
    USER_ID,
    USER_SESSION,
];

/// Columns parsed as numbers after the raw text has been read.
pub const NUMERIC_COLUMNS: [(&str, DataType); 4] = [
    (PRODUCT_ID, DataType::Int64),
    (CATEGORY_ID, DataType::Int64),
    (PRICE, DataType::Float64),
    (USER_ID, DataType::Int64),
];

/// Schema used while reading: every column as text.
pub fn raw_schema() -> Schema {
    Schema::from_iter(
        EVENT_COLUMNS
            .iter()
            .map(|name| Field::new((*name).into(), DataType::String)),
    )
}

/// Schema of a loaded `EventTable`.
pub fn event_schema() -> Schema {
    Schema::from_iter(EVENT_COLUMNS.iter().map(|name| {
        let dtype = NUMERIC_COLUMNS
            .iter()
            .find(|(numeric, _)| numeric == name)
            .map(|(_, dtype)| dtype.clone())
            .unwrap_or(DataType::String);
        Field::new((*name).into(), dtype)
    }))
}

/// Known user actions in the clickstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    View,
    Cart,
    Purchase,
    RemoveFromCart,
}

impl EventType {
    pub const ALL: [EventType; 4] = [
        EventType::View,
        EventType::Cart,
        EventType::Purchase,
        EventType::RemoveFromCart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::View => "view",
            EventType::Cart => "cart",
            EventType::Purchase => "purchase",
            EventType::RemoveFromCart => "remove_from_cart",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event type: {0}")]
pub struct UnknownEventType(pub String);

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}

/// One row of the event table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_time: String,
    pub event_type: String,
    pub product_id: i64,
    pub category_id: i64,
    pub category_code: Option<String>,
    pub brand: Option<String>,
    pub price: f64,
    pub user_id: i64,
    pub user_session: String,
}

/// In-memory event table backed by a typed DataFrame.
#[derive(Debug, Clone)]
pub struct EventTable {
    df: DataFrame,
}

impl EventTable {
    /// Wrap a DataFrame that already carries the event schema.
    pub fn new(df: DataFrame) -> PolarsResult<Self> {
        let expected = event_schema();
        let schema = df.schema();
        for (name, dtype) in expected.iter() {
            match schema.get(name) {
                Some(found) if found == dtype => {}
                Some(found) => polars_bail!(
                    SchemaMismatch: "column `{}` has type {}, expected {}", name, found, dtype
                ),
                None => polars_bail!(ColumnNotFound: "{}", name),
            }
        }
        let df = df.select(EVENT_COLUMNS)?;
        Ok(Self { df })
    }

    pub fn empty() -> Self {
        Self {
            df: DataFrame::empty_with_schema(&event_schema()),
        }
    }

    /// Build a table from typed records, mostly for fixtures and previews.
    pub fn from_records(records: &[EventRecord]) -> PolarsResult<Self> {
        let df = DataFrame::new(vec![
            Column::new(
                EVENT_TIME.into(),
                records.iter().map(|r| r.event_time.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                EVENT_TYPE.into(),
                records.iter().map(|r| r.event_type.clone()).collect::<Vec<_>>(),
            ),
            Column::new(
                PRODUCT_ID.into(),
                records.iter().map(|r| r.product_id).collect::<Vec<i64>>(),
            ),
            Column::new(
                CATEGORY_ID.into(),
                records.iter().map(|r| r.category_id).collect::<Vec<i64>>(),
            ),
            Column::new(
                CATEGORY_CODE.into(),
                records
                    .iter()
                    .map(|r| r.category_code.clone())
                    .collect::<Vec<Option<String>>>(),
            ),
            Column::new(
                BRAND.into(),
                records
                    .iter()
                    .map(|r| r.brand.clone())
                    .collect::<Vec<Option<String>>>(),
            ),
            Column::new(
                PRICE.into(),
                records.iter().map(|r| r.price).collect::<Vec<f64>>(),
            ),
            Column::new(
                USER_ID.into(),
                records.iter().map(|r| r.user_id).collect::<Vec<i64>>(),
            ),
            Column::new(
                USER_SESSION.into(),
                records.iter().map(|r| r.user_session.clone()).collect::<Vec<_>>(),
            ),
        ])?;
        Self::new(df)
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_dataframe(self) -> DataFrame {
        self.df
    }

    /// First `n` rows as typed records.
    ///
    /// Rows missing a required attribute (anything but category code and
    /// brand) have no `EventRecord` form and are left out.
    pub fn records(&self, n: usize) -> PolarsResult<Vec<EventRecord>> {
        let head = self.df.head(Some(n));
        let event_time = head.column(EVENT_TIME)?.str()?;
        let event_type = head.column(EVENT_TYPE)?.str()?;
        let product_id = head.column(PRODUCT_ID)?.i64()?;
        let category_id = head.column(CATEGORY_ID)?.i64()?;
        let category_code = head.column(CATEGORY_CODE)?.str()?;
        let brand = head.column(BRAND)?.str()?;
        let price = head.column(PRICE)?.f64()?;
        let user_id = head.column(USER_ID)?.i64()?;
        let user_session = head.column(USER_SESSION)?.str()?;

        let records = (0..head.height())
            .filter_map(|i| {
                Some(EventRecord {
                    event_time: event_time.get(i)?.to_string(),
                    event_type: event_type.get(i)?.to_string(),
                    product_id: product_id.get(i)?,
                    category_id: category_id.get(i)?,
                    category_code: category_code.get(i).map(str::to_string),
                    brand: brand.get(i).map(str::to_string),
                    price: price.get(i)?,
                    user_id: user_id.get(i)?,
                    user_session: user_session.get(i)?.to_string(),
                })
            })
            .collect();
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(event_type: &str, brand: Option<&str>) -> EventRecord {
        EventRecord {
            event_time: "2019-11-01 00:00:00 UTC".to_string(),
            event_type: event_type.to_string(),
            product_id: 1003461,
            category_id: 2053013555631882655,
            category_code: Some("electronics.smartphone".to_string()),
            brand: brand.map(str::to_string),
            price: 489.07,
            user_id: 520088904,
            user_session: "4d3b30da-a5e4-49df-b1a8-ba5943f1dd33".to_string(),
        }
    }

    #[test]
    fn event_type_parses_known_labels() {
        for t in EventType::ALL {
            assert_eq!(t.as_str().parse::<EventType>().unwrap(), t);
        }
        assert!("checkout".parse::<EventType>().is_err());
    }

    #[test]
    fn records_survive_table_conversion() {
        let input = vec![record("view", Some("xiaomi")), record("purchase", None)];
        let table = EventTable::from_records(&input).unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(table.records(10).unwrap(), input);
        assert_eq!(table.records(1).unwrap().len(), 1);
    }

    #[test]
    fn new_rejects_wrong_column_type() {
        let df = df!(
            EVENT_TIME => ["t"],
            EVENT_TYPE => ["view"],
            PRODUCT_ID => ["not a number"],
            CATEGORY_ID => [1i64],
            CATEGORY_CODE => ["c"],
            BRAND => ["b"],
            PRICE => [1.0f64],
            USER_ID => [1i64],
            USER_SESSION => ["s"]
        )
        .unwrap();
        assert!(EventTable::new(df).is_err());
    }

    #[test]
    fn empty_table_has_event_schema() {
        let table = EventTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.dataframe().schema().len(), EVENT_COLUMNS.len());
    }
}
