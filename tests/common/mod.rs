#![allow(dead_code)]

use ecommerce_behavior::data::EventRecord;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const HEADER: &str =
    "event_time,event_type,product_id,category_id,category_code,brand,price,user_id,user_session";

/// Write `lines` (without header) to a CSV file inside `dir`.
pub fn write_events(dir: &TempDir, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.path().join(name);
    let mut text = String::from(HEADER);
    text.push('\n');
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    fs::write(&path, text).unwrap();
    path
}

/// A CSV data line; `brand` of `None` leaves the field empty.
pub fn event_line(event_type: &str, brand: Option<&str>, user_id: i64) -> String {
    format!(
        "2019-11-01 00:00:{:02} UTC,{},1004856,2053013555631882655,electronics.smartphone,{},130.76,{},sess-{}",
        user_id % 60,
        event_type,
        brand.unwrap_or(""),
        user_id,
        user_id
    )
}

pub fn record(event_type: &str, brand: Option<&str>, user_id: i64) -> EventRecord {
    EventRecord {
        event_time: format!("2019-11-01 00:00:{:02} UTC", user_id % 60),
        event_type: event_type.to_string(),
        product_id: 1004856,
        category_id: 2053013555631882655,
        category_code: Some("electronics.smartphone".to_string()),
        brand: brand.map(str::to_string),
        price: 130.76,
        user_id,
        user_session: format!("sess-{}", user_id),
    }
}
